//! Forecast panel rendering
//!
//! Shows the forecast for the area picked in the rail: a title, the sub-area
//! line, and one collapsible row per day. Expanded rows reveal the weather
//! text and any wind or wave details.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, PanelState, NO_DATA_MESSAGE};
use crate::service::{AreaView, FailureKind, ViewSource};

/// Short label for a failure kind
fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Network => "Network error",
        FailureKind::Payload => "Unexpected response",
        FailureKind::NoData => "No data",
        FailureKind::Storage => "Storage error",
    }
}

fn title_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Renders the forecast panel into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match &app.panel {
        PanelState::Prompt => vec![Line::from(Span::styled(
            "地域を選択してください",
            Style::default().fg(Color::DarkGray),
        ))],
        PanelState::Loading { title } => vec![
            title_line(title),
            Line::from(""),
            Line::from(Span::styled(
                "Loading forecast...",
                Style::default().fg(Color::Cyan),
            )),
        ],
        PanelState::Loaded(view) => loaded_lines(app, view),
        PanelState::NoData { title } => vec![
            title_line(title),
            Line::from(""),
            Line::from(Span::styled(NO_DATA_MESSAGE, Style::default().fg(Color::Red))),
        ],
        PanelState::Failed {
            title,
            kind,
            message,
        } => vec![
            title_line(title),
            Line::from(""),
            Line::from(Span::styled(
                failure_label(*kind),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    let border_color = if app.focus == Focus::Rows {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" 天気予報 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn loaded_lines(app: &App, view: &AreaView) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(&view.title)];

    if let Some(subtitle) = &view.subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    if view.rows.is_empty() {
        lines.push(Line::from(Span::styled(
            NO_DATA_MESSAGE,
            Style::default().fg(Color::Red),
        )));
        return lines;
    }

    for (index, row) in view.rows.iter().enumerate() {
        let is_cursor = app.focus == Focus::Rows && app.row_cursor == index;
        let expanded = app.is_expanded(index);

        let cursor = if is_cursor { "\u{25B8} " } else { "  " }; // ▸
        let fold = if expanded { "\u{25BE} " } else { "\u{25B9} " }; // ▾ or ▹
        let label_style = if is_cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
            Span::styled(fold, Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} ", row.icon.glyph())),
            Span::styled(row.label.clone(), label_style),
        ]));

        if expanded {
            lines.push(Line::from(vec![
                Span::raw("      "),
                Span::raw(row.weather.clone()),
            ]));
            for detail in &row.details {
                lines.push(Line::from(Span::styled(
                    format!("      {}", detail),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    if view.source == ViewSource::Cache {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Shown from local cache",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}
