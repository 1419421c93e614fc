//! Scatter chart of scraped spots: text length against section count

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::store::SpotRecord;

/// (text_length, section_count) pairs
pub fn points(records: &[SpotRecord]) -> Vec<(f64, f64)> {
    records
        .iter()
        .map(|r| (r.text_length as f64, r.section_count as f64))
        .collect()
}

/// Upper axis bound with some headroom; never below 1
fn axis_bound(max: f64) -> f64 {
    (max + max / 10.0).ceil().max(1.0)
}

fn axis_labels(bound: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", bound / 2.0)),
        Span::raw(format!("{:.0}", bound)),
    ]
}

/// Renders the chart over the whole frame
pub fn render(frame: &mut Frame, records: &[SpotRecord]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());

    let data = points(records);
    let x_bound = axis_bound(data.iter().map(|p| p.0).fold(0.0, f64::max));
    let y_bound = axis_bound(data.iter().map(|p| p.1).fold(0.0, f64::max));

    let datasets = vec![Dataset::default()
        .name(format!("spots ({})", data.len()))
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(
                    " 観光地: 本文の長さとセクション数 ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("text_length")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_bound])
                .labels(axis_labels(x_bound)),
        )
        .y_axis(
            Axis::default()
                .title("section_count")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_bound])
                .labels(axis_labels(y_bound)),
        );

    frame.render_widget(chart, chunks[0]);

    let hint = Paragraph::new("Press any key to close").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, chunks[1]);
}
