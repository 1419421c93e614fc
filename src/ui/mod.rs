//! UI rendering module for the forecast browser
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod area_rail;
pub mod forecast_panel;
pub mod help_overlay;
pub mod spot_chart;

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub use area_rail::render as render_area_rail;
pub use forecast_panel::render as render_forecast_panel;
pub use help_overlay::render as render_help_overlay;
pub use spot_chart::render as render_spot_chart;

/// Width of the area rail in columns
const RAIL_WIDTH: u16 = 26;

/// Renders the whole browser screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Rail and panel
            Constraint::Length(1), // Help text
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(RAIL_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    render_area_rail(frame, app, columns[0]);
    render_forecast_panel(frame, app, columns[1]);
    render_help(frame, rows[1], app);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders the key hints at the bottom of the screen with data freshness
fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut help_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Select  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Focus  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Reload  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness_text = if mins_ago < 1 {
            " │ Data: just now".to_string()
        } else if mins_ago < 60 {
            format!(" │ Data: {}m ago", mins_ago)
        } else {
            format!(" │ Data: {}h ago", elapsed.num_hours())
        };
        help_spans.push(Span::styled(
            freshness_text,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

/// Buffer text with padding cells removed, for assertions on CJK content
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .filter(|symbol| *symbol != " ")
        .collect()
}
