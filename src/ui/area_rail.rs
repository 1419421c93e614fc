//! Area rail rendering
//!
//! The left-hand list of forecast areas. The highlighted entry follows the
//! selection; the area whose forecast is on screen is marked.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Focus};

/// Renders the area list into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .areas
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if app.shown_index == Some(index) {
                "\u{25CF} " // ●
            } else {
                "  "
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::raw(entry.name.clone()),
            ]))
        })
        .collect();

    let border_color = if app.focus == Focus::Areas {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let title = format!(" 地域 ({}) ", app.areas.len());

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("\u{25B8}"); // ▸

    let mut state = ListState::default();
    if !app.areas.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AreaEntry;
    use crate::ui::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn app_with_areas(count: usize) -> App {
        let areas = (0..count)
            .map(|i| AreaEntry {
                code: format!("{:06}", i),
                name: format!("Area{}", i),
            })
            .collect();
        App::new(areas, false)
    }

    fn draw(app: &App, height: u16) -> String {
        let backend = TestBackend::new(30, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_rail_lists_areas_with_count() {
        let app = app_with_areas(3);

        let content = draw(&app, 10);

        assert!(content.contains("Area0"));
        assert!(content.contains("Area2"));
        assert!(content.contains("(3)"));
    }

    #[test]
    fn test_rail_highlights_selection() {
        let mut app = app_with_areas(3);
        app.selected_index = 1;

        let content = draw(&app, 10);

        assert!(content.contains("\u{25B8}Area1"), "Selected row carries cursor");
    }

    #[test]
    fn test_rail_scrolls_to_selection() {
        let mut app = app_with_areas(40);
        app.selected_index = 35;

        let content = draw(&app, 8);

        assert!(content.contains("Area35"), "Selected area should be visible");
        assert!(!content.contains("Area0"), "Top of the list scrolled away");
    }

    #[test]
    fn test_rail_marks_shown_area() {
        let mut app = app_with_areas(2);
        app.shown_index = Some(1);

        let content = draw(&app, 6);

        assert!(content.contains("\u{25CF}Area1"));
    }

    #[test]
    fn test_rail_empty() {
        let app = app_with_areas(0);

        let content = draw(&app, 6);

        assert!(content.contains("(0)"));
    }
}
