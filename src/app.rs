//! Application state management for the forecast browser
//!
//! This module contains the interactive state: the area rail selection, the
//! forecast panel contents, keyboard handling and the hand-off of area loads
//! to the main loop.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::data::AreaEntry;
use crate::service::{AreaView, FailureKind, ForecastError};

/// Message shown when an area has no weather series
pub const NO_DATA_MESSAGE: &str = "天気データが取得できません";

/// Which part of the screen receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Areas,
    Rows,
}

/// What the forecast panel currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// Nothing selected yet
    Prompt,
    /// A forecast request is in flight
    Loading { title: String },
    /// Forecast rows are available
    Loaded(AreaView),
    /// The area has no weather series
    NoData { title: String },
    /// Fetching or storing failed
    Failed {
        title: String,
        kind: FailureKind,
        message: String,
    },
}

/// Main application struct managing state and data
pub struct App {
    /// Areas listed in the rail, in catalog order
    pub areas: Vec<AreaEntry>,
    /// Index of the highlighted area in the rail
    pub selected_index: usize,
    /// Index of the area whose forecast the panel belongs to
    pub shown_index: Option<usize>,
    pub focus: Focus,
    pub panel: PanelState,
    /// Expansion flag per forecast row
    pub expanded: Vec<bool>,
    /// Highlighted forecast row when the panel has focus
    pub row_cursor: usize,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Whether forecasts are shown from the SQLite cache
    pub cache_mode: bool,
    /// Timestamp of the last completed load
    pub last_refresh: Option<DateTime<Local>>,
    /// Area index waiting to be loaded by the main loop
    pending_load: Option<usize>,
}

impl App {
    /// Creates a new App over the given areas
    pub fn new(areas: Vec<AreaEntry>, cache_mode: bool) -> Self {
        Self {
            areas,
            selected_index: 0,
            shown_index: None,
            focus: Focus::Areas,
            panel: PanelState::Prompt,
            expanded: Vec::new(),
            row_cursor: 0,
            show_help: false,
            should_quit: false,
            cache_mode,
            last_refresh: None,
            pending_load: None,
        }
    }

    /// Returns the currently highlighted area, if any
    pub fn selected_area(&self) -> Option<&AreaEntry> {
        self.areas.get(self.selected_index)
    }

    /// Returns the area the panel belongs to, if any
    pub fn shown_area(&self) -> Option<&AreaEntry> {
        self.shown_index.and_then(|i| self.areas.get(i))
    }

    /// Panel title for an area
    pub fn title_for(&self, area: &AreaEntry) -> String {
        if self.cache_mode {
            format!("{} の天気予報（DB）", area.name)
        } else {
            format!("{} の天気予報", area.name)
        }
    }

    /// Queues a forecast load for the area at `index`
    pub fn request_load(&mut self, index: usize) {
        if index < self.areas.len() {
            self.selected_index = index;
            self.pending_load = Some(index);
        }
    }

    /// Takes the queued load and switches the panel to its loading state
    ///
    /// Returns the area to fetch. The caller passes the result to
    /// [`App::finish_load`].
    pub fn begin_load(&mut self) -> Option<AreaEntry> {
        let index = self.pending_load.take()?;
        let area = self.areas.get(index)?.clone();

        self.shown_index = Some(index);
        self.panel = PanelState::Loading {
            title: self.title_for(&area),
        };
        self.expanded.clear();
        self.row_cursor = 0;
        self.focus = Focus::Areas;
        Some(area)
    }

    /// Applies the result of a load started with [`App::begin_load`]
    pub fn finish_load(&mut self, result: Result<AreaView, ForecastError>) {
        let title = match self.shown_area() {
            Some(area) => self.title_for(area),
            None => String::new(),
        };

        self.panel = match result {
            Ok(view) => {
                self.expanded = vec![false; view.rows.len()];
                PanelState::Loaded(view)
            }
            Err(ForecastError::NoWeatherData(_)) => PanelState::NoData { title },
            Err(e) => PanelState::Failed {
                title,
                kind: e.kind(),
                message: e.to_string(),
            },
        };
        self.row_cursor = 0;
        self.last_refresh = Some(Local::now());
    }

    /// Number of rows in the loaded forecast
    pub fn row_count(&self) -> usize {
        match &self.panel {
            PanelState::Loaded(view) => view.rows.len(),
            _ => 0,
        }
    }

    /// Whether the row at `index` is expanded
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `Esc`: Leave the forecast rows, or quit from the area rail
    /// - `Up`/`k`, `Down`/`j`: Move within the focused list
    /// - `Tab`, `Left`/`h`, `Right`/`l`: Switch focus between rail and rows
    /// - `Enter`/`Space`: Load the highlighted area, or expand/collapse a row
    /// - `r`: Reload the shown area
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => match self.focus {
                Focus::Rows => self.focus = Focus::Areas,
                Focus::Areas => self.should_quit = true,
            },
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('r') => {
                if let Some(index) = self.shown_index {
                    self.request_load(index);
                }
            }
            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.toggle_focus();
            }
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Areas => self.move_selection_up(),
                Focus::Rows => self.move_row_up(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Areas => self.move_selection_down(),
                Focus::Rows => self.move_row_down(),
            },
            KeyCode::Enter | KeyCode::Char(' ') => match self.focus {
                Focus::Areas => self.request_load(self.selected_index),
                Focus::Rows => self.toggle_row(self.row_cursor),
            },
            _ => {}
        }
    }

    /// Switches focus; the rows only take focus when there are rows
    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Areas if self.row_count() > 0 => Focus::Rows,
            _ => Focus::Areas,
        };
    }

    /// Moves the selection up in the rail, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.areas.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the rail, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.areas.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    fn move_row_up(&mut self) {
        self.row_cursor = self.row_cursor.saturating_sub(1);
    }

    fn move_row_down(&mut self) {
        if self.row_cursor + 1 < self.row_count() {
            self.row_cursor += 1;
        }
    }

    /// Expands or collapses the row at `index`
    pub fn toggle_row(&mut self, index: usize) {
        if let Some(flag) = self.expanded.get_mut(index) {
            *flag = !*flag;
        }
    }
}
