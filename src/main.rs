//! tenki - Japanese weather forecasts in the terminal
//!
//! Browses JMA forecasts by area in a terminal UI, prints forecasts and cached
//! rows, and scrapes sightseeing-spot statistics from Wikipedia.

use std::error::Error;
use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use tenki::app::{App, NO_DATA_MESSAGE};
use tenki::cli::{Cli, Mode, StartupConfig};
use tenki::config::{self, Config};
use tenki::data::JmaClient;
use tenki::logging::{self, LogTarget};
use tenki::scrape::{ScrapeOutcome, WikiScraper};
use tenki::service::{AreaView, ForecastError, ForecastService};
use tenki::stats::SpotSummary;
use tenki::store::{CatalogCache, ForecastStore, SpotStore};
use tenki::ui;

type AppResult = Result<(), Box<dyn Error>>;
type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

fn enter_terminal() -> io::Result<Tui> {
    setup_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Builds the forecast service from configuration
fn build_service(config: &Config) -> Result<ForecastService, Box<dyn Error>> {
    let client = JmaClient::new(&config.jma)?;
    let mut service = ForecastService::new(client);

    if let Some(dir) = config.catalog_dir() {
        service = service.with_catalog_cache(CatalogCache::with_dir(dir), config.cache.catalog_ttl_hours);
    }
    if config.cache.enabled {
        let store = ForecastStore::open(config.forecast_db_path())?;
        info!(path = %store.path().display(), "forecast cache enabled");
        service = service.with_store(store);
    }

    Ok(service)
}

#[tokio::main]
async fn main() -> AppResult {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let mut config = Config::load(startup.config_path.as_deref())?;
    startup.apply_to(&mut config);

    // The terminal UI owns stdout and stderr while it runs
    let target = if startup.is_interactive() {
        LogTarget::File(config::cache_dir().unwrap_or_else(std::env::temp_dir))
    } else {
        LogTarget::Stderr
    };
    logging::init(target)?;

    match startup.mode {
        Mode::Browse => run_browser(&config).await,
        Mode::Areas => print_areas(&config).await,
        Mode::Forecast(code) => print_forecast(&config, &code).await,
        Mode::History(code) => print_history(&config, &code),
        Mode::Scrape => run_scrape(&config).await,
        Mode::Stats { plot } => show_stats(&config, plot),
    }
}

/// Interactive area rail and forecast panel
async fn run_browser(config: &Config) -> AppResult {
    let service = build_service(config)?;
    let catalog = service.load_areas().await?;

    let mut app = App::new(catalog.entries(), config.cache.enabled);
    // Show the first area right away
    app.request_load(0);

    let mut terminal = enter_terminal()?;
    let result = browser_loop(&mut terminal, &mut app, &service).await;
    leave_terminal(&mut terminal)?;

    result
}

async fn browser_loop(terminal: &mut Tui, app: &mut App, service: &ForecastService) -> AppResult {
    loop {
        if let Some(area) = app.begin_load() {
            // Draw the loading state before blocking on the request
            terminal.draw(|f| ui::render(f, app))?;
            let result = service.show_area(&area.code, &area.name).await;
            if let Err(e) = &result {
                warn!(area_code = %area.code, error = %e, "forecast load failed");
            }
            app.finish_load(result);
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn print_areas(config: &Config) -> AppResult {
    let service = build_service(config)?;
    let catalog = service.load_areas().await?;

    for entry in catalog.entries() {
        println!("{}\t{}", entry.code, entry.name);
    }
    Ok(())
}

fn print_view(view: &AreaView) {
    println!("{}", view.title);
    if let Some(subtitle) = &view.subtitle {
        println!("{}", subtitle);
    }
    for row in &view.rows {
        println!("  {} {}  {}", row.icon.glyph(), row.label, row.weather);
        for detail in &row.details {
            println!("      {}", detail);
        }
    }
}

async fn print_forecast(config: &Config, code: &str) -> AppResult {
    let service = build_service(config)?;

    // The area name is only used for the title; fall back to the code
    let name = match service.load_areas().await {
        Ok(catalog) => catalog.name_of(code).unwrap_or(code).to_string(),
        Err(e) => {
            warn!(error = %e, "area catalog unavailable");
            code.to_string()
        }
    };

    match service.show_area(code, &name).await {
        Ok(view) => print_view(&view),
        Err(ForecastError::NoWeatherData(_)) => println!("{}", NO_DATA_MESSAGE),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_history(config: &Config, code: &str) -> AppResult {
    let store = ForecastStore::open(config.forecast_db_path())?;
    let rows = store.load_area(code)?;

    if rows.is_empty() {
        println!("No cached forecasts for {} in {}", code, store.path().display());
        return Ok(());
    }

    println!("{} ({})", rows[0].area_name, code);
    for row in &rows {
        println!("  {}  {}  (取得: {})", row.forecast_date, row.weather, row.fetched_at);
    }
    Ok(())
}

async fn run_scrape(config: &Config) -> AppResult {
    let store = SpotStore::open(config.spot_db_path())?;
    let scraper = WikiScraper::new(config.scraper.clone())?;

    let report = scraper.run(&store).await?;

    for outcome in &report.outcomes {
        match outcome {
            ScrapeOutcome::Saved { stats, .. } => println!(
                "saved  {}  text={} sections={}",
                stats.title, stats.text_length, stats.section_count
            ),
            ScrapeOutcome::Failed { url, reason } => println!("failed {}  {}", url, reason),
        }
    }
    println!(
        "Saved {} of {} spots to {}",
        report.saved_count(),
        report.outcomes.len(),
        store.path().display()
    );
    Ok(())
}

fn show_stats(config: &Config, plot: bool) -> AppResult {
    let store = SpotStore::open(config.spot_db_path())?;
    let records = store.load_all()?;

    let Some(summary) = SpotSummary::from_records(&records) else {
        println!("No spots stored in {}", store.path().display());
        return Ok(());
    };

    if !plot {
        println!("{}", summary);
        return Ok(());
    }

    let mut terminal = enter_terminal()?;
    let result = chart_loop(&mut terminal, &records);
    leave_terminal(&mut terminal)?;
    result?;

    // Print after leaving the alternate screen so the table stays visible
    println!("{}", summary);
    Ok(())
}

/// Shows the scatter chart until any key is pressed
fn chart_loop(terminal: &mut Tui, records: &[tenki::store::SpotRecord]) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::render_spot_chart(f, records))?;
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}
