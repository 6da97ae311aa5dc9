mod app;
mod cli;
mod report;
mod ui;

use anyhow::{Context, Result};
use app::{App, Screen};
use bitecast::config::Config;
use bitecast::db::Database;
use bitecast::logic::astronomy::solar_date;
use bitecast::logic::{BiteForecastService, DataSyncService, ForecastRequest, SpeciesCatalog};
use bitecast::models::{BiteForecast, RawForecastSample};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{OverviewScreen, SpeciesScreen};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let Cli {
        command,
        config: config_path,
        data_dir,
        verbose,
    } = Cli::parse();

    // Initialize logging
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let catalog = SpeciesCatalog::builtin();

    match command {
        Some(Commands::Init) => {
            run_init(&catalog)?;
            Ok(())
        }
        Some(Commands::Species) => {
            print!("{}", report::species_table(&catalog));
            Ok(())
        }
        Some(Commands::Check) => run_check(config_path, data_dir.as_ref()).await,
        Some(Commands::Forecast {
            input,
            json,
            species,
            start,
        }) => {
            let config = Config::load(config_path)?;
            let start = start.unwrap_or_else(current_hour);
            let species = if species.is_empty() {
                config.forecast.species.clone()
            } else {
                species
            };

            let forecast = match input {
                Some(path) => forecast_from_file(&config, data_dir.as_ref(), &path, start, species)?,
                None => {
                    let sync = open_sync(&config, data_dir.as_ref())?;
                    let service = BiteForecastService::new(catalog);
                    forecast_live(&sync, &service, start, species).await?
                }
            };

            if json {
                let report = report::ForecastReport::new(&forecast);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::text_summary(&config.lake.name, &forecast));
            }
            Ok(())
        }
        None => {
            let config = if Config::exists(config_path.as_ref()) {
                Config::load(config_path)?
            } else {
                run_init(&catalog)?
            };
            run_tui(config, data_dir.as_ref(), catalog).await
        }
    }
}

fn run_init(catalog: &SpeciesCatalog) -> Result<Config> {
    let ids: Vec<&str> = catalog.ids().collect();
    let (config, _path) = Config::setup_interactive(&ids)?;
    Ok(config)
}

fn current_hour() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now)
}

fn open_sync(config: &Config, data_dir: Option<&PathBuf>) -> Result<DataSyncService> {
    let db_path = Config::db_path(data_dir)?;
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    Ok(DataSyncService::new(config.clone(), db))
}

/// Score samples read from a JSON file. History is looked up when the local
/// store can be opened and skipped otherwise.
fn forecast_from_file(
    config: &Config,
    data_dir: Option<&PathBuf>,
    path: &Path,
    start: DateTime<Utc>,
    species: Vec<String>,
) -> Result<BiteForecast> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read forecast file {}", path.display()))?;
    let samples: Vec<RawForecastSample> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse forecast file {}", path.display()))?;

    let location = config.lake.location();
    let history = match open_sync(config, data_dir) {
        Ok(sync) => sync.history(solar_date(start, location.longitude)),
        Err(e) => {
            tracing::warn!("Weather history unavailable: {:#}", e);
            Vec::new()
        }
    };

    let request = ForecastRequest::new(location, start, samples)
        .with_species(species)
        .with_history(history);
    Ok(BiteForecastService::default().run(&request)?)
}

async fn forecast_live(
    sync: &DataSyncService,
    service: &BiteForecastService,
    start: DateTime<Utc>,
    species: Vec<String>,
) -> Result<BiteForecast> {
    let loaded = sync.load_samples(Utc::now()).await?;
    tracing::debug!(
        "Loaded {} samples from {}",
        loaded.samples.len(),
        loaded.origin.as_str()
    );

    let location = sync.config().lake.location();
    let history = sync.history(solar_date(start, location.longitude));
    let request = ForecastRequest::new(location, start, loaded.samples)
        .with_species(species)
        .with_history(history);
    Ok(service.run(&request)?)
}

async fn run_check(config_path: Option<PathBuf>, data_dir: Option<&PathBuf>) -> Result<()> {
    let config = Config::load(config_path)?;
    println!("Config OK");
    println!(
        "  Lake: {} ({:.4}, {:.4})",
        config.lake.name, config.lake.latitude, config.lake.longitude
    );

    let sync = open_sync(&config, data_dir)?;
    let status = sync.check_connections().await;

    println!(
        "  Database: {}",
        if status.database { "OK" } else { "FAILED" }
    );
    let owm = match (status.openweathermap_configured, status.openweathermap) {
        (false, _) => "not configured",
        (true, true) => "OK",
        (true, false) => "FAILED",
    };
    println!("  OpenWeatherMap: {}", owm);

    if status.openweathermap_configured && !status.all_connected() {
        anyhow::bail!("one or more connections failed");
    }
    Ok(())
}

async fn run_tui(config: Config, data_dir: Option<&PathBuf>, catalog: SpeciesCatalog) -> Result<()> {
    let sync = open_sync(&config, data_dir)?;
    let service = BiteForecastService::new(catalog);
    let mut app = App::new(config, catalog);
    let species = app.config.forecast.species.clone();

    refresh_forecast(&mut app, &sync, &service, &species).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &sync, &service, &species).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn refresh_forecast(
    app: &mut App,
    sync: &DataSyncService,
    service: &BiteForecastService,
    species: &[String],
) {
    match forecast_live(sync, service, current_hour(), species.to_vec()).await {
        Ok(forecast) => {
            app.update_forecast(forecast);
            app.set_status(&format!("Forecast updated {}", Utc::now().format("%H:%M UTC")));
        }
        Err(e) => {
            tracing::warn!("Forecast refresh failed: {:#}", e);
            app.set_status(&format!("Refresh failed: {}", e));
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    sync: &DataSyncService,
    service: &BiteForecastService,
    species: &[String],
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| {
            let area = f.area();

            match app.screen {
                Screen::Overview => {
                    let screen = OverviewScreen::new(&app.config.lake.name, app.forecast.as_ref())
                        .with_selection(app.species_selection.index)
                        .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Species => {
                    let hourly = app
                        .forecast
                        .as_ref()
                        .map(|forecast| forecast.hourly.as_slice())
                        .unwrap_or(&[]);
                    let screen =
                        SpeciesScreen::new(app.selected_species(), app.selected_profile(), hourly)
                            .with_hour(app.hour_selection.index);
                    f.render_widget(screen, area);
                }
            }
        })?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Esc => app.switch_screen(Screen::Overview),
                    KeyCode::Char('r') => app.request_refresh(),
                    KeyCode::Char(c) => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        }
                    }
                    code => handle_screen_input(app, code),
                }
            }
        }

        // Handle refresh request
        if app.needs_refresh {
            app.needs_refresh = false;
            refresh_forecast(app, sync, service, species).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Overview => match code {
            KeyCode::Up => app.prev_species(),
            KeyCode::Down => app.next_species(),
            KeyCode::Enter => app.switch_screen(Screen::Species),
            _ => {}
        },
        Screen::Species => match code {
            KeyCode::Up => app.prev_hour(),
            KeyCode::Down => app.next_hour(),
            KeyCode::Left => app.prev_species(),
            KeyCode::Right => app.next_species(),
            _ => {}
        },
    }
}
