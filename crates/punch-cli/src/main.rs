use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use punch_cli::commands::report::Period;
use punch_cli::commands::{add, discard, projects, report, sessions, start, status, stop, streak};
use punch_cli::{Cli, Commands, Config, ProjectsAction, SessionsAction, settings};
use punch_core::Timer;
use punch_store::Store;

/// Loads the time data document, creating it with defaults on first run.
fn open_store(config: &Config) -> Result<Store> {
    Store::load(&config.data_path).context("failed to load time data")
}

/// Builds the timer from the persisted settings, injecting a persist
/// callback that writes the settings document after every transition.
fn build_timer(config: &Config, settings: &settings::Settings) -> Timer {
    let path = config.settings_path.clone();
    let mut snapshot = settings.clone();
    let mut timer = Timer::new(Box::new(move |state| {
        snapshot.timer_state = state.clone();
        settings::save(&path, &snapshot)?;
        Ok(())
    }));
    timer.load(settings.timer_state.clone());
    timer
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Status { watch }) => {
            let store = open_store(&config)?;
            let settings = settings::load(&config.settings_path)?;
            status::run(&store, &settings, *watch)?;
        }
        Some(Commands::Start { project }) => {
            let mut store = open_store(&config)?;
            let settings = settings::load(&config.settings_path)?;
            let mut timer = build_timer(&config, &settings);
            start::run(&mut store, &mut timer, project)?;
        }
        Some(Commands::Stop) => {
            let mut store = open_store(&config)?;
            let settings = settings::load(&config.settings_path)?;
            let mut timer = build_timer(&config, &settings);
            stop::run(&mut store, &mut timer)?;
        }
        Some(Commands::Discard) => {
            let settings = settings::load(&config.settings_path)?;
            let mut timer = build_timer(&config, &settings);
            discard::run(&mut timer)?;
        }
        Some(Commands::Add {
            project,
            date,
            start,
            end,
        }) => {
            let mut store = open_store(&config)?;
            let settings = settings::load(&config.settings_path)?;
            let mut timer = build_timer(&config, &settings);
            add::run(
                &mut store,
                &mut timer,
                project,
                date.as_deref(),
                start,
                end,
            )?;
        }
        Some(Commands::Report {
            week: _,
            month,
            day,
            json,
        }) => {
            let store = open_store(&config)?;
            let period = if *month {
                Period::Month
            } else if *day {
                Period::Day
            } else {
                Period::Week
            };
            report::run(&store, period, *json)?;
        }
        Some(Commands::Sessions { action }) => {
            let mut store = open_store(&config)?;
            match action {
                SessionsAction::List { back } => sessions::list(&store, *back)?,
                SessionsAction::Edit {
                    id,
                    project,
                    date,
                    start,
                    end,
                } => sessions::edit(
                    &mut store,
                    id,
                    project.as_deref(),
                    date.as_deref(),
                    start.as_deref(),
                    end.as_deref(),
                )?,
                SessionsAction::Delete { id } => sessions::delete(&mut store, id)?,
            }
        }
        Some(Commands::Projects { action }) => {
            let mut store = open_store(&config)?;
            match action {
                ProjectsAction::List => projects::list(&store)?,
                ProjectsAction::Add { name, color, icon } => {
                    projects::add(&mut store, name, color.as_deref(), icon.as_deref())?;
                }
                ProjectsAction::Edit {
                    id,
                    name,
                    color,
                    icon,
                } => projects::edit(
                    &mut store,
                    id,
                    name.as_deref(),
                    color.as_deref(),
                    icon.as_deref(),
                )?,
                ProjectsAction::Delete { id } => {
                    let settings = settings::load(&config.settings_path)?;
                    projects::delete(&mut store, id, &settings.timer_state)?;
                }
            }
        }
        Some(Commands::Streak) => {
            let store = open_store(&config)?;
            let settings = settings::load(&config.settings_path)?;
            streak::run(&store, &settings)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
