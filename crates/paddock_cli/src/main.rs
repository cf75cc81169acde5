//! Command-line request layer for the paddock simulator.
//!
//! # Responsibility
//! - Parse one command, open the farm store, run the matching core
//!   operation, print the result, close the store.
//! - Resolve database path, log directory and simulation rates from flags
//!   and `PADDOCK_*` environment variables.

mod api;
mod render;

use api::ActionResponse;
use clap::{Parser, Subcommand};
use log::error;
use paddock_core::{default_log_level, init_logging, Farm, SimulationConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "paddock_sim.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "paddock")]
#[command(about = "Simulate pasture growth and grazing across farm paddocks")]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PADDOCK_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "PADDOCK_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Show the current simulated date
    Date,
    /// Advance one day, growing and grazing every paddock
    NextDay,
    /// List paddocks with their mob and stock count
    Paddocks,
    /// List mobs with their paddock
    Mobs,
    /// List the animals in one mob
    Stock {
        #[arg(long)]
        mob: i64,
    },
    /// Show which mobs can move and which paddocks are free
    MoveOptions,
    /// Move a mob onto a vacant paddock
    MoveMob {
        #[arg(long)]
        mob: i64,
        #[arg(long)]
        paddock: i64,
    },
    /// Add a paddock
    AddPaddock {
        #[arg(long)]
        name: String,
        /// Hectares
        #[arg(long)]
        area: f64,
        /// kg dry matter per hectare
        #[arg(long = "dm-per-ha")]
        dm_per_ha: f64,
    },
    /// Change a paddock's area and pasture density
    EditPaddock {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        area: f64,
        #[arg(long = "dm-per-ha")]
        dm_per_ha: f64,
    },
    /// Reload the baseline farm, or a SQL script
    Reset {
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    if cli.command == Command::Version {
        println!("paddock_core version={}", paddock_core::core_version());
        return ExitCode::SUCCESS;
    }

    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let db_path = resolve_db_path(cli.db.clone());
    let farm = match Farm::open(&db_path, config) {
        Ok(farm) => farm,
        Err(err) => {
            error!("event=cli_open module=cli status=error error={err}");
            eprintln!("cannot open farm database `{}`: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let ok = run(&farm, &cli);
    if let Err(err) = farm.close() {
        eprintln!("failed to close farm database: {err}");
        return ExitCode::FAILURE;
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(farm: &Farm, cli: &Cli) -> bool {
    let json = cli.json;
    match &cli.command {
        Command::Date => listing(json, farm.current_date(), |date| date.to_string()),
        Command::NextDay => match api::next_day(farm) {
            Ok((report, response)) => {
                if json {
                    print_json(&report)
                } else {
                    print!("{}", render::day_report(&report));
                    respond(false, &response)
                }
            }
            Err(response) => respond(json, &response),
        },
        Command::Paddocks => listing(json, farm.list_paddocks(), |items| {
            render::paddocks(items)
        }),
        Command::Mobs => listing(json, farm.list_mobs(), |items| render::mobs(items)),
        Command::Stock { mob } => {
            let on = match farm.current_date() {
                Ok(date) => date,
                Err(err) => {
                    eprintln!("{err}");
                    return false;
                }
            };
            listing(json, farm.list_stock(*mob), |items| render::stock(items, on))
        }
        Command::MoveOptions => listing(json, farm.move_options(), render::move_options),
        Command::MoveMob { mob, paddock } => respond(json, &api::move_mob(farm, *mob, *paddock)),
        Command::AddPaddock {
            name,
            area,
            dm_per_ha,
        } => respond(json, &api::add_paddock(farm, name, *area, *dm_per_ha)),
        Command::EditPaddock { id, area, dm_per_ha } => {
            respond(json, &api::edit_paddock(farm, *id, *area, *dm_per_ha))
        }
        Command::Reset { script } => respond(json, &api::reset(farm, script.as_deref())),
        Command::Version => true,
    }
}

fn listing<T: Serialize, E: std::fmt::Display>(
    json: bool,
    result: Result<T, E>,
    text: impl FnOnce(&T) -> String,
) -> bool {
    match result {
        Ok(value) if json => print_json(&value),
        Ok(value) => {
            let rendered = text(&value);
            if rendered.ends_with('\n') {
                print!("{rendered}");
            } else {
                println!("{rendered}");
            }
            true
        }
        Err(err) => {
            eprintln!("{err}");
            false
        }
    }
}

fn respond(json: bool, response: &ActionResponse) -> bool {
    if json {
        print_json(response);
    } else if response.ok {
        println!("{}", response.message);
    } else {
        eprintln!("{}", response.message);
    }
    response.ok
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            true
        }
        Err(err) => {
            eprintln!("failed to encode JSON: {err}");
            false
        }
    }
}

fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}
