pub mod output;
pub mod replay;

use std::{env, io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use replay::{replay_file, write_replay};
use tracing::info;

use crate::{
    activities::{factory::CommandFactory, store::ActivityStore},
    session::{processing::OutputSettings, start_session},
    utils::{
        clock::{Clock, DefaultClock, FixedClock},
        ids::UuidGenerator,
        logging::{enable_logging, REPLAY_PREFIX, SESSION_PREFIX},
        time::{moment_on, parse_day, DateStyle},
    },
};

#[derive(Parser, Debug)]
#[command(name = "habitual", version, long_about = None)]
#[command(about = "Keeps track of daily and weekly habits", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Print logs to stderr")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Act as if today was this day, e.g. \"last friday\" or \"01/10/2025\""
    )]
    today: Option<String>,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t,
        help = "How to read dates like 01/10/2025"
    )]
    date_style: DateStyle,
    #[arg(long, global = true, help = "Disable colors in the output")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Start an interactive session. Type `help` to see the available commands, or send commands as JSON lines"
    )]
    Session {
        #[arg(long, help = "Print the state as JSON after every change")]
        json: bool,
    },
    #[command(about = "Apply JSON commands from a file on top of the default activities")]
    Replay {
        file: PathBuf,
        #[arg(long, help = "Print the resulting state as JSON")]
        json: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let prefix = match args.commands {
        Commands::Session { .. } => SESSION_PREFIX,
        Commands::Replay { .. } => REPLAY_PREFIX,
    };
    let dir = application_dir(args.dir)?;
    enable_logging(prefix, &dir, args.log)?;

    let clock = create_clock(args.today.as_deref(), args.date_style)?;
    let colored = !args.no_color;
    info!("Starting with today being {}", clock.today());

    match args.commands {
        Commands::Session { json } => {
            let store = ActivityStore::seeded(clock.as_ref());
            let factory = CommandFactory::new(Box::new(UuidGenerator), clock);
            let settings = OutputSettings {
                date_style: args.date_style,
                colored,
                json,
            };
            start_session(store, factory, settings).await?;
            Ok(())
        }
        Commands::Replay { file, json } => {
            let store = replay_file(&file, clock.as_ref()).await?;
            write_replay(
                &store,
                clock.as_ref(),
                json,
                colored,
                &mut std::io::stdout(),
            )
        }
    }
}

/// Directory for everything habitual writes to disk, which is only logs since the tracker keeps
/// nothing between sessions. `custom` comes from `--dir`; otherwise `$XDG_STATE_HOME/habitual`,
/// `$HOME/.local/state/habitual` or `%APPDATA%\habitual` is used. Created when missing.
fn application_dir(custom: Option<PathBuf>) -> Result<PathBuf> {
    let path = match custom {
        Some(path) => path,
        None => default_state_home()?.join(env!("CARGO_PKG_NAME")),
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(anyhow::anyhow!("Can't create {}: {v}", path.display())),
    }
}

#[cfg(windows)]
fn default_state_home() -> Result<PathBuf> {
    env::var("APPDATA")
        .map(PathBuf::from)
        .map_err(|_| anyhow::anyhow!("APPDATA should be present on Windows"))
}

#[cfg(not(windows))]
fn default_state_home() -> Result<PathBuf> {
    env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".local/state")))
        .map_err(|_| anyhow::anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))
}

/// The system clock, or one frozen on the day given with `--today`.
fn create_clock(today: Option<&str>, style: DateStyle) -> Result<Box<dyn Clock>> {
    let Some(today) = today else {
        return Ok(Box::new(DefaultClock));
    };
    let day = parse_day(today, &DefaultClock, style)?;
    let now = moment_on(day, &DefaultClock);
    let offset = *DefaultClock.local(now).offset();
    Ok(Box::new(FixedClock::new(now, offset)))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::utils::{
        clock::{Clock, DefaultClock},
        time::DateStyle,
    };

    use super::{application_dir, create_clock, Args};
    use clap::Parser;

    #[test]
    fn today_flag_freezes_the_clock() {
        let clock = create_clock(Some("01/10/2025"), DateStyle::Uk).unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());

        let clock = create_clock(Some("yesterday"), DateStyle::Uk).unwrap();
        assert_eq!(clock.today(), DefaultClock.today() - Duration::days(1));

        assert!(create_clock(Some("whenever"), DateStyle::Uk).is_err());
    }

    #[test]
    fn custom_application_dir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let custom = root.path().join("nested").join("habitual");

        let dir = application_dir(Some(custom.clone())).unwrap();

        assert_eq!(dir, custom);
        assert!(dir.is_dir());
        assert_eq!(application_dir(Some(custom.clone())).unwrap(), custom);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let args = Args::try_parse_from([
            "habitual",
            "replay",
            "commands.jsonl",
            "--json",
            "--date-style",
            "us",
            "--no-color",
        ])
        .unwrap();

        assert_eq!(args.date_style, DateStyle::Us);
        assert!(args.no_color);
        assert!(!args.log);
    }
}
