use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    activities::{
        command::{parse_command, Incoming},
        factory::check_against,
        store::ActivityStore,
        week::{Week, WeekGrid},
    },
    utils::clock::Clock,
};

use super::output::{dashboard::render_dashboard, week_grid::render_week_grid};

/// Applies every command in `path`, one JSON object per line, on top of the default activities.
/// Blank lines and lines starting with `#` are skipped. Fails on the first line that doesn't
/// parse or doesn't fit the state built so far.
pub async fn replay_file(path: &Path, clock: &dyn Clock) -> Result<ActivityStore> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Can't read commands from {}", path.display()))?;

    let commands = parse_commands(&content)?;

    let mut store = ActivityStore::seeded(clock);
    let mut ignored = 0;
    for (number, incoming) in commands {
        if let Incoming::Command(command) = &incoming {
            check_against(&store.state(), command)
                .with_context(|| format!("Line {number} can't be applied"))?;
        } else {
            ignored += 1;
        }
        store.dispatch_incoming(incoming);
    }

    info!(
        "Replayed {} commands from {}, ignored {ignored}",
        store.history().len(),
        path.display()
    );
    Ok(store)
}

fn parse_commands(content: &str) -> Result<Vec<(usize, Incoming)>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            parse_command(line)
                .map(|v| (number, v))
                .with_context(|| format!("Line {number} is not a valid command"))
        })
        .collect()
}

/// Prints the replayed state, either as the dashboard followed by the current week or as JSON.
pub fn write_replay(
    store: &ActivityStore,
    clock: &dyn Clock,
    json: bool,
    colored: bool,
    out: &mut impl Write,
) -> Result<()> {
    let state = store.state();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&state)?)?;
        return Ok(());
    }

    let grid = WeekGrid::build(&state, &[], Week::current(clock), clock);
    writeln!(out, "{}", render_dashboard(&state, clock, colored))?;
    write!(out, "{}", render_week_grid(&grid, colored))?;
    Ok(())
}
