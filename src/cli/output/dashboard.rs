use std::fmt::Write;

use ansi_term::Colour;

use crate::{
    activities::{
        projections::{today_completed_count, today_completions_for},
        store::ActivityState,
    },
    utils::{clock::Clock, time::format_date},
};

/// Renders today's overview: date header, number of completions today and one line per
/// activity.
pub fn render_dashboard(state: &ActivityState, clock: &dyn Clock, colored: bool) -> String {
    let mut out = String::new();
    let completed = today_completed_count(&state.completions, clock);

    let _ = writeln!(out, "Activity Tracker");
    let _ = writeln!(out, "{}", format_date(clock.today()));
    let _ = writeln!(out, "{completed} activities completed today");
    let _ = writeln!(out);

    if state.activities.is_empty() {
        let _ = writeln!(out, "No activities yet. Add one with `add <name>`");
        return out;
    }

    for activity in state.activities.iter() {
        let today = today_completions_for(&state.completions, &activity.id, clock);
        let mark = match (today.is_empty(), colored) {
            (true, _) => "[ ]".to_string(),
            (false, true) => Colour::Green.paint("[x]").to_string(),
            (false, false) => "[x]".to_string(),
        };
        let _ = writeln!(
            out,
            "{mark}\t{}\t{}\t{}\t{}",
            activity.id, activity.name, activity.target_frequency, activity.description
        );
        if let Some(notes) = today.first().and_then(|v| v.notes.as_deref()) {
            let _ = writeln!(out, "\tNotes: {notes}");
        }
    }
    out
}
