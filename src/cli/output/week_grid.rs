use std::fmt::Write;

use ansi_term::{Colour, Style};

use crate::activities::week::WeekGrid;

const COMPLETED_MARK: &str = "✓";
const EMPTY_MARK: &str = "·";

pub fn render_week_grid(grid: &WeekGrid, colored: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.week.range_label());

    if grid.rows.is_empty() {
        let _ = writeln!(out, "No activities selected");
        return out;
    }

    let today_style = if colored {
        Style::new().bold().underline()
    } else {
        Style::new()
    };

    let mut header = String::from("Activity");
    for (index, day) in grid.week.days().iter().enumerate() {
        let label = day.format("%a %d").to_string();
        let is_today = grid.rows[0].cells[index].is_today;
        if is_today {
            let _ = write!(header, "\t{}", today_style.paint(format!("{label}*")));
        } else {
            let _ = write!(header, "\t{label}");
        }
    }
    let _ = writeln!(out, "{header}");

    for row in &grid.rows {
        let _ = write!(out, "{} ({})", row.name, row.frequency);
        for cell in &row.cells {
            let mark = match (cell.is_completed(), colored) {
                (true, true) => Colour::Green.paint(COMPLETED_MARK).to_string(),
                (true, false) => COMPLETED_MARK.to_string(),
                (false, _) => EMPTY_MARK.to_string(),
            };
            let _ = write!(out, "\t{mark}");
        }
        let _ = writeln!(out);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::{
        activities::{
            command::ActivityCommand,
            entities::ActivityCompletion,
            store::ActivityStore,
            week::{Week, WeekGrid},
        },
        utils::clock::FixedClock,
    };

    use super::render_week_grid;

    #[test]
    fn grid_rendering_marks_today_and_completions() {
        let now = Utc.with_ymd_and_hms(2025, 10, 22, 9, 0, 0).unwrap();
        let clock = FixedClock::utc(now);
        let mut store = ActivityStore::seeded(&clock);
        let monday = now - Duration::days(2);
        store.dispatch(ActivityCommand::CompleteActivity(
            ActivityCompletion::new("c1", "1", monday, now, None).unwrap(),
        ));

        let grid = WeekGrid::build(&store.state(), &[], Week::current(&clock), &clock);
        let rendered = render_week_grid(&grid, false);
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Week from 20-26 October 2025");
        assert_eq!(
            lines[1],
            "Activity\tMon 20\tTue 21\tWed 22*\tThu 23\tFri 24\tSat 25\tSun 26"
        );
        assert_eq!(lines[2], "Reading (daily)\t✓\t·\t·\t·\t·\t·\t·");
        assert_eq!(lines[3], "Exercise (daily)\t·\t·\t·\t·\t·\t·\t·");
        assert_eq!(lines.len(), 5);
    }
}
