use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::utils::clock::Clock;

use super::{entities::Frequency, projections::CompletionIndex, store::ActivityState};

pub const DAYS_IN_WEEK: usize = 7;

/// Monday to Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            start: day.week(Weekday::Mon).first_day(),
        }
    }

    pub fn current(clock: &dyn Clock) -> Self {
        Self::containing(clock.today())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(DAYS_IN_WEEK as i64 - 1)
    }

    pub fn days(&self) -> [NaiveDate; DAYS_IN_WEEK] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    /// Week `weeks` away from this one, negative going back. `None` when any of its days falls
    /// outside the representable calendar.
    pub fn offset(&self, weeks: i64) -> Option<Self> {
        let start = self.start.checked_add_signed(Duration::try_weeks(weeks)?)?;
        start.checked_add_signed(Duration::days(DAYS_IN_WEEK as i64 - 1))?;
        Some(Self { start })
    }

    pub fn previous(&self) -> Option<Self> {
        self.offset(-1)
    }

    pub fn next(&self) -> Option<Self> {
        self.offset(1)
    }

    /// "Week from 20-26 October 2025", or "Week from 29 Sep-5 Oct 2025" when the week spans two
    /// months. The year is the one the week ends in.
    pub fn range_label(&self) -> String {
        let (start, end) = (self.start, self.end());
        if start.month() == end.month() {
            format!(
                "Week from {}-{} {} {}",
                start.day(),
                end.day(),
                start.format("%B"),
                end.year()
            )
        } else {
            format!(
                "Week from {} {}-{} {} {}",
                start.day(),
                start.format("%b"),
                end.day(),
                end.format("%b"),
                end.year()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekCell {
    pub day: NaiveDate,
    pub is_today: bool,
    /// First completion on this day, if any.
    pub completion_id: Option<Arc<str>>,
}

impl WeekCell {
    pub fn is_completed(&self) -> bool {
        self.completion_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub activity_id: Arc<str>,
    pub name: Arc<str>,
    pub frequency: Frequency,
    pub cells: [WeekCell; DAYS_IN_WEEK],
}

/// Completion history of the selected activities over one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    pub week: Week,
    pub rows: Vec<WeekRow>,
}

impl WeekGrid {
    /// Rows follow the order of activities in `state`. An empty `selected` means every activity.
    pub fn build(
        state: &ActivityState,
        selected: &[Arc<str>],
        week: Week,
        clock: &dyn Clock,
    ) -> Self {
        let index = CompletionIndex::build(&state.completions, clock);
        let today = clock.today();
        let days = week.days();

        let rows = state
            .activities
            .iter()
            .filter(|v| selected.is_empty() || selected.contains(&v.id))
            .map(|activity| WeekRow {
                activity_id: activity.id.clone(),
                name: activity.name.clone(),
                frequency: activity.target_frequency,
                cells: days.map(|day| WeekCell {
                    day,
                    is_today: day == today,
                    completion_id: index.completion_id_on(&activity.id, day),
                }),
            })
            .collect();

        Self { week, rows }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    use crate::{
        activities::{
            entities::ActivityCompletion,
            seed::initial_state,
            store::ActivityState,
        },
        utils::clock::FixedClock,
    };

    use super::{Week, WeekGrid};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_now() -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2025, 10, 22, 15, 0, 0).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        assert_eq!(Week::containing(date(2025, 10, 22)).start(), date(2025, 10, 20));
        assert_eq!(Week::containing(date(2025, 10, 20)).start(), date(2025, 10, 20));
        assert_eq!(Week::containing(date(2025, 10, 26)).start(), date(2025, 10, 20));
        assert_eq!(Week::containing(date(2025, 10, 27)).start(), date(2025, 10, 27));

        let week = Week::containing(date(2025, 10, 22));
        assert_eq!(week.end(), date(2025, 10, 26));
        assert_eq!(week.days()[6], week.end());
        assert_eq!(week.next().and_then(|v| v.previous()), Some(week));
        assert_eq!(week.offset(-3).map(|v| v.start()), Some(date(2025, 9, 29)));
    }

    #[test]
    fn offset_outside_calendar_is_none() {
        let week = Week::containing(date(2025, 10, 22));

        assert_eq!(week.offset(20_000_000), None);
        assert_eq!(week.offset(-20_000_000), None);
        assert_eq!(week.offset(i64::MAX), None);
        assert_eq!(Week::containing(NaiveDate::MAX).next(), None);
    }

    #[test]
    fn range_label_formats() {
        assert_eq!(
            Week::containing(date(2025, 10, 22)).range_label(),
            "Week from 20-26 October 2025"
        );
        assert_eq!(
            Week::containing(date(2025, 10, 1)).range_label(),
            "Week from 29 Sep-5 Oct 2025"
        );
        assert_eq!(
            Week::containing(date(2026, 1, 1)).range_label(),
            "Week from 29 Dec-4 Jan 2026"
        );
    }

    #[test]
    fn grid_marks_completed_days() {
        let clock = FixedClock::utc(test_now());
        let seeded = initial_state(&clock);
        let at = |d: i64| test_now() - Duration::days(d);
        let state = ActivityState::new(
            seeded.activities.to_vec(),
            vec![
                ActivityCompletion::new("today", "1", at(0), at(0), None).unwrap(),
                ActivityCompletion::new("monday", "1", at(2), at(2), None).unwrap(),
                ActivityCompletion::new("last-week", "2", at(7), at(7), None).unwrap(),
            ],
        );

        let grid = WeekGrid::build(&state, &[], Week::current(&clock), &clock);

        assert_eq!(grid.rows.len(), 3);
        let reading = &grid.rows[0];
        assert_eq!(&*reading.name, "Reading");
        let completed = reading
            .cells
            .iter()
            .filter(|v| v.is_completed())
            .map(|v| v.day)
            .collect::<Vec<_>>();
        assert_eq!(completed, vec![date(2025, 10, 20), date(2025, 10, 22)]);
        assert_eq!(reading.cells[2].completion_id.as_deref(), Some("today"));
        assert!(reading.cells[2].is_today);
        assert_eq!(reading.cells.iter().filter(|v| v.is_today).count(), 1);

        assert!(grid.rows[1].cells.iter().all(|v| !v.is_completed()));
    }

    #[test]
    fn grid_keeps_state_order_for_selection() {
        let clock = FixedClock::utc(test_now());
        let state = initial_state(&clock);

        let grid = WeekGrid::build(
            &state,
            &["3".into(), "1".into(), "missing".into()],
            Week::current(&clock),
            &clock,
        );

        assert_eq!(
            grid.rows.iter().map(|v| &*v.activity_id).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
    }
}
