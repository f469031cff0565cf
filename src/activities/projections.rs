//! Read-only views over completions. All of them are linear scans; the lists stay small enough
//! that nothing is cached. [CompletionIndex] exists for callers that ask the same question for
//! many cells at once, such as the week grid.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;

use crate::utils::clock::Clock;

use super::entities::ActivityCompletion;

/// Number of completions, of any activity, done today.
pub fn today_completed_count(completions: &[ActivityCompletion], clock: &dyn Clock) -> usize {
    completions
        .iter()
        .filter(|v| clock.is_today(v.completed_at))
        .count()
}

/// Today's completions of a single activity, in insertion order.
pub fn today_completions_for<'a>(
    completions: &'a [ActivityCompletion],
    activity_id: &str,
    clock: &dyn Clock,
) -> Vec<&'a ActivityCompletion> {
    completions
        .iter()
        .filter(|v| &*v.activity_id == activity_id && clock.is_today(v.completed_at))
        .collect()
}

pub fn is_completed_on(
    completions: &[ActivityCompletion],
    activity_id: &str,
    day: NaiveDate,
    clock: &dyn Clock,
) -> bool {
    first_on(completions, activity_id, day, clock).is_some()
}

/// Id of the first completion of `activity_id` on `day`.
pub fn completion_id_on(
    completions: &[ActivityCompletion],
    activity_id: &str,
    day: NaiveDate,
    clock: &dyn Clock,
) -> Option<Arc<str>> {
    first_on(completions, activity_id, day, clock).map(|v| v.id.clone())
}

fn first_on<'a>(
    completions: &'a [ActivityCompletion],
    activity_id: &str,
    day: NaiveDate,
    clock: &dyn Clock,
) -> Option<&'a ActivityCompletion> {
    completions
        .iter()
        .find(|v| &*v.activity_id == activity_id && clock.day_of(v.completed_at) == day)
}

/// Lookup of the first completion per `(activity, calendar day)`.
#[derive(Debug, Default)]
pub struct CompletionIndex {
    by_day: HashMap<(Arc<str>, NaiveDate), Arc<str>>,
}

impl CompletionIndex {
    pub fn build(completions: &[ActivityCompletion], clock: &dyn Clock) -> Self {
        let mut by_day = HashMap::new();
        for completion in completions {
            by_day
                .entry((
                    completion.activity_id.clone(),
                    clock.day_of(completion.completed_at),
                ))
                .or_insert_with(|| completion.id.clone());
        }
        Self { by_day }
    }

    pub fn completion_id_on(&self, activity_id: &str, day: NaiveDate) -> Option<Arc<str>> {
        self.by_day.get(&(Arc::from(activity_id), day)).cloned()
    }

    pub fn is_completed_on(&self, activity_id: &str, day: NaiveDate) -> bool {
        self.completion_id_on(activity_id, day).is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::{
        activities::{
            command::ActivityCommand,
            entities::ActivityCompletion,
            store::{ActivityState, ActivityStore},
        },
        utils::clock::{Clock, FixedClock},
    };

    use super::{
        completion_id_on, is_completed_on, today_completed_count, today_completions_for,
        CompletionIndex,
    };

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 15, 0, 0).unwrap()
    }

    fn completion(id: &str, activity_id: &str, at: DateTime<Utc>) -> ActivityCompletion {
        ActivityCompletion::new(id, activity_id, at, at, None).unwrap()
    }

    fn spread() -> Vec<ActivityCompletion> {
        let now = test_now();
        vec![
            completion("today-1", "1", now - Duration::hours(14)),
            completion("yesterday", "1", now - Duration::days(1)),
            completion("today-2", "2", now),
            completion("tomorrow", "2", now + Duration::days(1)),
            completion("today-3", "1", now + Duration::hours(8)),
        ]
    }

    #[test]
    fn today_count_only_counts_today() {
        let clock = FixedClock::utc(test_now());

        assert_eq!(today_completed_count(&spread(), &clock), 3);
        assert_eq!(today_completed_count(&[], &clock), 0);
    }

    #[test]
    fn today_count_follows_clock_offset() {
        // At UTC+10 the 23rd starts at 14:00 UTC on the 22nd, so the early entry drops out.
        let clock = FixedClock::new(test_now(), FixedOffset::east_opt(10 * 3600).unwrap());

        assert_eq!(today_completed_count(&spread(), &clock), 2);
    }

    #[test]
    fn today_completions_filter_by_activity() {
        let clock = FixedClock::utc(test_now());
        let completions = spread();

        let ids = today_completions_for(&completions, "1", &clock)
            .into_iter()
            .map(|v| &*v.id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec!["today-1", "today-3"]);
        assert!(today_completions_for(&completions, "3", &clock).is_empty());
    }

    #[test]
    fn completion_shows_on_its_day_only() {
        let clock = FixedClock::utc(test_now());
        let mut store = ActivityStore::new(ActivityState::default());
        store.dispatch(ActivityCommand::CompleteActivity(completion(
            "c1",
            "1",
            test_now(),
        )));
        let state = store.state();

        let today = clock.today();
        let yesterday = today.pred_opt().unwrap();
        assert!(is_completed_on(&state.completions, "1", today, &clock));
        assert!(!is_completed_on(&state.completions, "1", yesterday, &clock));
        assert!(!is_completed_on(&state.completions, "2", today, &clock));
    }

    #[test]
    fn completion_id_is_first_match() {
        let clock = FixedClock::utc(test_now());
        let completions = spread();
        let today = clock.today();

        assert_eq!(
            completion_id_on(&completions, "1", today, &clock).as_deref(),
            Some("today-1")
        );
        assert_eq!(
            completion_id_on(&completions, "2", today.succ_opt().unwrap(), &clock).as_deref(),
            Some("tomorrow")
        );
        assert_eq!(completion_id_on(&completions, "3", today, &clock), None);
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let clock = FixedClock::new(test_now(), FixedOffset::west_opt(3 * 3600).unwrap());
        let completions = spread();
        let index = CompletionIndex::build(&completions, &clock);

        let first = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
        for day in first.iter_days().take(7) {
            for activity_id in ["1", "2", "3"] {
                assert_eq!(
                    index.completion_id_on(activity_id, day),
                    completion_id_on(&completions, activity_id, day, &clock),
                    "{activity_id} {day}"
                );
                assert_eq!(
                    index.is_completed_on(activity_id, day),
                    is_completed_on(&completions, activity_id, day, &clock)
                );
            }
        }
    }
}
