use crate::utils::clock::Clock;

use super::{
    entities::{Activity, Frequency},
    store::ActivityState,
};

/// Activities every new session starts with, as `(id, name, description)`.
pub const DEFAULT_ACTIVITIES: [(&str, &str, &str); 3] = [
    ("1", "Reading", "Read for at least 30 minutes"),
    ("2", "Exercise", "Physical activity or workout"),
    ("3", "Journaling", "Write in personal journal"),
];

pub fn initial_state(clock: &dyn Clock) -> ActivityState {
    let created_at = clock.time();
    let activities = DEFAULT_ACTIVITIES
        .iter()
        .map(|(id, name, description)| Activity {
            id: (*id).into(),
            name: (*name).into(),
            description: (*description).into(),
            target_frequency: Frequency::Daily,
            created_at,
        })
        .collect::<Vec<_>>();
    ActivityState::new(activities, vec![])
}
