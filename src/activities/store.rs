use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::utils::clock::Clock;

use super::{
    command::{ActivityCommand, Incoming},
    entities::{Activity, ActivityCompletion},
    seed::initial_state,
};

/// Immutable snapshot of everything the tracker knows.
///
/// Both lists are shared slices. A snapshot handed out once stays valid and unchanged forever,
/// and a command only rebuilds the list it touches; the other one is shared with the previous
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActivityState {
    pub activities: Arc<[Activity]>,
    pub completions: Arc<[ActivityCompletion]>,
}

impl ActivityState {
    pub fn new(activities: Vec<Activity>, completions: Vec<ActivityCompletion>) -> Self {
        Self {
            activities: activities.into(),
            completions: completions.into(),
        }
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|v| &*v.id == id)
    }

    /// True when both snapshots share the very same lists, i.e. nothing happened in between.
    pub fn ptr_eq(&self, other: &ActivityState) -> bool {
        Arc::ptr_eq(&self.activities, &other.activities)
            && Arc::ptr_eq(&self.completions, &other.completions)
    }
}

/// Applies one command to a snapshot and returns the next one. Never fails and never touches
/// `state`.
pub fn reduce(state: &ActivityState, command: &ActivityCommand) -> ActivityState {
    match command {
        ActivityCommand::AddActivity(activity) => ActivityState {
            activities: appended(&state.activities, activity.clone()),
            completions: state.completions.clone(),
        },
        // Activity and its completions leave in the same step, so no snapshot ever holds a
        // completion of a removed activity.
        ActivityCommand::DeleteActivity(activity_id) => ActivityState {
            activities: retained(&state.activities, |v| v.id != *activity_id),
            completions: retained(&state.completions, |v| v.activity_id != *activity_id),
        },
        ActivityCommand::CompleteActivity(completion) => ActivityState {
            activities: state.activities.clone(),
            completions: appended(&state.completions, completion.clone()),
        },
        ActivityCommand::RemoveCompletion(completion_id) => ActivityState {
            activities: state.activities.clone(),
            completions: retained(&state.completions, |v| v.id != *completion_id),
        },
    }
}

fn appended<T: Clone>(values: &Arc<[T]>, value: T) -> Arc<[T]> {
    values.iter().cloned().chain(std::iter::once(value)).collect()
}

/// Keeps the original allocation when nothing gets filtered out.
fn retained<T: Clone>(values: &Arc<[T]>, keep: impl Fn(&T) -> bool) -> Arc<[T]> {
    if values.iter().all(&keep) {
        return values.clone();
    }
    values.iter().filter(|v| keep(v)).cloned().collect()
}

/// Owner of the current snapshot. All changes go through [ActivityStore::dispatch].
///
/// The store is meant to be created once per session and handed to whoever needs it.
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    state: ActivityState,
    history: Vec<ActivityCommand>,
}

impl ActivityStore {
    pub fn new(initial: ActivityState) -> Self {
        Self {
            state: initial,
            history: vec![],
        }
    }

    /// Store holding the default set of activities.
    pub fn seeded(clock: &dyn Clock) -> Self {
        Self::new(initial_state(clock))
    }

    /// Rebuilds a store by applying `commands` to `initial` in order.
    pub fn replay(
        initial: ActivityState,
        commands: impl IntoIterator<Item = ActivityCommand>,
    ) -> Self {
        let mut store = Self::new(initial);
        for command in commands {
            store.dispatch(command);
        }
        store
    }

    /// Current snapshot. Cloning only bumps reference counts.
    pub fn state(&self) -> ActivityState {
        self.state.clone()
    }

    /// Commands applied so far, oldest first.
    pub fn history(&self) -> &[ActivityCommand] {
        &self.history
    }

    #[instrument(skip_all, fields(kind = command.kind()))]
    pub fn dispatch(&mut self, command: ActivityCommand) {
        self.state = reduce(&self.state, &command);
        debug!(
            "Applied {}, {} activities and {} completions",
            command.kind(),
            self.state.activities.len(),
            self.state.completions.len()
        );
        self.history.push(command);
    }

    pub fn dispatch_incoming(&mut self, incoming: Incoming) {
        match incoming {
            Incoming::Command(command) => self.dispatch(command),
            Incoming::Unrecognized(kind) => {
                warn!("Ignoring unrecognized command {kind}");
            }
        }
    }
}
