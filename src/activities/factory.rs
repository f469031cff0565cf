use chrono::NaiveDate;

use crate::utils::{clock::Clock, ids::IdGenerator, time::moment_on};

use super::{
    command::ActivityCommand,
    entities::{Activity, ActivityCompletion, Frequency},
    error::ValidationError,
    projections::{completion_id_on, today_completions_for},
    store::ActivityState,
};

/// Turns user intents into well-formed commands. Ids and timestamps are assigned here, so the
/// store only ever receives complete records.
pub struct CommandFactory {
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl CommandFactory {
    pub fn new(ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn add_activity(
        &self,
        name: &str,
        description: &str,
        frequency: Frequency,
    ) -> Result<ActivityCommand, ValidationError> {
        // Name is checked before an id gets spent on it.
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let activity = Activity::new(
            self.ids.new_id(),
            name,
            description,
            frequency,
            self.clock.time(),
        )?;
        Ok(ActivityCommand::AddActivity(activity))
    }

    pub fn delete_activity(
        &self,
        state: &ActivityState,
        activity_id: &str,
    ) -> Result<ActivityCommand, ValidationError> {
        let activity = known_activity(state, activity_id)?;
        Ok(ActivityCommand::DeleteActivity(activity.id.clone()))
    }

    /// Always creates a new completion, even if the activity was already done that day.
    pub fn complete_on(
        &self,
        state: &ActivityState,
        activity_id: &str,
        day: NaiveDate,
        notes: Option<&str>,
    ) -> Result<ActivityCommand, ValidationError> {
        let activity = known_activity(state, activity_id)?;
        let completion = ActivityCompletion::new(
            self.ids.new_id(),
            activity.id.clone(),
            moment_on(day, self.clock()),
            self.clock.time(),
            notes,
        )?;
        Ok(ActivityCommand::CompleteActivity(completion))
    }

    /// Week grid cell click: undoes the first completion on `day` if there is one, otherwise
    /// completes the activity on that day with `notes`.
    pub fn toggle_on(
        &self,
        state: &ActivityState,
        activity_id: &str,
        day: NaiveDate,
        notes: Option<&str>,
    ) -> Result<ActivityCommand, ValidationError> {
        known_activity(state, activity_id)?;
        match completion_id_on(&state.completions, activity_id, day, self.clock()) {
            Some(completion_id) => Ok(ActivityCommand::RemoveCompletion(completion_id)),
            None => self.complete_on(state, activity_id, day, notes),
        }
    }

    /// Activity card click: same as [CommandFactory::toggle_on] for today, but keeps the notes
    /// when completing.
    pub fn toggle_today(
        &self,
        state: &ActivityState,
        activity_id: &str,
        notes: Option<&str>,
    ) -> Result<ActivityCommand, ValidationError> {
        known_activity(state, activity_id)?;
        match today_completions_for(&state.completions, activity_id, self.clock()).first() {
            Some(completion) => Ok(ActivityCommand::RemoveCompletion(completion.id.clone())),
            None => self.complete_on(state, activity_id, self.clock.today(), notes),
        }
    }
}

/// Checks a command that was built elsewhere, such as one read from the wire, against `state`.
/// Completions must point at an existing activity and new records can't reuse an id. Removals
/// of unknown ids pass, since applying them changes nothing.
pub fn check_against(
    state: &ActivityState,
    command: &ActivityCommand,
) -> Result<(), ValidationError> {
    match command {
        ActivityCommand::AddActivity(activity) => {
            if state.activity(&activity.id).is_some() {
                return Err(ValidationError::DuplicateId(activity.id.clone()));
            }
        }
        ActivityCommand::CompleteActivity(completion) => {
            known_activity(state, &completion.activity_id)?;
            if state.completions.iter().any(|v| v.id == completion.id) {
                return Err(ValidationError::DuplicateId(completion.id.clone()));
            }
        }
        ActivityCommand::DeleteActivity(_) | ActivityCommand::RemoveCompletion(_) => {}
    }
    Ok(())
}

fn known_activity<'a>(
    state: &'a ActivityState,
    activity_id: &str,
) -> Result<&'a Activity, ValidationError> {
    state
        .activity(activity_id)
        .ok_or_else(|| ValidationError::UnknownActivity(activity_id.into()))
}
