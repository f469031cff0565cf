use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    entities::{Activity, ActivityCompletion},
    error::ValidationError,
};

/// Every change the store knows how to apply. The set is closed: anything else arriving from the
/// outside is represented by [Incoming::Unrecognized] and never reaches the reducer.
///
/// Serialized as `{"type": "ADD_ACTIVITY", "payload": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCommand {
    AddActivity(Activity),
    DeleteActivity(Arc<str>),
    CompleteActivity(ActivityCompletion),
    RemoveCompletion(Arc<str>),
}

pub const ADD_ACTIVITY: &str = "ADD_ACTIVITY";
pub const DELETE_ACTIVITY: &str = "DELETE_ACTIVITY";
pub const COMPLETE_ACTIVITY: &str = "COMPLETE_ACTIVITY";
pub const REMOVE_COMPLETION: &str = "REMOVE_COMPLETION";

const KNOWN_KINDS: &[&str] = &[
    ADD_ACTIVITY,
    DELETE_ACTIVITY,
    COMPLETE_ACTIVITY,
    REMOVE_COMPLETION,
];

impl ActivityCommand {
    /// Wire tag of the command.
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityCommand::AddActivity(_) => ADD_ACTIVITY,
            ActivityCommand::DeleteActivity(_) => DELETE_ACTIVITY,
            ActivityCommand::CompleteActivity(_) => COMPLETE_ACTIVITY,
            ActivityCommand::RemoveCompletion(_) => REMOVE_COMPLETION,
        }
    }

    /// Checks a payload that didn't go through the typed constructors, e.g. one decoded from
    /// JSON, and returns it in the same shape the constructors would have produced.
    pub fn validate(self) -> Result<Self, ValidationError> {
        match self {
            ActivityCommand::AddActivity(activity) => Ok(ActivityCommand::AddActivity(
                Activity::new(
                    activity.id,
                    &activity.name,
                    &activity.description,
                    activity.target_frequency,
                    activity.created_at,
                )?,
            )),
            ActivityCommand::CompleteActivity(completion) => {
                Ok(ActivityCommand::CompleteActivity(ActivityCompletion::new(
                    completion.id,
                    completion.activity_id,
                    completion.completed_at,
                    completion.created_at,
                    completion.notes.as_deref(),
                )?))
            }
            ActivityCommand::DeleteActivity(id) | ActivityCommand::RemoveCompletion(id)
                if id.trim().is_empty() =>
            {
                Err(ValidationError::EmptyId)
            }
            command => Ok(command),
        }
    }
}

/// Whatever arrived at the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Command(ActivityCommand),
    /// A `type` tag that isn't one of the four commands. Dispatching it changes nothing.
    Unrecognized(String),
}

impl From<ActivityCommand> for Incoming {
    fn from(value: ActivityCommand) -> Self {
        Incoming::Command(value)
    }
}

#[derive(Deserialize)]
struct RawCommand {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Decodes one command in its wire form.
///
/// Unknown tags are not an error, they come back as [Incoming::Unrecognized]. A known tag with
/// a missing or invalid payload is rejected here so that the store never sees it.
pub fn parse_command(text: &str) -> Result<Incoming, ValidationError> {
    let raw: RawCommand = serde_json::from_str(text)
        .map_err(|e| ValidationError::MalformedCommand(e.to_string()))?;

    let Some(kind) = KNOWN_KINDS.iter().copied().find(|v| *v == raw.kind) else {
        return Ok(Incoming::Unrecognized(raw.kind));
    };

    let Some(payload) = raw.payload else {
        return Err(ValidationError::MalformedPayload {
            kind,
            reason: "payload is missing".into(),
        });
    };

    let command: ActivityCommand =
        serde_json::from_value(serde_json::json!({ "type": kind, "payload": payload })).map_err(
            |e| ValidationError::MalformedPayload {
                kind,
                reason: e.to_string(),
            },
        )?;
    Ok(Incoming::Command(command.validate()?))
}
