use std::sync::Arc;

/// Raised while building a command, before anything reaches the store. The store itself never
/// fails: once a command exists it is applied unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Activity name can't be empty")]
    EmptyName,

    #[error("Identifier can't be empty")]
    EmptyId,

    #[error("Activity {0} doesn't exist")]
    UnknownActivity(Arc<str>),

    #[error("Identifier {0} is already taken")]
    DuplicateId(Arc<str>),

    #[error("Command is not a {{\"type\": ..}} object: {0}")]
    MalformedCommand(String),

    #[error("Payload of {kind} is malformed: {reason}")]
    MalformedPayload { kind: &'static str, reason: String },
}
