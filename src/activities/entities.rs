use std::{fmt::Display, sync::Arc};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// How often the user intends to do an activity. Only shown to the user, nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

/// A recurring habit the user wants to keep track of.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub description: Arc<str>,
    pub target_frequency: Frequency,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(
        id: impl Into<Arc<str>>,
        name: &str,
        description: &str,
        target_frequency: Frequency,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let id = non_empty_id(id.into())?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.into(),
            description: description.trim().into(),
            target_frequency,
            created_at,
        })
    }
}

/// Record that an activity was done on some day.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCompletion {
    pub id: Arc<str>,
    pub activity_id: Arc<str>,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Arc<str>>,
    pub created_at: DateTime<Utc>,
}

impl ActivityCompletion {
    pub fn new(
        id: impl Into<Arc<str>>,
        activity_id: impl Into<Arc<str>>,
        completed_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: non_empty_id(id.into())?,
            activity_id: non_empty_id(activity_id.into())?,
            completed_at,
            notes: notes.map(str::trim).filter(|v| !v.is_empty()).map(Arc::from),
            created_at,
        })
    }
}

fn non_empty_id(id: Arc<str>) -> Result<Arc<str>, ValidationError> {
    if id.trim().is_empty() {
        Err(ValidationError::EmptyId)
    } else {
        Ok(id)
    }
}
