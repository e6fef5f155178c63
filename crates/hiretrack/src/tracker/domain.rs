use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for tracked applications. Assigned by the tracker, never by clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Applied, Self::Interview, Self::Offer, Self::Rejected]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
        }
    }

    /// Offer and Rejected end the pipeline; no urgency or pipeline value applies.
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Offer | Self::Rejected => true,
            Self::Applied | Self::Interview => false,
        }
    }

    /// Reached at least the interview stage.
    pub const fn counts_as_interview(self) -> bool {
        match self {
            Self::Interview | Self::Offer => true,
            Self::Applied | Self::Rejected => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}', expected one of Applied, Interview, Offer, Rejected")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// One tracked job application as persisted and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    pub date_applied: DateTime<Utc>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub notes: String,
}

/// Fields a client may supply when creating an application.
///
/// Everything is optional at the wire level so that missing required fields
/// surface as validation errors naming the field rather than as decode failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary: Option<Value>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date_applied: Option<String>,
}

impl NewApplication {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: Some(company.into()),
            role: Some(role.into()),
            ..Self::default()
        }
    }

    pub fn with_salary(mut self, salary: impl Into<Value>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_date_applied(mut self, date_applied: DateTime<Utc>) -> Self {
        self.date_applied = Some(date_applied.to_rfc3339());
        self
    }
}

/// Coerces any numeric-like input into a finite, non-negative salary.
///
/// Numbers and numeric strings are accepted; anything else, negatives, and
/// non-finite values collapse to zero.
pub fn normalize_salary(raw: Option<&Value>) -> f64 {
    let value = match raw {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };

    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
