use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Scheduler recorded when a feed does not name one.
pub const DEFAULT_SCHEDULER: &str = "BLR-NSP-SCHEDULER1";

/// Bucket label for a non-passing run without a reason.
pub const UNKNOWN_REASON: &str = "Unknown";

/// Label for runs without a cloud.
pub const UNKNOWN_CLOUD: &str = "unknown";

/// Outcome of a regression run. Unrecognised values are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RunStatus {
    Passed,
    Failed,
    Killed,
    Other(String),
}

impl RunStatus {
    /// Case-insensitive for the known outcomes; anything else passes through untouched.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASSED" => Self::Passed,
            "FAILED" => Self::Failed,
            "KILLED" => Self::Killed,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Killed => "KILLED",
            Self::Other(s) => s,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::parse(&s))
    }
}

/// One regression execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub request_id: String,
    pub scheduler: String,
    pub cloud: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub reason: Option<String>,
    pub subreason: Option<String>,
    pub notes: Option<String>,
}

impl Run {
    /// Minimal run; the remaining fields default to empty.
    pub fn new(request_id: impl Into<String>, started_at: DateTime<Utc>, status: RunStatus) -> Self {
        Self {
            request_id: request_id.into(),
            scheduler: DEFAULT_SCHEDULER.to_string(),
            cloud: None,
            started_at,
            ended_at: None,
            status,
            reason: None,
            subreason: None,
            notes: None,
        }
    }

    pub fn with_cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>, subreason: Option<&str>) -> Self {
        self.reason = Some(reason.into());
        self.subreason = subreason.map(str::to_string);
        self
    }

    pub fn with_ended_at(mut self, ended_at: DateTime<Utc>) -> Self {
        self.ended_at = Some(ended_at);
        self
    }

    /// Blank values count as missing.
    pub fn cloud_label(&self) -> &str {
        label_or(self.cloud.as_deref(), UNKNOWN_CLOUD)
    }

    pub fn reason_label(&self) -> &str {
        label_or(self.reason.as_deref(), UNKNOWN_REASON)
    }
}

fn label_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}

/// A run as handed to dashboard consumers, with its external log link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunView {
    #[serde(flatten)]
    pub run: Run,
    pub log_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_normalises_known_values_only() {
        assert_eq!(RunStatus::parse("passed"), RunStatus::Passed);
        assert_eq!(RunStatus::parse(" Failed "), RunStatus::Failed);
        assert_eq!(RunStatus::parse("KILLED"), RunStatus::Killed);
        assert_eq!(
            RunStatus::parse("Aborted-by-user"),
            RunStatus::Other("Aborted-by-user".to_string())
        );
    }

    #[test]
    fn status_serialises_as_plain_string() {
        let v = serde_json::to_value(RunStatus::Passed).unwrap();
        assert_eq!(v, serde_json::json!("PASSED"));
        let other: RunStatus = serde_json::from_value(serde_json::json!("TIMEOUT")).unwrap();
        assert_eq!(other.as_str(), "TIMEOUT");
    }

    #[test]
    fn labels_fall_back_for_missing_fields() {
        let run = Run::new("1", Utc::now(), RunStatus::Failed);
        assert_eq!(run.cloud_label(), UNKNOWN_CLOUD);
        assert_eq!(run.reason_label(), UNKNOWN_REASON);

        let blank = run.with_cloud("").with_reason(" ", None);
        assert_eq!(blank.cloud_label(), UNKNOWN_CLOUD);
        assert_eq!(blank.reason_label(), UNKNOWN_REASON);
    }
}
