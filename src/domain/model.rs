use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NATIONALITY: &str = "RSA";

/// Holder data recovered from an identity document barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub nationality: String,
    pub date_of_birth: String,
}

impl IdentityRecord {
    /// Record carrying only an id number, everything else empty or defaulted.
    pub fn id_only(id_number: &str) -> Self {
        Self {
            id_number: id_number.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            gender: String::new(),
            nationality: DEFAULT_NATIONALITY.to_string(),
            date_of_birth: String::new(),
        }
    }

    /// `first last`, trimmed, single space between the parts.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Raw text delivered by a scanner or tag reader, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScanPayload(String);

impl RawScanPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawScanPayload {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RawScanPayload {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Fields captured from the informal `name|id|phone` layout. Absent or blank
/// positions stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyFields {
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub phone: Option<String>,
}

impl LegacyFields {
    pub fn is_partial(&self) -> bool {
        self.name.is_none() || self.id_number.is_none() || self.phone.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.id_number.is_none() && self.phone.is_none()
    }
}

/// Terminal result of dispatching one identity scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    StructuredMatch(IdentityRecord),
    LegacyMatch(LegacyFields),
    RawIdCapture { id_number: String },
    Unrecognized,
}

impl ScanOutcome {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ScanOutcome::Unrecognized)
    }

    /// Short feedback line for the guard.
    pub fn feedback(&self) -> &'static str {
        match self {
            ScanOutcome::StructuredMatch(_) => "ID document decoded",
            ScanOutcome::LegacyMatch(fields) if fields.is_partial() => {
                "Partial capture, complete the remaining fields"
            }
            ScanOutcome::LegacyMatch(_) => "Details captured",
            ScanOutcome::RawIdCapture { .. } => "ID captured, verify the number",
            ScanOutcome::Unrecognized => "Format not recognized, enter details manually",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointStatus {
    Pending,
    Completed,
}

/// A physical location on the patrol route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub name: String,
    pub status: CheckpointStatus,
    /// Scheduled time while pending, verification time once completed.
    pub time: String,
}

/// Terminal result of dispatching one tag scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckpointOutcome {
    Visited { checkpoint_id: String, name: String },
    UnrecognizedCheckpoint { tag: String },
}

impl CheckpointOutcome {
    pub fn is_visited(&self) -> bool {
        matches!(self, CheckpointOutcome::Visited { .. })
    }
}

/// A submitted visitor registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorEntry {
    pub badge: String,
    pub full_name: String,
    pub id_number: String,
    pub phone: String,
    pub company: String,
    pub purpose: String,
    pub host_name: String,
    pub logged_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInEvent {
    pub checkpoint_id: String,
    pub name: String,
    pub verified_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_and_trims() {
        let mut record = IdentityRecord::id_only("8001015009087");
        record.first_name = "John".to_string();
        record.last_name = "Doe".to_string();
        assert_eq!(record.full_name(), "John Doe");

        record.first_name = String::new();
        assert_eq!(record.full_name(), "Doe");
    }

    #[test]
    fn test_legacy_fields_partial() {
        let fields = LegacyFields {
            name: Some("Jane".to_string()),
            id_number: Some("123".to_string()),
            phone: None,
        };
        assert!(fields.is_partial());
        assert!(!fields.is_empty());
        assert!(LegacyFields::default().is_empty());
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(ScanOutcome::Unrecognized).unwrap();
        assert_eq!(json["kind"], "unrecognized");
    }
}
