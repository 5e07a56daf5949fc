use chrono::{DateTime, Utc};
use serde::Serialize;

/// A correctable timestamp of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    Start,
    End,
}

impl RecordField {
    /// Parse a user supplied field name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" | "in" | "clock-in" => Some(RecordField::Start),
            "end" | "out" | "clock-out" => Some(RecordField::End),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Start => "start",
            RecordField::End => "end",
        }
    }

    /// Column holding the live value.
    pub fn column(&self) -> &'static str {
        match self {
            RecordField::Start => "start_at",
            RecordField::End => "end_at",
        }
    }

    /// Column holding the first captured value.
    pub fn original_column(&self) -> &'static str {
        match self {
            RecordField::Start => "original_start",
            RecordField::End => "original_end",
        }
    }
}

/// Audit state of one field of one record.
///
/// `Unedited` means the original has never been captured; once a record moves
/// to `Edited` the original stays fixed for the rest of its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAudit {
    Unedited,
    Edited { original: DateTime<Utc> },
}

impl FieldAudit {
    pub fn from_original(original: Option<DateTime<Utc>>) -> Self {
        match original {
            Some(original) => FieldAudit::Edited { original },
            None => FieldAudit::Unedited,
        }
    }

    pub fn is_edited(&self) -> bool {
        matches!(self, FieldAudit::Edited { .. })
    }
}
