use super::edited_by::EditedBy;
use super::field::{FieldAudit, RecordField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One clock-in / clock-out session as captured by the device pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,                  // ⇔ records.id (TEXT, opaque)
    pub owner_id: String,            // ⇔ records.owner_id
    pub location_id: Option<String>, // ⇔ records.location_id

    pub start: DateTime<Utc>,       // ⇔ records.start_at (RFC3339 UTC)
    pub end: Option<DateTime<Utc>>, // ⇔ records.end_at (NULL = in progress)

    // Denormalized at capture time so old reports stay stable.
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub location_latitude: Option<f64>,
    #[serde(default)]
    pub location_longitude: Option<f64>,

    #[serde(default = "default_sync_status")]
    pub sync_status: String, // opaque

    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_by: EditedBy,
    #[serde(default)]
    pub original_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub original_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edit_reason: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_sync_status() -> String {
    "synced".to_string()
}

impl Record {
    /// Bare record with no location and no audit data.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            location_id: None,
            start,
            end,
            location_name: None,
            location_latitude: None,
            location_longitude: None,
            sync_status: default_sync_status(),
            edited_at: None,
            edited_by: EditedBy::None,
            original_start: None,
            original_end: None,
            edit_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_location(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.location_id = Some(id.into());
        self.location_name = Some(name.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    pub fn value(&self, field: RecordField) -> Option<DateTime<Utc>> {
        match field {
            RecordField::Start => Some(self.start),
            RecordField::End => self.end,
        }
    }

    pub fn original(&self, field: RecordField) -> Option<DateTime<Utc>> {
        match field {
            RecordField::Start => self.original_start,
            RecordField::End => self.original_end,
        }
    }

    pub fn audit(&self, field: RecordField) -> FieldAudit {
        FieldAudit::from_original(self.original(field))
    }

    /// Check that writing `value` into `field` keeps clock-out after
    /// clock-in. Open sessions cannot receive a clock-out correction.
    pub fn check_correction(&self, field: RecordField, value: DateTime<Utc>) -> Result<(), String> {
        match field {
            RecordField::Start => {
                if let Some(end) = self.end
                    && value >= end
                {
                    return Err(format!(
                        "clock-in {} must be before clock-out {}",
                        value.to_rfc3339(),
                        end.to_rfc3339()
                    ));
                }
                Ok(())
            }
            RecordField::End => match self.end {
                None => Err(format!("record {} is still in progress", self.id)),
                Some(_) if value <= self.start => Err(format!(
                    "clock-out {} must be after clock-in {}",
                    value.to_rfc3339(),
                    self.start.to_rfc3339()
                )),
                Some(_) => Ok(()),
            },
        }
    }

    /// Location name, ignoring empty strings.
    pub fn location_label(&self) -> Option<&str> {
        self.location_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn open_and_edited_flags() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut r = Record::new("r1", "u1", start, None);
        assert!(r.is_open());
        assert!(!r.is_edited());
        assert_eq!(r.audit(RecordField::Start), FieldAudit::Unedited);

        r.original_start = Some(start);
        r.edited_at = Some(start);
        assert!(r.is_edited());
        assert!(r.audit(RecordField::Start).is_edited());
        assert!(!r.audit(RecordField::End).is_edited());
    }

    #[test]
    fn correction_ordering_checks() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap();
        let done = Record::new("r1", "u1", start, Some(end));
        let open = Record::new("r2", "u1", start, None);

        assert!(done.check_correction(RecordField::Start, start).is_ok());
        assert!(done.check_correction(RecordField::Start, end).is_err());
        assert!(done.check_correction(RecordField::End, start).is_err());
        assert!(done.check_correction(RecordField::End, end).is_ok());
        assert!(open.check_correction(RecordField::Start, end).is_ok());
        assert!(open.check_correction(RecordField::End, end).is_err());
    }

    #[test]
    fn blank_location_has_no_label() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let r = Record::new("r1", "u1", start, None).with_location("l1", "  ");
        assert_eq!(r.location_label(), None);
    }

    #[test]
    fn deserializes_pipeline_payload() {
        let json = r#"{
            "id": "r9",
            "owner_id": "u1",
            "location_id": null,
            "start": "2024-03-01T08:00:00Z",
            "end": null,
            "location_name": "Site A"
        }"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, "r9");
        assert!(r.is_open());
        assert_eq!(r.edited_by, EditedBy::None);
        assert_eq!(r.sync_status, "synced");
    }
}
