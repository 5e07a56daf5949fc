use serde::{Deserialize, Serialize};

/// Who last touched the timestamps of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditedBy {
    #[default]
    None,
    Manual,   // correction from the dashboard / CLI
    Geofence, // correction emitted by the device pipeline
}

impl EditedBy {
    /// Convert enum → DB value (NULL for `None`)
    pub fn to_db_str(&self) -> Option<&'static str> {
        match self {
            EditedBy::None => None,
            EditedBy::Manual => Some("manual"),
            EditedBy::Geofence => Some("geofence"),
        }
    }

    /// Convert DB value → enum
    pub fn from_db_str(s: Option<&str>) -> Option<Self> {
        match s {
            None => Some(EditedBy::None),
            Some("manual") => Some(EditedBy::Manual),
            Some("geofence") => Some(EditedBy::Geofence),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_mapping() {
        assert_eq!(EditedBy::Manual.to_db_str(), Some("manual"));
        assert_eq!(EditedBy::None.to_db_str(), None);
        assert_eq!(EditedBy::from_db_str(None), Some(EditedBy::None));
        assert_eq!(
            EditedBy::from_db_str(Some("geofence")),
            Some(EditedBy::Geofence)
        );
        assert_eq!(EditedBy::from_db_str(Some("robot")), None);
    }
}
