use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geofenced work site. Read-only for the aggregation and edit logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,       // ⇔ locations.id
    pub owner_id: String, // ⇔ locations.owner_id
    pub name: String,     // ⇔ locations.name
    #[serde(default)]
    pub address: String, // ⇔ locations.address
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64, // geofence radius in meters
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Location {
    pub fn status_label(&self) -> &'static str {
        if self.active { "active" } else { "inactive" }
    }
}
