use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineType {
    MissingEvent,
    #[serde(rename = "no_response_24h")]
    NoResponse24h,
    TrainingLoss,
    Manual,
}

impl FineType {
    pub fn as_str(&self) -> &str {
        match self {
            FineType::MissingEvent => "missing_event",
            FineType::NoResponse24h => "no_response_24h",
            FineType::TrainingLoss => "training_loss",
            FineType::Manual => "manual",
        }
    }
}

/// The event a fine is attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct FineEvent {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineRecord {
    pub player_id: String,
    pub player_name: String,
    pub event_id: String,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    pub fine_type: FineType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_subtype: Option<String>,
    pub fine_amount: u32,
    #[serde(default)]
    pub paid: bool,
    pub created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
}

impl FineRecord {
    pub fn new(
        fine_type: FineType,
        fine_amount: u32,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        event: &FineEvent,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            event_id: event.id.clone(),
            event_name: event.name.clone(),
            event_date: event.date,
            fine_type,
            fine_subtype: None,
            fine_amount,
            paid: false,
            created_date,
            paid_date: None,
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.fine_subtype = Some(subtype.into());
        self
    }

    pub fn mark_paid(&mut self, now: DateTime<Utc>) {
        self.paid = true;
        self.paid_date = Some(now);
    }

    pub fn mark_unpaid(&mut self) {
        self.paid = false;
        self.paid_date = None;
    }
}

/// Key for a `missing_event` fine.
pub fn fine_key(event_id: &str, player_id: &str) -> String {
    format!("{event_id}_{player_id}")
}

/// Key for a `no_response_24h` fine, distinct from the `missing_event` key.
pub fn no_response_key(event_id: &str, player_id: &str) -> String {
    format!("{event_id}_{player_id}_no_response")
}

/// Player id used for names typed in by an operator (no roster id available).
pub fn name_as_player_id(name: &str) -> String {
    name.trim().replace(' ', "_")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualFineType {
    pub id: String,
    pub name: String,
    pub amount: u32,
    #[serde(default)]
    pub description: String,
    pub created_date: DateTime<Utc>,
}

/// Catalog id derived from a display name: lowercase, runs of other characters as `_`.
pub fn fine_type_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            id.push(c);
        } else if !id.ends_with('_') {
            id.push('_');
        }
    }
    id.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fine_type_uses_persisted_names() {
        let json = serde_json::to_string(&FineType::NoResponse24h).unwrap();
        assert_eq!(json, "\"no_response_24h\"");
        let parsed: FineType = serde_json::from_str("\"training_loss\"").unwrap();
        assert_eq!(parsed, FineType::TrainingLoss);
        assert_eq!(FineType::MissingEvent.as_str(), "missing_event");
    }

    #[test]
    fn keys_distinguish_response_fines() {
        assert_eq!(fine_key("E1", "P1"), "E1_P1");
        assert_eq!(no_response_key("E1", "P1"), "E1_P1_no_response");
        assert_eq!(name_as_player_id("Anna Holm"), "Anna_Holm");
    }

    #[test]
    fn payment_toggles_paid_date() {
        let event = FineEvent {
            id: "E1".into(),
            name: "Training".into(),
            date: Utc::now(),
        };
        let mut fine = FineRecord::new(FineType::MissingEvent, 50, "P1", "Anna", &event, Utc::now());
        fine.mark_paid(Utc::now());
        assert!(fine.paid && fine.paid_date.is_some());
        fine.mark_unpaid();
        assert!(!fine.paid && fine.paid_date.is_none());
    }

    #[test]
    fn derives_catalog_ids() {
        assert_eq!(fine_type_id("Late for Bus!"), "late_for_bus");
        assert_eq!(fine_type_id("  Glemt  trøje "), "glemt_trøje");
    }
}
