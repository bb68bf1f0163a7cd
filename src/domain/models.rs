use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Roster/Events API Structures ---

/// One refresh worth of data from the roster source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Raw event ("spond") as delivered by the roster source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default = "unknown_heading")]
    pub heading: String,
    #[serde(default)]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responses: EventResponses,
}

fn unknown_heading() -> String {
    "Unknown Event".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponses {
    #[serde(default)]
    pub accepted_ids: Vec<String>,
    #[serde(default)]
    pub declined_ids: Vec<String>,
    #[serde(default)]
    pub unanswered_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile: Option<MemberProfile>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Profile picture URL without its query string, preferring the profile's image.
    pub fn profile_picture(&self) -> Option<String> {
        self.profile
            .as_ref()
            .and_then(|p| p.image_url.as_deref())
            .or(self.image_url.as_deref())
            .map(|url| url.split('?').next().unwrap_or(url).to_string())
            .filter(|url| !url.is_empty())
    }

    pub fn to_record(&self) -> MemberRecord {
        MemberRecord {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            name: self.full_name(),
            profile_picture: self.profile_picture(),
        }
    }
}

/// Member directory entry persisted after each sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_with_missing_optional_fields() {
        let event: Event = serde_json::from_str(r#"{"id": "E1"}"#).unwrap();
        assert_eq!(event.heading, "Unknown Event");
        assert!(event.start_timestamp.is_none());
        assert!(event.responses.unanswered_ids.is_empty());
    }

    #[test]
    fn parses_spond_member_shape() {
        let raw = r#"{
            "id": "M1",
            "firstName": "Anna",
            "lastName": "Holm",
            "profile": {"imageUrl": "https://img.example/a.jpg?size=200"}
        }"#;
        let member: Member = serde_json::from_str(raw).unwrap();
        assert_eq!(member.full_name(), "Anna Holm");
        assert_eq!(
            member.profile_picture().as_deref(),
            Some("https://img.example/a.jpg")
        );
    }

    #[test]
    fn falls_back_to_top_level_image_and_trims_name() {
        let member: Member =
            serde_json::from_str(r#"{"id": "M2", "firstName": "Bo", "imageUrl": "x.png"}"#)
                .unwrap();
        assert_eq!(member.full_name(), "Bo");
        assert_eq!(member.profile_picture().as_deref(), Some("x.png"));
        assert!(member.to_record().profile_picture.is_some());
    }
}
