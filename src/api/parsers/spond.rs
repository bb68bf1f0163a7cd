use anyhow::{Context, Result};
use log::warn;
use serde_json::Value;

use crate::domain::{Event, Member};

/// Extract the session token from a login response
pub fn parse_login_token(data: &Value) -> Option<String> {
    data.get("loginToken")
        .or_else(|| data.get("accessToken").and_then(|t| t.get("token")))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Members of the group with the given id, `None` if the group is absent
pub fn find_group_members(groups: &Value, group_id: &str) -> Option<Vec<Member>> {
    let group = groups
        .as_array()?
        .iter()
        .find(|group| group.get("id").and_then(Value::as_str) == Some(group_id))?;

    let members = group
        .get("members")
        .and_then(Value::as_array)
        .map(|raw| parse_lenient(raw, "member"))
        .unwrap_or_default();
    Some(members)
}

/// Events list; entries that do not match the expected shape are skipped
pub fn parse_events(data: &Value) -> Result<Vec<Event>> {
    let raw = data
        .as_array()
        .context("Expected a JSON array of events")?;
    Ok(parse_lenient(raw, "event"))
}

fn parse_lenient<T: serde::de::DeserializeOwned>(raw: &[Value], what: &str) -> Vec<T> {
    raw.iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed {what}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_either_token_shape() {
        assert_eq!(
            parse_login_token(&json!({"loginToken": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(
            parse_login_token(&json!({"accessToken": {"token": "xyz"}})).as_deref(),
            Some("xyz")
        );
        assert!(parse_login_token(&json!({"loginToken": ""})).is_none());
    }

    #[test]
    fn finds_members_of_the_configured_group() {
        let groups = json!([
            {"id": "OTHER", "members": [{"id": "X"}]},
            {"id": "G1", "members": [
                {"id": "M1", "firstName": "Anna"},
                {"firstName": "no id"}
            ]}
        ]);
        let members = find_group_members(&groups, "G1").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "M1");
        assert!(find_group_members(&groups, "G2").is_none());
    }

    #[test]
    fn events_must_be_an_array() {
        assert!(parse_events(&json!({"error": "nope"})).is_err());
        let events = parse_events(&json!([{"id": "E1", "heading": "Kamp"}])).unwrap();
        assert_eq!(events[0].heading, "Kamp");
    }
}
