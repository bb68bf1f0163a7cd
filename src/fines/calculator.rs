use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::classify::{EventKind, classify_event};
use crate::config::FineSettings;
use crate::domain::{
    Event, FineEvent, FineRecord, FineType, Member, fine_key, no_response_key,
};

/// Roster id to display name.
pub type MemberNames = HashMap<String, String>;

pub fn member_names(members: &[Member]) -> MemberNames {
    members
        .iter()
        .map(|member| (member.id.clone(), member.full_name()))
        .collect()
}

/// Turns attendance responses into keyed fine records.
pub struct FineCalculator<'a> {
    settings: &'a FineSettings,
}

impl<'a> FineCalculator<'a> {
    pub fn new(settings: &'a FineSettings) -> Self {
        Self { settings }
    }

    pub fn amount_for(&self, kind: EventKind) -> u32 {
        match kind {
            EventKind::Match => self.settings.match_fine,
            EventKind::Training => self.settings.training_fine,
        }
    }

    /// Fines for every event, in event order.
    pub fn calculate_all(
        &self,
        events: &[Event],
        members: &MemberNames,
        existing: &BTreeMap<String, FineRecord>,
        now: DateTime<Utc>,
    ) -> Vec<(String, FineRecord)> {
        events
            .iter()
            .flat_map(|event| self.calculate_event_fines(event, members, existing, now))
            .collect()
    }

    /// Fines one event produces. `existing` is consulted so a player who was
    /// already fined for this event gets no response-time fine on top.
    pub fn calculate_event_fines(
        &self,
        event: &Event,
        members: &MemberNames,
        existing: &BTreeMap<String, FineRecord>,
        now: DateTime<Utc>,
    ) -> Vec<(String, FineRecord)> {
        let Some(start) = event.start_timestamp else {
            warn!("Skipping event {} without a start time", event.id);
            return Vec::new();
        };

        if self.before_cutoff(start) {
            debug!("Skipping event {} before fines cutoff", event.id);
            return Vec::new();
        }

        let fine_event = FineEvent {
            id: event.id.clone(),
            name: event.heading.clone(),
            date: start,
        };
        let kind = classify_event(&event.heading, self.settings.match_keywords.as_slice());
        let amount = self.amount_for(kind);

        let responses = &event.responses;
        let mut missing: BTreeSet<&String> = responses.declined_ids.iter().collect();
        if self.settings.assess_unanswered_as_missing {
            missing.extend(responses.unanswered_ids.iter());
        }

        let mut fines = Vec::new();
        let mut fined_players: BTreeSet<&str> = BTreeSet::new();

        for player_id in missing {
            let record = FineRecord::new(
                FineType::MissingEvent,
                amount,
                player_id.as_str(),
                display_name(members, player_id),
                &fine_event,
                now,
            );
            fines.push((fine_key(&event.id, player_id), record));
            fined_players.insert(player_id.as_str());
        }

        if self.within_response_window(start, now) {
            let unanswered: BTreeSet<&String> = responses.unanswered_ids.iter().collect();
            for player_id in unanswered {
                // Only roster members are held to the response deadline.
                let Some(name) = members.get(player_id) else {
                    continue;
                };
                let already_fined = fined_players.contains(player_id.as_str())
                    || existing.contains_key(&fine_key(&event.id, player_id))
                    || existing.contains_key(&no_response_key(&event.id, player_id));
                if already_fined {
                    continue;
                }

                let record = FineRecord::new(
                    FineType::NoResponse24h,
                    self.settings.late_response_fine,
                    player_id.as_str(),
                    name.clone(),
                    &fine_event,
                    now,
                );
                fines.push((no_response_key(&event.id, player_id), record));
            }
        }

        debug!("Event {} produced {} fines", event.id, fines.len());
        fines
    }

    // --- Helper Methods ---

    fn before_cutoff(&self, start: DateTime<Utc>) -> bool {
        self.settings
            .cutoff_date
            .is_some_and(|cutoff| start.date_naive() < cutoff)
    }

    fn within_response_window(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let hours_until = (start - now).num_seconds() as f64 / 3600.0;
        (0.0..=self.settings.late_response_hours as f64).contains(&hours_until)
    }
}

fn display_name(members: &MemberNames, player_id: &str) -> String {
    members
        .get(player_id)
        .cloned()
        .unwrap_or_else(|| format!("Unknown ({player_id})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventResponses;
    use chrono::{Duration, NaiveDate};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn event(heading: &str, start: DateTime<Utc>, declined: &[&str], unanswered: &[&str]) -> Event {
        Event {
            id: "E1".to_string(),
            heading: heading.to_string(),
            start_timestamp: Some(start),
            responses: EventResponses {
                accepted_ids: ids(&["ok"]),
                declined_ids: ids(declined),
                unanswered_ids: ids(unanswered),
            },
        }
    }

    fn roster() -> MemberNames {
        [("P1", "Anna Holm"), ("P2", "Bo Berg")]
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn declined_and_unanswered_players_miss_the_event() {
        let settings = FineSettings::default();
        let calculator = FineCalculator::new(&settings);
        let now = Utc::now();
        let past = now - Duration::days(2);

        let fines = calculator.calculate_event_fines(
            &event("Tuesday training", past, &["P1"], &["P2", "X9"]),
            &roster(),
            &BTreeMap::new(),
            now,
        );

        let keys: Vec<&str> = fines.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["E1_P1", "E1_P2", "E1_X9"]);
        assert!(fines.iter().all(|(_, f)| f.fine_type == FineType::MissingEvent));
        assert!(fines.iter().all(|(_, f)| f.fine_amount == 50));
        assert_eq!(fines[2].1.player_name, "Unknown (X9)");
    }

    #[test]
    fn match_events_use_the_match_amount() {
        let settings = FineSettings::default();
        let calculator = FineCalculator::new(&settings);
        let now = Utc::now();

        let fines = calculator.calculate_event_fines(
            &event("Kamp mod B93", now - Duration::hours(3), &["P1"], &[]),
            &roster(),
            &BTreeMap::new(),
            now,
        );
        assert_eq!(fines[0].1.fine_amount, 100);
    }

    #[test]
    fn events_before_cutoff_produce_nothing() {
        let settings = FineSettings {
            cutoff_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..FineSettings::default()
        };
        let calculator = FineCalculator::new(&settings);
        let start = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|d| d.and_hms_opt(18, 0, 0))
            .unwrap()
            .and_utc();

        let fines = calculator.calculate_event_fines(
            &event("Training", start, &["P1"], &["P2"]),
            &roster(),
            &BTreeMap::new(),
            Utc::now(),
        );
        assert!(fines.is_empty());
    }

    #[test]
    fn events_on_the_cutoff_day_are_fined() {
        let settings = FineSettings {
            cutoff_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..FineSettings::default()
        };
        let calculator = FineCalculator::new(&settings);
        let midnight = NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
            .and_utc();

        let fines = calculator.calculate_event_fines(
            &event("Training", midnight, &["P1"], &[]),
            &roster(),
            &BTreeMap::new(),
            Utc::now(),
        );
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].0, "E1_P1");
    }

    #[test]
    fn late_response_fine_applies_when_unanswered_are_not_missing() {
        let settings = FineSettings {
            assess_unanswered_as_missing: false,
            ..FineSettings::default()
        };
        let calculator = FineCalculator::new(&settings);
        let now = Utc::now();

        let fines = calculator.calculate_event_fines(
            &event("Training", now + Duration::hours(5), &["P1"], &["P2", "X9"]),
            &roster(),
            &BTreeMap::new(),
            now,
        );

        let keys: Vec<&str> = fines.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["E1_P1", "E1_P2_no_response"]);
        assert_eq!(fines[1].1.fine_type, FineType::NoResponse24h);
        assert_eq!(fines[1].1.fine_amount, 25);
    }

    #[test]
    fn response_fines_are_exclusive_with_missing_fines() {
        let settings = FineSettings::default();
        let calculator = FineCalculator::new(&settings);
        let now = Utc::now();

        let fines = calculator.calculate_event_fines(
            &event("Training", now + Duration::hours(5), &[], &["P2"]),
            &roster(),
            &BTreeMap::new(),
            now,
        );
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].1.fine_type, FineType::MissingEvent);
    }

    #[test]
    fn response_window_ignores_distant_and_past_events() {
        let settings = FineSettings {
            assess_unanswered_as_missing: false,
            ..FineSettings::default()
        };
        let calculator = FineCalculator::new(&settings);
        let now = Utc::now();

        for start in [now + Duration::hours(30), now - Duration::hours(1)] {
            let fines = calculator.calculate_event_fines(
                &event("Training", start, &[], &["P1"]),
                &roster(),
                &BTreeMap::new(),
                now,
            );
            assert!(fines.is_empty());
        }
    }

    #[test]
    fn existing_ledger_entries_block_response_fines() {
        let settings = FineSettings {
            assess_unanswered_as_missing: false,
            ..FineSettings::default()
        };
        let calculator = FineCalculator::new(&settings);
        let now = Utc::now();
        let upcoming = event("Training", now + Duration::hours(2), &[], &["P1"]);

        let first = calculator.calculate_event_fines(&upcoming, &roster(), &BTreeMap::new(), now);
        let existing: BTreeMap<String, FineRecord> = first.into_iter().collect();
        let second = calculator.calculate_event_fines(&upcoming, &roster(), &existing, now);
        assert!(second.is_empty());
    }

    #[test]
    fn events_without_start_time_are_skipped() {
        let settings = FineSettings::default();
        let calculator = FineCalculator::new(&settings);
        let mut undated = event("Training", Utc::now(), &["P1"], &[]);
        undated.start_timestamp = None;

        let fines = calculator.calculate_event_fines(&undated, &roster(), &BTreeMap::new(), Utc::now());
        assert!(fines.is_empty());
    }
}
