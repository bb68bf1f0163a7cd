use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Match,
    Training,
}

/// An event is a match when its title contains any keyword, ignoring case.
pub fn classify_event<S: AsRef<str>>(title: &str, match_keywords: &[S]) -> EventKind {
    let title = title.to_lowercase();
    let is_match = match_keywords
        .iter()
        .map(|keyword| keyword.as_ref().trim().to_lowercase())
        .any(|keyword| !keyword.is_empty() && title.contains(&keyword));

    if is_match {
        EventKind::Match
    } else {
        EventKind::Training
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORDS: [&str; 4] = ["match", "kamp", "spill", "game"];

    #[test]
    fn recognises_match_keywords_in_any_case() {
        assert_eq!(classify_event("Træningskamp mod Vejle", &KEYWORDS), EventKind::Match);
        assert_eq!(classify_event("HOME GAME", &KEYWORDS), EventKind::Match);
        assert_eq!(classify_event("Cup Match", &KEYWORDS), EventKind::Match);
    }

    #[test]
    fn everything_else_is_training() {
        assert_eq!(classify_event("Tirsdagstræning", &KEYWORDS), EventKind::Training);
        assert_eq!(classify_event("", &KEYWORDS), EventKind::Training);
    }

    #[test]
    fn blank_keywords_never_match() {
        assert_eq!(classify_event("Training", &["", "  "]), EventKind::Training);
    }
}
