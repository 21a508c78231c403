use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Airport;

/// Most entries kept in the visit log; older visits fall off the end.
pub const HISTORY_CAP: usize = 50;

/// One remembered visit. The wire field names keep compatibility with the
/// browser build of SkyConnect, which wrote camelCase JSON.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryItem {
    pub code: String,
    pub airport: Airport,
    #[serde(rename = "viewedAt", alias = "viewed_at")]
    pub viewed_at: DateTime<Utc>,
}

/// Visit history: most-recent-first, at most one entry per code, capped.
/// `hydrated` distinguishes "not yet loaded from disk" from "loaded and
/// empty" — the log is usable before hydration, it just starts blank.
#[derive(Debug, Default)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
    hydrated: bool,
}

impl HistoryLog {
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Adopt the persisted items. Visits recorded before hydration finished
    /// stay in front; persisted duplicates of those codes are dropped.
    pub fn hydrate(&mut self, stored: Vec<HistoryItem>) {
        for item in stored {
            if !self.items.iter().any(|i| i.code == item.code) {
                self.items.push(item);
            }
        }
        self.items.truncate(HISTORY_CAP);
        self.hydrated = true;
    }

    /// Record a visit. Re-visiting a known code moves it to the front with
    /// a fresh timestamp instead of duplicating. Empty codes are ignored.
    /// Returns true when the log changed.
    pub fn add_visit(&mut self, code: &str, airport: Airport) -> bool {
        let key = code.trim().to_uppercase();
        if key.is_empty() {
            return false;
        }
        self.items.retain(|item| item.code != key);
        self.items.insert(
            0,
            HistoryItem {
                code: key.clone(),
                airport,
                viewed_at: Utc::now(),
            },
        );
        self.items.truncate(HISTORY_CAP);
        debug!("visit recorded {key} ({} in log)", self.items.len());
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn find(&self, code: &str) -> Option<&HistoryItem> {
        find_in(&self.items, code)
    }
}

/// Scan a list of history items for `code`, matching either the entry key
/// or the nested airport's ICAO/IATA code, case-insensitively.
pub fn find_in<'a>(items: &'a [HistoryItem], code: &str) -> Option<&'a HistoryItem> {
    let wanted = code.trim();
    if wanted.is_empty() {
        return None;
    }
    items
        .iter()
        .find(|item| item.code.eq_ignore_ascii_case(wanted) || item.airport.has_code(wanted))
}

#[cfg(test)]
mod tests {
    use super::{find_in, HistoryLog, HISTORY_CAP};
    use crate::model::Airport;

    fn airport(iata: &str, name: &str) -> Airport {
        Airport {
            airport_name: Some(name.to_string()),
            iata_code: Some(iata.to_string()),
            ..Airport::default()
        }
    }

    #[test]
    fn revisit_moves_to_front_without_duplicating() {
        let mut log = HistoryLog::default();
        assert!(log.add_visit("bog", airport("BOG", "El Dorado")));
        assert!(log.add_visit("EZE", airport("EZE", "Ezeiza")));
        assert!(log.add_visit("BOG", airport("BOG", "El Dorado")));

        assert_eq!(log.len(), 2);
        assert_eq!(log.items()[0].code, "BOG");
        assert_eq!(log.items()[1].code, "EZE");
    }

    #[test]
    fn empty_code_is_ignored() {
        let mut log = HistoryLog::default();
        assert!(!log.add_visit("  ", airport("BOG", "El Dorado")));
        assert!(log.is_empty());
    }

    #[test]
    fn log_never_exceeds_cap() {
        let mut log = HistoryLog::default();
        for i in 0..(HISTORY_CAP + 20) {
            let code = format!("A{i:03}");
            log.add_visit(&code, airport(&code, "Somewhere"));
        }
        assert_eq!(log.len(), HISTORY_CAP);
        // Newest first, oldest dropped.
        assert_eq!(log.items()[0].code, format!("A{:03}", HISTORY_CAP + 19));
        assert!(log.find("A000").is_none());
    }

    #[test]
    fn find_matches_key_or_nested_codes() {
        let mut log = HistoryLog::default();
        let mut el_dorado = airport("BOG", "El Dorado");
        el_dorado.icao_code = Some("SKBO".to_string());
        // Entry keyed by ICAO, still reachable via the nested IATA code.
        log.add_visit("SKBO", el_dorado);

        assert!(log.find("skbo").is_some());
        assert!(log.find("BOG").is_some());
        assert!(log.find("EZE").is_none());
        assert!(log.find("").is_none());
    }

    #[test]
    fn hydration_keeps_session_visits_in_front() {
        let mut log = HistoryLog::default();
        log.add_visit("EZE", airport("EZE", "Ezeiza"));
        assert!(!log.is_hydrated());

        let stored = vec![
            super::HistoryItem {
                code: "EZE".to_string(),
                airport: airport("EZE", "Ezeiza"),
                viewed_at: chrono::Utc::now(),
            },
            super::HistoryItem {
                code: "BOG".to_string(),
                airport: airport("BOG", "El Dorado"),
                viewed_at: chrono::Utc::now(),
            },
        ];
        log.hydrate(stored);

        assert!(log.is_hydrated());
        assert_eq!(log.len(), 2);
        assert_eq!(log.items()[0].code, "EZE");
        assert_eq!(log.items()[1].code, "BOG");
    }

    #[test]
    fn find_in_empty_slice() {
        assert!(find_in(&[], "BOG").is_none());
    }

    #[test]
    fn clear_empties_log() {
        let mut log = HistoryLog::default();
        log.add_visit("BOG", airport("BOG", "El Dorado"));
        log.clear();
        assert!(log.is_empty());
    }
}
