use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::history::HistoryItem;

pub const HISTORY_VERSION: u64 = 1;

/// On-disk envelope, matching the browser build's persisted shape:
/// `{ "state": { "items": [...] }, "version": 1 }`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryFile {
    #[serde(default)]
    pub state: HistoryState,
    #[serde(default)]
    pub version: u64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryState {
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

/// Pre-envelope format: a bare `{ "items": [...] }`. Still readable so an
/// old file survives an upgrade; TODO drop once version 1 has been the
/// only writer for a few releases.
#[derive(Debug, Default, Deserialize)]
struct LegacyHistoryFile {
    #[serde(default)]
    items: Vec<HistoryItem>,
}

pub fn load_history(path: &Path) -> Result<Vec<HistoryItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history: {}", path.display()))?;
    Ok(parse_history(&content))
}

/// Total parse of a persisted payload. Either envelope shape yields its
/// items; anything malformed yields an empty log rather than an error.
pub fn parse_history(content: &str) -> Vec<HistoryItem> {
    if let Ok(file) = serde_json::from_str::<HistoryFile>(content) {
        if !file.state.items.is_empty() {
            return file.state.items;
        }
    }
    if let Ok(file) = serde_json::from_str::<LegacyHistoryFile>(content) {
        return file.items;
    }
    Vec::new()
}

pub fn save_history(path: &Path, items: &[HistoryItem]) -> Result<()> {
    let file = HistoryFile {
        state: HistoryState {
            items: items.to_vec(),
        },
        version: HISTORY_VERSION,
    };
    let content = serde_json::to_string_pretty(&file)
        .with_context(|| format!("Failed to serialize history: {}", path.display()))?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write history: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_history, parse_history, save_history};
    use crate::history::HistoryItem;
    use crate::model::Airport;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        dir.push(format!("skyconnect-tui-test-{suffix}"));
        let _ = fs::create_dir_all(&dir);
        dir.push(name);
        dir
    }

    fn sample_item(code: &str) -> HistoryItem {
        HistoryItem {
            code: code.to_string(),
            airport: Airport {
                airport_name: Some("El Dorado International".to_string()),
                iata_code: Some("BOG".to_string()),
                icao_code: Some("SKBO".to_string()),
                ..Airport::default()
            },
            viewed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn history_roundtrip() {
        let path = temp_file("history.json");
        let items = vec![sample_item("SKBO")];
        save_history(&path, &items).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"state\""));
        assert!(content.contains("\"version\": 1"));
        assert!(content.contains("\"viewedAt\""));

        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].code, "SKBO");
        assert_eq!(loaded[0].airport.iata_code.as_deref(), Some("BOG"));
        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(path.parent().unwrap());
    }

    #[test]
    fn missing_file_loads_empty() {
        let path = temp_file("does-not-exist.json");
        assert!(load_history(&path).unwrap().is_empty());
        let _ = fs::remove_dir(path.parent().unwrap());
    }

    #[test]
    fn legacy_bare_shape_still_parses() {
        let content = r#"{
            "items": [
                { "code": "BOG",
                  "airport": { "airport_name": "El Dorado International", "iata_code": "BOG" },
                  "viewedAt": "2024-06-01T12:00:00Z" }
            ]
        }"#;
        let items = parse_history(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "BOG");
    }

    #[test]
    fn envelope_wins_over_legacy() {
        let content = r#"{
            "state": { "items": [
                { "code": "EZE",
                  "airport": { "iata_code": "EZE" },
                  "viewedAt": "2024-06-01T12:00:00Z" }
            ] },
            "version": 1
        }"#;
        let items = parse_history(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "EZE");
    }

    #[test]
    fn malformed_payloads_parse_as_empty() {
        assert!(parse_history("").is_empty());
        assert!(parse_history("not json at all").is_empty());
        assert!(parse_history("[1,2,3]").is_empty());
        assert!(parse_history(r#"{"state": {"items": "oops"}}"#).is_empty());
        assert!(parse_history(r#"{"state": null, "items": 42}"#).is_empty());
    }
}
