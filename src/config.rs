use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

pub const DEFAULT_API_URL: &str = "https://api.aviationstack.com/v1/airports";
pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const DEFAULT_HISTORY_FILE: &str = "skyconnect-history.json";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_UPSTREAM_SEARCH: bool = false;
pub const QUERY_MIN_CHARS: usize = 2;
pub const QUERY_MAX_CHARS: usize = 50;

/// Page sizes offered by the size selector. The upstream free plan caps a
/// request at 100 records, so the cycle stops there.
pub const PAGE_SIZE_CHOICES: &[u64] = &[10, 25, 50, 100];

pub const MAX_PAGE_SIZE: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub config_path: PathBuf,
    pub page_size: u64,
    pub history_file: String,
    pub fetch_timeout_secs: u64,
    pub debounce_ms: u64,
    pub upstream_search: bool,
    pub airport: Option<String>,
    pub query: String,
    pub log_enabled: bool,
    pub log_level: String,
    pub log_file: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    page_size: Option<u64>,
    history_file: Option<String>,
    fetch_timeout_secs: Option<u64>,
    debounce_ms: Option<u64>,
    upstream_search: Option<bool>,
    query: Option<String>,
    log_enabled: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

pub fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_from(&args)
}

fn parse_from(args: &[String]) -> Result<Config> {
    let mut explicit_config: Option<PathBuf> = None;
    let mut airport: Option<String> = None;
    let mut query: Option<String> = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a value"))?;
                explicit_config = Some(PathBuf::from(value));
            }
            "--airport" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--airport needs a code"))?;
                airport = Some(value.trim().to_uppercase());
            }
            "--query" | "-q" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{arg} needs a value"))?;
                query = Some(value.clone());
            }
            other => {
                return Err(anyhow!("Unknown argument: {other}"));
            }
        }
    }

    let env_config = env::var("SKYCONNECT_CONFIG").ok().map(PathBuf::from);
    let config_path = explicit_config
        .clone()
        .or(env_config)
        .unwrap_or_else(|| PathBuf::from("skyconnect-tui.toml"));

    let mut config = Config {
        api_url: DEFAULT_API_URL.to_string(),
        api_key: String::new(),
        config_path: config_path.clone(),
        page_size: DEFAULT_PAGE_SIZE,
        history_file: DEFAULT_HISTORY_FILE.to_string(),
        fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        debounce_ms: DEFAULT_DEBOUNCE_MS,
        upstream_search: DEFAULT_UPSTREAM_SEARCH,
        airport: None,
        query: String::new(),
        log_enabled: false,
        log_level: "info".to_string(),
        log_file: "skyconnect-tui.log".to_string(),
    };

    if config_path.exists() {
        if let Some(file_config) = load_file_config(&config_path)? {
            apply_file_config(&mut config, file_config);
        }
    } else if explicit_config.is_some() {
        return Err(anyhow!("Config file not found: {}", config_path.display()));
    }

    config.config_path = config_path;

    if let Ok(value) = env::var("SKYCONNECT_URL") {
        if !value.trim().is_empty() {
            config.api_url = value;
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_API_KEY") {
        config.api_key = value;
    } else if let Ok(value) = env::var("AVIATIONSTACK_KEY") {
        config.api_key = value;
    }
    if let Ok(value) = env::var("SKYCONNECT_PAGE_SIZE") {
        if let Ok(size) = value.parse::<u64>() {
            config.page_size = size;
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_HISTORY_FILE") {
        if !value.trim().is_empty() {
            config.history_file = value;
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_TIMEOUT_SECS") {
        if let Ok(secs) = value.parse::<u64>() {
            config.fetch_timeout_secs = secs.max(1);
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_DEBOUNCE_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.debounce_ms = ms;
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_UPSTREAM_SEARCH") {
        config.upstream_search = matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(value) = env::var("SKYCONNECT_AIRPORT") {
        if !value.trim().is_empty() {
            config.airport = Some(value.trim().to_uppercase());
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_LOG") {
        config.log_enabled = matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(value) = env::var("SKYCONNECT_LOG_LEVEL") {
        if !value.trim().is_empty() {
            config.log_level = value;
        }
    }
    if let Ok(value) = env::var("SKYCONNECT_LOG_FILE") {
        if !value.trim().is_empty() {
            config.log_file = value;
        }
    }

    if let Some(code) = airport {
        if !code.is_empty() {
            config.airport = Some(code);
        }
    }
    if let Some(value) = query {
        config.query = value;
    }

    config.page_size = clamp_page_size(config.page_size);

    Ok(config)
}

pub fn clamp_page_size(size: u64) -> u64 {
    size.clamp(1, MAX_PAGE_SIZE)
}

fn load_file_config(path: &Path) -> Result<Option<FileConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(file_config))
}

fn apply_file_config(config: &mut Config, file: FileConfig) {
    if let Some(value) = file.api_url {
        if !value.trim().is_empty() {
            config.api_url = value;
        }
    }
    if let Some(value) = file.api_key {
        config.api_key = value;
    }
    if let Some(value) = file.page_size {
        config.page_size = clamp_page_size(value);
    }
    if let Some(value) = file.history_file {
        if !value.trim().is_empty() {
            config.history_file = value;
        }
    }
    if let Some(value) = file.fetch_timeout_secs {
        config.fetch_timeout_secs = value.max(1);
    }
    if let Some(value) = file.debounce_ms {
        config.debounce_ms = value;
    }
    if let Some(value) = file.upstream_search {
        config.upstream_search = value;
    }
    if let Some(value) = file.query {
        config.query = value;
    }
    if let Some(value) = file.log_enabled {
        config.log_enabled = value;
    }
    if let Some(value) = file.log_level {
        if !value.trim().is_empty() {
            config.log_level = value;
        }
    }
    if let Some(value) = file.log_file {
        if !value.trim().is_empty() {
            config.log_file = value;
        }
    }
}

/// Write the chosen page size back into the config file, keeping whatever
/// else (and whatever formatting) the file already has.
pub fn save_page_size(path: &Path, page_size: u64) -> Result<()> {
    let existing = fs::read_to_string(path).unwrap_or_default();
    let mut doc = existing
        .parse::<DocumentMut>()
        .unwrap_or_else(|_| DocumentMut::new());
    doc["page_size"] = toml_edit::value(page_size as i64);
    fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        dir.push(format!("skyconnect-config-test-{suffix}"));
        let _ = fs::create_dir_all(&dir);
        dir.push(name);
        dir
    }

    fn base_config() -> Config {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            config_path: PathBuf::from("skyconnect-tui.toml"),
            page_size: DEFAULT_PAGE_SIZE,
            history_file: DEFAULT_HISTORY_FILE.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            upstream_search: DEFAULT_UPSTREAM_SEARCH,
            airport: None,
            query: String::new(),
            log_enabled: false,
            log_level: "info".to_string(),
            log_file: "skyconnect-tui.log".to_string(),
        }
    }

    #[test]
    fn load_file_config_parses_values() {
        let path = temp_file("config.toml");
        let content = r#"
api_url = "https://api.example.test/v1/airports"
api_key = "abc123"
page_size = 50
history_file = "visits.json"
fetch_timeout_secs = 3
debounce_ms = 150
upstream_search = true
query = "international"
log_enabled = true
log_level = "debug"
log_file = "sky.log"
"#;
        fs::write(&path, content).unwrap();
        let cfg = load_file_config(&path).unwrap().unwrap();
        assert_eq!(
            cfg.api_url.as_deref(),
            Some("https://api.example.test/v1/airports")
        );
        assert_eq!(cfg.api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.page_size, Some(50));
        assert_eq!(cfg.history_file.as_deref(), Some("visits.json"));
        assert_eq!(cfg.fetch_timeout_secs, Some(3));
        assert_eq!(cfg.debounce_ms, Some(150));
        assert_eq!(cfg.upstream_search, Some(true));
        assert_eq!(cfg.query.as_deref(), Some("international"));
        assert_eq!(cfg.log_enabled, Some(true));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.log_file.as_deref(), Some("sky.log"));
        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(path.parent().unwrap());
    }

    #[test]
    fn apply_file_config_overrides_and_clamps() {
        let mut cfg = base_config();
        let file = FileConfig {
            page_size: Some(50_000),
            fetch_timeout_secs: Some(0),
            api_key: Some("key".to_string()),
            log_enabled: Some(true),
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        apply_file_config(&mut cfg, file);
        assert_eq!(cfg.page_size, MAX_PAGE_SIZE);
        assert_eq!(cfg.fetch_timeout_secs, 1);
        assert_eq!(cfg.api_key, "key");
        assert!(cfg.log_enabled);
        assert_eq!(cfg.log_level, "trace");
    }

    #[test]
    fn blank_values_do_not_override_defaults() {
        let mut cfg = base_config();
        let file = FileConfig {
            api_url: Some("  ".to_string()),
            history_file: Some(String::new()),
            log_level: Some(String::new()),
            ..Default::default()
        };
        apply_file_config(&mut cfg, file);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.history_file, DEFAULT_HISTORY_FILE);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn save_page_size_preserves_other_keys() {
        let path = temp_file("config.toml");
        fs::write(&path, "api_key = \"abc\" # keep me\npage_size = 25\n").unwrap();
        save_page_size(&path, 100).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("page_size = 100"));
        assert!(content.contains("# keep me"));

        let cfg = load_file_config(&path).unwrap().unwrap();
        assert_eq!(cfg.page_size, Some(100));
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(path.parent().unwrap());
    }

    #[test]
    fn save_page_size_creates_missing_file() {
        let path = temp_file("fresh.toml");
        save_page_size(&path, 10).unwrap();
        let cfg = load_file_config(&path).unwrap().unwrap();
        assert_eq!(cfg.page_size, Some(10));
        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(path.parent().unwrap());
    }

    #[test]
    fn page_size_clamped() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(25), 25);
        assert_eq!(clamp_page_size(9_999), MAX_PAGE_SIZE);
    }
}
