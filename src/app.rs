use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use ratatui::widgets::TableState;
use tracing::{debug, info, warn};

use crate::config;
use crate::debounce::Debouncer;
use crate::history::{HistoryItem, HistoryLog};
use crate::model::{Airport, AirportsResponse};
use crate::net::FetchRequest;
use crate::pager::{self, PageToken};
use crate::recover::Recovery;
use crate::storage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Home,
    Results,
    Detail,
    History,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Home => "HOME",
            View::Results => "RESULTS",
            View::Detail => "DETAIL",
            View::History => "HISTORY",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailTab {
    General,
    Location,
    Timezone,
    Stats,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::General,
        DetailTab::Location,
        DetailTab::Timezone,
        DetailTab::Stats,
    ];

    pub fn next(self) -> Self {
        match self {
            DetailTab::General => DetailTab::Location,
            DetailTab::Location => DetailTab::Timezone,
            DetailTab::Timezone => DetailTab::Stats,
            DetailTab::Stats => DetailTab::General,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::General => "GENERAL",
            DetailTab::Location => "LOCATION",
            DetailTab::Timezone => "TIMEZONE",
            DetailTab::Stats => "STATS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Sky,
    Amber,
    Monochrome,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Sky => ThemeMode::Amber,
            ThemeMode::Amber => ThemeMode::Monochrome,
            ThemeMode::Monochrome => ThemeMode::Sky,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Sky => "SKY",
            ThemeMode::Amber => "AMBER",
            ThemeMode::Monochrome => "MONO",
        }
    }
}

pub struct App {
    pub(crate) view: View,
    pub(crate) input_mode: InputMode,
    pub(crate) theme_mode: ThemeMode,
    pub(crate) query: String,
    pub(crate) query_edit: String,
    pub(crate) query_error: Option<String>,
    pub(crate) debounce: Debouncer,
    pub(crate) page: u64,
    pub(crate) page_size: u64,
    pub(crate) upstream_search: bool,
    pub(crate) data: Option<AirportsResponse>,
    pub(crate) loading: bool,
    pub(crate) last_error: Option<String>,
    pub(crate) last_update: Option<SystemTime>,
    latest_seq: u64,
    fetch_pending: bool,
    pub(crate) selected: Option<Airport>,
    pub(crate) detail_code: Option<String>,
    pub(crate) detail_tab: DetailTab,
    pub(crate) history: HistoryLog,
    pub(crate) history_path: Option<PathBuf>,
    pub(crate) history_cursor: usize,
    recovery: Recovery,
    pub(crate) table_state: TableState,
    pub(crate) config_path: PathBuf,
    pub(crate) tick: u64,
}

impl App {
    pub fn new(
        page_size: u64,
        query: String,
        upstream_search: bool,
        debounce_delay: Duration,
        history_path: Option<PathBuf>,
        config_path: PathBuf,
    ) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            view: View::Home,
            input_mode: InputMode::Normal,
            theme_mode: ThemeMode::Sky,
            query_edit: query.clone(),
            query,
            query_error: None,
            debounce: Debouncer::new(debounce_delay),
            page: 1,
            page_size: config::clamp_page_size(page_size),
            upstream_search,
            data: None,
            loading: false,
            last_error: None,
            last_update: None,
            latest_seq: 0,
            fetch_pending: false,
            selected: None,
            detail_code: None,
            detail_tab: DetailTab::General,
            history: HistoryLog::default(),
            history_path,
            history_cursor: 0,
            recovery: Recovery::new(),
            table_state,
            config_path,
            tick: 0,
        }
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    // ----- fetching -----

    fn schedule_fetch(&mut self) {
        self.fetch_pending = true;
    }

    /// Pull the next fetch to issue, if any. Stamps it with a fresh
    /// sequence number; replies for older sequences are dropped.
    pub fn take_fetch_request(&mut self) -> Option<FetchRequest> {
        if !self.fetch_pending {
            return None;
        }
        self.fetch_pending = false;
        self.latest_seq += 1;
        self.loading = true;
        let offset = (self.page - 1).saturating_mul(self.page_size);
        let query = if self.upstream_search {
            self.query.clone()
        } else {
            String::new()
        };
        debug!(
            "fetch seq={} page={} size={}",
            self.latest_seq, self.page, self.page_size
        );
        Some(FetchRequest {
            seq: self.latest_seq,
            query,
            limit: self.page_size,
            offset,
        })
    }

    pub fn apply_results(&mut self, seq: u64, data: AirportsResponse) {
        if seq != self.latest_seq {
            debug!("dropping stale results seq={seq} latest={}", self.latest_seq);
            return;
        }
        info!(
            "results: {} airports, total={:?}",
            data.data.len(),
            data.pagination.total
        );
        self.loading = false;
        self.last_error = None;
        self.last_update = Some(SystemTime::now());
        self.data = Some(data);
        self.table_state.select(Some(0));

        let total = self.total_pages();
        if self.page > total {
            self.page = total;
            self.schedule_fetch();
        }
    }

    pub fn apply_error(&mut self, seq: u64, message: String) {
        if seq != 0 && seq != self.latest_seq {
            debug!("dropping stale error seq={seq} latest={}", self.latest_seq);
            return;
        }
        warn!("fetch error: {message}");
        self.loading = false;
        self.last_error = Some(message);
    }

    pub fn refresh(&mut self) {
        debug!("manual refresh");
        self.schedule_fetch();
    }

    // ----- paging -----

    pub fn total_count(&self) -> u64 {
        match &self.data {
            Some(data) => data
                .pagination
                .total
                .unwrap_or(data.data.len() as u64),
            None => 0,
        }
    }

    pub fn total_pages(&self) -> u64 {
        pager::total_pages(self.total_count(), self.page_size)
    }

    pub fn page_tokens(&self) -> Vec<PageToken> {
        pager::page_window(self.page, self.total_pages())
    }

    pub fn goto_page(&mut self, page: u64) {
        let target = page.clamp(1, self.total_pages());
        if target != self.page {
            self.page = target;
            debug!("page -> {}", self.page);
            self.table_state.select(Some(0));
            self.schedule_fetch();
        }
    }

    pub fn next_page(&mut self) {
        self.goto_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.goto_page(self.page.saturating_sub(1).max(1));
    }

    pub fn first_page(&mut self) {
        self.goto_page(1);
    }

    pub fn last_page(&mut self) {
        self.goto_page(self.total_pages());
    }

    /// Cycle through the offered page sizes. The choice is written back to
    /// the config file so it sticks across sessions.
    pub fn cycle_page_size(&mut self) {
        let choices = config::PAGE_SIZE_CHOICES;
        let position = choices.iter().position(|&size| size == self.page_size);
        let next = match position {
            Some(index) => choices[(index + 1) % choices.len()],
            None => choices[0],
        };
        if next == self.page_size {
            return;
        }
        info!("page size -> {next}");
        self.page_size = next;
        self.page = 1;
        self.table_state.select(Some(0));
        self.schedule_fetch();
        if let Err(err) = config::save_page_size(&self.config_path, next) {
            warn!("page size save failed: {err}");
        }
    }

    // ----- search -----

    pub fn start_search(&mut self) {
        self.query_edit = self.query.clone();
        self.query_error = None;
        self.input_mode = InputMode::Search;
        debug!("search edit start");
    }

    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.query_edit = self.query.clone();
        self.query_error = None;
        self.debounce.cancel();
        debug!("search edit cancel");
    }

    pub fn push_search_char(&mut self, ch: char, now: Instant) {
        self.query_edit.push(ch);
        self.query_error = None;
        self.debounce.schedule(now);
    }

    pub fn backspace_search(&mut self, now: Instant) {
        self.query_edit.pop();
        self.query_error = None;
        self.debounce.schedule(now);
    }

    pub fn clear_search_edit(&mut self, now: Instant) {
        self.query_edit.clear();
        self.query_error = None;
        self.debounce.schedule(now);
    }

    /// Fires the pending debounce, if due, committing the edit buffer as
    /// the applied filter.
    pub fn poll_debounce(&mut self, now: Instant) {
        if self.debounce.fire_due(now) {
            self.commit_query();
        }
    }

    fn commit_query(&mut self) {
        let next = self.query_edit.trim().to_string();
        if next == self.query {
            return;
        }
        debug!("filter -> {next:?}");
        self.query = next;
        self.table_state.select(Some(0));
        if self.upstream_search {
            self.page = 1;
            self.schedule_fetch();
        }
    }

    pub fn submit_search(&mut self) {
        match validate_query(&self.query_edit) {
            Ok(query) => {
                self.query_error = None;
                self.debounce.cancel();
                let changed = query != self.query;
                self.query = query;
                self.input_mode = InputMode::Normal;
                info!("search submitted {:?}", self.query);
                if self.view == View::Home {
                    self.enter_results();
                }
                if changed {
                    self.table_state.select(Some(0));
                    if self.upstream_search {
                        self.page = 1;
                        self.schedule_fetch();
                    }
                }
            }
            Err(message) => {
                warn!("search rejected: {message}");
                self.query_error = Some(message);
            }
        }
    }

    pub fn clear_query(&mut self) {
        if self.query.is_empty() && self.query_edit.is_empty() {
            return;
        }
        debug!("filter cleared");
        self.query.clear();
        self.query_edit.clear();
        self.query_error = None;
        self.debounce.cancel();
        self.table_state.select(Some(0));
        if self.upstream_search {
            self.page = 1;
            self.schedule_fetch();
        }
    }

    /// Row indices of the loaded page that pass the local filter.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let Some(data) = &self.data else {
            return Vec::new();
        };
        let needle = self.query.trim().to_lowercase();
        data.data
            .iter()
            .enumerate()
            .filter(|(_, airport)| airport.matches(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    // ----- views -----

    pub fn enter_results(&mut self) {
        self.view = View::Results;
        if self.data.is_none() {
            self.schedule_fetch();
        }
        debug!("view -> {}", self.view.label());
    }

    pub fn open_history(&mut self) {
        self.history_cursor = 0;
        self.view = View::History;
        debug!("view -> {}", self.view.label());
    }

    pub fn go_back(&mut self) {
        match self.view {
            View::Detail | View::History => {
                self.view = View::Results;
                if self.data.is_none() {
                    self.schedule_fetch();
                }
            }
            View::Results => self.view = View::Home,
            View::Home => {}
        }
        debug!("view -> {}", self.view.label());
    }

    pub fn open_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn close_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.toggle();
        debug!("theme -> {}", self.theme_mode.label());
    }

    // ----- selection -----

    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let row = self.table_state.selected().unwrap_or(0).min(len - 1);
        self.table_state.select(Some(row));
    }

    pub fn next_row(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(row) => (row + 1) % len,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn previous_row(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let previous = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(row) => row - 1,
        };
        self.table_state.select(Some(previous));
    }

    pub fn next_history_item(&mut self) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        self.history_cursor = (self.history_cursor + 1) % len;
    }

    pub fn previous_history_item(&mut self) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        if self.history_cursor == 0 {
            self.history_cursor = len - 1;
        } else {
            self.history_cursor -= 1;
        }
    }

    // ----- detail / history -----

    /// Open the airport under the cursor in the results table. Records the
    /// visit.
    pub fn open_selected(&mut self, indices: &[usize]) -> bool {
        let Some(row) = self.table_state.selected() else {
            return false;
        };
        let Some(&index) = indices.get(row) else {
            return false;
        };
        let Some(airport) = self
            .data
            .as_ref()
            .and_then(|data| data.data.get(index))
            .cloned()
        else {
            return false;
        };
        self.open_detail(airport);
        true
    }

    pub fn open_detail(&mut self, airport: Airport) {
        let code = airport.code();
        if let Some(code) = code.as_deref() {
            if self.history.add_visit(code, airport.clone()) {
                self.persist_history();
            }
        }
        info!("open detail {}", code.as_deref().unwrap_or("<no code>"));
        self.detail_code = code;
        self.selected = Some(airport);
        self.recovery.mark_adopted();
        self.detail_tab = DetailTab::General;
        self.view = View::Detail;
    }

    /// Re-open an entry from the history view. Unlike `open_detail` this
    /// does not touch the log, so browsing history never reorders it.
    pub fn open_history_selected(&mut self) -> bool {
        let Some(item) = self.history.items().get(self.history_cursor) else {
            return false;
        };
        debug!("reopen from history {}", item.code);
        self.selected = Some(item.airport.clone());
        self.detail_code = Some(item.code.clone());
        self.recovery.mark_adopted();
        self.detail_tab = DetailTab::General;
        self.view = View::Detail;
        true
    }

    pub fn next_detail_tab(&mut self) {
        self.detail_tab = self.detail_tab.next();
    }

    pub fn set_detail_tab(&mut self, tab: DetailTab) {
        self.detail_tab = tab;
    }

    pub fn clear_history(&mut self) {
        if self.history.is_empty() {
            return;
        }
        info!("history cleared ({} entries)", self.history.len());
        self.history.clear();
        self.history_cursor = 0;
        self.persist_history();
    }

    fn persist_history(&self) {
        let Some(path) = self.history_path.as_ref() else {
            return;
        };
        if let Err(err) = storage::save_history(path, self.history.items()) {
            warn!("history save failed: {err}");
        }
    }

    // ----- hydration & recovery -----

    /// Enter the detail view directly for `code`, as a shared link would.
    /// Runs the immediate recovery phase against the raw persisted log.
    pub fn open_deep_link(&mut self, code: &str) {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return;
        }
        info!("deep link {code}");
        self.detail_code = Some(code.clone());
        self.detail_tab = DetailTab::General;
        self.view = View::Detail;
        if let Some(airport) = self.recovery.immediate(self.history_path.as_deref(), &code) {
            info!("recovered {code} from persisted history");
            self.selected = Some(airport);
        }
    }

    /// The hydration thread finished reading the persisted log.
    pub fn apply_hydration(&mut self, items: Vec<HistoryItem>) {
        info!("history hydrated: {} items", items.len());
        self.history.hydrate(items);
        self.try_deferred_recovery();
    }

    fn try_deferred_recovery(&mut self) {
        if self.selected.is_some() || !self.history.is_hydrated() {
            return;
        }
        let Some(code) = self.detail_code.clone() else {
            return;
        };
        if let Some(airport) = self.recovery.deferred(self.history.items(), &code) {
            info!("recovered {code} from hydrated history");
            self.selected = Some(airport);
        }
    }
}

/// Submission-time query check. Typing is never blocked; this only gates
/// the submit. An empty query is fine (it clears the filter).
pub fn validate_query(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    let chars = value.chars().count();
    if chars > config::QUERY_MAX_CHARS {
        return Err(format!("At most {} characters", config::QUERY_MAX_CHARS));
    }
    if chars < config::QUERY_MIN_CHARS {
        return Err(format!("At least {} characters", config::QUERY_MIN_CHARS));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{validate_query, App, DetailTab, InputMode, View};
    use crate::history::HistoryItem;
    use crate::model::{Airport, AirportsResponse, PaginationMeta};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        dir.push(format!("skyconnect-app-test-{suffix}"));
        let _ = fs::create_dir_all(&dir);
        dir
    }

    fn test_app() -> App {
        App::new(
            25,
            String::new(),
            false,
            Duration::from_millis(300),
            None,
            PathBuf::from("skyconnect-tui.toml"),
        )
    }

    fn airport(iata: &str, name: &str, country: &str) -> Airport {
        Airport {
            airport_name: Some(name.to_string()),
            iata_code: Some(iata.to_string()),
            country_name: Some(country.to_string()),
            ..Airport::default()
        }
    }

    fn response(airports: Vec<Airport>, total: u64) -> AirportsResponse {
        AirportsResponse {
            pagination: PaginationMeta {
                limit: Some(25),
                offset: Some(0),
                count: Some(airports.len() as u64),
                total: Some(total),
            },
            data: airports,
        }
    }

    #[test]
    fn validate_query_bounds() {
        assert_eq!(validate_query(""), Ok(String::new()));
        assert_eq!(validate_query("   "), Ok(String::new()));
        assert_eq!(validate_query(" bogota "), Ok("bogota".to_string()));
        assert!(validate_query("b").is_err());
        assert_eq!(validate_query("bo"), Ok("bo".to_string()));
        assert!(validate_query(&"x".repeat(51)).is_err());
        assert_eq!(validate_query(&"x".repeat(50)), Ok("x".repeat(50)));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut app = test_app();
        app.enter_results();
        let first = app.take_fetch_request().unwrap();

        // A newer request supersedes the first before it answers.
        app.refresh();
        let second = app.take_fetch_request().unwrap();
        assert!(second.seq > first.seq);

        app.apply_results(first.seq, response(vec![airport("AAA", "Anaa", "PF")], 1));
        assert!(app.data.is_none(), "stale reply must be ignored");
        assert!(app.loading);

        app.apply_results(second.seq, response(vec![airport("BOG", "El Dorado", "CO")], 1));
        assert!(app.data.is_some());
        assert!(!app.loading);
    }

    #[test]
    fn stale_errors_are_dropped_too() {
        let mut app = test_app();
        app.enter_results();
        let first = app.take_fetch_request().unwrap();
        app.refresh();
        let second = app.take_fetch_request().unwrap();

        app.apply_error(first.seq, "HTTP 500".to_string());
        assert!(app.last_error.is_none());

        app.apply_error(second.seq, "HTTP 429".to_string());
        assert_eq!(app.last_error.as_deref(), Some("HTTP 429"));
    }

    #[test]
    fn page_navigation_clamps_to_total() {
        let mut app = test_app();
        app.enter_results();
        let req = app.take_fetch_request().unwrap();
        app.apply_results(req.seq, response(vec![airport("BOG", "El Dorado", "CO")], 60));
        assert_eq!(app.total_pages(), 3);

        app.goto_page(99);
        assert_eq!(app.page, 3);
        app.next_page();
        assert_eq!(app.page, 3);
        app.first_page();
        assert_eq!(app.page, 1);
        app.previous_page();
        assert_eq!(app.page, 1);
    }

    #[test]
    fn page_change_issues_new_fetch() {
        let mut app = test_app();
        app.enter_results();
        let req = app.take_fetch_request().unwrap();
        app.apply_results(req.seq, response(vec![airport("BOG", "El Dorado", "CO")], 100));

        app.next_page();
        let req = app.take_fetch_request().expect("page change should fetch");
        assert_eq!(req.offset, 25);
        assert_eq!(req.limit, 25);
    }

    #[test]
    fn local_filter_narrows_loaded_page() {
        let mut app = test_app();
        app.enter_results();
        let req = app.take_fetch_request().unwrap();
        app.apply_results(
            req.seq,
            response(
                vec![
                    airport("BOG", "El Dorado International", "Colombia"),
                    airport("EZE", "Ministro Pistarini", "Argentina"),
                    airport("MDE", "Jose Maria Cordova", "Colombia"),
                ],
                3,
            ),
        );
        assert_eq!(app.filtered_indices().len(), 3);

        app.start_search();
        let now = Instant::now();
        for ch in "colombia".chars() {
            app.push_search_char(ch, now);
        }
        app.poll_debounce(now + Duration::from_millis(300));
        assert_eq!(app.query, "colombia");
        assert_eq!(app.filtered_indices(), vec![0, 2]);

        app.clear_query();
        assert_eq!(app.filtered_indices().len(), 3);
    }

    #[test]
    fn debounce_waits_for_pause() {
        let mut app = test_app();
        app.start_search();
        let start = Instant::now();
        app.push_search_char('b', start);
        app.push_search_char('o', start + Duration::from_millis(200));

        app.poll_debounce(start + Duration::from_millis(300));
        assert_eq!(app.query, "", "still within the rescheduled window");

        app.poll_debounce(start + Duration::from_millis(500));
        assert_eq!(app.query, "bo");
    }

    #[test]
    fn submit_rejects_short_query_inline() {
        let mut app = test_app();
        app.start_search();
        app.push_search_char('b', Instant::now());
        app.submit_search();
        assert!(app.query_error.is_some());
        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(app.query, "");
    }

    #[test]
    fn submit_from_home_enters_results() {
        let mut app = test_app();
        assert_eq!(app.view, View::Home);
        app.start_search();
        let now = Instant::now();
        for ch in "bogota".chars() {
            app.push_search_char(ch, now);
        }
        app.submit_search();
        assert_eq!(app.view, View::Results);
        assert_eq!(app.query, "bogota");
        assert!(app.take_fetch_request().is_some());
    }

    #[test]
    fn open_detail_records_visit_once() {
        let mut app = test_app();
        app.enter_results();
        let req = app.take_fetch_request().unwrap();
        app.apply_results(req.seq, response(vec![airport("BOG", "El Dorado", "CO")], 1));

        let indices = app.filtered_indices();
        assert!(app.open_selected(&indices));
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.detail_tab, DetailTab::General);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history.items()[0].code, "BOG");

        // Opening again moves rather than duplicates.
        app.go_back();
        assert!(app.open_selected(&indices));
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn history_reopen_does_not_reorder_log() {
        let mut app = test_app();
        app.open_detail(airport("BOG", "El Dorado", "CO"));
        app.open_detail(airport("EZE", "Ministro Pistarini", "AR"));
        assert_eq!(app.history.items()[0].code, "EZE");

        app.open_history();
        app.next_history_item();
        assert!(app.open_history_selected());
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.selected.as_ref().unwrap().iata_code.as_deref(), Some("BOG"));
        // BOG stays second: reopening from history is not a new visit.
        assert_eq!(app.history.items()[0].code, "EZE");
    }

    #[test]
    fn deep_link_recovers_after_hydration() {
        let mut app = test_app();
        app.open_deep_link("bog");
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.detail_code.as_deref(), Some("BOG"));
        assert!(app.selected.is_none());

        app.apply_hydration(vec![HistoryItem {
            code: "BOG".to_string(),
            airport: airport("BOG", "El Dorado", "CO"),
            viewed_at: chrono::Utc::now(),
        }]);
        assert!(app.selected.is_some());
    }

    #[test]
    fn deep_link_with_empty_log_stays_unselected() {
        let mut app = test_app();
        app.open_deep_link("BOG");
        app.apply_hydration(Vec::new());
        assert!(app.selected.is_none());
        assert!(app.history.is_hydrated());
    }

    #[test]
    fn cycle_page_size_persists_choice() {
        let dir = temp_dir();
        let config_path = dir.join("config.toml");
        let mut app = App::new(
            25,
            String::new(),
            false,
            Duration::from_millis(300),
            None,
            config_path.clone(),
        );

        app.cycle_page_size();
        assert_eq!(app.page_size, 50);
        assert_eq!(app.page, 1);
        assert!(app.take_fetch_request().is_some());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("page_size = 50"));
        let _ = fs::remove_file(&config_path);
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn selection_wraps_and_clamps() {
        let mut app = test_app();
        app.next_row(3);
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row(3);
        app.next_row(3);
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row(3);
        assert_eq!(app.table_state.selected(), Some(2));

        app.clamp_selection(2);
        assert_eq!(app.table_state.selected(), Some(1));
        app.clamp_selection(0);
        assert_eq!(app.table_state.selected(), None);
    }
}
