use chrono::{DateTime, FixedOffset, Local, Utc};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use std::time::SystemTime;

use crate::app::{App, DetailTab, InputMode, ThemeMode, View};
use crate::model::Airport;
use crate::pager::PageToken;

struct Theme {
    accent: Color,
    danger: Color,
    dim: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    header_bg: Color,
    panel_bg: Color,
}

pub fn ui(f: &mut Frame, app: &mut App, indices: &[usize]) {
    let area = f.area();
    match app.view {
        View::Home => render_home(f, area, app),
        View::Results => render_results(f, area, app, indices),
        View::Detail => render_detail(f, area, app),
        View::History => render_history(f, area, app),
    }

    if app.input_mode == InputMode::Help {
        render_help_menu(f, area, app);
    }
}

fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let title = Paragraph::new(vec![Line::from(Span::styled(
        "SKYCONNECT EXPLORER",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ))])
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[1]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "Search airports worldwide",
        Style::default().fg(theme.dim),
    )))
    .alignment(Alignment::Center);
    f.render_widget(subtitle, chunks[2]);

    let editing = app.input_mode == InputMode::Search;
    let box_width = (area.width.saturating_sub(4)).min(64).max(20);
    let search_area = center_horizontal(chunks[3], box_width);
    let content = if editing {
        Line::from(vec![
            Span::styled(app.query_edit.clone(), Style::default().fg(theme.accent)),
            Span::styled("_", Style::default().fg(theme.accent)),
        ])
    } else if app.query_edit.is_empty() {
        Line::from(Span::styled(
            "Press / to search, Enter to browse all airports",
            Style::default().fg(theme.dim),
        ))
    } else {
        Line::from(Span::raw(app.query_edit.clone()))
    };
    let search_box = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("SEARCH")
            .border_style(if editing {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.dim)
            }),
    );
    f.render_widget(search_box, search_area);

    let hint = match &app.query_error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.danger),
        )),
        None => Line::from(Span::styled(
            "[h] history   [?] help   [q] quit",
            Style::default().fg(theme.dim),
        )),
    };
    let hints = Paragraph::new(hint).alignment(Alignment::Center);
    f.render_widget(hints, chunks[4]);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App, indices: &[usize]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, chunks[0], app, indices);
    render_search_line(f, chunks[1], app, indices);
    render_table(f, chunks[2], app, indices);
    render_pager(f, chunks[3], app);
    render_results_footer(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, indices: &[usize]) {
    let theme = theme(app.theme_mode);
    let loaded = app.data.as_ref().map(|d| d.data.len()).unwrap_or(0);

    let status = if let Some(err) = &app.last_error {
        format!("ERR: {err}")
    } else if app.loading {
        "SYNC".to_string()
    } else {
        "OK".to_string()
    };
    let status_color = if app.last_error.is_some() {
        theme.danger
    } else {
        Color::Green
    };

    let update_time = app
        .last_update
        .map(format_system_time)
        .unwrap_or_else(|| "--".to_string());

    let spinner = if app.loading {
        ["|", "/", "-", "\\"][(app.tick / 2) as usize % 4]
    } else {
        " "
    };

    let line_top = Line::from(vec![
        Span::styled(
            "SKYCONNECT",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("AIRPORTS {}", app.total_count()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::raw(format!("PAGE {}/{}", app.page, app.total_pages())),
        Span::raw(" | "),
        Span::raw(format!("SIZE {}", app.page_size)),
        Span::raw(" | "),
        Span::raw(format!("SHOWING {}/{loaded}", indices.len())),
    ]);

    let line_bottom = Line::from(vec![
        Span::raw(format!("LAST {update_time}")),
        Span::raw(" | "),
        Span::styled(format!("{spinner} {status}"), {
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD)
        }),
        Span::raw(" | "),
        Span::styled("MENU ", Style::default().fg(theme.dim)),
        Span::styled("[/]Search ", Style::default().fg(theme.dim)),
        Span::styled("[←/→]Page ", Style::default().fg(theme.dim)),
        Span::styled("[s]Size ", Style::default().fg(theme.dim)),
        Span::styled("[h]History ", Style::default().fg(theme.dim)),
        Span::styled("[?]Help", Style::default().fg(theme.dim)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("EXPLORER");
    let paragraph = Paragraph::new(vec![line_top, line_bottom])
        .block(block)
        .style(Style::default().bg(theme.panel_bg));
    f.render_widget(paragraph, area);
}

fn render_search_line(f: &mut Frame, area: Rect, app: &App, indices: &[usize]) {
    let theme = theme(app.theme_mode);
    let line = if app.input_mode == InputMode::Search {
        let mut spans = vec![
            Span::styled("SEARCH: ", Style::default().fg(theme.accent)),
            Span::raw(app.query_edit.clone()),
            Span::styled("_", Style::default().fg(theme.accent)),
        ];
        if app.debounce.is_pending() {
            spans.push(Span::styled(" ...", Style::default().fg(theme.dim)));
        }
        if let Some(error) = &app.query_error {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                error.clone(),
                Style::default().fg(theme.danger),
            ));
        }
        Line::from(spans)
    } else if !app.query.is_empty() {
        Line::from(vec![
            Span::styled("FILTER ", Style::default().fg(theme.dim)),
            Span::styled(
                app.query.clone(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} matches on this page  [c] clear", indices.len()),
                Style::default().fg(theme.dim),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "Type / to filter this page by name, code or country",
            Style::default().fg(theme.dim),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App, indices: &[usize]) {
    let theme = theme(app.theme_mode);

    if indices.is_empty() {
        let message = if app.loading && app.data.is_none() {
            "Loading airports...".to_string()
        } else if !app.query.is_empty() {
            format!(
                "No matches for \"{}\" on this page.\n\n[c] clear the filter   [Home] jump to page 1",
                app.query
            )
        } else {
            "No airports on this page.".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .title("AIRPORTS");
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(theme.dim).bg(theme.panel_bg));
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("IATA"),
        Cell::from("ICAO"),
        Cell::from("NAME"),
        Cell::from("CITY"),
        Cell::from("COUNTRY"),
        Cell::from("TIMEZONE"),
    ])
    .style(
        Style::default()
            .fg(theme.accent)
            .bg(theme.header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let airports = app.data.as_ref().map(|d| d.data.as_slice()).unwrap_or(&[]);
    let rows = indices.iter().filter_map(|&index| {
        let airport = airports.get(index)?;
        Some(Row::new(vec![
            Cell::from(fmt_text(airport.iata_code.as_deref())),
            Cell::from(fmt_text(airport.icao_code.as_deref())),
            Cell::from(fmt_text(airport.airport_name.as_deref())),
            Cell::from(fmt_text(airport.city_iata_code.as_deref())),
            Cell::from(fmt_text(airport.country_name.as_deref())),
            Cell::from(fmt_text(airport.timezone.as_deref())),
        ]))
    });

    let constraints = [
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(24),
        Constraint::Length(5),
        Constraint::Length(18),
        Constraint::Length(22),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .title("AIRPORTS");

    let table = Table::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(1)
        .style(Style::default().bg(theme.panel_bg))
        .row_highlight_style(
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_pager(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);
    if app.total_pages() <= 1 {
        return;
    }

    let mut spans = Vec::new();
    let prev_style = if app.page == 1 {
        Style::default().fg(theme.dim)
    } else {
        Style::default().fg(theme.accent)
    };
    spans.push(Span::styled("<< prev ", prev_style));

    for token in app.page_tokens() {
        match token {
            PageToken::Page(page) => {
                if page == app.page {
                    spans.push(Span::styled(
                        format!("[{page}]"),
                        Style::default()
                            .fg(theme.highlight_fg)
                            .bg(theme.highlight_bg)
                            .add_modifier(Modifier::BOLD),
                    ));
                } else {
                    spans.push(Span::styled(
                        format!(" {page} "),
                        Style::default().fg(theme.accent),
                    ));
                }
            }
            PageToken::Ellipsis => {
                spans.push(Span::styled(" ... ", Style::default().fg(theme.dim)));
            }
        }
    }

    let next_style = if app.page >= app.total_pages() {
        Style::default().fg(theme.dim)
    } else {
        Style::default().fg(theme.accent)
    };
    spans.push(Span::styled(" next >>", next_style));

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_results_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);
    let line = Line::from(Span::styled(
        "[Enter] details  [r] reload  [t] theme  [Esc] home  [q] quit",
        Style::default().fg(theme.dim),
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);

    let Some(airport) = app.selected.as_ref() else {
        render_detail_empty(f, area, app);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

    let code_line = Line::from(Span::styled(
        airport.display_code(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ));
    let name_line = Line::from(Span::styled(
        fmt_text(airport.airport_name.as_deref()),
        Style::default().fg(theme.dim),
    ));
    let header = Paragraph::new(vec![code_line, name_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("AIRPORT"),
        )
        .style(Style::default().bg(theme.panel_bg));
    f.render_widget(header, chunks[0]);

    let mut tab_spans = Vec::new();
    for tab in DetailTab::ALL {
        let style = if tab == app.detail_tab {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        tab_spans.push(Span::styled(format!(" {} ", tab.label()), style));
        tab_spans.push(Span::raw(" "));
    }
    let tabs = Paragraph::new(Line::from(tab_spans)).alignment(Alignment::Center);
    f.render_widget(tabs, chunks[1]);

    let lines = match app.detail_tab {
        DetailTab::General => general_lines(airport, &theme),
        DetailTab::Location => location_lines(airport, &theme, chunks[2].width),
        DetailTab::Timezone => timezone_lines(airport, &theme),
        DetailTab::Stats => stats_lines(&theme),
    };
    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Plain)
                .title(app.detail_tab.label()),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(theme.panel_bg));
    f.render_widget(body, chunks[2]);

    let footer = Line::from(Span::styled(
        "[Tab] next tab  [1-4] pick tab  [h] history  [Esc] back  [q] quit",
        Style::default().fg(theme.dim),
    ));
    f.render_widget(Paragraph::new(footer), chunks[3]);
}

fn render_detail_empty(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);
    let code = app.detail_code.as_deref().unwrap_or("--");
    let hydrating = !app.history.is_hydrated();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No airport data in local memory for {code}."),
            Style::default().fg(theme.dim),
        )),
    ];
    if hydrating {
        lines.push(Line::from(Span::styled(
            "Checking the visit history...",
            Style::default().fg(theme.dim),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "It was not found in the visit history either.",
            Style::default().fg(theme.dim),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Esc] open the airport list",
        Style::default().fg(theme.accent),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("AIRPORT"),
        )
        .style(Style::default().bg(theme.panel_bg));
    f.render_widget(paragraph, area);
}

fn general_lines(airport: &Airport, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        kv_line("IATA", fmt_text(airport.iata_code.as_deref()), theme),
        kv_line("ICAO", fmt_text(airport.icao_code.as_deref()), theme),
        kv_line("COUNTRY", fmt_text(airport.country_name.as_deref()), theme),
        kv_line(
            "COUNTRY ISO",
            fmt_text(airport.country_iso2.as_deref()),
            theme,
        ),
        kv_line(
            "CITY IATA",
            fmt_text(airport.city_iata_code.as_deref()),
            theme,
        ),
        kv_line("PHONE", fmt_text(airport.phone_number.as_deref()), theme),
    ]
}

fn location_lines(airport: &Airport, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![
        kv_line("LATITUDE", fmt_text(airport.latitude.as_deref()), theme),
        kv_line("LONGITUDE", fmt_text(airport.longitude.as_deref()), theme),
        kv_line("GEONAME ID", fmt_text(airport.geoname_id.as_deref()), theme),
        Line::from(""),
    ];
    match (airport.latitude_f64(), airport.longitude_f64()) {
        (Some(lat), Some(lon)) => {
            let gauge_width = (width.saturating_sub(20) as usize).clamp(11, 61);
            lines.push(kv_line("LON", gauge(lon, -180.0, 180.0, gauge_width), theme));
            lines.push(kv_line("LAT", gauge(lat, -90.0, 90.0, gauge_width), theme));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "Coordinates not available.",
                Style::default().fg(theme.dim),
            )));
        }
    }
    lines
}

fn timezone_lines(airport: &Airport, theme: &Theme) -> Vec<Line<'static>> {
    let offset = airport
        .gmt_offset_secs()
        .and_then(FixedOffset::east_opt);
    let local: Option<DateTime<FixedOffset>> = offset.map(|off| Utc::now().with_timezone(&off));

    vec![
        kv_line("TIMEZONE", fmt_text(airport.timezone.as_deref()), theme),
        kv_line("GMT", fmt_text(airport.gmt.as_deref()), theme),
        Line::from(""),
        kv_line(
            "LOCAL TIME",
            local
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "--".to_string()),
            theme,
        ),
        kv_line(
            "LOCAL DATE",
            local
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "--".to_string()),
            theme,
        ),
    ]
}

fn stats_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "Statistics not available",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "The free data plan does not include per-airport statistics.",
            Style::default().fg(theme.dim),
        )),
    ]
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    let title = format!("HISTORY ({}/{})", app.history.len(), crate::history::HISTORY_CAP);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title);

    if app.history.is_empty() {
        let message = if app.history.is_hydrated() {
            "No airports visited yet."
        } else {
            "Loading visit history..."
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.dim).bg(theme.panel_bg));
        f.render_widget(paragraph, chunks[0]);
    } else {
        let header = Row::new(vec![
            Cell::from("CODE"),
            Cell::from("NAME"),
            Cell::from("COUNTRY"),
            Cell::from("VIEWED"),
        ])
        .style(
            Style::default()
                .fg(theme.accent)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        );

        let rows = app.history.items().iter().enumerate().map(|(i, item)| {
            let row = Row::new(vec![
                Cell::from(item.code.clone()),
                Cell::from(fmt_text(item.airport.airport_name.as_deref())),
                Cell::from(fmt_text(item.airport.country_name.as_deref())),
                Cell::from(format_viewed_at(item.viewed_at)),
            ]);
            if i == app.history_cursor {
                row.style(
                    Style::default()
                        .fg(theme.highlight_fg)
                        .bg(theme.highlight_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        });

        let constraints = [
            Constraint::Length(6),
            Constraint::Min(24),
            Constraint::Length(18),
            Constraint::Length(17),
        ];
        let table = Table::new(rows, constraints)
            .header(header)
            .block(block)
            .column_spacing(1)
            .style(Style::default().bg(theme.panel_bg));
        f.render_widget(table, chunks[0]);
    }

    let footer = Line::from(Span::styled(
        "[Enter] open  [x] clear history  [Esc] back  [q] quit",
        Style::default().fg(theme.dim),
    ));
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

fn render_help_menu(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme(app.theme_mode);
    let popup = centered_rect(70, 20, area);

    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "HELP",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Navigation",
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        )),
        Line::from("  ↑/↓        Move selection"),
        Line::from("  ←/→        Previous / next page"),
        Line::from("  Home/End   First / last page"),
        Line::from("  Enter      Open details"),
        Line::from("  Esc        Back"),
        Line::from(""),
        Line::from(Span::styled(
            "Search",
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        )),
        Line::from("  /          Search (Enter apply, Esc cancel, Ctrl+U clear)"),
        Line::from("  c          Clear filter"),
        Line::from(""),
        Line::from(Span::styled(
            "Pages & Views",
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        )),
        Line::from("  s          Cycle page size (saved to config)"),
        Line::from("  r          Reload current page"),
        Line::from("  h          Visit history"),
        Line::from("  x          Clear history (in history view)"),
        Line::from("  Tab / 1-4  Detail tabs"),
        Line::from("  t          Toggle theme"),
        Line::from(""),
        Line::from(Span::styled(
            "Quit",
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        )),
        Line::from("  q          Quit"),
        Line::from("  ?          Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            Style::default().fg(theme.dim),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("HELP");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(theme.panel_bg));
    f.render_widget(paragraph, popup);
}

fn kv_line(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {label:<12} "),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

/// One-line position gauge: `value` marked inside `[min .. max]`.
fn gauge(value: f64, min: f64, max: f64, width: usize) -> String {
    let width = width.max(3);
    let inner = width - 2;
    let clamped = value.clamp(min, max);
    let ratio = (clamped - min) / (max - min);
    let position = ((inner - 1) as f64 * ratio).round() as usize;
    let mut cells = vec!['-'; inner];
    cells[position] = '+';
    let body: String = cells.into_iter().collect();
    format!("[{body}]")
}

fn center_horizontal(area: Rect, width: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(width),
            Constraint::Min(1),
        ])
        .split(area);
    chunks[1]
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height.saturating_sub(2)).max(3);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(area);
    let vertical = popup_layout[1];
    let width = (vertical.width * percent_x / 100).max(20);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(width),
            Constraint::Min(1),
        ])
        .split(vertical);
    horizontal[1]
}

fn fmt_text(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => "--".to_string(),
    }
}

fn format_viewed_at(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%H:%M:%S").to_string()
}

fn theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Sky => Theme {
            accent: Color::Rgb(0, 170, 255),
            danger: Color::LightRed,
            dim: Color::Rgb(90, 110, 130),
            highlight_fg: Color::Black,
            highlight_bg: Color::Rgb(0, 170, 255),
            header_bg: Color::Rgb(14, 24, 36),
            panel_bg: Color::Rgb(10, 18, 28),
        },
        ThemeMode::Amber => Theme {
            accent: Color::Rgb(255, 191, 0),
            danger: Color::LightRed,
            dim: Color::Rgb(140, 110, 40),
            highlight_fg: Color::Black,
            highlight_bg: Color::Rgb(255, 220, 120),
            header_bg: Color::Rgb(32, 24, 14),
            panel_bg: Color::Rgb(24, 18, 10),
        },
        ThemeMode::Monochrome => Theme {
            accent: Color::White,
            danger: Color::White,
            dim: Color::DarkGray,
            highlight_fg: Color::Black,
            highlight_bg: Color::Gray,
            header_bg: Color::Rgb(24, 24, 24),
            panel_bg: Color::Rgb(16, 16, 16),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{fmt_text, gauge};

    #[test]
    fn text_fallbacks() {
        assert_eq!(fmt_text(None), "--");
        assert_eq!(fmt_text(Some("   ")), "--");
        assert_eq!(fmt_text(Some(" BOG ")), "BOG");
    }

    #[test]
    fn gauge_marks_position() {
        assert_eq!(gauge(-180.0, -180.0, 180.0, 12), "[+---------]");
        assert_eq!(gauge(180.0, -180.0, 180.0, 12), "[---------+]");
        let mid = gauge(0.0, -180.0, 180.0, 13);
        assert_eq!(mid.len(), 13);
        assert_eq!(mid.chars().nth(6), Some('+'));
        // Out-of-range values clamp instead of panicking.
        assert_eq!(gauge(999.0, -180.0, 180.0, 12), "[---------+]");
    }
}
