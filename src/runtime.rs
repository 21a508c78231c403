use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crate::app::{App, DetailTab, InputMode, View};
use crate::history::HistoryItem;
use crate::net::{FetchMessage, FetchRequest};
use crate::ui;

pub struct NetChannels {
    pub req_tx: Sender<FetchRequest>,
    pub res_rx: Receiver<FetchMessage>,
}

pub fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    net: NetChannels,
    hydration_rx: Receiver<Vec<HistoryItem>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    loop {
        while let Ok(message) = net.res_rx.try_recv() {
            match message {
                FetchMessage::Results { seq, data } => app.apply_results(seq, data),
                FetchMessage::Error { seq, message } => app.apply_error(seq, message),
            }
        }

        while let Ok(items) = hydration_rx.try_recv() {
            app.apply_hydration(items);
        }

        app.poll_debounce(Instant::now());

        if let Some(request) = app.take_fetch_request() {
            let _ = net.req_tx.send(request);
        }

        let indices = app.filtered_indices();
        if app.view == View::Results {
            app.clamp_selection(indices.len());
        }

        terminal.draw(|f| ui::ui(f, &mut app, &indices))?;
        app.advance_tick();

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('?') => app.open_help(),
                        KeyCode::Char('t') => app.toggle_theme(),
                        KeyCode::Char('/') => {
                            if matches!(app.view, View::Home | View::Results) {
                                app.start_search();
                            }
                        }
                        KeyCode::Char('c') => {
                            if app.view == View::Results {
                                app.clear_query();
                            }
                        }
                        KeyCode::Char('h') => {
                            if app.view != View::History {
                                app.open_history();
                            }
                        }
                        KeyCode::Char('x') => {
                            if app.view == View::History {
                                app.clear_history();
                            }
                        }
                        KeyCode::Char('r') => {
                            if app.view == View::Results {
                                app.refresh();
                            }
                        }
                        KeyCode::Char('s') => {
                            if app.view == View::Results {
                                app.cycle_page_size();
                            }
                        }
                        KeyCode::Tab => {
                            if app.view == View::Detail {
                                app.next_detail_tab();
                            }
                        }
                        KeyCode::Char('1') => detail_tab(&mut app, DetailTab::General),
                        KeyCode::Char('2') => detail_tab(&mut app, DetailTab::Location),
                        KeyCode::Char('3') => detail_tab(&mut app, DetailTab::Timezone),
                        KeyCode::Char('4') => detail_tab(&mut app, DetailTab::Stats),
                        KeyCode::Down => match app.view {
                            View::Results => app.next_row(indices.len()),
                            View::History => app.next_history_item(),
                            _ => {}
                        },
                        KeyCode::Up => match app.view {
                            View::Results => app.previous_row(indices.len()),
                            View::History => app.previous_history_item(),
                            _ => {}
                        },
                        KeyCode::Left => {
                            if app.view == View::Results {
                                app.previous_page();
                            }
                        }
                        KeyCode::Right => {
                            if app.view == View::Results {
                                app.next_page();
                            }
                        }
                        KeyCode::Home => {
                            if app.view == View::Results {
                                app.first_page();
                            }
                        }
                        KeyCode::End => {
                            if app.view == View::Results {
                                app.last_page();
                            }
                        }
                        KeyCode::Enter => match app.view {
                            View::Home => app.enter_results(),
                            View::Results => {
                                app.open_selected(&indices);
                            }
                            View::History => {
                                app.open_history_selected();
                            }
                            View::Detail => {}
                        },
                        KeyCode::Esc => app.go_back(),
                        _ => {}
                    },
                    InputMode::Search => match key.code {
                        KeyCode::Enter => app.submit_search(),
                        KeyCode::Esc => app.cancel_search(),
                        KeyCode::Backspace => app.backspace_search(Instant::now()),
                        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            if ch == 'u' {
                                app.clear_search_edit(Instant::now());
                            }
                        }
                        KeyCode::Char(ch) => app.push_search_char(ch, Instant::now()),
                        _ => {}
                    },
                    InputMode::Help => match key.code {
                        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.close_help(),
                        _ => {}
                    },
                },
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, &indices, mouse);
                }
                _ => {}
            }
        }
    }
}

fn detail_tab(app: &mut App, tab: DetailTab) {
    if app.view == View::Detail {
        app.set_detail_tab(tab);
    }
}

fn handle_mouse(app: &mut App, indices: &[usize], mouse: MouseEvent) {
    if app.input_mode != InputMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => match app.view {
            View::Results => app.previous_row(indices.len()),
            View::History => app.previous_history_item(),
            _ => {}
        },
        MouseEventKind::ScrollDown => match app.view {
            View::Results => app.next_row(indices.len()),
            View::History => app.next_history_item(),
            _ => {}
        },
        _ => {}
    }
}
