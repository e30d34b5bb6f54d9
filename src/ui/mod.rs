pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::event::{AppEvent, ConnectionState};
use crate::model::ticker::RankedEntry;
use crate::surge::ingest::IngestStats;

use dashboard::{AlertPopup, KeybindBar, LogPanel, RankingTable, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub quote_suffixes: Vec<String>,
    pub window_len: usize,
    pub max_rows: usize,
    pub connection: ConnectionState,
    pub ranked: Vec<RankedEntry>,
    pub tracked_symbols: usize,
    pub stats: IngestStats,
    pub active_alert: Option<RankedEntry>,
    pub table_scroll: usize,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(quote_suffixes: Vec<String>, window_len: usize, max_rows: usize) -> Self {
        Self {
            quote_suffixes,
            window_len,
            max_rows,
            connection: ConnectionState::Connecting,
            ranked: Vec::new(),
            tracked_symbols: 0,
            stats: IngestStats::default(),
            active_alert: None,
            table_scroll: 0,
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn is_alert_open(&self) -> bool {
        self.active_alert.is_some()
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.ranked.len().saturating_sub(1);
        self.table_scroll = (self.table_scroll + 1).min(max_scroll);
    }

    pub fn scroll_up(&mut self) {
        self.table_scroll = self.table_scroll.saturating_sub(1);
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::WsStatus(state) => {
                let was_open = self.connection == ConnectionState::Open;
                match &state {
                    ConnectionState::Open if !was_open => {
                        self.push_log("[WS] connected".to_string());
                    }
                    ConnectionState::ClosedReconnecting { .. } if was_open => {
                        self.push_log("[WS] disconnected, reconnecting".to_string());
                    }
                    _ => {}
                }
                self.connection = state;
            }
            AppEvent::Ranking {
                mut entries,
                tracked_symbols,
                stats,
            } => {
                entries.truncate(self.max_rows);
                self.ranked = entries;
                self.tracked_symbols = tracked_symbols;
                self.stats = stats;
                self.table_scroll = self.table_scroll.min(self.ranked.len().saturating_sub(1));
            }
            AppEvent::Stats(stats) => {
                self.stats = stats;
            }
            AppEvent::AlertRaised(entry) => {
                self.push_log(format!(
                    "[ALERT] {} +{:.2}%",
                    entry.symbol, entry.percent_change
                ));
                self.active_alert = Some(entry);
            }
            AppEvent::AlertCleared => {
                self.active_alert = None;
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // ranking table
            Constraint::Length(6), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            connection: &state.connection,
            stats: &state.stats,
            tracked_symbols: state.tracked_symbols,
            ranked_symbols: state.ranked.len(),
        },
        outer[0],
    );

    frame.render_widget(
        RankingTable::new(&state.ranked, &state.quote_suffixes)
            .scroll(state.table_scroll)
            .window_len(state.window_len),
        outer[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[2]);

    frame.render_widget(KeybindBar, outer[3]);

    if let Some(entry) = &state.active_alert {
        frame.render_widget(AlertPopup { entry }, AlertPopup::area(frame.area()));
    }
}
