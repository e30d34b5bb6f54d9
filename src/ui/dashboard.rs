use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget, Wrap},
};

use crate::event::ConnectionState;
use crate::model::ticker::RankedEntry;
use crate::surge::ingest::IngestStats;

/// Symbol without its quote suffix ("BTCUSDT" -> "BTC").
pub fn coin_name<'a>(symbol: &'a str, quote_suffixes: &[String]) -> &'a str {
    quote_suffixes
        .iter()
        .find_map(|suffix| symbol.strip_suffix(suffix.as_str()))
        .filter(|base| !base.is_empty())
        .unwrap_or(symbol)
}

pub fn format_price(price: f64) -> String {
    format!("${:.4}", price)
}

pub fn format_pct(pct: f64) -> String {
    format!("{:.2}%", pct)
}

pub fn change_color(pct: f64) -> Color {
    if pct >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

pub struct StatusBar<'a> {
    pub connection: &'a ConnectionState,
    pub stats: &'a IngestStats,
    pub tracked_symbols: usize,
    pub ranked_symbols: usize,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let conn_status = match self.connection {
            ConnectionState::Open => Span::styled("CONNECTED", Style::default().fg(Color::Green)),
            ConnectionState::Connecting => {
                Span::styled("CONNECTING", Style::default().fg(Color::Yellow))
            }
            ConnectionState::ClosedReconnecting {
                attempt,
                retry_in_ms,
            } => Span::styled(
                format!("RECONNECTING #{} in {:.1}s", attempt, *retry_in_ms as f64 / 1000.0),
                Style::default().fg(Color::Red),
            ),
        };

        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let line = Line::from(vec![
            Span::styled(
                " surge-watch ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            conn_status,
            sep(),
            Span::styled(
                format!("msgs: {}", self.stats.messages),
                Style::default().fg(Color::DarkGray),
            ),
            sep(),
            Span::styled(
                format!(
                    "acc/thr/bad: {}/{}/{}",
                    self.stats.accepted, self.stats.throttled, self.stats.malformed
                ),
                Style::default().fg(Color::DarkGray),
            ),
            sep(),
            Span::styled(
                format!("ranked {}/{}", self.ranked_symbols, self.tracked_symbols),
                Style::default().fg(Color::Cyan),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct RankingTable<'a> {
    entries: &'a [RankedEntry],
    quote_suffixes: &'a [String],
    scroll: usize,
    window_len: usize,
}

impl<'a> RankingTable<'a> {
    pub fn new(entries: &'a [RankedEntry], quote_suffixes: &'a [String]) -> Self {
        Self {
            entries,
            quote_suffixes,
            scroll: 0,
            window_len: 0,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }
}

impl Widget for RankingTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Coin price change ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        if self.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("Waiting for {} samples...", self.window_len),
                Style::default().fg(Color::DarkGray),
            )))
            .block(block)
            .render(area, buf);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Coin"),
            Cell::from("Symbol"),
            Cell::from("Ref Price"),
            Cell::from("Current Price"),
            Cell::from("Window Change (%)"),
        ])
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let rows = self.entries.iter().skip(self.scroll).map(|entry| {
            Row::new(vec![
                Cell::from(coin_name(&entry.symbol, self.quote_suffixes).to_string()),
                Cell::from(entry.symbol.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(format_price(entry.reference_price)),
                Cell::from(format_price(entry.current_price)),
                Cell::from(format_pct(entry.percent_change))
                    .style(Style::default().fg(change_color(entry.percent_change))),
            ])
        });

        Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .block(block)
        .render(area, buf);
    }
}

pub struct AlertPopup<'a> {
    pub entry: &'a RankedEntry,
}

impl AlertPopup<'_> {
    /// Centered rect of the popup inside `area`.
    pub fn area(area: Rect) -> Rect {
        let width = area.width.min(44);
        let height = area.height.min(7);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}

impl Widget for AlertPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Price Surge Alert! ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    self.entry.symbol.as_str(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" increased by "),
                Span::styled(
                    format_pct(self.entry.percent_change),
                    Style::default().fg(change_color(self.entry.percent_change)),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} -> {}",
                    format_price(self.entry.reference_price),
                    format_price(self.entry.current_price)
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Confirm",
                Style::default().fg(Color::Yellow),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|m| Line::from(Span::styled(m.as_str(), Style::default().fg(Color::Gray))))
            .collect();

        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::styled(" dismiss  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[X]", Style::default().fg(Color::Yellow)),
            Span::styled(" reset  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[J/K]", Style::default().fg(Color::Yellow)),
            Span::styled(" scroll  ", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
