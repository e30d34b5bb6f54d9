use crate::model::ticker::RankedEntry;
use crate::surge::ingest::IngestStats;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Connecting,
    Open,
    ClosedReconnecting { attempt: u32, retry_in_ms: u64 },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    WsStatus(ConnectionState),
    Ranking {
        entries: Vec<RankedEntry>,
        tracked_symbols: usize,
        stats: IngestStats,
    },
    Stats(IngestStats),
    AlertRaised(RankedEntry),
    AlertCleared,
    LogMessage(String),
    Error(String),
}
