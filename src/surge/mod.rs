pub mod alarm;
pub mod alert;
pub mod detector;
pub mod history;
pub mod ingest;
pub mod ranker;
pub mod reconnect;

pub use alert::{AlertGate, AlertPresentation, AlertSink};
pub use detector::{run_detector, CycleOutcome, DetectorCommand, SurgeDetector};
pub use history::PriceHistory;
pub use ingest::{IngestStats, PriceSnapshot, StreamIngestor};
pub use ranker::rank;
pub use reconnect::ReconnectScheduler;
