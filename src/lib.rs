pub mod binance;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod surge;
pub mod ui;
