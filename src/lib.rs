//! Client-side coordinator for a binary-options trading widget.
//!
//! [`Widget`] walks the selection chain (symbol, category, period, payout),
//! keeps the proposal streams in step with it and submits orders. The
//! transport, rendering and storage are reached through the traits in
//! [`ports`]; [`paper`] has in-memory versions of them.

pub mod config;
pub mod error;
pub mod exec;
pub mod helpers;
pub mod notify;
pub mod orchestrator;
pub mod paper;
pub mod ports;
pub mod prices;
pub mod state;
pub mod timers;
pub mod types;

pub use config::Config;
pub use error::{ApiError, WidgetError};
pub use orchestrator::Widget;
