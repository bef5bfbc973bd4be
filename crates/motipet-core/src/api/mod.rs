//! Client for the daily-state backend.

mod client;
mod types;

pub use client::{ApiClient, DailyStateSource, DAILY_STATE_PATH};
pub use types::{DailyStateRequest, DailyStateResponse};
