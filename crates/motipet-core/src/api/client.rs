//! Daily-state HTTP client.

use chrono::{Local, NaiveDate};
use rand::Rng;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::{DailyStateRequest, DailyStateResponse};
use crate::error::ApiError;
use crate::storage::ApiConfig;

/// Endpoint path below the configured base URL.
pub const DAILY_STATE_PATH: &str = "v1/motipet/daily_state";

/// Anything that can turn a readiness score into the day's pet state.
pub trait DailyStateSource {
    fn fetch_daily_state(
        &self,
        score: f64,
    ) -> impl Future<Output = Result<DailyStateResponse, ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<Url>,
    user_id: String,
    gender: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.as_deref().map(Url::parse).transpose()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            user_id: config.user_id.clone(),
            gender: config.gender.clone(),
        })
    }

    /// Full endpoint URL. The path is appended, so base URLs with a path
    /// prefix keep it.
    pub fn endpoint(&self) -> Result<Url, ApiError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or(ApiError::BaseUrlNotConfigured)?;
        let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), DAILY_STATE_PATH);
        Ok(Url::parse(&joined)?)
    }

    /// Synthesize a request around `score` with plausible jitter.
    pub fn make_payload<R: Rng + ?Sized>(
        &self,
        score: f64,
        date: NaiveDate,
        rng: &mut R,
    ) -> DailyStateRequest {
        let hrv_today = (score + rng.gen_range(-6.0..=6.0)).clamp(40.0, 120.0);
        DailyStateRequest {
            user_id: self.user_id.clone(),
            date: date.format("%Y-%m-%d").to_string(),
            gender: self.gender.clone(),
            sleep_duration_hours: Some(rng.gen_range(7.0..=8.5)),
            sleep_efficiency: Some(rng.gen_range(0.85..=0.95)),
            restorative_sleep_ratio: Some(rng.gen_range(0.32..=0.45)),
            hrv_rmssd_today: Some(hrv_today),
            hrv_rmssd_3day_avg: Some(hrv_today + rng.gen_range(-4.0..=3.0)),
            hrv_rmssd_7day_avg: Some(hrv_today + rng.gen_range(-6.0..=2.0)),
            resting_heart_rate: Some(rng.gen_range(48.0..=60.0)),
            training_load_au: Some(rng.gen_range(120.0..=420.0)),
        }
    }

    /// POST the payload and decode the response.
    pub async fn post_daily_state(
        &self,
        payload: &DailyStateRequest,
    ) -> Result<DailyStateResponse, ApiError> {
        let url = self.endpoint()?;
        debug!(%url, user_id = %payload.user_id, date = %payload.date, "posting daily state");

        let resp = self.client.post(url).json(payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::ServerError {
                status_code: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

impl DailyStateSource for ApiClient {
    async fn fetch_daily_state(&self, score: f64) -> Result<DailyStateResponse, ApiError> {
        let payload = self.make_payload(score, Local::now().date_naive(), &mut rand::thread_rng());
        self.post_daily_state(&payload).await
    }
}
