use serde::{Deserialize, Serialize};

/// Body of `POST /v1/motipet/daily_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStateRequest {
    pub user_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub gender: Option<String>,
    pub sleep_duration_hours: Option<f64>,
    pub sleep_efficiency: Option<f64>,
    pub restorative_sleep_ratio: Option<f64>,
    pub hrv_rmssd_today: Option<f64>,
    #[serde(rename = "hrv_rmssd3_day_avg")]
    pub hrv_rmssd_3day_avg: Option<f64>,
    #[serde(rename = "hrv_rmssd7_day_avg")]
    pub hrv_rmssd_7day_avg: Option<f64>,
    pub resting_heart_rate: Option<f64>,
    pub training_load_au: Option<f64>,
}

/// Server-computed pet state for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStateResponse {
    pub pet_state: String,
    pub state_reason: String,
    pub xp_gain_base: i64,
    pub xp_gain_bonus: i64,
    pub xp_gain_total: i64,
    pub readiness_score: i64,
    pub readiness_diagnosis: String,
    pub happiness_score: i64,
    pub happiness_state: String,
    pub level: i64,
    pub leveled_up: bool,
    #[serde(rename = "total_xp")]
    pub total_xp: i64,
    pub xp_into_level: i64,
    pub xp_to_next_level: i64,
    pub level_progress_ratio: f64,
    pub force_happy_seconds: i64,
}
