use axum::{http::StatusCode, Json};
use chrono::NaiveDate;
use mongodb::options::ClientOptions;
use pantry_meal_api::{parse_calendar_date, MealSlot, PlanDay};

use crate::config::DbConfig;

pub type ApiError = (StatusCode, Json<String>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn connect_db(cfg: &DbConfig) -> Option<mongodb::Database> {
    match async {
        mongodb::Client::with_options(
            ClientOptions::parse(&cfg.url).await?,
        )
    }.await {
        Ok(v) => {
            Some(v.database(&cfg.database))
        },
        Err(err) => {
            tracing::error!("could not connect to db: {err}");
            None
        },
    }
}

fn bad_request(code: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(code.to_string()))
}

pub fn parse_day(s: &str) -> Result<PlanDay, ApiError> {
    s.parse().map_err(|_| bad_request("unknown_day"))
}

pub fn parse_slot(s: &str) -> Result<MealSlot, ApiError> {
    s.parse().map_err(|_| bad_request("unknown_slot"))
}

/// Parses an optional `YYYY-MM-DD` date, defaulting to the local today.
pub fn date_or_today(s: Option<&str>) -> Result<NaiveDate, ApiError> {
    match s {
        Some(s) => parse_calendar_date(s).map_err(|err| {
            tracing::debug!("rejecting date: {err}");
            bad_request("invalid_date")
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
