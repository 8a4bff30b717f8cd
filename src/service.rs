//! Request handling for the daily rates endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use log::{debug, error, info, warn};
use serde::{Deserialize, Deserializer, de};

use crate::config::Config;
use crate::error::ApiError;
use crate::exchange_rate::generate;
use crate::request_log::{MAX_RECENT, RequestLog, RequestLogEntry};
use crate::val_curs::to_xml;

/// Format accepted for `date_req`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Source of the uniform draw that decides random failures.
pub trait FailureSource: Send + Sync {
    /// A value in `[0, 1)`.
    fn sample(&self) -> f64;
}

/// Draws from the thread-local generator. Not seeded by request content.
#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl FailureSource for ThreadRngSource {
    fn sample(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed sequence of draws, repeating the last one once exhausted.
#[derive(Debug)]
pub struct FixedSource {
    draws: Mutex<VecDeque<f64>>,
}

impl FixedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl FailureSource for FixedSource {
    fn sample(&self) -> f64 {
        let mut draws = self.draws.lock().unwrap_or_else(|e| e.into_inner());
        if draws.len() > 1 {
            draws.pop_front().unwrap_or_default()
        } else {
            draws.front().copied().unwrap_or_default()
        }
    }
}

/// Query string of `GET /scripts/XML_daily.asp`.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyQuery {
    pub date_req: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub force_error: bool,
    pub test_id: Option<String>,
}

impl DailyQuery {
    /// The test session id, with an empty value treated as absent.
    pub fn test_id(&self) -> Option<&str> {
        self.test_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Parse the boolean spellings web clients commonly send.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_flag(&value).ok_or_else(|| {
        de::Error::custom(format!("force_error: {:?} is not a valid boolean", value))
    })
}

/// `DD/MM/YYYY` with a four digit year of at least 1. Day and month may
/// drop their leading zero.
pub fn is_valid_date(date_req: &str) -> bool {
    let four_digit_year = date_req
        .rsplit_once('/')
        .is_some_and(|(_, year)| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));

    four_digit_year
        && NaiveDate::parse_from_str(date_req, DATE_FORMAT).is_ok_and(|date| date.year() >= 1)
}

/// Validates requests, injects failures and keeps the request log.
pub struct RateService {
    config: Config,
    log: RequestLog,
    failures: Arc<dyn FailureSource>,
}

impl RateService {
    pub fn new(config: Config, log: RequestLog) -> Self {
        Self::with_failure_source(config, log, Arc::new(ThreadRngSource))
    }

    pub fn with_failure_source(
        config: Config,
        log: RequestLog,
        failures: Arc<dyn FailureSource>,
    ) -> Self {
        Self {
            config,
            log,
            failures,
        }
    }

    fn should_fail(&self, forced: bool) -> bool {
        forced || self.failures.sample() < self.config.error_rate
    }

    async fn record(
        &self,
        date_req: &str,
        test_id: Option<&str>,
        response_code: u16,
    ) -> Result<(), ApiError> {
        self.log
            .record(date_req, test_id, response_code)
            .await
            .map_err(|e| {
                error!("Can't record {} for {}: {}", response_code, date_req, e);
                ApiError::Storage(e)
            })?;
        Ok(())
    }

    /// Produce the daily XML document. Each outcome is logged exactly once
    /// before returning.
    pub async fn daily_rates(&self, query: &DailyQuery) -> Result<String, ApiError> {
        let date_req = query.date_req.as_str();
        let test_id = query.test_id();

        if !is_valid_date(date_req) {
            debug!("Rejecting date_req {:?}", date_req);
            self.record(date_req, test_id, 400).await?;
            return Err(ApiError::InvalidDate);
        }

        if self.should_fail(query.force_error) {
            warn!(
                "Injecting failure for {} (test_id={:?}, forced={})",
                date_req, test_id, query.force_error
            );
            self.record(date_req, test_id, 500).await?;
            return Err(ApiError::Injected);
        }

        let rates = generate(date_req, test_id);
        let xml = to_xml(date_req, &rates).map_err(|e| {
            error!("Can't render rates for {}: {}", date_req, e);
            ApiError::from(e)
        })?;
        self.record(date_req, test_id, 200).await?;
        debug!("Served {} rates for {} (test_id={:?})", rates.len(), date_req, test_id);

        Ok(xml)
    }

    pub async fn recent_requests(&self) -> Result<Vec<RequestLogEntry>, ApiError> {
        Ok(self.log.recent(MAX_RECENT).await?)
    }

    pub async fn reset(&self) -> Result<(), ApiError> {
        let removed = self.log.reset().await?;
        info!("Test state reset, {} log entries removed", removed);
        Ok(())
    }
}
