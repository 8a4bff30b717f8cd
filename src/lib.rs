//! Deterministic mock of the central bank `XML_daily.asp` endpoint.
//!
//! Rates are pseudo-random but reproducible per `(date_req, test_id)`;
//! failures can be injected on demand or at a configured rate, and every
//! handled request is written to a SQLite log for later inspection.

pub mod config;
pub mod currency;
pub mod error;
pub mod exchange_rate;
pub mod request_log;
pub mod routes;
pub mod service;
pub mod val_curs;

pub use config::Config;
pub use request_log::RequestLog;
pub use service::RateService;
