//! HTTP surface of the mock.

use actix_web::error::QueryPayloadError;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::error::ApiError;
use crate::service::{DailyQuery, RateService};

pub const SERVICE_VERSION: &str = "1.0";

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Register every endpoint on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/scripts/XML_daily.asp", web::get().to(daily_rates))
        .route("/healthcheck", web::get().to(healthcheck))
        .route("/reset-test-state", web::post().to(reset_test_state))
        .route("/requests-log", web::get().to(requests_log));
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidQuery(err.to_string()).into()
}

async fn daily_rates(
    service: web::Data<RateService>,
    query: web::Query<DailyQuery>,
) -> Result<HttpResponse, ApiError> {
    let xml = service.daily_rates(&query).await?;
    Ok(HttpResponse::Ok().content_type(XML_CONTENT_TYPE).body(xml))
}

async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "OK", "version": SERVICE_VERSION }))
}

async fn reset_test_state(service: web::Data<RateService>) -> Result<HttpResponse, ApiError> {
    service.reset().await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "test state reset" })))
}

async fn requests_log(service: web::Data<RateService>) -> Result<HttpResponse, ApiError> {
    let requests = service.recent_requests().await?;
    Ok(HttpResponse::Ok().json(json!({ "requests": requests })))
}
