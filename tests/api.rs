use std::sync::Arc;

use actix_web::{App, body::MessageBody, dev::ServiceResponse, http::StatusCode, test, web};
use cbr_mock::service::FixedSource;
use cbr_mock::val_curs::from_xml;
use cbr_mock::{Config, RateService, RequestLog, routes};
use serde_json::Value;

async fn rate_service(error_rate: f64) -> web::Data<RateService> {
    let config = Config::default()
        .with_database_url("sqlite::memory:")
        .with_error_rate(error_rate)
        .unwrap();
    let log = RequestLog::connect(&config).await.unwrap();
    web::Data::new(RateService::with_failure_source(
        config,
        log,
        Arc::new(FixedSource::constant(0.5)),
    ))
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data($service.clone())
                .configure(routes::configure),
        )
        .await
    };
}

async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn healthcheck() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    let req = test::TestRequest::get().uri("/healthcheck").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, serde_json::json!({ "status": "OK", "version": "1.0" }));
}

#[actix_web::test]
async fn daily_rates_xml() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    let req = test::TestRequest::get()
        .uri("/scripts/XML_daily.asp?date_req=22/07/2025&test_id=t1")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/xml"
    );

    let body = test::read_body(resp).await;
    let val_curs = from_xml(std::str::from_utf8(&body).unwrap()).unwrap();
    assert_eq!(val_curs.date, "22/07/2025");

    let usd = val_curs.valute.iter().find(|v| v.id == "R01235").unwrap();
    assert_eq!(usd.char_code, "USD");
    assert_eq!(usd.value, "31.51");
}

#[actix_web::test]
async fn repeated_requests_are_identical() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    let uri = "/scripts/XML_daily.asp?date_req=01/03/2024&test_id=session-7";
    let first = test::call_and_read_body(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let second =
        test::call_and_read_body(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(first, second);
}

#[actix_web::test]
async fn invalid_dates_are_rejected() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    let dates = ["31/02/2025", "2025-07-22", "01/01/25", "01/01/0000", "01/01/20255"];
    for date in dates {
        let req = test::TestRequest::get()
            .uri(&format!("/scripts/XML_daily.asp?date_req={}", date))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await["detail"],
            "Date must be in DD/MM/YYYY format"
        );
    }

    let log = service.recent_requests().await.unwrap();
    assert_eq!(log.len(), dates.len());
    assert!(log.iter().all(|e| e.response_code == 400));
    assert_eq!(log[0].date_req, "01/01/20255");
}

#[actix_web::test]
async fn signed_year_is_rejected() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    // `+` must be percent-encoded or the query decoder turns it into a space
    let req = test::TestRequest::get()
        .uri("/scripts/XML_daily.asp?date_req=01/01/%2B2025")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let log = service.recent_requests().await.unwrap();
    assert_eq!(log[0].date_req, "01/01/+2025");
    assert_eq!(log[0].response_code, 400);
}

#[actix_web::test]
async fn forced_error() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    for flag in ["true", "1", "yes"] {
        let req = test::TestRequest::get()
            .uri(&format!(
                "/scripts/XML_daily.asp?date_req=22/07/2025&force_error={}",
                flag
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(resp).await["detail"], "Internal server error");
    }

    let log = service.recent_requests().await.unwrap();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|e| e.response_code == 500));
}

#[actix_web::test]
async fn random_failures_follow_error_rate() {
    let service = rate_service(1.0).await;
    let app = app!(service);

    let req = test::TestRequest::get()
        .uri("/scripts/XML_daily.asp?date_req=22/07/2025")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn malformed_query() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    for uri in [
        "/scripts/XML_daily.asp",
        "/scripts/XML_daily.asp?date_req=22/07/2025&force_error=maybe",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    assert!(service.recent_requests().await.unwrap().is_empty());
}

#[actix_web::test]
async fn requests_log_and_reset() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    for i in 0..3 {
        let req = test::TestRequest::get()
            .uri(&format!("/scripts/XML_daily.asp?date_req=0{}/01/2025&test_id=t", i + 1))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = test::TestRequest::get()
        .uri("/scripts/XML_daily.asp?date_req=bad")
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/requests-log").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let requests = body["requests"].as_array().unwrap();

    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0]["date_req"], "bad");
    assert_eq!(requests[0]["response_code"], 400);
    assert_eq!(requests[0]["test_id"], Value::Null);
    assert_eq!(requests[3]["date_req"], "01/01/2025");
    assert_eq!(requests[3]["test_id"], "t");
    assert_eq!(requests[3]["response_code"], 200);

    let req = test::TestRequest::post().uri("/reset-test-state").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "status": "test state reset" }));

    let req = test::TestRequest::get().uri("/requests-log").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["requests"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn requests_log_keeps_latest_hundred() {
    let service = rate_service(0.0).await;
    let app = app!(service);

    for i in 0..110 {
        let uri = if i % 10 == 0 {
            "/scripts/XML_daily.asp?date_req=22/07/2025&force_error=true".to_string()
        } else {
            format!("/scripts/XML_daily.asp?date_req=22/07/2025&test_id=run{}", i)
        };
        test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    }

    let req = test::TestRequest::get().uri("/requests-log").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let requests = body["requests"].as_array().unwrap();

    assert_eq!(requests.len(), 100);
    assert_eq!(requests[0]["test_id"], "run109");
    let ids: Vec<i64> = requests.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
}
