use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use hydrotemp_core::{DataSession, SessionSchema};
use serde_json::Value;
use tower::ServiceExt;

fn weather_csv() -> String {
    let mut text = String::from("time,Ktemp\n");
    for month in 1..=12 {
        text.push_str(&format!("2018-{month:02}-15,283.0\n"));
    }
    // 2019 has no rows at all
    text.push_str("2020-03-01,300.0\n2020-03-02,302.0\n");
    text
}

fn water_csv() -> String {
    let mut text = String::from("Sample Date,Turbidity (NTU)\n");
    for month in (1..=12).filter(|m| *m != 4) {
        text.push_str(&format!("{month:02}/10/2020,0.{month:02}\n"));
    }
    text
}

async fn loaded_app() -> Router {
    let (app, state) = hydrotemp_dashboard::build_app().unwrap();
    let session =
        DataSession::from_csv(&weather_csv(), &water_csv(), &SessionSchema::default()).unwrap();
    hydrotemp_dashboard::set_session(&state, session).await;
    app
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn range_reports_observed_years() {
    let app = loaded_app().await;

    let (status, range) = get_json(&app, "/api/v1/range").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(range["min"], 2018);
    assert_eq!(range["max"], 2020);
    assert_eq!(range["defaultYear"], 2020);
}

#[tokio::test]
async fn monthly_defaults_and_clamps_year() {
    let app = loaded_app().await;

    // no year: most recent year
    let (status, series) = get_json(&app, "/api/v1/monthly").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series["year"], 2020);
    assert_eq!(series["points"].as_array().unwrap().len(), 1);
    assert_eq!(series["points"][0]["monthName"], "Mar");
    assert_eq!(series["points"][0]["temperatureF"], 82.13);

    // below range clamps to the first year
    let (status, series) = get_json(&app, "/api/v1/monthly?year=1900").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series["year"], 2018);
    assert_eq!(series["points"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn year_without_data_is_not_found() {
    let app = loaded_app().await;

    let (status, notice) = get_json(&app, "/api/v1/monthly?year=2019").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(notice["year"], 2019);
    assert_eq!(notice["error"], "No data for year 2019");

    let (status, _) = get_json(&app, "/api/v1/combined?year=2019").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn yearly_series_has_threshold_line() {
    let app = loaded_app().await;

    let (status, yearly) = get_json(&app, "/api/v1/yearly").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(yearly["points"].as_array().unwrap().len(), 2);
    assert_eq!(yearly["thresholdF"], 55.0);
    assert_eq!(yearly["thresholdLine"], serde_json::json!([55.0, 55.0]));
    assert_eq!(yearly["firstWarmYear"]["year"], 2020);
}

#[tokio::test]
async fn combined_series_is_labeled_proxy() {
    let app = loaded_app().await;

    let (status, combined) = get_json(&app, "/api/v1/combined?year=2020").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(combined["origin"]["kind"], "measured");
    assert_eq!(combined["turbidityBasis"], "temperatureProxy");
    assert_eq!(combined["points"][0]["turbidityNTU"], 1.12);
    assert_eq!(combined["scatter"][0]["x"], 82.13);
}

#[tokio::test]
async fn fallback_is_synthetic_and_clamped_to_data_range() {
    let app = loaded_app().await;

    let (status, series) = get_json(&app, "/api/v1/fallback?year=2030").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series["year"], 2020);
    assert_eq!(series["origin"]["kind"], "synthetic");
    assert_eq!(series["origin"]["completeData"], true);
    assert_eq!(series["points"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn turbidity_summary_fills_gap() {
    let app = loaded_app().await;

    let (status, summary) = get_json(&app, "/api/v1/turbidity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["completeYears"], serde_json::json!([2020]));

    let april = &summary["months"][3];
    assert_eq!(april["month"], 4);
    assert_eq!(april["interpolated"], true);
    assert!((april["turbidityNTU"].as_f64().unwrap() - 0.04).abs() < 1e-9);
}

#[tokio::test]
async fn status_reports_counts() {
    let app = loaded_app().await;

    let (status, body) = get_json(&app, "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "loaded");
    assert_eq!(body["weatherRecords"], 14);
    assert_eq!(body["waterQualityRecords"], 11);
    assert_eq!(body["rejected"]["weather"], 0);
    assert_eq!(body["yearRange"]["min"], 2018);
    assert_eq!(body["firstWarmYear"], 2020);
}
