use axum::extract::{Multipart, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use coalwatch_parser::{parse_upload, IngestReport};
use coalwatch_repository::{DailyWeather, NewStockpile, PileFireEvent, PileTemperature};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::predictor::{predict_ignition_risk, Prediction};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/submit-stockpile", post(submit_stockpile))
        .route("/api/predict", post(predict))
        .route("/api/calendar", get(calendar))
        .route("/api/upload-actual-fires", post(upload_actual_fires))
        .route("/api/metrics", get(metrics))
        .route("/api/upload-csv", post(upload_csv))
        .route("/api/weather", get(weather))
        .route("/api/pile-weather", get(pile_weather))
        .with_state(state)
}

async fn submit_stockpile(
    State(state): State<AppState>,
    Query(params): Query<NewStockpile>,
) -> Result<Json<Value>, ApiError> {
    if params.pile_age_days < 0 {
        return Err(ApiError::BadRequest(
            "pile_age_days must not be negative".to_string(),
        ));
    }
    let stockpile = state.repository.insert_stockpile(&params).await?;
    Ok(Json(json!({ "id": stockpile.id, "status": "ok" })))
}

#[derive(Debug, Deserialize)]
struct PredictParams {
    warehouse: i64,
    pile_id: String,
    current_temp: f64,
    pile_age_days: i64,
    coal_grade: String,
    current_date: Option<String>,
}

/// Strict calendar-date binding for the direct-submission endpoints. Runs
/// before any storage access, so a rejected date persists nothing.
fn parse_iso_date(value: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("invalid {field} '{value}', expected YYYY-MM-DD"))
    })
}

async fn predict(Query(params): Query<PredictParams>) -> Result<Json<Prediction>, ApiError> {
    let raw_date = params.current_date.as_deref().unwrap_or("2025-11-21");
    let current_date = parse_iso_date(raw_date, "current_date")?;

    tracing::debug!(
        warehouse = params.warehouse,
        pile_id = %params.pile_id,
        age_days = params.pile_age_days,
        grade = %params.coal_grade,
        "prediction requested"
    );

    Ok(Json(predict_ignition_risk(params.current_temp, current_date)))
}

async fn calendar() -> Json<Value> {
    // Stub forecast window, pending real calendar generation.
    Json(json!({
        "period": "2025-11-21 — 2025-11-25",
        "high_risk_days": [
            { "date": "2025-11-22", "warehouse": 4, "pile_id": "39" },
            { "date": "2025-11-24", "warehouse": 3, "pile_id": "12" }
        ]
    }))
}

#[derive(Debug, Deserialize)]
struct ActualFireParams {
    warehouse: i64,
    pile_id: String,
    fire_date: String,
}

async fn upload_actual_fires(
    State(state): State<AppState>,
    Query(params): Query<ActualFireParams>,
) -> Result<Json<Value>, ApiError> {
    let fire_date = parse_iso_date(&params.fire_date, "fire_date")?;

    state
        .repository
        .insert_actual_fire(params.warehouse, &params.pile_id, fire_date)
        .await?;

    Ok(Json(json!({ "status": "ok" })))
}

async fn metrics() -> Json<Value> {
    // Stub: real accuracy counts need actual fire data to compare against.
    Json(json!({
        "accuracy_2days": 0.0,
        "total_predictions": 0,
        "correct_predictions": 0,
        "note": "metrics update once actual fire data is loaded"
    }))
}

async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("malformed multipart body: {err}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::BadRequest(format!("failed to read upload: {err}")))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let Some((filename, contents)) = upload else {
        return Err(ApiError::BadRequest(
            "multipart body contained no file".to_string(),
        ));
    };

    if !filename.to_lowercase().ends_with(".csv") {
        return Err(ApiError::BadRequest(format!(
            "unsupported extension on '{filename}': only .csv uploads are accepted"
        )));
    }

    let records = parse_upload(&filename, &contents)?;
    let inserted_rows = state.repository.insert_records(&records).await?;

    tracing::info!(
        filename = %filename,
        format = records.format().as_str(),
        inserted_rows,
        "upload ingested"
    );

    Ok(Json(IngestReport {
        filename,
        inserted_rows,
    }))
}

#[derive(Debug, Deserialize)]
struct DateRangeParams {
    start: NaiveDate,
    end: NaiveDate,
}

async fn weather(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<Vec<DailyWeather>>, ApiError> {
    let days = state.repository.daily_weather(params.start, params.end).await?;
    Ok(Json(days))
}

#[derive(Debug, Deserialize)]
struct PileWeatherParams {
    warehouse: i64,
    pile_id: String,
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Serialize)]
struct PileWeatherResponse {
    warehouse: i64,
    pile_id: String,
    temperatures: Vec<PileTemperature>,
    fires: Vec<PileFireEvent>,
    weather: Vec<DailyWeather>,
}

async fn pile_weather(
    State(state): State<AppState>,
    Query(params): Query<PileWeatherParams>,
) -> Result<Json<PileWeatherResponse>, ApiError> {
    let temperatures = state
        .repository
        .pile_temperatures(params.warehouse, &params.pile_id, params.start, params.end)
        .await?;
    let fires = state
        .repository
        .pile_fire_events(params.warehouse, &params.pile_id, params.start, params.end)
        .await?;
    let weather = state.repository.daily_weather(params.start, params.end).await?;

    Ok(Json(PileWeatherResponse {
        warehouse: params.warehouse,
        pile_id: params.pile_id,
        temperatures,
        fires,
        weather,
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{calendar, metrics, parse_iso_date, predict};
    use crate::error::ApiError;

    /// The stateless routes, wired up without a database.
    fn stub_router() -> Router {
        Router::new()
            .route("/api/predict", post(predict))
            .route("/api/calendar", get(calendar))
            .route("/api/metrics", get(metrics))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn predict_high_risk_forecasts_a_date() {
        let response = stub_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict?warehouse=4&pile_id=39&current_temp=90&pile_age_days=18&coal_grade=DG")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["risk_score"], 1.0);
        assert_eq!(body["predicted_ignition_date"], "2025-11-23");
        assert_eq!(body["warning"], "high risk");
    }

    #[tokio::test]
    async fn predict_low_risk_has_no_date() {
        let response = stub_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict?warehouse=4&pile_id=39&current_temp=40&pile_age_days=18&coal_grade=DG")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["risk_score"], 0.0);
        assert_eq!(body["predicted_ignition_date"], Value::Null);
        assert_eq!(body["warning"], "low risk");
    }

    #[tokio::test]
    async fn predict_rejects_unparseable_date() {
        let response = stub_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict?warehouse=4&pile_id=39&current_temp=90&pile_age_days=18&coal_grade=DG&current_date=2025-13-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn fire_date_with_invalid_month_is_rejected() {
        // The validation runs before any storage call, so a rejected date
        // never reaches the actual_fire table.
        let err = parse_iso_date("2025-13-01", "fire_date").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(err.to_string().contains("2025-13-01"));
    }

    #[test]
    fn well_formed_fire_date_parses() {
        let date = parse_iso_date("2025-11-23", "fire_date").unwrap();
        assert_eq!(
            date,
            chrono::NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
        );
    }

    #[tokio::test]
    async fn calendar_and_metrics_stubs_respond() {
        let response = stub_router()
            .oneshot(Request::builder().uri("/api/calendar").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["period"], "2025-11-21 — 2025-11-25");

        let response = stub_router()
            .oneshot(Request::builder().uri("/api/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_predictions"], 0);
    }
}
