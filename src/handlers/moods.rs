use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::mood::{ListQuery, MoodPage, MoodStats, MoodView, StatsQuery};
use crate::repo::DEFAULT_STATS_DAYS;
use crate::validation;
use crate::AppState;

pub async fn create_mood(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<(StatusCode, Json<MoodView>)> {
    // Coarse type check first so a number where a string belongs gets its
    // own message instead of being coerced or swallowed.
    let report = validation::check_payload_types(&payload);
    if !report.valid {
        return Err(AppError::Validation(report.errors.join("; ")));
    }

    let date = payload.get("date").and_then(Value::as_str);
    let emoji = payload.get("emoji").and_then(Value::as_str);
    let note = payload.get("note").and_then(Value::as_str);

    let entry = state.repo.create(date, emoji, note).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<MoodView>> {
    let date = parse_date_param(&date)?;
    let entry = state
        .repo
        .get_by_date(date)
        .await?
        .ok_or_else(|| AppError::NotFound(date.to_string()))?;
    Ok(Json(entry.into()))
}

pub async fn list_moods(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<MoodPage>> {
    let page = state.repo.list(&query).await?;
    Ok(Json(page))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<MoodView>> {
    let date = parse_date_param(&date)?;
    let removed = state.repo.delete_by_date(date).await?;
    Ok(Json(removed.into()))
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<MoodStats>> {
    let stats = state
        .repo
        .statistics(query.days.unwrap_or(DEFAULT_STATS_DAYS))
        .await?;
    Ok(Json(stats))
}

fn parse_date_param(raw: &str) -> AppResult<NaiveDate> {
    validation::parse_strict_date(raw).ok_or_else(|| {
        AppError::Validation(format!("Date '{}' must be a valid YYYY-MM-DD date", raw))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::config::Config;
    use crate::db::pool::test_pool;
    use crate::repo::MoodRepository;
    use crate::{router, AppState};

    async fn test_app() -> axum::Router {
        let state = AppState {
            repo: MoodRepository::new(test_pool().await),
            config: Arc::new(Config {
                database_url: "sqlite::memory:".into(),
                database_key: None,
                host: "127.0.0.1".into(),
                port: 0,
                frontend_url: "http://localhost:3000".into(),
                cors_extra_origins: Vec::new(),
            }),
        };
        router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_mood(payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/moods")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn create_then_read_over_http() {
        let app = test_app().await;

        let created = app
            .clone()
            .oneshot(post_mood(&json!({
                "date": "2025-09-22",
                "emoji": "😊",
                "note": "sunny",
            })))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = body_json(created).await;
        assert_eq!(body["date"], "2025-09-22");
        assert_eq!(body["emoji"], "😊");
        assert_eq!(body["note"], "sunny");
        assert!(body["id"].as_i64().unwrap() > 0);

        let fetched = app.oneshot(get("/api/moods/2025-09-22")).await.unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        let body = body_json(fetched).await;
        assert_eq!(body["emoji"], "😊");
    }

    #[tokio::test]
    async fn non_string_field_is_rejected_with_error_envelope() {
        let app = test_app().await;

        let response = app
            .oneshot(post_mood(&json!({
                "date": 20250922,
                "emoji": "😊",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["status"], 422);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("'date'"));
    }

    #[tokio::test]
    async fn malformed_date_path_param_is_rejected() {
        let app = test_app().await;

        let response = app.oneshot(get("/api/moods/2025-2-3")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_entry_yields_not_found_envelope() {
        let app = test_app().await;

        let response = app.oneshot(get("/api/moods/2025-09-22")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn duplicate_create_yields_conflict_envelope() {
        let app = test_app().await;
        let payload = json!({ "date": "2025-09-22", "emoji": "😢" });

        let first = app.clone().oneshot(post_mood(&payload)).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app.oneshot(post_mood(&payload)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["error"]["code"], "DUPLICATE_DATE");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("delete the existing entry first"));
    }

    #[tokio::test]
    async fn stats_route_wins_over_date_param_route() {
        let app = test_app().await;

        let response = app.oneshot(get("/api/moods/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalEntries"], 0);
        assert_eq!(body["period"], 30);
        assert_eq!(body["distribution"].as_object().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn delete_returns_snapshot_over_http() {
        let app = test_app().await;

        app.clone()
            .oneshot(post_mood(&json!({ "date": "2025-09-22", "emoji": "🥰" })))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/moods/2025-09-22")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["emoji"], "🥰");

        let gone = app.oneshot(get("/api/moods/2025-09-22")).await.unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_status_and_encryption_state() {
        let app = test_app().await;

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["encryption"], "disabled");
    }
}
