//! Axum route handler for the Enhance API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default)]
    pub resume: Option<Value>,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /api/v1/enhance
///
/// Returns the enhanced record in the same shape it came in. 503 when no LLM is configured.
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(request): Json<EnhanceRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let resume = match request.resume {
        Some(value) if !value.is_null() => value,
        _ => return Err(AppError::Validation("resume is required".to_string())),
    };
    let job_description = request.job_description.unwrap_or_default();
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("jobDescription cannot be empty".to_string()));
    }

    let record = ResumeRecord::from_value(resume)?;
    let enhanced = state.enhancer.enhance(&record, &job_description).await?;

    info!(
        experience = enhanced.experience.len(),
        skills = enhanced.skills.len(),
        "resume enhanced"
    );
    Ok(Json(enhanced))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::enhance::{DisabledEnhancer, Enhancer};
    use crate::render::fixtures;
    use crate::routes::build_router;

    /// Upper-cases the summary so the round trip is observable.
    struct ShoutingEnhancer;

    #[async_trait]
    impl Enhancer for ShoutingEnhancer {
        async fn enhance(&self, record: &ResumeRecord, _jd: &str) -> Result<ResumeRecord, AppError> {
            let mut out = record.clone();
            out.personal_info.summary = out.personal_info.summary.to_uppercase();
            Ok(out)
        }
    }

    async fn call(enhancer: Arc<dyn Enhancer>, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/enhance")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = build_router(AppState::for_tests(enhancer))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn resume() -> Value {
        serde_json::to_value(fixtures::typical_record()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_are_400_even_when_disabled() {
        let (status, _) = call(Arc::new(DisabledEnhancer), json!({ "resume": resume() })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            Arc::new(DisabledEnhancer),
            json!({ "resume": null, "jobDescription": "Rust role" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_disabled_enhancer_is_503() {
        let (status, body) = call(
            Arc::new(DisabledEnhancer),
            json!({ "resume": resume(), "jobDescription": "Rust role" }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_enhanced_record_keeps_its_shape() {
        let (status, body) = call(
            Arc::new(ShoutingEnhancer),
            json!({ "resume": resume(), "jobDescription": "Rust role" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["personalInfo"]["fullName"], "Jane Doe");
        assert!(body["personalInfo"]["summary"].as_str().unwrap().starts_with("BACKEND ENGINEER"));
        assert_eq!(body["experience"].as_array().unwrap().len(), 2);
    }
}
