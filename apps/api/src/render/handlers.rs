//! Axum route handlers for the Render API.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::fit::FitReport;
use crate::layout::templates::{descriptor, TemplateId};
use crate::render::{render_report, render_resume_with, Backend};
use crate::state::AppState;

pub const TIER_HEADER: &str = "x-onepage-tier";
pub const SCALE_HEADER: &str = "x-onepage-scale";
pub const DROPPED_HEADER: &str = "x-onepage-dropped-items";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub resume: Value,
    pub template: String,
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub columns: usize,
}

fn resolve_backend(requested: Option<&str>, fallback: Backend) -> Result<Backend, AppError> {
    match requested.map(str::trim).filter(|b| !b.is_empty()) {
        Some(name) => Ok(name.parse()?),
        None => Ok(fallback),
    }
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid header value {value:?}: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateSummary>> {
    Json(
        TemplateId::ALL
            .into_iter()
            .map(|id| {
                let d = descriptor(id);
                TemplateSummary {
                    id,
                    name: d.name,
                    description: d.description,
                    columns: d.column_count(),
                }
            })
            .collect(),
    )
}

/// POST /api/v1/render
///
/// Always one A4 page. Tier, scale and dropped-item count ride along as response headers.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let render_id = Uuid::new_v4();
    let backend = resolve_backend(request.backend.as_deref(), state.config.default_backend)?;
    let compress = state.config.pdf_compress;
    let template = request.template;
    let resume = request.resume;

    let output = tokio::task::spawn_blocking(move || render_resume_with(resume, &template, backend, compress))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    let report = &output.report;
    info!(
        %render_id,
        template = report.template.as_str(),
        %backend,
        tier = report.tier.as_str(),
        scale = report.scale,
        dropped = report.dropped.total(),
        bytes = output.pdf.len(),
        "rendered resume"
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename=\"{}\"", output.filename))?,
    );
    headers.insert(HeaderName::from_static(TIER_HEADER), header_value(report.tier.as_str())?);
    headers.insert(
        HeaderName::from_static(SCALE_HEADER),
        header_value(&format!("{:.3}", report.scale))?,
    );
    headers.insert(
        HeaderName::from_static(DROPPED_HEADER),
        header_value(&report.dropped.total().to_string())?,
    );

    Ok((StatusCode::OK, headers, output.pdf).into_response())
}

/// POST /api/v1/render/report
///
/// Same pipeline as `/render` without the PDF, for preview UIs.
pub async fn handle_render_report(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<FitReport>, AppError> {
    let backend = resolve_backend(request.backend.as_deref(), state.config.default_backend)?;
    let template = request.template;
    let resume = request.resume;

    let report = tokio::task::spawn_blocking(move || render_report(resume, &template, backend))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in report: {e}")))??;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::enhance::DisabledEnhancer;
    use crate::render::fixtures;
    use crate::routes::build_router;

    fn app() -> axum::Router {
        build_router(AppState::for_tests(Arc::new(DisabledEnhancer)))
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_resolve_backend() {
        assert_eq!(resolve_backend(None, Backend::Structural).unwrap(), Backend::Structural);
        assert_eq!(resolve_backend(Some(" "), Backend::Procedural).unwrap(), Backend::Procedural);
        assert_eq!(resolve_backend(Some("structural"), Backend::Procedural).unwrap(), Backend::Structural);
        assert!(resolve_backend(Some("latex"), Backend::Procedural).is_err());
    }

    #[tokio::test]
    async fn test_list_templates() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v1/templates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let templates: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(templates.len(), 7);
        let executive = templates.iter().find(|t| t["id"] == "executive").unwrap();
        assert_eq!(executive["columns"], 2);
    }

    #[tokio::test]
    async fn test_render_returns_pdf_with_fit_headers() {
        let body = json!({
            "resume": serde_json::to_value(fixtures::typical_record()).unwrap(),
            "template": "classic",
            "backend": "structural",
        });
        let response = app().oneshot(post("/api/v1/render", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe_resume.pdf\""
        );
        assert_eq!(headers[TIER_HEADER], "base");
        assert_eq!(headers[SCALE_HEADER], "1.000");
        assert!(headers.contains_key(DROPPED_HEADER));
        let pdf = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_unknown_template_is_400_and_malformed_record_is_422() {
        let unknown = json!({
            "resume": serde_json::to_value(fixtures::minimal_record()).unwrap(),
            "template": "fancy",
        });
        let response = app().oneshot(post("/api/v1/render", unknown)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let malformed = json!({ "resume": { "experience": [] }, "template": "classic" });
        let response = app().oneshot(post("/api/v1/render/report", malformed)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_report_describes_fit() {
        let body = json!({
            "resume": serde_json::to_value(fixtures::stress_record()).unwrap(),
            "template": "technical",
            "backend": "procedural",
        });
        let response = app().oneshot(post("/api/v1/render/report", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let report: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["tier"], "dense");
        assert_eq!(report["verdict"], "truncated");
        assert!(report["dropped"]["experience"].as_u64().unwrap() >= 47);
    }
}
