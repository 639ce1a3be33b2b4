//! Enhancement: rewrites a résumé against a job description through the LLM.
//!
//! The result is treated like any other user text. It is parsed with the same rules as an
//! incoming record and then goes through metrics, tiers and limits unchanged.
//!
//! `AppState` holds an `Arc<dyn Enhancer>`: `LlmEnhancer` when an API key is configured,
//! `DisabledEnhancer` otherwise.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeRecord;

use self::prompts::{build_enhance_prompt, enhance_system};

#[async_trait]
pub trait Enhancer: Send + Sync {
    async fn enhance(&self, record: &ResumeRecord, job_description: &str) -> Result<ResumeRecord, AppError>;
}

/// Claude-backed enhancer.
pub struct LlmEnhancer(pub LlmClient);

#[async_trait]
impl Enhancer for LlmEnhancer {
    async fn enhance(&self, record: &ResumeRecord, job_description: &str) -> Result<ResumeRecord, AppError> {
        let resume_json = serde_json::to_string_pretty(record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing record: {e}")))?;
        let prompt = build_enhance_prompt(&resume_json, job_description);
        debug!(prompt_chars = prompt.len(), "requesting enhancement");

        let value: serde_json::Value = self
            .0
            .call_json(&prompt, &enhance_system())
            .await
            .map_err(|e| AppError::Llm(format!("enhancement failed: {e}")))?;

        ResumeRecord::from_value(value).map_err(|e| {
            warn!(error = %e, "model returned an unusable record");
            AppError::Llm(format!("enhancement returned an invalid record: {e}"))
        })
    }
}

/// Stand-in when no API key is configured. Always 503.
pub struct DisabledEnhancer;

#[async_trait]
impl Enhancer for DisabledEnhancer {
    async fn enhance(&self, _record: &ResumeRecord, _job_description: &str) -> Result<ResumeRecord, AppError> {
        Err(AppError::Unavailable(
            "enhancement is disabled: ANTHROPIC_API_KEY is not configured".to_string(),
        ))
    }
}
