//! Narrative generation through an OpenAI-compatible chat endpoint.
//!
//! The analysis result is serialized into a short textual context and
//! sent to an external text-generation service; the response is an
//! opaque story string appended verbatim to the report. The numeric
//! pipeline has no dependency on this service: a missing API token,
//! transport failure, non-success status, or malformed body all
//! degrade to [`FALLBACK_NARRATIVE`], logged at `warn` level.
//! [`generate`] therefore never returns an error.
//!
//! One synchronous request per run, with an explicit timeout
//! (default 30 s).

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// Placeholder appended to the report when no narrative could be
/// generated.
pub const FALLBACK_NARRATIVE: &str =
    "Narrative generation was unavailable for this run.";

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for the narrative-generation request.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Model name sent in the request.
    pub model: String,
    /// Maximum tokens requested. Default: 800.
    pub max_tokens: u32,
    /// Sampling temperature. Default: 0.7.
    pub temperature: f64,
    /// Request timeout. Default: 30 seconds.
    pub timeout: Duration,
    /// Environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://aiproxy.sanand.workers.dev/openai/v1/chat/completions"
                .to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 800,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
            token_env: "AIPROXY_TOKEN".to_string(),
        }
    }
}

impl NarrativeConfig {
    /// Sets the endpoint URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Sets the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the environment variable read for the bearer token.
    pub fn token_env(mut self, var: impl Into<String>) -> Self {
        self.token_env = var.into();
        self
    }
}

// ── Wire types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ── Context serialization ─────────────────────────────────────────────

/// Serializes an analysis result into the textual context sent to the
/// service. Deterministic for a given result.
pub fn build_context(result: &AnalysisResult) -> String {
    let mut ctx = String::new();
    let insights = &result.insights;
    ctx.push_str(&format!(
        "Dataset: {} rows, {} columns ({} numeric, {} categorical), {} missing values.\n",
        insights.row_count,
        insights.column_count,
        insights.numeric_columns,
        insights.categorical_columns,
        insights.missing_values,
    ));

    ctx.push_str("Column statistics:\n");
    for profile in &result.profiles {
        match &profile.summary {
            Some(s) => {
                let std = s
                    .std
                    .map(|v| format!("{v:.3}"))
                    .unwrap_or_else(|| "undefined".to_string());
                ctx.push_str(&format!(
                    "- {} ({}): count={}, mean={:.3}, std={std}, min={:.3}, median={:.3}, max={:.3}, missing={}\n",
                    profile.name, profile.kind, s.count, s.mean, s.min, s.p50, s.max,
                    profile.missing_count,
                ));
            }
            None => {
                ctx.push_str(&format!(
                    "- {} ({}): missing={}\n",
                    profile.name, profile.kind, profile.missing_count,
                ));
            }
        }
    }

    ctx.push_str(&format!(
        "Outlier counts ({}): ",
        result.outliers.method
    ));
    if result.outliers.counts.is_empty() {
        ctx.push_str("no numeric columns");
    } else {
        let parts: Vec<String> = result
            .outliers
            .counts
            .iter()
            .map(|c| format!("{}={}", c.column, c.count))
            .collect();
        ctx.push_str(&parts.join(", "));
    }
    ctx.push('\n');
    ctx.push_str(
        "Write a short narrative describing this dataset, its notable statistics, \
         and any outliers or correlations worth attention.\n",
    );
    ctx
}

// ── Request ───────────────────────────────────────────────────────────

/// Generates a narrative for the analysis result.
///
/// Returns the service's story text, or [`FALLBACK_NARRATIVE`] when
/// the request cannot be made or fails in any way.
pub fn generate(result: &AnalysisResult, config: &NarrativeConfig) -> String {
    let token = match std::env::var(&config.token_env) {
        Ok(t) if !t.is_empty() => t,
        _ => {
            warn!(
                "narrative skipped: {} is not set",
                config.token_env
            );
            return FALLBACK_NARRATIVE.to_string();
        }
    };

    let client = match reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!("narrative skipped: HTTP client construction failed: {e}");
            return FALLBACK_NARRATIVE.to_string();
        }
    };

    let context = build_context(result);
    let request = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: "You are a helpful assistant.",
            },
            ChatMessage {
                role: "user",
                content: &context,
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let response = match client
        .post(&config.endpoint)
        .bearer_auth(token)
        .json(&request)
        .send()
    {
        Ok(r) => r,
        Err(e) => {
            warn!("narrative request failed: {e}");
            return FALLBACK_NARRATIVE.to_string();
        }
    };

    if !response.status().is_success() {
        warn!("narrative request returned status {}", response.status());
        return FALLBACK_NARRATIVE.to_string();
    }

    match response.json::<ChatResponse>() {
        Ok(body) => body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_else(|| {
                warn!("narrative response had no choices");
                FALLBACK_NARRATIVE.to_string()
            }),
        Err(e) => {
            warn!("narrative response could not be decoded: {e}");
            FALLBACK_NARRATIVE.to_string()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
