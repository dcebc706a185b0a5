//! Commit message drafting
//!
//! A short-lived OpenCode session turns the repository's diff summary into a
//! one-line message. Every failure along the way (no diff, no model
//! configured, session errors, an empty reply) yields the dated fallback,
//! so this never fails.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Error type returned by [`SessionClient`] implementations.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

const SESSION_TITLE: &str = "opencode-sync";
const MAX_MESSAGE_CHARS: usize = 72;

/// Model settings from the OpenCode server's config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default)]
    pub small_model: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ModelSettings {
    /// The model to draft with: `small_model`, else `model`, as
    /// `provider/model`.
    pub fn resolve(&self) -> Option<ModelRef> {
        let value = self.small_model.as_deref().or(self.model.as_deref())?;
        let (provider, model) = value.split_once('/')?;
        if provider.is_empty() || model.is_empty() {
            return None;
        }
        Some(ModelRef {
            provider_id: provider.to_string(),
            model_id: model.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    #[serde(rename = "providerID")]
    pub provider_id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
}

/// The slice of the OpenCode client used for drafting.
#[async_trait]
pub trait SessionClient: Send + Sync {
    async fn config(&self) -> Result<ModelSettings, ClientError>;

    /// Create a session and return its id.
    async fn create_session(&self, title: &str) -> Result<String, ClientError>;

    /// Send a text prompt and return the raw response body.
    async fn prompt(
        &self,
        session_id: &str,
        model: &ModelRef,
        text: &str,
    ) -> Result<Value, ClientError>;

    async fn delete_session(&self, session_id: &str) -> Result<(), ClientError>;
}

/// Where diff summaries come from.
pub trait DiffSource {
    /// Summary of uncommitted changes, or `None` when there is nothing to
    /// describe or the summary could not be produced.
    fn diff_summary(&self, repo_dir: &Path) -> Option<String>;
}

/// [`DiffSource`] backed by the repository itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitDiff;

impl DiffSource for GitDiff {
    fn diff_summary(&self, repo_dir: &Path) -> Option<String> {
        match synced_git::diff_summary(repo_dir) {
            Ok(summary) if !summary.trim().is_empty() => Some(summary),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "No diff summary available");
                None
            }
        }
    }
}

/// `Sync OpenCode config (YYYY-MM-DD)`.
pub fn fallback_message(date: NaiveDate) -> String {
    format!("Sync OpenCode config ({})", date.format("%Y-%m-%d"))
}

/// Draft a commit message for the changes in `repo_dir`.
pub async fn generate_commit_message(
    client: &dyn SessionClient,
    diff: &dyn DiffSource,
    repo_dir: &Path,
    date: NaiveDate,
) -> String {
    let fallback = fallback_message(date);

    let Some(summary) = diff.diff_summary(repo_dir) else {
        return fallback;
    };

    let model = match client.config().await {
        Ok(settings) => settings.resolve(),
        Err(e) => {
            debug!(error = %e, "Could not read model settings");
            None
        }
    };
    let Some(model) = model else {
        return fallback;
    };

    let prompt = [
        "Generate a concise single-line git commit message (max 72 chars).",
        "Focus on OpenCode config sync changes.",
        "Return only the message, no quotes.",
        "",
        "Diff summary:",
        summary.as_str(),
    ]
    .join("\n");

    let session_id = match client.create_session(SESSION_TITLE).await {
        Ok(id) => id,
        Err(e) => {
            debug!(error = %e, "Could not create drafting session");
            return fallback;
        }
    };

    let drafted = match client.prompt(&session_id, &model, &prompt).await {
        Ok(response) => extract_message(&response).and_then(|text| sanitize_message(&text)),
        Err(e) => {
            debug!(error = %e, "Drafting prompt failed");
            None
        }
    };

    if let Err(e) = client.delete_session(&session_id).await {
        debug!(error = %e, session = %session_id, "Could not delete drafting session");
    }

    drafted.unwrap_or(fallback)
}

/// First non-empty text part of a prompt response.
fn extract_message(response: &Value) -> Option<String> {
    let parts = response
        .get("parts")
        .or_else(|| response.get("info").and_then(|info| info.get("parts")))?
        .as_array()?;

    parts
        .iter()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(|text| text.trim().to_string())
}

fn sanitize_message(message: &str) -> Option<String> {
    let first_line = message.lines().next().unwrap_or_default().trim();
    let unquoted = first_line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`'))
        .trim();
    if unquoted.is_empty() {
        return None;
    }

    let truncated: String = unquoted.chars().take(MAX_MESSAGE_CHARS).collect();
    Some(truncated.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(fallback_message(date), "Sync OpenCode config (2024-03-07)");
    }

    #[test]
    fn small_model_wins_over_model() {
        let settings = ModelSettings {
            small_model: Some("anthropic/haiku".into()),
            model: Some("openai/gpt".into()),
        };
        assert_eq!(
            settings.resolve(),
            Some(ModelRef {
                provider_id: "anthropic".into(),
                model_id: "haiku".into()
            })
        );
    }

    #[test]
    fn model_without_provider_is_unusable() {
        let settings = ModelSettings {
            small_model: None,
            model: Some("gpt".into()),
        };
        assert_eq!(settings.resolve(), None);
        assert_eq!(ModelSettings::default().resolve(), None);
    }

    #[test]
    fn extracts_from_nested_info_parts() {
        let response = json!({
            "info": {"parts": [
                {"type": "reasoning", "text": "thinking"},
                {"type": "text", "text": "  Add agent definitions  "}
            ]}
        });
        assert_eq!(
            extract_message(&response).as_deref(),
            Some("Add agent definitions")
        );
        assert_eq!(extract_message(&json!({"parts": []})), None);
    }

    #[test]
    fn sanitize_strips_quotes_and_extra_lines() {
        assert_eq!(
            sanitize_message("\"`Update plugins`\"\n\nLonger body").as_deref(),
            Some("Update plugins")
        );
        assert_eq!(sanitize_message("``"), None);
    }

    #[test]
    fn sanitize_truncates_to_72_chars() {
        let long = "x".repeat(100);
        assert_eq!(sanitize_message(&long).map(|m| m.len()), Some(72));
    }
}
