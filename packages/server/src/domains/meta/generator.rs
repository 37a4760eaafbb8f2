//! SEO meta tag generation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::info;

use crate::common::text::truncate_with_ellipsis;
use crate::kernel::{log_generation, GenerationRecord, ServerDeps};

use super::error::MetaError;

const TITLE_LIMIT: usize = 60;
const DESCRIPTION_LIMIT: usize = 160;
const DEFAULT_TITLE: &str = "SEO Optimized Title";
const DEFAULT_DESCRIPTION: &str = "SEO optimized description for better search rankings.";

const SYSTEM_PROMPT: &str = "You are an SEO expert specializing in creating compelling meta titles and descriptions that improve search rankings and click-through rates.";

static RE_JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());
static RE_TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)^\W*title\W*:\s*"?([^"\n]+)"?"#).unwrap());
static RE_DESCRIPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)^\W*description\W*:\s*"?([^"\n]+)"?"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Url,
    #[default]
    Text,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaRequest {
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default)]
    pub content: String,
    pub keyword: Option<String>,
    pub tone: Option<String>,
    pub page_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMeta {
    pub title: String,
    pub description: String,
}

pub fn build_prompt(request: &MetaRequest) -> String {
    let mut prompt = match request.input_type {
        InputType::Url => format!(
            "Analyze this URL and generate SEO-optimized meta tags: {}",
            request.content
        ),
        InputType::Text => format!(
            "Generate SEO-optimized meta tags for a {} about: {}",
            request
                .page_type
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or("web page"),
            request.content
        ),
    };

    if let Some(keyword) = request.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
        prompt.push_str(&format!("\nFocus keyword: {}", keyword));
    }
    if let Some(tone) = request.tone.as_deref().filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!("\nTone: {}", tone));
    }

    prompt.push_str(&format!(
        "\n\nRespond with JSON only, in the form {{\"title\": \"...\", \"description\": \"...\"}}. \
         The title must be at most {} characters and the description at most {} characters.",
        TITLE_LIMIT, DESCRIPTION_LIMIT
    ));
    prompt
}

#[derive(Deserialize)]
struct RawMeta {
    title: Option<String>,
    description: Option<String>,
}

/// Pull `{title, description}` out of model output, then clamp lengths.
pub fn parse_generated(text: &str) -> GeneratedMeta {
    let from_json = RE_JSON_BLOCK
        .find(text)
        .and_then(|m| serde_json::from_str::<RawMeta>(m.as_str()).ok());

    let (title, description) = match from_json {
        Some(raw) => (raw.title, raw.description),
        None => {
            let line = |regex: &Regex| {
                regex
                    .captures(text)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().to_string())
            };
            (line(&RE_TITLE_LINE), line(&RE_DESCRIPTION_LINE))
        }
    };

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let description = description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    GeneratedMeta {
        title: truncate_with_ellipsis(title.trim(), TITLE_LIMIT),
        description: truncate_with_ellipsis(description.trim(), DESCRIPTION_LIMIT),
    }
}

pub async fn generate_meta(
    deps: &ServerDeps,
    request: &MetaRequest,
) -> Result<GeneratedMeta, MetaError> {
    if request.content.trim().is_empty() {
        return Err(MetaError::EmptyContent);
    }
    let ai = deps.ai.as_ref().ok_or(MetaError::NotConfigured)?;

    let text = ai
        .complete_with_system(SYSTEM_PROMPT, &build_prompt(request))
        .await
        .map_err(MetaError::from_ai)?;
    let meta = parse_generated(&text);

    info!(input_type = request.input_type.as_str(), title = %meta.title, "Generated meta tags");

    log_generation(
        deps.audit.as_ref(),
        GenerationRecord {
            input_type: request.input_type.as_str().to_string(),
            input_content: request.content.clone(),
            focus_keyword: request.keyword.clone(),
            tone: request
                .tone
                .clone()
                .unwrap_or_else(|| "professional".to_string()),
            title: meta.title.clone(),
            description: meta.description.clone(),
        },
    )
    .await;

    Ok(meta)
}
