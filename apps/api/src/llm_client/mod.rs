/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through `ModelProvider`.
///
/// Model: gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod credentials;
#[cfg(test)]
pub mod fake;
pub mod prompts;

pub use credentials::CredentialPool;

/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt blocked by provider: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Model kept calling tools after {rounds} rounds")]
    ToolLoop { rounds: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Provider-neutral request / reply
// ────────────────────────────────────────────────────────────────────────────

/// A named sub-capability the model may ask to invoke mid-generation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// A completed tool round: what the model asked for and what we answered.
#[derive(Debug, Clone)]
pub struct ToolExchange {
    pub call: ToolCall,
    pub output: Value,
}

/// One generation request: prompt, the JSON shape expected back, and any
/// tool rounds already completed in this conversation.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: String,
    pub prompt: String,
    pub response_schema: Value,
    pub tools: Vec<ToolDeclaration>,
    pub exchanges: Vec<ToolExchange>,
}

impl ModelRequest {
    pub fn new(system: impl Into<String>, prompt: String, response_schema: Value) -> Self {
        Self {
            system: system.into(),
            prompt,
            response_schema,
            tools: Vec::new(),
            exchanges: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: ToolDeclaration) -> Self {
        self.tools.push(tool);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// Final answer text (expected to hold JSON).
    Text(String),
    /// The model wants a declared tool run before it answers.
    ToolCall(ToolCall),
}

/// The seam between orchestration and the hosted model.
///
/// Carried in `AppState` as `Arc<dyn ModelProvider>` so tests can script replies.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTools<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTools<'a> {
    function_declarations: &'a [ToolDeclaration],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn text_part(text: &str) -> GeminiPart {
    GeminiPart {
        text: Some(text.to_string()),
        ..Default::default()
    }
}

/// Lays out the conversation: the user prompt, then one model/user turn pair
/// per completed tool exchange.
fn build_contents(request: &ModelRequest) -> Vec<GeminiContent> {
    let mut contents = vec![GeminiContent {
        role: Some("user".to_string()),
        parts: vec![text_part(&request.prompt)],
    }];

    for exchange in &request.exchanges {
        contents.push(GeminiContent {
            role: Some("model".to_string()),
            parts: vec![GeminiPart {
                function_call: Some(exchange.call.clone()),
                ..Default::default()
            }],
        });
        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                function_response: Some(FunctionResponse {
                    name: exchange.call.name.clone(),
                    response: exchange.output.clone(),
                }),
                ..Default::default()
            }],
        });
    }

    contents
}

fn build_request(request: &ModelRequest) -> GeminiRequest<'_> {
    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTools {
            function_declarations: &request.tools,
        }]
    };

    // Function calling rejects any JSON response mode; with tools declared
    // the schema travels in the prompt text only.
    let structured = request.tools.is_empty();

    GeminiRequest {
        system_instruction: GeminiContent {
            role: None,
            parts: vec![text_part(&request.system)],
        },
        contents: build_contents(request),
        tools,
        generation_config: GenerationConfig {
            response_mime_type: structured.then_some("application/json"),
            response_schema: structured.then_some(&request.response_schema),
        },
    }
}

fn into_reply(response: GeminiResponse) -> Result<ModelReply, LlmError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => LlmError::Blocked(reason),
            None => LlmError::EmptyContent,
        });
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            warn!("Gemini finished with reason {reason}");
        }
    }

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    if let Some(call) = parts.iter().find_map(|p| p.function_call.clone()) {
        return Ok(ModelReply::ToolCall(call));
    }

    let text: String = parts
        .iter()
        .filter(|p| p.thought != Some(true))
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(ModelReply::Text(text))
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production model provider: Gemini `generateContent`.
/// One attempt per call. No retries, no client-side timeout.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    credentials: CredentialPool,
}

impl LlmClient {
    pub fn new(base_url: &str, credentials: CredentialPool) -> Result<Self, LlmError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                MODEL
            ),
            credentials,
        })
    }
}

#[async_trait]
impl ModelProvider for LlmClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, LlmError> {
        let body = build_request(request);

        let api_key = self.credentials.pick(&mut rand::thread_rng());

        let mut builder = self.client.post(&self.endpoint).json(&body);
        // Without a key the call goes out bare and the provider's default auth applies.
        if let Some(key) = api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GeminiResponse = serde_json::from_slice(&response.bytes().await?)?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        into_reply(gemini_response)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
