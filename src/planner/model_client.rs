use crate::error::PipelineError;

/// A single, strongly typed boundary: text in, raw text out. Everything
/// downstream of this trait is validation — the rest of the system depends
/// only on `plan.v1`, never on how the reply was produced.
pub trait ModelClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, PipelineError>;
}

/// The production client: a blocking HTTP call to an OpenAI-compatible
/// chat-completions endpoint. Blocking keeps the orchestrator's
/// single-threaded, cooperative-at-stage-boundaries model intact — no
/// cross-stage concurrency is introduced by the network call.
pub struct HttpModelClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model_id: String,
    temperature: f64,
    api_key_env: String,
    max_tokens: u32,
}

impl HttpModelClient {
    pub fn new(endpoint: impl Into<String>, model_id: impl Into<String>, temperature: f64) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            model_id: model_id.into(),
            temperature,
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 4096,
        }
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    /// Hard ceiling on the model's reply length, passed through as the
    /// wire-level `max_tokens`. A reply truncated at this ceiling still
    /// fails strict JSON parsing and is retried like any other malformed
    /// reply, rather than silently accepted as a partial plan.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl ModelClient for HttpModelClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, PipelineError> {
        // Read at call time only; never retained, logged, or written to any
        // audit artifact.
        let api_key = std::env::var(&self.api_key_env).map_err(|_| {
            PipelineError::Config(format!("{} is not set", self.api_key_env))
        })?;

        let body = ChatRequest {
            model: &self.model_id,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| PipelineError::InvalidPlan(format!("model call failed: {}", e)))?;

        let parsed: ChatResponse = response
            .error_for_status()
            .map_err(|e| PipelineError::InvalidPlan(format!("model returned an error: {}", e)))?
            .json()
            .map_err(|e| {
                PipelineError::InvalidPlan(format!("model response was not valid JSON: {}", e))
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::InvalidPlan("model returned no choices".to_string()))
    }
}

/// A canned-reply test double driving S1-S6 without a real language model.
/// Replies are consumed in order; a missing reply for an attempt produces
/// an explicit `InvalidPlan` rather than panicking.
pub struct StubModelClient {
    replies: std::cell::RefCell<std::collections::VecDeque<String>>,
}

impl StubModelClient {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: std::cell::RefCell::new(replies.into_iter().collect()),
        }
    }
}

impl ModelClient for StubModelClient {
    fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, PipelineError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| PipelineError::InvalidPlan("stub model has no more replies".to_string()))
    }
}
