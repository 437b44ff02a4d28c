use crate::LunaError;
use crate::config::AdviceConfig;
use crate::entry::LogEntry;
use std::time::Duration;

/// Returned without any request when nothing has been logged.
pub const NO_DATA_MESSAGE: &str =
    "Nothing logged yet? Record today first and I'll be right here waiting for you.";

/// Returned when the completion endpoint cannot be reached or answers badly.
pub const FALLBACK_MESSAGE: &str = "Oops, the signal dropped, but I'm still right here with you. \
Drink something warm, bundle up, and get some good rest.";

const HISTORY_LIMIT: usize = 10;
const TEMPERATURE: f64 = 0.8;

const SYSTEM_PROMPT: &str =
    "You are the gentle companion inside a period journal: a warm, caring close friend. Reply in plain text only.";

const USER_PROMPT_TEMPLATE: &str = r#"Here are my most recent period journal entries:

{HISTORY}

Write me a short, soothing wellness note like a close friend whispering in my ear.
- Pay attention to color, texture, symptoms and mood.
- If my latest entry shows discomfort ({LATEST_SYMPTOMS}) or a low mood ({LATEST_MOODS}), comfort me first.
- Give concrete ways to stay warm and be kind to myself (thick socks, a warm drink, a hot water bottle on my belly).
- Keep it under 150 words."#;

/// Sends a prompt to a text-generation endpoint and returns its reply.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, LunaError>;
}

/// OpenAI-compatible chat completions endpoint.
pub struct ChatCompletionClient {
    config: AdviceConfig,
}

impl ChatCompletionClient {
    pub fn new(config: AdviceConfig) -> Self {
        Self { config }
    }
}

impl CompletionClient for ChatCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, LunaError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "temperature": TEMPERATURE,
        });

        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_global(Some(Duration::from_secs(self.config.timeout_secs)))
                .build(),
        );

        let mut request = agent.post(&self.config.endpoint);
        if let Some(key) = self.config.api_key() {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let resp: serde_json::Value = request
            .send_json(&body)
            .map_err(|e| LunaError::Advice(format!("request: {e}")))?
            .body_mut()
            .read_json()
            .map_err(|e| LunaError::Advice(format!("response: {e}")))?;

        extract_content(&resp)
    }
}

fn extract_content(resp: &serde_json::Value) -> Result<String, LunaError> {
    let text = resp
        .pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        return Err(LunaError::Advice("no content in chat completion response".into()));
    }
    Ok(text.to_string())
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "none".into()
    } else {
        labels.join(",")
    }
}

/// One history line for the prompt.
pub fn format_entry_line(e: &LogEntry) -> String {
    format!(
        "date: {}, volume: {}, color: {}, texture: {}, symptoms: {}, moods: {}, pain: {}",
        e.date,
        e.volume,
        e.color,
        e.texture,
        join_or_none(&e.symptoms),
        join_or_none(&e.moods),
        e.pain_level
    )
}

/// Prompt over the latest entries, or None when there are none.
pub fn build_prompt(entries: &[LogEntry]) -> Option<String> {
    let latest = entries.last()?;
    let recent = &entries[entries.len().saturating_sub(HISTORY_LIMIT)..];
    let history: Vec<String> = recent.iter().map(format_entry_line).collect();
    let history = history.join("\n");
    let symptoms = join_or_none(&latest.symptoms);
    let moods = join_or_none(&latest.moods);

    Some(fill_template(
        USER_PROMPT_TEMPLATE,
        &[
            ("{HISTORY}", history.as_str()),
            ("{LATEST_SYMPTOMS}", symptoms.as_str()),
            ("{LATEST_MOODS}", moods.as_str()),
        ],
    ))
}

/// Single pass over the template: substituted values are never scanned again.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((at, key, value)) = vars
        .iter()
        .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
        .min_by_key(|(at, _, _)| *at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out.push_str(rest);
    out
}

/// Advice for the given entries (ascending by date). Never fails: an empty
/// journal gets [`NO_DATA_MESSAGE`] without a request, any client error gets
/// [`FALLBACK_MESSAGE`].
pub fn request_advice(entries: &[LogEntry], client: &dyn CompletionClient) -> String {
    let Some(prompt) = build_prompt(entries) else {
        return NO_DATA_MESSAGE.into();
    };

    match client.complete(&prompt) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("advice request failed: {e}");
            FALLBACK_MESSAGE.into()
        }
    }
}
