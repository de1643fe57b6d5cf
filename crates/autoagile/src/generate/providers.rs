//! AI provider clients
//!
//! OpenAI and Anthropic go through rig completion agents; DevS.ai has no
//! Rust SDK and is called over plain HTTP. The mock provider never reaches
//! this module's `complete` - callers branch to the offline generators
//! first.

use std::fmt;
use std::str::FromStr;

use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::{anthropic, openai};
use serde::Deserialize;

use crate::prelude::*;

pub const WORK_ITEM_PREAMBLE: &str = "\
You are an assistant for product managers. You turn short feature requests
into well-structured Jira work items.

Rules:
- Respond with a single line starting with \"Title:\" followed by a markdown description.
- Keep the problem statement grounded in the request; do not invent metrics.
- Use plain markdown headings and bullet lists. No code fences.";

pub const CONTENT_PREAMBLE: &str = "\
You are an assistant for product managers. You write concise internal
communications about planned work.

Rules:
- Respond with plain markdown only. No code fences.
- Do not mention these rules or describe what you are doing.";

const DEVS_AI_URL: &str = "https://devs.ai/api/v1/chats/completions";

/// An AI completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    DevsAi,
    Mock,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::DevsAi => Some("DEVS_AI_API_KEY"),
            Provider::Mock => None,
        }
    }

    /// Model used when the caller does not pass one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Anthropic => "claude-3-5-sonnet-latest",
            Provider::DevsAi => "gpt-4o-mini",
            Provider::Mock => "mock",
        }
    }

    fn api_key(&self) -> Result<String> {
        let var = self
            .api_key_var()
            .ok_or_else(|| eyre!("The mock provider has no API key"))?;
        std::env::var(var).map_err(|_| eyre!("{} environment variable not set", var))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::DevsAi => "devs-ai",
            Provider::Mock => "mock",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "devs-ai" | "devsai" | "devs.ai" => Ok(Provider::DevsAi),
            "mock" => Ok(Provider::Mock),
            other => Err(format!(
                "Unknown provider '{other}'. Valid options: openai, anthropic, devs-ai, mock"
            )),
        }
    }
}

/// Pick the provider to use.
///
/// An explicit name wins, then the config file, then the first provider
/// with an API key in the environment, and finally the offline mock.
pub fn resolve_provider(explicit: Option<&str>) -> Result<Provider> {
    if let Some(name) = explicit {
        return name.parse::<Provider>().map_err(|e| eyre!(e));
    }

    if let Some(name) = crate::config::load_config()?.provider {
        return name.parse::<Provider>().map_err(|e| eyre!(e));
    }

    for provider in [Provider::OpenAi, Provider::Anthropic, Provider::DevsAi] {
        let configured = provider
            .api_key_var()
            .map(|var| std::env::var(var).is_ok())
            .unwrap_or(false);
        if configured {
            return Ok(provider);
        }
    }

    Ok(Provider::Mock)
}

/// Send one completion request and return the response text.
pub async fn complete(
    provider: Provider,
    model: Option<String>,
    preamble: &str,
    prompt: &str,
) -> Result<String> {
    let model = model.unwrap_or_else(|| provider.default_model().to_string());

    match provider {
        Provider::OpenAi => {
            let api_key = provider.api_key()?;
            let client = openai::Client::<rig::http_client::ReqwestClient>::builder()
                .api_key(&api_key)
                .build()
                .map_err(|e| eyre!("Failed to create OpenAI client: {}", e))?;
            let agent = client.agent(&model).preamble(preamble).build();

            agent
                .prompt(prompt)
                .await
                .map_err(|e| eyre!("Model generation failed: {}", e))
        }
        Provider::Anthropic => {
            let api_key = provider.api_key()?;
            let client = anthropic::Client::<rig::http_client::ReqwestClient>::builder()
                .api_key(&api_key)
                .build()
                .map_err(|e| eyre!("Failed to create Anthropic client: {}", e))?;
            let agent = client.agent(&model).preamble(preamble).build();

            agent
                .prompt(prompt)
                .await
                .map_err(|e| eyre!("Model generation failed: {}", e))
        }
        Provider::DevsAi => devs_ai_complete(&provider.api_key()?, &model, preamble, prompt).await,
        Provider::Mock => Err(eyre!("The mock provider does not call a model")),
    }
}

/// Call the DevS.ai chat-completions endpoint directly.
async fn devs_ai_complete(
    api_key: &str,
    model: &str,
    preamble: &str,
    prompt: &str,
) -> Result<String> {
    let payload = serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": preamble },
            { "role": "user", "content": prompt }
        ],
        "stream": false,
    });

    let response = reqwest::Client::new()
        .post(DEVS_AI_URL)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| eyre!("Failed to reach DevS.ai: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("DevS.ai request failed [{}]: {}", status, body));
    }

    #[derive(Deserialize)]
    struct ChatCompletion {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ChoiceMessage,
    }

    #[derive(Deserialize)]
    struct ChoiceMessage {
        content: String,
    }

    let completion: ChatCompletion = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse DevS.ai response: {}", e))?;

    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| eyre!("DevS.ai returned no choices"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parses_cli_spellings() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert_eq!("devs-ai".parse::<Provider>().unwrap(), Provider::DevsAi);
        assert_eq!("devs.ai".parse::<Provider>().unwrap(), Provider::DevsAi);
        assert_eq!("mock".parse::<Provider>().unwrap(), Provider::Mock);
        assert!("copilot".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_display_round_trips() {
        for provider in [
            Provider::OpenAi,
            Provider::Anthropic,
            Provider::DevsAi,
            Provider::Mock,
        ] {
            let parsed: Provider = provider.to_string().parse().unwrap();
            assert_eq!(parsed, provider);
        }
    }

    #[test]
    fn test_default_models_are_per_provider() {
        assert_eq!(Provider::OpenAi.default_model(), "gpt-4o");
        assert_eq!(Provider::Anthropic.default_model(), "claude-3-5-sonnet-latest");
        assert_eq!(Provider::DevsAi.default_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_mock_provider_has_no_api_key_var() {
        assert_eq!(Provider::Mock.api_key_var(), None);
        assert_eq!(
            Provider::OpenAi.api_key_var(),
            Some("OPENAI_API_KEY")
        );
    }

    #[test]
    fn test_resolve_provider_prefers_explicit_name() {
        let provider = resolve_provider(Some("anthropic")).unwrap();
        assert_eq!(provider, Provider::Anthropic);
    }

    #[test]
    fn test_resolve_provider_rejects_unknown_explicit_name() {
        assert!(resolve_provider(Some("copilot")).is_err());
    }
}
