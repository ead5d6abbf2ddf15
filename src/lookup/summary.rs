//! AI-generated strategic summary of the partner network.
//!
//! The prompt is built locally from the collection; any OpenAI-compatible
//! chat-completions endpoint can answer it.

use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::models::Company;

/// Returned instead of calling the service when there is nothing to analyze.
pub const EMPTY_COLLECTION_HINT: &str = "Add partners to get AI insights.";

/// Returned when the service cannot produce a summary.
pub const SUMMARY_UNAVAILABLE: &str = "Could not generate insights right now.";

const SYSTEM_PROMPT: &str =
    "You are an analyst for a real-estate partnership program. Answer in short paragraphs.";

/// Something that turns a prompt into text.
pub trait SummaryGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// One line per partner: name, broker count, commission and account owner.
pub fn build_prompt(companies: &[Company]) -> String {
    let listing = companies
        .iter()
        .map(|c| {
            format!(
                "{} (brokers: {}, commission: {}%, account owner: {})",
                c.name, c.broker_count, c.commission_rate, c.account_owner
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following list of partner real-estate agencies and give a strategic summary. \
         Consider the network size (brokers), the negotiated commission rates (1% to 8%) and the \
         internal account owners to identify success patterns or agreements that need review. \
         Give practical suggestions to maximize the network's ROI and partner engagement.\n\
         List: {}",
        listing
    )
}

/// Produce the summary text. Never fails: an empty collection yields a hint
/// and a generator error yields a fixed fallback.
pub fn generate_insights(generator: &dyn SummaryGenerator, companies: &[Company]) -> String {
    if companies.is_empty() {
        return EMPTY_COLLECTION_HINT.to_string();
    }

    match generator.generate(&build_prompt(companies)) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(provider = generator.name(), "empty summary returned");
            SUMMARY_UNAVAILABLE.to_string()
        }
        Err(e) => {
            warn!(provider = generator.name(), error = %e, "summary generation failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

/// Summary generator using an OpenAI-compatible API
pub struct RemoteSummarizer {
    client: Client,
    api_url: String,
    api_endpoint: String,
    api_key: String,
    model: String,
}

impl RemoteSummarizer {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("API key not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_url: config.effective_api_url().to_string(),
            api_endpoint: config.effective_api_endpoint().to_string(),
            api_key,
            model: config.effective_model().to_string(),
        })
    }

    fn full_url(&self) -> String {
        format!(
            "{}{}",
            self.api_url.trim_end_matches('/'),
            self.api_endpoint
        )
    }
}

impl SummaryGenerator for RemoteSummarizer {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
            top_p: 0.9,
        };

        debug!(url = %self.full_url(), model = %self.model, "requesting summary");
        let response = self
            .client
            .post(self.full_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("API error {}: {}", status, body));
        }

        let completion: CompletionResponse = response.json()?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("No completion choices returned"))
    }

    fn name(&self) -> &str {
        "Remote API"
    }
}

// OpenAI API request/response types

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_draft;
    use chrono::NaiveDate;
    use std::cell::Cell;

    struct Canned {
        reply: Result<String, String>,
        calls: Cell<usize>,
    }

    impl SummaryGenerator for Canned {
        fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone().map_err(|e| anyhow!(e))
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn companies() -> Vec<Company> {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        vec![Company::from_draft(sample_draft(), today)]
    }

    #[test]
    fn test_prompt_lists_every_partner() {
        let prompt = build_prompt(&companies());
        assert!(prompt.contains(
            "Imobiliária Horizonte (brokers: 12, commission: 5%, account owner: Ana)"
        ));
    }

    #[test]
    fn test_empty_collection_skips_service() {
        let generator = Canned {
            reply: Ok("unused".to_string()),
            calls: Cell::new(0),
        };
        assert_eq!(generate_insights(&generator, &[]), EMPTY_COLLECTION_HINT);
        assert_eq!(generator.calls.get(), 0);
    }

    #[test]
    fn test_failure_falls_back() {
        let generator = Canned {
            reply: Err("boom".to_string()),
            calls: Cell::new(0),
        };
        assert_eq!(generate_insights(&generator, &companies()), SUMMARY_UNAVAILABLE);
        assert_eq!(generator.calls.get(), 1);
    }

    #[test]
    fn test_remote_summarizer() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model": "gpt-4o-mini"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant", "content": "Focus on the large agencies."}, "finish_reason": "stop"}]}"#,
            )
            .create();

        let config = AiConfig {
            api_key: Some("test-key".to_string()),
            api_url: Some(server.url()),
            ..Default::default()
        };
        let summarizer = RemoteSummarizer::new(&config).unwrap();
        let text = generate_insights(&summarizer, &companies());
        mock.assert();
        assert_eq!(text, "Focus on the large agencies.");
    }

    #[test]
    fn test_remote_error_status_falls_back() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": "bad key"}"#)
            .create();

        let config = AiConfig {
            api_key: Some("wrong".to_string()),
            api_url: Some(server.url()),
            ..Default::default()
        };
        let summarizer = RemoteSummarizer::new(&config).unwrap();
        assert!(summarizer.generate("hi").is_err());
        assert_eq!(generate_insights(&summarizer, &companies()), SUMMARY_UNAVAILABLE);
    }

    #[test]
    fn test_missing_key() {
        assert!(RemoteSummarizer::new(&AiConfig::default()).is_err());
    }
}
