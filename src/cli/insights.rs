use anyhow::Result;

use crate::cli::ui::warning;
use crate::config::{Config, SETTING_AI_API_KEY};
use crate::lookup::summary::{generate_insights, EMPTY_COLLECTION_HINT};
use crate::lookup::RemoteSummarizer;
use crate::store::CompanyStore;

/// Execute the insights command
pub fn run_insights(store: &impl CompanyStore, config: &Config) -> Result<()> {
    let companies = store.list();
    if companies.is_empty() {
        println!("{}", EMPTY_COLLECTION_HINT);
        return Ok(());
    }

    if !config.ai.is_configured() {
        warning(&format!(
            "No AI provider configured. Run: partnerhub config set {} <key>",
            SETTING_AI_API_KEY
        ));
        return Ok(());
    }

    let summarizer = RemoteSummarizer::new(&config.ai)?;
    eprintln!("Analyzing {} partners...", companies.len());
    println!("{}", generate_insights(&summarizer, companies));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use crate::models::sample_draft;
    use crate::store::{MemoryStore, Repository};
    use chrono::NaiveDate;

    #[test]
    fn test_unconfigured_provider_is_not_an_error() {
        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        repo.create(sample_draft(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .unwrap();
        assert!(run_insights(&repo, &Config::default()).is_ok());
    }

    #[test]
    fn test_calls_configured_provider() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Grow the network."}}]}"#)
            .create();

        let backend = MemoryStore::new();
        let mut repo = Repository::open(&backend).unwrap();
        repo.create(sample_draft(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .unwrap();
        let config = Config {
            ai: AiConfig {
                api_key: Some("sk-test".to_string()),
                api_url: Some(server.url()),
                ..Default::default()
            },
            ..Default::default()
        };
        run_insights(&repo, &config).unwrap();
        mock.assert();
    }
}
