use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translator configuration missing: {0}")]
    Config(String),
    #[error("translator request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translator returned HTTP {0}")]
    Status(u16),
    #[error("translator response carried no translation")]
    Malformed,
}

/// The translation capability. Callers pass text with interpolation
/// markers already replaced by guard tokens and restore them afterwards.
/// A failure is non-fatal to a synchronization pass; no retry policy is
/// layered here.
pub trait Translator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateProvider {
    Azure,
    Dummy,
}

impl std::str::FromStr for TranslateProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "azure" => Ok(TranslateProvider::Azure),
            "dummy" => Ok(TranslateProvider::Dummy),
            other => Err(format!("unknown translation provider: {other}")),
        }
    }
}

/// Azure Translator REST adapter (api-version 3.0). The subscription key
/// is environment-only; endpoint and region may come from configuration.
pub struct AzureTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
    key: String,
    region: Option<String>,
    source_lang: String,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    translations: Vec<TranslationText>,
}

#[derive(Debug, Deserialize)]
struct TranslationText {
    text: String,
}

impl AzureTranslator {
    pub fn new(
        endpoint: String,
        key: String,
        region: Option<String>,
        source_lang: &str,
        timeout_ms: u64,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            key,
            region,
            source_lang: source_lang.to_string(),
        })
    }

    /// Reads `AZURE_TRANSLATOR_ENDPOINT`, `AZURE_TRANSLATOR_SUBSCRIPTION_KEY`
    /// and `AZURE_TRANSLATOR_REGION`; `endpoint`/`region` arguments take
    /// precedence when present.
    pub fn from_env(
        endpoint: Option<String>,
        region: Option<String>,
        source_lang: &str,
        timeout_ms: u64,
    ) -> Result<Self, TranslateError> {
        let endpoint = endpoint
            .or_else(|| std::env::var("AZURE_TRANSLATOR_ENDPOINT").ok())
            .ok_or_else(|| TranslateError::Config("AZURE_TRANSLATOR_ENDPOINT is not set".into()))?;
        let key = std::env::var("AZURE_TRANSLATOR_SUBSCRIPTION_KEY").map_err(|_| {
            TranslateError::Config("AZURE_TRANSLATOR_SUBSCRIPTION_KEY is not set".into())
        })?;
        let region = region.or_else(|| std::env::var("AZURE_TRANSLATOR_REGION").ok());
        Self::new(endpoint, key, region, source_lang, timeout_ms)
    }
}

impl Translator for AzureTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.endpoint.trim_end_matches('/'));
        let mut request = self
            .client
            .post(url)
            .query(&[
                ("api-version", "3.0"),
                ("from", self.source_lang.as_str()),
                ("to", target_lang),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&[serde_json::json!({ "Text": text })]);
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region);
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status().as_u16()));
        }
        let items: Vec<TranslationItem> = response.json()?;
        items
            .into_iter()
            .next()
            .and_then(|item| item.translations.into_iter().next())
            .map(|t| t.text)
            .ok_or(TranslateError::Malformed)
    }
}

/// Offline provider: tags the text with the target language instead of
/// translating it. Used by tests and air-gapped runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyTranslator;

impl Translator for DummyTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        Ok(format!("[{target_lang}] {text}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("azure".parse(), Ok(TranslateProvider::Azure));
        assert_eq!("Dummy".parse(), Ok(TranslateProvider::Dummy));
        assert!("deepl".parse::<TranslateProvider>().is_err());
    }

    #[test]
    fn dummy_provider_tags_with_target_language() {
        let out = DummyTranslator.translate("Hello", "de").unwrap();
        assert_eq!(out, "[de] Hello");
    }
}
