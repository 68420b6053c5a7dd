use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;

use super::{Language, TranslateProvider};

const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google translation client (the keyless `gtx` endpoint). Source language
/// is auto-detected; the response is a nested array of translated segments.
pub struct GoogleTranslate {
    client: Client,
}

impl GoogleTranslate {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

fn extract_translation(value: &serde_json::Value) -> anyhow::Result<String> {
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .context("unexpected translation payload shape")?;

    let mut out = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|p| p.as_str()) {
            out.push_str(part);
        }
    }
    if out.is_empty() {
        bail!("empty translation result");
    }
    Ok(out)
}

#[async_trait]
impl TranslateProvider for GoogleTranslate {
    async fn translate(&self, text: &str, target: Language) -> anyhow::Result<String> {
        let response = self
            .client
            .get(TRANSLATE_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("translation request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("translation API returned {status}");
        }

        let value: serde_json::Value =
            response.json().await.context("translation response body")?;
        extract_translation(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_concatenated() {
        let value: serde_json::Value = serde_json::from_str(
            r#"[[["बाढ़ की चेतावनी! ", "Flood alert! ", null], ["सुरक्षित स्थान पर जाएँ।", "Move to a safe place.", null]], null, "en"]"#,
        )
        .unwrap();
        let out = extract_translation(&value).unwrap();
        assert_eq!(out, "बाढ़ की चेतावनी! सुरक्षित स्थान पर जाएँ।");
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let value: serde_json::Value = serde_json::from_str(r#"{"error": "rate limited"}"#).unwrap();
        assert!(extract_translation(&value).is_err());
        let value: serde_json::Value = serde_json::from_str("[[]]").unwrap();
        assert!(extract_translation(&value).is_err());
    }
}
