use async_trait::async_trait;
use tracing::error;

mod google;
mod language;

pub use google::GoogleTranslate;
pub use language::Language;

/// Provider character budget per request.
pub const MAX_CHUNK_CHARS: usize = 5000;

/// Prefix attached to the untranslated text when the provider fails.
pub const FAILURE_MARKER: &str = "[Translation Failed]";

#[async_trait]
pub trait TranslateProvider: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> anyhow::Result<String>;
}

/// Splits `text` on sentence boundaries into chunks under `budget`
/// characters. A single oversized sentence still becomes its own chunk.
fn chunk_sentences(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in text.split(". ") {
        let sentence_chars = sentence.chars().count();
        if current_chars + sentence_chars < budget {
            current.push_str(sentence);
            current.push_str(". ");
            current_chars += sentence_chars + 2;
        } else {
            if !current.is_empty() {
                chunks.push(current);
            }
            current = format!("{sentence}. ");
            current_chars = sentence_chars + 2;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Translates an alert message, chunking long text to stay under the
/// provider budget. English targets and empty text pass through without a
/// provider call. A provider failure is reported and the original text is
/// returned behind [`FAILURE_MARKER`] so the alert flow keeps going.
pub async fn translate_message(
    provider: &dyn TranslateProvider,
    text: &str,
    target: Language,
) -> String {
    if target == Language::English || text.is_empty() {
        return text.to_string();
    }

    if text.chars().count() <= MAX_CHUNK_CHARS {
        return match provider.translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                error!(error = %e, target = target.code(), "translation failed");
                format!("{FAILURE_MARKER} {text}")
            }
        };
    }

    let mut translated_chunks = Vec::new();
    for chunk in chunk_sentences(text, MAX_CHUNK_CHARS) {
        match provider.translate(&chunk, target).await {
            Ok(translated) => translated_chunks.push(translated),
            Err(e) => {
                error!(error = %e, target = target.code(), "translation failed mid-chunk");
                return format!("{FAILURE_MARKER} {text}");
            }
        }
    }
    translated_chunks.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Echoes input and records every call; `fail` makes all calls error.
    struct RecordingProvider {
        calls: AtomicUsize,
        inputs: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                inputs: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl TranslateProvider for RecordingProvider {
        async fn translate(&self, text: &str, _target: Language) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());
            if self.fail {
                anyhow::bail!("provider unavailable");
            }
            Ok(text.to_string())
        }
    }

    #[tokio::test]
    async fn english_target_is_a_passthrough() {
        let provider = RecordingProvider::new(false);
        let text = "Flood alert! Heavy rainfall detected.";
        let out = translate_message(&provider, text, Language::English).await;
        assert_eq!(out, text);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_text_is_a_passthrough() {
        let provider = RecordingProvider::new(false);
        let out = translate_message(&provider, "", Language::Hindi).await;
        assert_eq!(out, "");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn short_text_uses_exactly_one_call() {
        let provider = RecordingProvider::new(false);
        let text = "Move to safer location immediately. Avoid river areas.";
        translate_message(&provider, text, Language::Tamil).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn long_text_is_chunked_in_sentence_order() {
        let provider = RecordingProvider::new(false);
        let sentences: Vec<String> = (0..200)
            .map(|i| format!("Sentence number {i} warns about rising water levels"))
            .collect();
        let text = sentences.join(". ");
        assert!(text.chars().count() > MAX_CHUNK_CHARS);

        let out = translate_message(&provider, &text, Language::Bengali).await;
        assert!(provider.calls.load(Ordering::SeqCst) > 1);

        // Every original sentence survives, in order.
        let mut cursor = 0;
        for sentence in &sentences {
            let found = out[cursor..]
                .find(sentence.as_str())
                .expect("sentence missing from translated output");
            cursor += found + sentence.len();
        }

        // And each provider call stayed under the budget.
        for input in provider.inputs.lock().unwrap().iter() {
            assert!(input.chars().count() <= MAX_CHUNK_CHARS + 2);
        }
    }

    #[tokio::test]
    async fn failure_returns_marked_original() {
        let provider = RecordingProvider::new(true);
        let text = "Heavy rainfall detected.";
        let out = translate_message(&provider, text, Language::Marathi).await;
        assert_eq!(out, format!("{FAILURE_MARKER} {text}"));
    }

    #[test]
    fn single_oversized_sentence_still_chunks() {
        let long_sentence = "x".repeat(64);
        let chunks = chunk_sentences(&long_sentence, 10);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with(&long_sentence));
    }

    #[test]
    fn chunks_respect_the_budget_for_normal_sentences() {
        let text = (0..50)
            .map(|i| format!("short sentence {i}"))
            .collect::<Vec<_>>()
            .join(". ");
        let chunks = chunk_sentences(&text, 100);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100 + 2);
        }
    }
}
