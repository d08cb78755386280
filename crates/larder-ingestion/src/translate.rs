//! Translation client.
//!
//! Maps a food/ingredient name between languages; the English form is the
//! join key into the nutrition API. Any failure — empty input, transport,
//! unexpected payload — is a failure marker for that one item, never fatal
//! to the run.

use serde_json::Value;
use tracing::{debug, instrument};

use larder_common::sandbox::SandboxClient;
use larder_common::{LarderError, Result};

const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

pub struct TranslationClient {
    client: SandboxClient,
}

impl TranslationClient {
    pub fn new(client: SandboxClient) -> Self {
        Self { client }
    }

    /// Translate `text` from `source` to `target` (ISO 639-1 codes).
    #[instrument(skip(self))]
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(LarderError::Translation("empty input".to_string()));
        }

        let resp = self
            .client
            .get(TRANSLATE_ENDPOINT)?
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LarderError::Translation(format!(
                "service returned HTTP {}",
                resp.status()
            )));
        }

        let value: Value = resp.json().await?;
        let translated = parse_translation(&value).ok_or_else(|| {
            LarderError::Translation(format!("unexpected response shape for {:?}", text))
        })?;

        debug!(from = text, to = %translated, "translated");
        Ok(translated)
    }
}

/// The endpoint answers a nested array: index 0 holds the translated
/// segments, each segment's own index 0 the translated text. Segments are
/// concatenated in order.
fn parse_translation(value: &Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(Value::as_str) {
            out.push_str(text);
        }
    }
    let out = out.trim().to_string();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_segment() {
        let value = json!([[["apple", "pomme", null, null, 10]], null, "fr"]);
        assert_eq!(parse_translation(&value).as_deref(), Some("apple"));
    }

    #[test]
    fn test_parse_multiple_segments_concatenated() {
        let value = json!([
            [["green ", "haricots ", null], ["beans", "verts", null]],
            null,
            "fr"
        ]);
        assert_eq!(parse_translation(&value).as_deref(), Some("green beans"));
    }

    #[test]
    fn test_parse_rejects_unexpected_shapes() {
        assert!(parse_translation(&json!({})).is_none());
        assert!(parse_translation(&json!([])).is_none());
        assert!(parse_translation(&json!([[]])).is_none());
    }
}
