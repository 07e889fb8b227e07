//! Cleanup for free text that ends up as the displayed reply.

use once_cell::sync::Lazy;
use regex::Regex;

use super::canned::GENERIC_SUPPORT_REPLY;

/// Longest reply shown, in characters, including the truncation marker.
pub const MAX_REPLY_CHARS: usize = 200;

/// Appended when a reply is cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Appended to longer text that stops mid-sentence.
pub const CONTINUATION_HINT: &str =
    "... Let me know if you'd like me to continue or if you have questions!";

const ABRUPT_ENDING_MIN_CHARS: usize = 50;

static REPLY_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""reply"\s*:\s*"((?:[^"\\]|\\.)+)""#).expect("reply field pattern is valid")
});

/// Sanitizes free-text replies for display.
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    max_chars: usize,
}

impl Default for ResponseSanitizer {
    fn default() -> Self {
        Self {
            max_chars: MAX_REPLY_CHARS,
        }
    }
}

impl ResponseSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the display bound. Values below the marker length are raised to it.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars.max(TRUNCATION_MARKER.len() + 1);
        self
    }

    /// Sanitizes text, substituting a supportive line if nothing is left.
    pub fn sanitize(&self, text: &str) -> String {
        self.clean(text)
            .unwrap_or_else(|| GENERIC_SUPPORT_REPLY.to_string())
    }

    /// Sanitizes text; `None` if nothing displayable remains.
    ///
    /// # Steps
    /// 1. Remove control characters and prompt-injection markers
    /// 2. Strip code fences
    /// 3. Unwrap a JSON-looking object to its `reply`
    /// 4. Collapse escaped newlines and quotes
    /// 5. Hint at a continuation if the text stops mid-sentence
    /// 6. Truncate to the display bound
    pub fn clean(&self, text: &str) -> Option<String> {
        let cleaned = strip_injection_markers(&remove_control_chars(text));
        let mut cleaned = strip_code_fences(&cleaned);

        if cleaned.starts_with('{') {
            if let Some(reply) = unwrap_reply(&cleaned) {
                cleaned = reply;
            }
        }

        let cleaned = cleaned.replace("\\n", " ").replace("\\\"", "\"");
        let mut cleaned = cleaned
            .trim()
            .trim_start_matches('"')
            .trim_end_matches('"')
            .trim()
            .to_string();

        if cleaned.is_empty() {
            return None;
        }

        if cleaned.chars().count() > ABRUPT_ENDING_MIN_CHARS
            && !cleaned.ends_with(['.', '!', '?'])
        {
            cleaned.push_str(CONTINUATION_HINT);
        }

        Some(self.truncate(cleaned))
    }

    fn truncate(&self, text: String) -> String {
        if text.chars().count() <= self.max_chars {
            return text;
        }
        let keep = self.max_chars - TRUNCATION_MARKER.chars().count();
        let mut cut: String = text.chars().take(keep).collect();
        cut.truncate(cut.trim_end().len());
        cut.push_str(TRUNCATION_MARKER);
        cut
    }
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

fn strip_injection_markers(s: &str) -> String {
    let patterns = [
        "```system",
        "```assistant",
        "[INST]",
        "[/INST]",
        "<|system|>",
        "<|assistant|>",
        "<|user|>",
        "<|im_start|>",
        "<|im_end|>",
        "<<SYS>>",
        "<</SYS>>",
    ];

    let mut result = s.to_string();
    for pattern in patterns {
        result = result.replace(pattern, "");
    }
    result
}

fn strip_code_fences(s: &str) -> String {
    s.replace("```json", "").replace("```", "").trim().to_string()
}

/// Best-effort reply extraction from a JSON-looking string.
fn unwrap_reply(s: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(s) {
        return value
            .get("reply")
            .and_then(|r| r.as_str())
            .filter(|r| !r.trim().is_empty())
            .map(str::to_string);
    }

    REPLY_FIELD
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
