//! Turns whatever the completion service returned into a [`ChatbotResponse`].
//!
//! Models asked for JSON reply with JSON, JSON wrapped in prose, a raw
//! chat-completions envelope, or plain prose. Each shape is tried in a fixed
//! order; the first stage that produces a reply wins and a canned reply is
//! used when none does.

use serde_json::Value;

use super::canned;
use super::intent::IntentMatch;
use super::response::{ChatbotResponse, FollowUpOption};
use super::sanitizer::ResponseSanitizer;

/// A reply recovered from raw completion text.
#[derive(Debug, Clone, PartialEq, Default)]
struct ParsedReply {
    reply: String,
    actions: Vec<String>,
    follow_up_options: Vec<FollowUpOption>,
}

type Stage = fn(&ResponseNormalizer, &str) -> Option<ParsedReply>;

/// Normalizes raw completion text into a displayable response.
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    sanitizer: ResponseSanitizer,
}

impl ResponseNormalizer {
    const STAGES: [(&'static str, Stage); 4] = [
        ("direct_json", Self::direct_json),
        ("envelope", Self::envelope),
        ("embedded_json", Self::embedded_json),
        ("prose", Self::prose),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes raw completion text. Never fails.
    pub fn normalize(&self, raw: &str, intent: &IntentMatch) -> ChatbotResponse {
        for (name, stage) in Self::STAGES {
            if let Some(parsed) = stage(self, raw) {
                tracing::debug!(stage = name, intent = %intent.intent, "Completion normalized");
                return ChatbotResponse::new(parsed.reply, intent)
                    .with_actions(parsed.actions)
                    .with_follow_up_options(parsed.follow_up_options);
            }
        }

        tracing::warn!(
            intent = %intent.intent,
            raw_len = raw.len(),
            "Completion unusable, falling back to canned reply"
        );
        self.canned(intent)
    }

    fn canned(&self, intent: &IntentMatch) -> ChatbotResponse {
        if intent.is_follow_up() {
            return ChatbotResponse::new(canned::guidance(intent.intent), intent);
        }
        let (reply, options) = canned::opener(intent.intent);
        ChatbotResponse::new(reply, intent).with_follow_up_options(options)
    }

    fn direct_json(&self, raw: &str) -> Option<ParsedReply> {
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        parse_reply_object(&value)
    }

    /// A chat-completions envelope whose message content holds the real reply.
    fn envelope(&self, raw: &str) -> Option<ParsedReply> {
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        let content = value
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()?;

        self.direct_json(content)
            .or_else(|| self.embedded_json(content))
            .or_else(|| self.free_text(content))
    }

    fn embedded_json(&self, raw: &str) -> Option<ParsedReply> {
        let object = extract_balanced_object(raw)?;
        let value: Value = serde_json::from_str(object).ok()?;
        parse_reply_object(&value)
    }

    fn prose(&self, raw: &str) -> Option<ParsedReply> {
        self.free_text(raw)
    }

    /// Non-blank text that is not broken JSON becomes the reply as is.
    /// Text that cleans down to nothing gets the generic supportive line.
    fn free_text(&self, text: &str) -> Option<ParsedReply> {
        if text.trim().is_empty() || looks_like_json(text) {
            return None;
        }
        Some(ParsedReply {
            reply: self.sanitizer.sanitize(text),
            ..ParsedReply::default()
        })
    }
}

/// Reads `reply`, `actions` and `followUpOptions` from a JSON object.
///
/// Requires a non-empty string `reply`.
fn parse_reply_object(value: &Value) -> Option<ParsedReply> {
    let reply = value.get("reply")?.as_str()?.trim();
    if reply.is_empty() {
        return None;
    }

    let actions = value
        .get("actions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let follow_up_options = value
        .get("followUpOptions")
        .or_else(|| value.get("follow_up_options"))
        .and_then(Value::as_array)
        .map(|items| parse_options(items))
        .unwrap_or_default();

    Some(ParsedReply {
        reply: reply.to_string(),
        actions,
        follow_up_options,
    })
}

/// Lenient option parsing: entries missing both id and text are dropped.
fn parse_options(items: &[Value]) -> Vec<FollowUpOption> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(FollowUpOption::new("", text.as_str(), "")),
            Value::Object(_) => serde_json::from_value::<FollowUpOption>(item.clone()).ok(),
            _ => None,
        })
        .filter_map(|mut option| {
            option.id = option.id.trim().to_string();
            option.text = option.text.trim().to_string();
            match (option.id.is_empty(), option.text.is_empty()) {
                (true, true) => return None,
                (false, true) => option.text = option.id.clone(),
                (true, false) => option.id = slug(&option.text),
                (false, false) => {}
            }
            Some(option)
        })
        .collect()
}

fn slug(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Text opening an object, or a well-formed array.
fn looks_like_json(raw: &str) -> bool {
    let trimmed = raw.replace("```json", "").replace("```", "");
    let trimmed = trimmed.trim();
    trimmed.starts_with('{')
        || (trimmed.starts_with('[') && serde_json::from_str::<Value>(trimmed).is_ok())
}

/// First balanced `{...}` in `s`, honouring string literals and escapes.
fn extract_balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chatbot::canned::GENERIC_SUPPORT_REPLY;
    use crate::domain::chatbot::intent::{IntentLabel, FOLLOW_UP_KEYWORD};
    use crate::domain::chatbot::sanitizer::{MAX_REPLY_CHARS, TRUNCATION_MARKER};
    use proptest::prelude::*;

    fn task_match() -> IntentMatch {
        IntentMatch::new(IntentLabel::TaskBreakdown, 0.6, vec!["stuck".to_string()])
    }

    fn follow_up_match() -> IntentMatch {
        IntentMatch::new(
            IntentLabel::FocusSession,
            0.95,
            vec![FOLLOW_UP_KEYWORD.to_string(), "focus".to_string()],
        )
    }

    fn normalize(raw: &str, intent: &IntentMatch) -> ChatbotResponse {
        ResponseNormalizer::new().normalize(raw, intent)
    }

    #[test]
    fn test_direct_json_reply_without_options() {
        let response = normalize(r#"{"reply":"X"}"#, &task_match());
        assert_eq!(response.reply, "X");
        assert!(response.follow_up_options.is_none());
        assert!(response.actions.is_empty());
        assert_eq!(response.intent, IntentLabel::TaskBreakdown);
        assert_eq!(response.confidence, 0.6);
    }

    #[test]
    fn test_direct_json_with_options_and_actions() {
        let raw = r#"{
            "reply": "What feels most doable?",
            "actions": ["start_timer", 42],
            "followUpOptions": [
                {"id": "tiny_step", "text": "Pick one tiny step", "emoji": "1️⃣"},
                {"text": "Brain dump first"},
                {"id": "timer"},
                {"emoji": "4️⃣"}
            ]
        }"#;
        let response = normalize(raw, &task_match());
        assert_eq!(response.reply, "What feels most doable?");
        assert_eq!(response.actions, vec!["start_timer"]);

        let options = response.follow_up_options.unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].id, "tiny_step");
        assert_eq!(options[1].id, "brain_dump_first");
        assert_eq!(options[2].text, "timer");
    }

    #[test]
    fn test_empty_reply_field_is_not_accepted() {
        let response = normalize(r#"{"reply": "   "}"#, &task_match());
        assert!(response.offers_choices());
        assert_ne!(response.reply.trim(), "");
    }

    #[test]
    fn test_envelope_with_json_content() {
        let raw = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"reply\": \"Breathe in for four.\"}"}}]
        })
        .to_string();
        let response = normalize(&raw, &task_match());
        assert_eq!(response.reply, "Breathe in for four.");
    }

    #[test]
    fn test_envelope_with_prose_content() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "Let's take it slow."}}]
        })
        .to_string();
        assert_eq!(normalize(&raw, &task_match()).reply, "Let's take it slow.");
    }

    #[test]
    fn test_envelope_with_fenced_json_content() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "Sure!\n```json\n{\"reply\": \"Start with five minutes.\"}\n```"}}]
        })
        .to_string();
        assert_eq!(normalize(&raw, &task_match()).reply, "Start with five minutes.");
    }

    #[test]
    fn test_embedded_json_in_prose() {
        let raw = r#"Here you go: {"reply": "Try {one} thing.", "followUpOptions": []} hope it helps"#;
        let response = normalize(raw, &task_match());
        assert_eq!(response.reply, "Try {one} thing.");
        assert!(response.follow_up_options.is_none());
    }

    #[test]
    fn test_embedded_json_after_multibyte_text() {
        let raw = r#"🎯🎯 {"reply": "Aim small."}"#;
        assert_eq!(normalize(raw, &task_match()).reply, "Aim small.");
    }

    #[test]
    fn test_long_prose_is_truncated() {
        let raw = "Breaking big tasks into small ones really helps your brain get started. ".repeat(10);
        let response = normalize(&raw, &task_match());
        assert!(response.reply.chars().count() <= MAX_REPLY_CHARS);
        assert!(response.reply.ends_with(TRUNCATION_MARKER));
        assert!(response.follow_up_options.is_none());
    }

    #[test]
    fn test_follow_up_garbage_gets_guidance_without_options() {
        let intent = follow_up_match();
        let response = normalize("{not json at all", &intent);
        assert_eq!(response.reply, canned::guidance(IntentLabel::FocusSession));
        assert!(response.follow_up_options.is_none());
        assert_eq!(response.intent, IntentLabel::FocusSession);
    }

    #[test]
    fn test_fresh_garbage_gets_opener_with_four_options() {
        let response = normalize("", &task_match());
        let (reply, _) = canned::opener(IntentLabel::TaskBreakdown);
        assert_eq!(response.reply, reply);
        assert_eq!(response.follow_up_options.map(|o| o.len()), Some(4));
    }

    #[test]
    fn test_envelope_with_empty_fenced_content_gets_generic_line() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "```json\n```"}}]
        })
        .to_string();
        let response = normalize(&raw, &task_match());
        assert_eq!(response.reply, GENERIC_SUPPORT_REPLY);
        assert!(response.follow_up_options.is_none());
        assert_eq!(response.intent, IntentLabel::TaskBreakdown);
    }

    #[test]
    fn test_quotes_only_prose_gets_generic_line() {
        let response = normalize("\"\"", &task_match());
        assert_eq!(response.reply, GENERIC_SUPPORT_REPLY);
        assert!(response.follow_up_options.is_none());
    }

    #[test]
    fn test_envelope_with_replyless_json_falls_back_to_opener() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "{\"unexpected\": true}"}}]
        })
        .to_string();
        let response = normalize(&raw, &task_match());
        assert_eq!(response.follow_up_options.map(|o| o.len()), Some(4));
    }

    #[test]
    fn test_bracketed_prose_is_not_mistaken_for_json() {
        let response = normalize("[Note] take a breath.", &task_match());
        assert_eq!(response.reply, "[Note] take a breath.");
        assert!(response.follow_up_options.is_none());

        assert!(looks_like_json("[1, 2]"));
        assert!(looks_like_json("{\"reply\""));
        assert!(!looks_like_json("[Note] take a breath."));
    }

    #[test]
    fn test_balanced_extraction_respects_strings() {
        let s = r#"x {"a": "}", "b": {"c": "\"{"}} tail"#;
        assert_eq!(
            extract_balanced_object(s),
            Some(r#"{"a": "}", "b": {"c": "\"{"}}"#)
        );
        assert_eq!(extract_balanced_object("{ unclosed"), None);
        assert_eq!(extract_balanced_object("no braces"), None);
    }

    proptest! {
        #[test]
        fn test_reply_is_never_empty(raw in "\\PC{0,400}", follow_up in any::<bool>()) {
            let intent = if follow_up { follow_up_match() } else { task_match() };
            let response = normalize(&raw, &intent);
            prop_assert!(!response.reply.trim().is_empty());
            prop_assert_eq!(response.intent, intent.intent);
        }

        #[test]
        fn test_prose_replies_stay_within_bound(raw in "[A-Za-z ,]{1,600}") {
            let response = normalize(&raw, &task_match());
            if response.follow_up_options.is_none() {
                prop_assert!(response.reply.chars().count() <= MAX_REPLY_CHARS);
            }
        }
    }
}
