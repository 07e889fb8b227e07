//! Conversation context supplied by the caller on every turn.
//!
//! The pipeline only ever reads a context. Recording an exchange is a
//! caller-side convenience, done after a turn has been answered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::intent::IntentLabel;

/// Id the embedding app gives its greeting bubble; never sent upstream.
pub const WELCOME_TURN_ID: &str = "welcome";

/// Markers that identify a "I picked one of your options" message.
///
/// Matched against lower-cased text.
pub const SELECTION_MARKERS: &[&str] = &[
    "i chose:",
    "chose:",
    "please provide detailed",
    "step-by-step guidance",
];

/// Returns true if the text reads as a follow-up selection.
pub fn is_selection_message(text: &str) -> bool {
    let lowercase = text.to_lowercase();
    SELECTION_MARKERS.iter().any(|m| lowercase.contains(m))
}

/// Who sent a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "bot")]
    Assistant,
}

/// One message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Creates a turn with a fresh id and the current time.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content)
    }

    /// The app's greeting bubble.
    pub fn welcome(content: impl Into<String>) -> Self {
        Self {
            id: WELCOME_TURN_ID.to_string(),
            ..Self::assistant(content)
        }
    }

    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_TURN_ID
    }
}

/// What the user has told the app about themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub current_mood: Option<String>,
    /// Self-reported, 1 (calm) to 10 (overwhelmed).
    pub stress_level: Option<u8>,
}

/// Session markers maintained by the embedding app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub focus_session_active: bool,
    pub last_mood_check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recent_intents: Vec<IntentLabel>,
}

/// Everything the pipeline may read about the conversation so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub user_profile: Option<UserProfile>,
    pub session_data: Option<SessionData>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_turn(mut self, turn: ChatTurn) -> Self {
        self.history.push(turn);
        self
    }

    pub fn with_user_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = Some(profile);
        self
    }

    pub fn with_session_data(mut self, session: SessionData) -> Self {
        self.session_data = Some(session);
        self
    }

    /// Returns true if any earlier turn was a follow-up selection.
    pub fn has_selection_in_history(&self) -> bool {
        self.history.iter().any(|t| is_selection_message(&t.content))
    }

    /// Appends a finished exchange and remembers the detected intent.
    pub fn record_exchange(
        &mut self,
        user_text: impl Into<String>,
        reply: impl Into<String>,
        intent: IntentLabel,
    ) {
        self.history.push(ChatTurn::user(user_text));
        self.history.push(ChatTurn::assistant(reply));

        let session = self.session_data.get_or_insert_with(SessionData::default);
        session.recent_intents.push(intent);
        if intent == IntentLabel::MoodCheckin {
            session.last_mood_check_in = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_markers_are_case_insensitive() {
        assert!(is_selection_message("I CHOSE: Try a 5-minute focus sprint"));
        assert!(is_selection_message("Please provide detailed steps"));
        assert!(is_selection_message("give me step-by-step guidance"));
        assert!(!is_selection_message("I can't focus today"));
    }

    #[test]
    fn test_sender_accepts_bot_alias() {
        let sender: Sender = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(sender, Sender::Assistant);
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_welcome_turn_is_flagged() {
        let turn = ChatTurn::welcome("Hi! I'm here to help.");
        assert!(turn.is_welcome());
        assert_eq!(turn.sender, Sender::Assistant);
        assert!(!ChatTurn::assistant("Hi").is_welcome());
    }

    #[test]
    fn test_turns_get_unique_ids() {
        assert_ne!(ChatTurn::user("a").id, ChatTurn::user("a").id);
    }

    #[test]
    fn test_detects_selection_in_history() {
        let context = ConversationContext::new()
            .with_turn(ChatTurn::user("I can't focus"))
            .with_turn(ChatTurn::assistant("What would help?"));
        assert!(!context.has_selection_in_history());

        let context = context.with_turn(ChatTurn::user("I chose: Set up my environment"));
        assert!(context.has_selection_in_history());
    }

    #[test]
    fn test_record_exchange_appends_both_turns() {
        let mut context = ConversationContext::new();
        context.record_exchange("How am I doing?", "Let's check in.", IntentLabel::MoodCheckin);

        assert_eq!(context.history.len(), 2);
        assert_eq!(context.history[0].sender, Sender::User);
        assert_eq!(context.history[1].sender, Sender::Assistant);

        let session = context.session_data.unwrap();
        assert_eq!(session.recent_intents, vec![IntentLabel::MoodCheckin]);
        assert!(session.last_mood_check_in.is_some());
    }

    #[test]
    fn test_deserializes_camel_case_context() {
        let json = r#"{
            "history": [
                {"id": "welcome", "sender": "bot", "content": "Hi!", "timestamp": "2024-05-01T10:00:00Z"}
            ],
            "userProfile": {"name": "Sam", "currentMood": "tired"},
            "sessionData": {"focusSessionActive": true}
        }"#;

        let context: ConversationContext = serde_json::from_str(json).unwrap();
        assert!(context.history[0].is_welcome());
        let profile = context.user_profile.unwrap();
        assert_eq!(profile.name.as_deref(), Some("Sam"));
        assert!(profile.preferences.is_empty());
        assert!(context.session_data.unwrap().focus_session_active);
    }
}
