//! Chatbot Domain Module
//!
//! Everything needed to turn one user message into a supportive reply,
//! short of the network call itself.
//!
//! # Pipeline
//!
//! - **Classifier**: keyword/urgency scoring into an [`IntentLabel`]
//! - **PromptBuilder**: system instruction for the completion service
//! - **ResponseNormalizer**: repairs whatever came back into a [`ChatbotResponse`]
//! - **Canned**: fallback replies when the service output is unusable

pub mod canned;
pub mod classifier;
pub mod context;
pub mod intent;
pub mod normalizer;
pub mod prompt;
pub mod response;
pub mod sanitizer;

pub use classifier::{IntentClassifier, KeywordIntentClassifier, INTENT_PATTERNS};
pub use context::{
    is_selection_message, ChatTurn, ConversationContext, Sender, SessionData, UserProfile,
    WELCOME_TURN_ID,
};
pub use intent::{IntentLabel, IntentMatch, FOLLOW_UP_KEYWORD};
pub use normalizer::ResponseNormalizer;
pub use prompt::PromptBuilder;
pub use response::{ChatbotResponse, FollowUpOption, APOLOGY_REPLY};
pub use sanitizer::{ResponseSanitizer, MAX_REPLY_CHARS};
