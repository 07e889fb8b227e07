//! RespondHandler - Answer one user message

use std::sync::Arc;

use crate::domain::chatbot::{
    ChatbotResponse, ConversationContext, IntentClassifier, KeywordIntentClassifier,
    PromptBuilder, ResponseNormalizer,
};
use crate::ports::{CompletionGateway, CompletionRequest};

/// Command to answer a user message
#[derive(Debug, Clone)]
pub struct RespondCommand {
    pub user_text: String,
    pub context: ConversationContext,
}

impl RespondCommand {
    pub fn new(user_text: impl Into<String>, context: ConversationContext) -> Self {
        Self {
            user_text: user_text.into(),
            context,
        }
    }
}

/// Handler that runs classify → prompt → complete → normalize.
///
/// Holds no per-conversation state; one handler can serve concurrent turns.
pub struct RespondHandler<G: ?Sized + CompletionGateway> {
    gateway: Arc<G>,
    classifier: Arc<dyn IntentClassifier>,
    prompt_builder: PromptBuilder,
    normalizer: ResponseNormalizer,
}

impl<G: ?Sized + CompletionGateway> RespondHandler<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            classifier: Arc::new(KeywordIntentClassifier::new()),
            prompt_builder: PromptBuilder::new(),
            normalizer: ResponseNormalizer::new(),
        }
    }

    /// Replaces the keyword classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Answers the command. Never fails: gateway errors become an apology.
    pub async fn handle(&self, cmd: RespondCommand) -> ChatbotResponse {
        self.respond(&cmd.user_text, &cmd.context).await
    }

    /// Answers `user_text` given the conversation so far.
    pub async fn respond(&self, user_text: &str, context: &ConversationContext) -> ChatbotResponse {
        // 1. Classify
        let intent = self.classifier.classify(user_text, Some(context));
        tracing::debug!(
            intent = %intent.intent,
            confidence = intent.confidence,
            follow_up = intent.is_follow_up(),
            "Intent classified"
        );
        if intent.intent.is_urgent() {
            tracing::warn!(keywords = ?intent.keywords, "Distress signals detected");
        }

        // 2. Build the instruction and message sequence
        let instruction = self.prompt_builder.build(&intent, context);
        let request = CompletionRequest::for_turn(instruction, &context.history, user_text);

        // 3. Call the completion service
        let raw = match self.gateway.complete(request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, status = ?err.status(), "Completion failed, apologizing");
                return ChatbotResponse::apology();
            }
        };

        // 4. Normalize whatever came back
        self.normalizer.normalize(&raw, &intent)
    }
}
