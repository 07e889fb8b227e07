//! Intent classification for incoming user messages.

use super::context::{is_selection_message, ConversationContext};
use super::intent::{IntentLabel, IntentMatch, FOLLOW_UP_KEYWORD};

/// Classifies user intent from message content
pub trait IntentClassifier: Send + Sync {
    /// Classify the user's intent from their message.
    ///
    /// The context is accepted for classifiers that want it; the keyword
    /// classifier decides from the text alone.
    fn classify(&self, message: &str, context: Option<&ConversationContext>) -> IntentMatch;
}

/// Trigger phrases and urgency weight for one intent.
#[derive(Debug, Clone, Copy)]
pub struct IntentPattern {
    pub intent: IntentLabel,
    pub triggers: &'static [&'static str],
    pub urgency: u32,
}

/// Scoring table, in tie-break order.
pub const INTENT_PATTERNS: &[IntentPattern] = &[
    IntentPattern {
        intent: IntentLabel::TaskBreakdown,
        triggers: &[
            "overwhelming",
            "too much",
            "big task",
            "break down",
            "steps",
            "procrastinating",
            "stuck",
        ],
        urgency: 3,
    },
    IntentPattern {
        intent: IntentLabel::FocusSession,
        triggers: &[
            "focus",
            "concentrate",
            "distracted",
            "pomodoro",
            "work session",
            "can't focus",
        ],
        urgency: 2,
    },
    IntentPattern {
        intent: IntentLabel::StressManagement,
        triggers: &[
            "stressed",
            "anxious",
            "panic",
            "overwhelmed",
            "calm",
            "breathing",
            "relax",
        ],
        urgency: 4,
    },
    IntentPattern {
        intent: IntentLabel::MoodCheckin,
        triggers: &["feeling", "mood", "how am i", "emotional", "check in", "today"],
        urgency: 1,
    },
    IntentPattern {
        intent: IntentLabel::LearningTip,
        triggers: &["tip", "help", "advice", "learn", "strategy", "how to", "teach me"],
        urgency: 1,
    },
    IntentPattern {
        intent: IntentLabel::DistressEscalation,
        triggers: &[
            "crisis",
            "emergency",
            "hurt myself",
            "give up",
            "hopeless",
            "can't cope",
        ],
        urgency: 5,
    },
    IntentPattern {
        intent: IntentLabel::GeneralSupport,
        triggers: &["hello", "hi", "support", "talk", "listen", "understand"],
        urgency: 1,
    },
    IntentPattern {
        intent: IntentLabel::Unknown,
        triggers: &[],
        urgency: 0,
    },
];

const FOLLOW_UP_CONFIDENCE: f32 = 0.95;
const GENERIC_FOLLOW_UP_CONFIDENCE: f32 = 0.9;

/// Keyword/urgency scoring classifier (default implementation)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Picks guidance topic for a message that selected an offered option.
    fn classify_follow_up(&self, text: &str) -> IntentMatch {
        let has_any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));
        let keywords = |topic: &str| vec![FOLLOW_UP_KEYWORD.to_string(), topic.to_string()];

        if has_any(&["focus", "sprint", "environment", "breathing"]) {
            return IntentMatch::new(
                IntentLabel::FocusSession,
                FOLLOW_UP_CONFIDENCE,
                keywords("focus"),
            );
        }
        if has_any(&["steps", "break", "5 minutes", "brain dump"]) {
            return IntentMatch::new(
                IntentLabel::TaskBreakdown,
                FOLLOW_UP_CONFIDENCE,
                keywords("tasks"),
            );
        }
        if has_any(&["deep breathing", "grounding", "calming"]) {
            return IntentMatch::new(
                IntentLabel::StressManagement,
                FOLLOW_UP_CONFIDENCE,
                keywords("stress"),
            );
        }

        IntentMatch::new(
            IntentLabel::GeneralSupport,
            GENERIC_FOLLOW_UP_CONFIDENCE,
            vec![FOLLOW_UP_KEYWORD.to_string()],
        )
    }

    fn score(&self, text: &str) -> IntentMatch {
        let mut best = IntentLabel::Unknown;
        let mut best_score = 0u32;
        let mut best_keywords: Vec<&str> = Vec::new();

        for pattern in INTENT_PATTERNS {
            let matches: Vec<&str> = pattern
                .triggers
                .iter()
                .copied()
                .filter(|t| text.contains(t))
                .collect();
            let score = matches.len() as u32 * pattern.urgency;

            // Strictly greater: earlier labels win ties.
            if score > best_score {
                best = pattern.intent;
                best_score = score;
                best_keywords = matches;
            }
        }

        IntentMatch::new(
            best,
            (best_score as f32 / 10.0).min(1.0),
            best_keywords.into_iter().map(str::to_string).collect(),
        )
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, message: &str, _context: Option<&ConversationContext>) -> IntentMatch {
        let text = normalize_text(message);

        if is_selection_message(&text) {
            return self.classify_follow_up(&text);
        }

        self.score(&text)
    }
}

/// Lower-cases and folds typographic apostrophes so "can’t" matches "can't".
fn normalize_text(message: &str) -> String {
    message.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}
