//! IntentLabel enum and the result of classifying a user message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Synthetic keyword attached to every follow-up selection match.
pub const FOLLOW_UP_KEYWORD: &str = "follow-up";

/// The closed set of intents the chatbot responds to.
///
/// Declaration order is significant: keyword scoring breaks ties in favour
/// of the label that comes first in [`IntentLabel::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    TaskBreakdown,
    FocusSession,
    StressManagement,
    MoodCheckin,
    LearningTip,
    DistressEscalation,
    GeneralSupport,
    Unknown,
}

impl IntentLabel {
    /// Returns all labels in canonical (tie-break) order.
    pub fn all() -> &'static [IntentLabel] {
        &[
            IntentLabel::TaskBreakdown,
            IntentLabel::FocusSession,
            IntentLabel::StressManagement,
            IntentLabel::MoodCheckin,
            IntentLabel::LearningTip,
            IntentLabel::DistressEscalation,
            IntentLabel::GeneralSupport,
            IntentLabel::Unknown,
        ]
    }

    /// Returns the wire name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::TaskBreakdown => "task_breakdown",
            IntentLabel::FocusSession => "focus_session",
            IntentLabel::StressManagement => "stress_management",
            IntentLabel::MoodCheckin => "mood_checkin",
            IntentLabel::LearningTip => "learning_tip",
            IntentLabel::DistressEscalation => "distress_escalation",
            IntentLabel::GeneralSupport => "general_support",
            IntentLabel::Unknown => "unknown",
        }
    }

    /// Returns true for intents that need crisis-level care in the reply.
    pub fn is_urgent(&self) -> bool {
        matches!(self, IntentLabel::DistressEscalation)
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of classifying one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub intent: IntentLabel,
    /// Always within `[0, 1]`.
    pub confidence: f32,
    pub keywords: Vec<String>,
}

impl IntentMatch {
    /// Creates a match, clamping confidence into `[0, 1]`.
    pub fn new(intent: IntentLabel, confidence: f32, keywords: Vec<String>) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            intent,
            confidence,
            keywords,
        }
    }

    /// The "nothing matched" result.
    pub fn unknown() -> Self {
        Self::new(IntentLabel::Unknown, 0.0, Vec::new())
    }

    /// Returns true if the user picked one of the previously offered options.
    pub fn is_follow_up(&self) -> bool {
        self.keywords.iter().any(|k| k == FOLLOW_UP_KEYWORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_returns_8_labels_ending_with_unknown() {
        let all = IntentLabel::all();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], IntentLabel::TaskBreakdown);
        assert_eq!(all[7], IntentLabel::Unknown);
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&IntentLabel::DistressEscalation).unwrap();
        assert_eq!(json, "\"distress_escalation\"");

        let parsed: IntentLabel = serde_json::from_str("\"mood_checkin\"").unwrap();
        assert_eq!(parsed, IntentLabel::MoodCheckin);
    }

    #[test]
    fn test_as_str_matches_serde_for_every_label() {
        for label in IntentLabel::all() {
            let json = serde_json::to_string(label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(IntentMatch::new(IntentLabel::FocusSession, 1.7, vec![]).confidence, 1.0);
        assert_eq!(IntentMatch::new(IntentLabel::FocusSession, -0.3, vec![]).confidence, 0.0);
        assert_eq!(IntentMatch::new(IntentLabel::FocusSession, f32::NAN, vec![]).confidence, 0.0);
    }

    #[test]
    fn test_follow_up_detected_from_keywords() {
        let m = IntentMatch::new(
            IntentLabel::FocusSession,
            0.95,
            vec![FOLLOW_UP_KEYWORD.to_string(), "focus".to_string()],
        );
        assert!(m.is_follow_up());
        assert!(!IntentMatch::unknown().is_follow_up());
    }
}
