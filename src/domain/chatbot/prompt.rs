//! System instruction assembly.

use super::context::ConversationContext;
use super::intent::{IntentLabel, IntentMatch};

const CORE_RULES: &str = "You are an empathetic AI assistant specializing in supporting people with ADHD and similar cognitive challenges.

CORE PRINCIPLES:
- Always be supportive, non-judgmental, and understanding
- Acknowledge the user's feelings before offering solutions
- Break complex ideas into simple steps
- Use encouraging, positive language

OUTPUT FORMAT:
1. Respond with ONLY one valid JSON object, with no text before or after it
2. First-time replies stay under 100 words; detailed guidance may run to 250 words
3. The \"reply\" field is conversational and human-readable, never JSON-looking
4. Fields:
   - \"reply\": your empathetic response text
   - \"followUpOptions\": 2-4 choices as {\"id\", \"text\", \"emoji\"} (first-time replies only)
   - \"actions\": short practical action tags (optional)

Example first-time reply:
{\"reply\": \"Trouble focusing is really common for ADHD brains. What would help most right now?\", \"followUpOptions\": [{\"id\": \"focus_sprint\", \"text\": \"Try a 5-minute focus sprint\", \"emoji\": \"1️⃣\"}, {\"id\": \"environment\", \"text\": \"Set up my environment\", \"emoji\": \"2️⃣\"}]}

Example reply after the user chose an option:
{\"reply\": \"Here's a 5-minute focus sprint: 1️⃣ Set a timer for 5 minutes ✅ 2️⃣ Pick ONE small task ✅ 3️⃣ Work on it without distractions ✅ 4️⃣ Take a 2-minute break ✅\"}

When the user says \"I chose: [option]\", give step-by-step guidance for that option and offer no further choices.";

const FOLLOW_UP_RULES: &[&str] = &[
    "The user has selected a follow-up option. Provide DETAILED step-by-step guidance (3-4 clear steps)",
    "Use numbered lists with ✅ checkboxes",
    "Be specific and actionable",
    "NO MORE OPTIONS: omit \"followUpOptions\" and give actual steps to follow",
];

/// Per-intent instruction fragment.
struct IntentBrief {
    goal: &'static str,
    /// Used when the user has not yet picked an option.
    opening: &'static [&'static str],
    /// Used in both modes.
    always: &'static [&'static str],
}

fn brief(intent: IntentLabel) -> IntentBrief {
    match intent {
        IntentLabel::TaskBreakdown => IntentBrief {
            goal: "Help break down overwhelming tasks into manageable steps.",
            opening: &[
                "Acknowledge their feeling of being overwhelmed",
                "Offer 2-4 options like \"Break it into smaller steps\", \"Start with just 5 minutes\", \"Write it all down first\"",
            ],
            always: &["Use encouraging language and celebrate small wins"],
        },
        IntentLabel::FocusSession => IntentBrief {
            goal: "Guide focus sessions and concentration techniques.",
            opening: &[
                "Acknowledge their focus difficulties",
                "Offer 2-4 options like \"Try a 5-minute focus sprint\", \"Set up your environment\", \"Use a simple breathing technique\"",
            ],
            always: &["Include visual elements like ✅ checkboxes and numbered steps"],
        },
        IntentLabel::StressManagement => IntentBrief {
            goal: "Provide calming and stress-reduction support.",
            opening: &[
                "Acknowledge their stress with empathy",
                "Offer 2-4 immediate options like \"Try deep breathing\", \"Do a quick grounding exercise\", \"Take a calming break\"",
            ],
            always: &["Use calming emojis and clear numbered steps"],
        },
        IntentLabel::MoodCheckin => IntentBrief {
            goal: "Facilitate mood awareness and emotional check-ins.",
            opening: &[
                "Ask gentle, specific questions about their current state",
                "Offer 2-4 options such as naming the feeling, a quick body scan, or journaling",
            ],
            always: &[
                "Help them identify and name emotions",
                "Offer appropriate support based on their mood",
            ],
        },
        IntentLabel::LearningTip => IntentBrief {
            goal: "Share ADHD-friendly tips and strategies.",
            opening: &[
                "Offer 2-4 areas to get a tip on, such as time, organization, focus, or motivation",
            ],
            always: &[
                "Explain why a strategy works for ADHD brains",
                "Keep it simple and easy to implement",
                "Encourage experimentation without pressure",
            ],
        },
        IntentLabel::DistressEscalation => IntentBrief {
            goal: "URGENT: provide crisis support and professional resource guidance.",
            opening: &[
                "Acknowledge their courage in reaching out",
                "Offer 2-4 options including immediate grounding and contacting a crisis line",
            ],
            always: &[
                "Suggest professional crisis resources (call or text 988 in the US, or local emergency services)",
                "Emphasize that they deserve support and help is available",
            ],
        },
        IntentLabel::GeneralSupport => IntentBrief {
            goal: "Provide general emotional support and encouragement.",
            opening: &[
                "Show genuine care and understanding",
                "Ask how you can best support them today, with 2-4 options",
            ],
            always: &["Validate their experiences", "Offer hope and encouragement"],
        },
        IntentLabel::Unknown => IntentBrief {
            goal: "Clarify user needs with gentle inquiry.",
            opening: &[
                "Ask clarifying questions to understand their needs",
                "Offer 2-4 common areas where you can help as options",
            ],
            always: &["Maintain a warm, supportive tone"],
        },
    }
}

/// Builds the system instruction for one turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Assembles core rules, user context and the intent fragment.
    pub fn build(&self, intent: &IntentMatch, context: &ConversationContext) -> String {
        let follow_up = Self::is_follow_up_mode(intent, context);
        let mut prompt = String::from(CORE_RULES);

        let user_context = Self::user_context(context);
        if !user_context.is_empty() {
            prompt.push_str("\n\nUSER CONTEXT: ");
            prompt.push_str(&user_context);
        }

        prompt.push_str("\n\n");
        prompt.push_str(&Self::intent_fragment(intent.intent, follow_up));
        prompt
    }

    /// Follow-up mode: the user has already picked from offered choices.
    pub fn is_follow_up_mode(intent: &IntentMatch, context: &ConversationContext) -> bool {
        intent.is_follow_up() || context.has_selection_in_history()
    }

    fn user_context(context: &ConversationContext) -> String {
        let mut facts = Vec::new();

        if let Some(profile) = &context.user_profile {
            if let Some(name) = profile.name.as_deref().filter(|n| !n.trim().is_empty()) {
                facts.push(format!("User's name is {}.", name.trim()));
            }
            if let Some(mood) = profile.current_mood.as_deref().filter(|m| !m.trim().is_empty()) {
                facts.push(format!("User's recent mood: {}.", mood.trim()));
            }
            if let Some(level) = profile.stress_level {
                facts.push(format!("Self-reported stress level: {}/10.", level));
            }
            if !profile.preferences.is_empty() {
                facts.push(format!("Preferences: {}.", profile.preferences.join(", ")));
            }
        }

        if let Some(session) = &context.session_data {
            if session.focus_session_active {
                facts.push("User is currently in a focus session.".to_string());
            }
            if !session.recent_intents.is_empty() {
                facts.push(format!(
                    "Recent topics: {}.",
                    session
                        .recent_intents
                        .iter()
                        .map(|i| i.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }

        facts.join(" ")
    }

    fn intent_fragment(intent: IntentLabel, follow_up: bool) -> String {
        let brief = brief(intent);
        let mode_rules: &[&str] = if follow_up {
            FOLLOW_UP_RULES
        } else {
            brief.opening
        };

        format!(
            "CURRENT INTENT ({}): {}\n{}",
            intent.as_str(),
            brief.goal,
            mode_rules
                .iter()
                .chain(brief.always)
                .map(|rule| format!("- {}", rule))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}
