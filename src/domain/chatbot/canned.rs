//! Canned replies used when the completion service's output is unusable.
//!
//! Two tables keyed by intent: long-form guidance for follow-up turns, and a
//! short empathetic opener with four choices for everything else.

use super::intent::IntentLabel;
use super::response::FollowUpOption;

/// Last-resort line when even sanitized text comes out empty.
pub const GENERIC_SUPPORT_REPLY: &str =
    "I'm here to support you. Can you tell me more about what you're experiencing?";

const NUMBER_EMOJI: [&str; 4] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣"];

/// Step-by-step guidance for a turn where the user already picked an option.
pub fn guidance(intent: IntentLabel) -> &'static str {
    match intent {
        IntentLabel::FocusSession => "🎯 **5-Minute Focus Sprint Guide**\n\n\
            1️⃣ **Prepare Your Space** ✅\n   • Clear your desk/workspace\n   • Put away distractions (phone, etc.)\n   • Get water nearby\n\n\
            2️⃣ **Set Your Timer** ✅\n   • Set timer for exactly 5 minutes\n   • Choose ONE specific task\n   • Tell yourself 'just 5 minutes'\n\n\
            3️⃣ **Sprint Time** ✅\n   • Work ONLY on that task\n   • Ignore other thoughts\n   • Push through resistance\n\n\
            4️⃣ **Reward & Rest** ✅\n   • Celebrate completing the sprint! 🎉\n   • Take a 2-3 minute break\n   • Decide if you want another sprint\n\n\
            💡 **Pro Tip**: Even 5 minutes builds momentum!",
        IntentLabel::TaskBreakdown => "📋 **Task Breakdown Method**\n\n\
            1️⃣ **Brain Dump** ✅\n   • Write down EVERYTHING related to the task\n   • Don't worry about order yet\n   • Include even tiny details\n\n\
            2️⃣ **Categorize & Prioritize** ✅\n   • Group similar items together\n   • Mark: Must Do, Should Do, Could Do\n   • Number them 1-2-3 by importance\n\n\
            3️⃣ **Make It Tiny** ✅\n   • Break each step into 15-minute chunks\n   • If it takes longer, break it smaller\n   • Each step should feel manageable\n\n\
            4️⃣ **Start Small** ✅\n   • Pick the easiest #1 priority item\n   • Set timer for 15 minutes\n   • Just focus on that one piece\n\n\
            5️⃣ **Track Progress** ✅\n   • Check off completed items\n   • Celebrate each small win! 🎉\n\n\
            💪 **Remember**: Progress > Perfection!",
        IntentLabel::StressManagement => "🧘 **Stress Relief Technique**\n\n\
            1️⃣ **Immediate Relief (2 minutes)** ✅\n   • Take 5 deep belly breaths\n   • Count: in for 4, hold for 4, out for 6\n   • Let your shoulders drop\n\n\
            2️⃣ **Grounding Exercise** ✅\n   • Name 5 things you can see\n   • Name 4 things you can touch\n   • Name 3 things you can hear\n   • Name 2 things you can smell\n   • Name 1 thing you can taste\n\n\
            3️⃣ **Body Check** ✅\n   • Notice where you feel tension\n   • Gently stretch those areas\n   • Massage your temples/neck\n\n\
            4️⃣ **Positive Self-Talk** ✅\n   • Say: 'This feeling will pass'\n   • 'I am safe right now'\n   • 'I can handle this step by step'\n\n\
            5️⃣ **Next Steps** ✅\n   • Drink some water\n   • Take a short walk if possible\n   • Plan one small next action\n\n\
            🌟 **You've got this!**",
        IntentLabel::GeneralSupport => "💝 **Self-Support Action Plan**\n\n\
            1️⃣ **Acknowledge Your Efforts** ✅\n   • You reached out for help - that's brave!\n   • Recognize you're trying your best\n   • ADHD brains work differently, not wrong\n\n\
            2️⃣ **Ground Yourself** ✅\n   • Take 3 slow, deep breaths\n   • Feel your feet on the ground\n   • Notice you're safe in this moment\n\n\
            3️⃣ **Choose Your Focus** ✅\n   • Pick ONE thing you can control\n   • Make it something small and doable\n   • Ignore everything else for now\n\n\
            4️⃣ **Take Action** ✅\n   • Set a timer for 10 minutes\n   • Work on just that one thing\n   • Give yourself permission to start imperfectly\n\n\
            5️⃣ **Practice Self-Compassion** ✅\n   • Talk to yourself like a good friend\n   • Remember: progress isn't linear\n   • You deserve kindness from yourself\n\n\
            🤗 **You're not alone in this journey!**",
        IntentLabel::MoodCheckin => "🌈 **Emotional Check-In Guide**\n\n\
            1️⃣ **Body Awareness** ✅\n   • Take a deep breath\n   • Scan your body from head to toe\n   • Notice areas of tension or comfort\n\n\
            2️⃣ **Name Your Emotions** ✅\n   • What's the main feeling right now?\n   • Is there a secondary emotion?\n   • Rate intensity 1-10\n\n\
            3️⃣ **Validate Your Experience** ✅\n   • All feelings are valid and temporary\n   • You're allowed to feel however you feel\n   • Emotions give us important information\n\n\
            4️⃣ **Gentle Self-Care** ✅\n   • What does your emotional self need?\n   • Rest? Movement? Connection? Comfort?\n   • Choose one small act of kindness for yourself\n\n\
            5️⃣ **Moving Forward** ✅\n   • Set an intention for the next hour\n   • Remember: you don't have to fix everything\n   • Small steps count\n\n\
            💚 **Your feelings matter and so do you!**",
        IntentLabel::LearningTip => "📚 **ADHD-Friendly Learning Strategy**\n\n\
            1️⃣ **Set Up for Success** ✅\n   • Choose a quiet, organized space\n   • Remove visual distractions\n   • Have water and snacks ready\n\n\
            2️⃣ **Break It Down** ✅\n   • Divide material into 15-20 minute chunks\n   • Use timers for focused study periods\n   • Plan 5-minute breaks between chunks\n\n\
            3️⃣ **Engage Multiple Senses** ✅\n   • Read aloud or use text-to-speech\n   • Use highlighters or colorful notes\n   • Draw diagrams or mind maps\n   • Walk while reviewing\n\n\
            4️⃣ **Active Learning Techniques** ✅\n   • Summarize in your own words\n   • Teach the concept to someone else\n   • Create acronyms or memory tricks\n   • Connect new info to what you know\n\n\
            5️⃣ **Review & Reward** ✅\n   • Review within 24 hours\n   • Celebrate your learning progress! 🎉\n   • Track what methods work best for you\n\n\
            🧠 **Your ADHD brain is creative and capable!**",
        IntentLabel::DistressEscalation => "🆘 **Crisis Support Plan**\n\n\
            1️⃣ **Immediate Safety** ✅\n   • You are not alone\n   • Take slow, deep breaths\n   • Ground yourself: feet on floor, hands on surface\n\n\
            2️⃣ **Reach Out Now** ✅\n   • Call someone you trust\n   • Crisis Text Line: Text HOME to 741741\n   • National Suicide Prevention: 988\n   • Emergency services: 911 if in immediate danger\n\n\
            3️⃣ **Grounding Technique** ✅\n   • Count 5 things you can see\n   • 4 things you can touch\n   • 3 things you can hear\n   • Focus on the present moment\n\n\
            4️⃣ **Professional Help** ✅\n   • Contact your therapist/counselor\n   • Call your doctor\n   • Go to nearest emergency room if needed\n   • Consider crisis intervention services\n\n\
            5️⃣ **Build Your Support** ✅\n   • Create a list of trusted contacts\n   • Identify warning signs for future\n   • Plan coping strategies\n   • Remember: seeking help is strength\n\n\
            💪 **You matter. Your life has value. Help is available.**",
        IntentLabel::Unknown => "🌟 **General Wellness Check**\n\n\
            1️⃣ **Pause & Breathe** ✅\n   • Take a moment to stop what you're doing\n   • Take 3 slow, intentional breaths\n   • Center yourself in this moment\n\n\
            2️⃣ **Check Your Needs** ✅\n   • Are you hungry, thirsty, or tired?\n   • Do you need movement or rest?\n   • What does your body need right now?\n\n\
            3️⃣ **Identify Your Goal** ✅\n   • What would help you most right now?\n   • Focus? Stress relief? Task help? Connection?\n   • Choose ONE thing to focus on\n\n\
            4️⃣ **Take One Small Step** ✅\n   • Pick the smallest possible action\n   • Set a timer if needed\n   • Give yourself permission to start imperfectly\n\n\
            5️⃣ **Practice Self-Compassion** ✅\n   • Remember: you're doing your best\n   • Progress doesn't have to be perfect\n   • You deserve patience and kindness\n\n\
            🤗 **Every small step forward counts!**",
    }
}

/// Short opener plus `(id, text)` pairs for the choices to offer.
fn opener_table(intent: IntentLabel) -> (&'static str, [(&'static str, &'static str); 4]) {
    match intent {
        IntentLabel::FocusSession => (
            "I hear you, trouble focusing is totally normal. What would help you most right now?",
            [
                ("focus_sprint", "Try a 5-minute focus sprint"),
                ("environment", "Set up my environment"),
                ("breathing", "Use a calming technique"),
                ("break_task", "Break task into tiny steps"),
            ],
        ),
        IntentLabel::TaskBreakdown => (
            "Feeling overwhelmed is completely understandable. Let's make this manageable together.",
            [
                ("break_steps", "Break it into smaller steps"),
                ("five_minutes", "Start with just 5 minutes"),
                ("brain_dump", "Write everything down first"),
                ("priority_method", "Use priority method"),
            ],
        ),
        IntentLabel::StressManagement => (
            "I can hear that you're feeling stressed. That's okay, let's find something that helps.",
            [
                ("deep_breathing", "Try deep breathing"),
                ("grounding", "Do a grounding exercise"),
                ("quick_break", "Take a calming break"),
                ("body_scan", "Body tension release"),
            ],
        ),
        IntentLabel::GeneralSupport => (
            "I'm here to support you. What kind of help would be most useful right now?",
            [
                ("focus_help", "Help me focus"),
                ("task_help", "Break down a task"),
                ("stress_help", "Manage stress"),
                ("motivation_help", "Get motivated"),
            ],
        ),
        IntentLabel::MoodCheckin => (
            "Thanks for checking in with yourself. How are you feeling right now?",
            [
                ("feeling_good", "Pretty good today"),
                ("feeling_okay", "Okay, could be better"),
                ("feeling_tough", "Having a tough time"),
                ("feeling_mixed", "Mixed emotions"),
            ],
        ),
        IntentLabel::LearningTip => (
            "Great that you're looking to learn! What area would you like tips for?",
            [
                ("study_tips", "Study techniques"),
                ("time_management", "Time management"),
                ("organization", "Getting organized"),
                ("memory_techniques", "Memory techniques"),
            ],
        ),
        IntentLabel::DistressEscalation => (
            "I hear you, and I want you to know that reaching out takes courage. You deserve support.",
            [
                ("crisis_resources", "Find crisis resources"),
                ("grounding_now", "Grounding technique now"),
                ("professional_help", "Talk to someone professional"),
                ("safety_plan", "Create a safety plan"),
            ],
        ),
        IntentLabel::Unknown => (
            "I'm here to help! What's on your mind today?",
            [
                ("focus_issues", "Having trouble focusing"),
                ("overwhelmed", "Feeling overwhelmed"),
                ("general_support", "Just need someone to talk to"),
                ("daily_struggles", "Daily ADHD struggles"),
            ],
        ),
    }
}

/// Short reply and numbered choices for a first-time request.
pub fn opener(intent: IntentLabel) -> (&'static str, Vec<FollowUpOption>) {
    let (reply, choices) = opener_table(intent);
    let options = choices
        .iter()
        .zip(NUMBER_EMOJI)
        .map(|((id, text), emoji)| FollowUpOption::new(*id, *text, emoji))
        .collect();
    (reply, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_intent_has_numbered_guidance_with_closing_tip() {
        for intent in IntentLabel::all() {
            let text = guidance(*intent);
            assert!(text.contains("1️⃣"), "{intent} guidance should be numbered");
            assert!(text.contains("4️⃣"), "{intent} guidance should have at least 4 steps");
            let closing = text.lines().last().unwrap();
            assert!(closing.contains("**"), "{intent} guidance should end with a tip");
        }
    }

    #[test]
    fn test_every_intent_has_four_numbered_options() {
        for intent in IntentLabel::all() {
            let (reply, options) = opener(*intent);
            assert!(!reply.is_empty());
            assert_eq!(options.len(), 4);
            assert_eq!(options[0].emoji, "1️⃣");
            assert_eq!(options[3].emoji, "4️⃣");
            assert!(options.iter().all(|o| !o.id.is_empty() && !o.text.is_empty()));
        }
    }

    #[test]
    fn test_distress_guidance_lists_crisis_lines() {
        let text = guidance(IntentLabel::DistressEscalation);
        assert!(text.contains("988"));
        assert!(text.contains("741741"));
    }

    #[test]
    fn test_focus_opener_offers_sprint_first() {
        let (_, options) = opener(IntentLabel::FocusSession);
        assert_eq!(options[0].id, "focus_sprint");
    }
}
