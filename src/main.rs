//! ADHD Companion - terminal chat client
//!
//! Reads configuration from `ADHD_COMPANION__*` environment variables (or a
//! `.env` file) and chats over stdin. Typing the number of an offered option
//! picks it. `--demo` plays a short scripted conversation instead.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use adhd_companion::adapters::ai::ChatCompletionsGateway;
use adhd_companion::application::RespondHandler;
use adhd_companion::config::{AppConfig, ValidationError};
use adhd_companion::domain::chatbot::{ChatTurn, ChatbotResponse, ConversationContext, FollowUpOption};

const WELCOME: &str = "Hi! I'm your ADHD companion. What's on your mind today?";

/// Scripted turns for `--demo`; `None` picks the first offered option.
const DEMO_SCRIPT: &[Option<&str>] = &[
    Some("I can't focus on my work today"),
    None,
    Some("I'm feeling really stressed about my deadline"),
    Some("Can you give me a tip for remembering appointments?"),
];

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.logging.init_tracing();
    config.validate()?;

    let gateway_config = config
        .completion
        .gateway_config()
        .ok_or(ValidationError::MissingRequired("ADHD_COMPANION__COMPLETION__API_KEY"))?;
    let gateway = Arc::new(ChatCompletionsGateway::new(gateway_config)?);
    let handler = RespondHandler::new(gateway);

    tracing::info!(
        model = %config.completion.model,
        endpoint = %config.completion.base_url,
        "ADHD companion ready"
    );

    if std::env::args().skip(1).any(|arg| arg == "--demo") {
        run_demo(&handler).await;
        return Ok(());
    }

    run_interactive(&handler).await
}

fn new_conversation() -> ConversationContext {
    ConversationContext::new().with_turn(ChatTurn::welcome(WELCOME))
}

async fn run_interactive(handler: &RespondHandler<ChatCompletionsGateway>) -> Result<(), BoxError> {
    let mut context = new_conversation();
    let mut offered: Vec<FollowUpOption> = Vec::new();

    println!("🤖 {}", WELCOME);
    println!("(type 'quit' to leave)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let user_text = pick_option(line, &offered)
            .map(FollowUpOption::selection_message)
            .unwrap_or_else(|| line.to_string());

        let response = handler.respond(&user_text, &context).await;
        print_response(&response);

        context.record_exchange(user_text, response.reply.clone(), response.intent);
        offered = response.follow_up_options.unwrap_or_default();
    }

    Ok(())
}

async fn run_demo(handler: &RespondHandler<ChatCompletionsGateway>) {
    let mut context = new_conversation();
    let mut offered: Vec<FollowUpOption> = Vec::new();

    println!("🤖 {}\n", WELCOME);

    for step in DEMO_SCRIPT {
        let user_text = match step {
            Some(text) => text.to_string(),
            None => match offered.first() {
                Some(option) => option.selection_message(),
                None => continue,
            },
        };

        println!("🙂 {}", user_text);
        let response = handler.respond(&user_text, &context).await;
        print_response(&response);

        context.record_exchange(user_text, response.reply.clone(), response.intent);
        offered = response.follow_up_options.unwrap_or_default();
    }
}

/// Maps "2" to the second offered option.
fn pick_option<'a>(input: &str, offered: &'a [FollowUpOption]) -> Option<&'a FollowUpOption> {
    let index: usize = input.parse().ok()?;
    offered.get(index.checked_sub(1)?)
}

fn print_response(response: &ChatbotResponse) {
    println!(
        "🤖 {}  [{} {:.0}%]",
        response.reply,
        response.intent,
        response.confidence * 100.0
    );
    if let Some(options) = &response.follow_up_options {
        for (i, option) in options.iter().enumerate() {
            let emoji = if option.emoji.is_empty() { "•" } else { option.emoji.as_str() };
            println!("   {} {} ({})", emoji, option.text, i + 1);
        }
    }
    println!();
}
