//! `POST /api/chat-simple`: a canned, provider-free twin of `/api/chat`.

use chrono::Utc;
use std::sync::LazyLock;
use regex::Regex;
use sage_core::GatewayError;
use sage_reasoning::api_types::{ChatReply, ChatRequest, Usage};

pub const SIMPLE_MODEL: &str = "simple-chatbot";

static GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:hello|hi|hey)\b").expect("valid regex"));
static MATH_HELP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:math|calculate|solve)\b").expect("valid regex"));

/// Reply to the last message of the request, checked in a fixed order.
pub fn simple_reply(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if lower.contains("2+2") || lower.contains("kitna") || lower.contains("hota") {
        "2 + 2 = 4\n\n**Answer:** 4 (four)\n\nI can help you with more math problems! Just ask me any calculation."
    } else if GREETING.is_match(&lower) {
        "Hello! 👋 How can I help you today? I can assist with math problems, answer questions, and have conversations!"
    } else if lower.contains("how are you") {
        "I'm doing great, thank you for asking! I'm here and ready to help you with anything you need. How are you doing?"
    } else if MATH_HELP.is_match(&lower) {
        "I'd be happy to help with math problems! Please provide the specific calculation or equation you'd like me to solve. For example: \"2+2\", \"5*3\", \"10-4\", etc."
    } else {
        "That's an interesting question! 🤔 I'd love to help you with that. I can provide information about:\n\n• **Math & Problem Solving** 🔢\n• **Science & Technology** 🔬\n• **Programming & Coding** 💻\n• **General Knowledge** 📚\n\nCould you tell me more about what specifically you'd like to know?"
    }
}

pub fn complete_simple(request: &ChatRequest) -> Result<ChatReply, GatewayError> {
    let last = request
        .messages
        .last()
        .ok_or_else(GatewayError::missing_messages)?;
    Ok(ChatReply {
        message: simple_reply(&last.content).to_string(),
        usage: Usage {
            total_tokens: Some(50),
            ..Default::default()
        },
        model: SIMPLE_MODEL.to_string(),
        timestamp: Utc::now(),
    })
}
