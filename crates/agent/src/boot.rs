//! Envelopes the agent wraps around user-role input, and the boot sequence
//! a fresh conversation starts from.

use mnemos_core::message::{FunctionCall, Message};
use mnemos_core::tool::ToolResult;
use mnemos_tools::SEND_MESSAGE;
use serde_json::json;

const BOOT_THOUGHT: &str =
    "Bootup sequence complete. Persona activated. Testing messaging functionality.";
const BOOT_GREETING: &str = "More human than human is our motto.";

/// `{"type":"user_message","message":...}`
pub fn user_message(text: &str) -> String {
    json!({ "type": "user_message", "message": text }).to_string()
}

/// The reminder sent after the model answered without addressing the user.
pub fn send_message_reminder() -> String {
    json!({
        "type": "system_alert",
        "message": "Your last response was not shown to the user. You must call send_message to reply to the user before answering.",
    })
    .to_string()
}

/// The three messages a fresh history is seeded with: a greeting sent
/// through `send_message`, its result, and the first login notice.
pub fn boot_sequence() -> Vec<Message> {
    let greeting = json!({ "message": BOOT_GREETING }).to_string();
    vec![
        Message::function_call(FunctionCall::new(SEND_MESSAGE, greeting), BOOT_THOUGHT),
        Message::function_result(SEND_MESSAGE, ToolResult::ok("").envelope()),
        Message::user(
            json!({ "type": "login", "last_login": "Never (first login)" }).to_string(),
        ),
    ]
}
