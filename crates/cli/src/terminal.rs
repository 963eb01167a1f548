//! Terminal rendering of agent UI events.

use mnemos_core::event::{UiEvent, UiEventKind, UiSink};
use std::io::Write;

/// Prints agent events as they happen.
///
/// Bot messages go to stdout. Inner monologue and function calls are shown
/// only when asked for. Notices go to stderr.
pub struct TerminalSink {
    bot_name: String,
    show_inner: bool,
}

impl TerminalSink {
    pub fn new(bot_name: impl Into<String>, show_inner: bool) -> Self {
        Self {
            bot_name: bot_name.into(),
            show_inner,
        }
    }

    /// The line to print for an event, if any, and whether it is a notice.
    fn render(&self, event: &UiEvent) -> Option<(String, bool)> {
        match event.kind {
            // The user just typed it
            UiEventKind::UserMessage => None,
            UiEventKind::BotMessage => Some((
                indent(&format!("{} > ", self.bot_name), &event.text),
                false,
            )),
            UiEventKind::BotThought if self.show_inner => {
                Some((indent("  (thinking) ", &event.text), false))
            }
            UiEventKind::BotFunction if self.show_inner => {
                Some((format!("  [fn] {}", event.text), false))
            }
            UiEventKind::Notice => Some((format!("  [!] {}", event.text), true)),
            UiEventKind::BotThought | UiEventKind::BotFunction => None,
        }
    }
}

/// Prefix the first line with `prefix` and align the rest under it.
fn indent(prefix: &str, text: &str) -> String {
    let pad = " ".repeat(prefix.chars().count() + 2);
    let mut lines = text.lines();
    let mut out = format!("  {prefix}{}", lines.next().unwrap_or_default());
    for line in lines {
        out.push('\n');
        out.push_str(&pad);
        out.push_str(line);
    }
    out
}

impl UiSink for TerminalSink {
    fn emit(&self, event: UiEvent) {
        let Some((line, notice)) = self.render(&event) else {
            return;
        };
        if notice {
            eprintln!("{line}");
        } else {
            println!("{line}");
            let _ = std::io::stdout().flush();
        }
    }
}
