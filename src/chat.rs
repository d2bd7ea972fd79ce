use serde::{Deserialize, Serialize};

/// First message shown when the demo chat opens
pub const GREETING: &str = "👋 Hi! How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Demo chat used to try the bot before installing it. The bot echoes the user.
#[derive(Debug, Clone)]
pub struct DemoChat {
    messages: Vec<ChatMessage>,
    open: bool,
}

impl Default for DemoChat {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoChat {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
            open: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Append the user's message and the bot's echo. Blank input is ignored.
    pub fn send(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }
        for role in [Role::User, Role::Assistant] {
            self.messages.push(ChatMessage {
                role,
                content: input.to_string(),
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_greeting() {
        let chat = DemoChat::new();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::Assistant);
        assert_eq!(chat.messages()[0].content, GREETING);
        assert!(!chat.is_open());
    }

    #[test]
    fn test_echo() {
        let mut chat = DemoChat::new();
        assert!(chat.send("  What do you sell? "));
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[1].content, "  What do you sell? ");
        assert_eq!(messages[2].content, messages[1].content);
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut chat = DemoChat::new();
        assert!(!chat.send(""));
        assert!(!chat.send(" \t\n"));
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_dialog_toggle_keeps_history() {
        let mut chat = DemoChat::new();
        chat.open();
        assert!(chat.is_open());
        chat.send("hello");
        chat.close();
        assert!(!chat.is_open());
        assert_eq!(chat.messages().len(), 3);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatMessage {
            role: Role::User,
            content: "hi".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
