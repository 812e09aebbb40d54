use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::responder::{self, BotReply, Stat, StudentRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<StudentRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<Stat>>,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            text: text.into(),
            table: None,
            stats: None,
            sent_at: Utc::now(),
        }
    }

    pub fn bot(reply: BotReply) -> Self {
        Message {
            role: Role::Bot,
            text: reply.text,
            table: reply.table,
            stats: reply.stats,
            sent_at: Utc::now(),
        }
    }

    fn bot_text(text: &str) -> Self {
        Message {
            role: Role::Bot,
            text: text.to_string(),
            table: None,
            stats: None,
            sent_at: Utc::now(),
        }
    }
}

/// Append-only chat history for one session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Conversation::default()
    }

    /// Opens with the greeting and one worked example so the panel is never empty.
    pub fn seeded() -> Self {
        let mut conversation = Conversation::new();
        conversation.push(Message::bot_text(responder::GREETING));
        conversation.push(Message::user("Which subject had the highest failure rate?"));
        let mut answer = Message::bot_text(
            "Discrete Mathematics (MA301) recorded the highest failure rate at 32%, indicating higher difficulty compared to other subjects.",
        );
        answer.stats = Some(responder::stats(&[
            ("Failure Rate", "32%"),
            ("Subject Code", "MA301"),
            ("Total Students", "156"),
        ]));
        conversation.push(answer);
        conversation
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
