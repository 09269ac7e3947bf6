//! Conversations between portal users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esst_auth::{User, UserDirectory};
use esst_core::{ConversationId, DomainError, DomainResult, Entity, MessageId, UserId, entity};

use crate::matches_query;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl Entity for Message {
    type Id = MessageId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A direct (two participants) or group conversation.
///
/// Messages are append-only and kept in send order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub participants: Vec<UserId>,
    pub is_group: bool,
    pub unread_count: u32,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn direct(id: ConversationId, a: UserId, b: UserId) -> Self {
        Self {
            id,
            title: None,
            participants: vec![a, b],
            is_group: false,
            unread_count: 0,
            messages: Vec::new(),
        }
    }

    pub fn group(id: ConversationId, title: impl Into<String>, participants: Vec<UserId>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            participants,
            is_group: true,
            unread_count: 0,
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>, unread_count: u32) -> Self {
        self.messages = messages;
        self.unread_count = unread_count;
        self
    }

    pub fn has_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The other side of a direct conversation.
    pub fn other_participant(&self, viewer: UserId) -> Option<UserId> {
        if self.is_group {
            return None;
        }
        self.participants.iter().copied().find(|id| *id != viewer)
    }

    /// Title shown in the conversation list: the group title, or the other
    /// participant's full name.
    pub fn display_name(&self, viewer: UserId, directory: &impl UserDirectory) -> String {
        if self.is_group {
            return self.title.clone().unwrap_or_default();
        }
        self.other_participant(viewer)
            .and_then(|id| directory.find(id))
            .map(User::full_name)
            .unwrap_or_default()
    }
}

impl Entity for Conversation {
    type Id = ConversationId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// All conversations, scoped per viewer on read.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    conversations: Vec<Conversation>,
}

impl Inbox {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }

    /// Conversations the viewer takes part in, in list order.
    pub fn conversations_for(&self, viewer: UserId) -> impl Iterator<Item = &Conversation> {
        self.conversations
            .iter()
            .filter(move |conv| conv.has_participant(viewer))
    }

    /// Search the viewer's conversations by group title or by the other
    /// participant's name. Empty query returns them all.
    pub fn search(
        &self,
        viewer: UserId,
        query: &str,
        directory: &impl UserDirectory,
    ) -> Vec<&Conversation> {
        self.conversations_for(viewer)
            .filter(|conv| {
                if query.trim().is_empty() {
                    return true;
                }
                let name = conv.display_name(viewer, directory);
                !name.is_empty() && matches_query(&name, query)
            })
            .collect()
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        entity::find(&self.conversations, id)
    }

    /// Open a conversation: reset its unread count and return its messages.
    pub fn open(&mut self, id: ConversationId, viewer: UserId) -> DomainResult<&[Message]> {
        let conv = self.participant_conversation(id, viewer)?;
        conv.unread_count = 0;
        for message in conv.messages.iter_mut().filter(|m| m.sender_id != viewer) {
            message.is_read = true;
        }
        Ok(&conv.messages)
    }

    /// Append a message; it becomes the conversation's last message.
    pub fn send(
        &mut self,
        id: ConversationId,
        sender: UserId,
        content: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<&Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("message content cannot be empty"));
        }

        let conv = self.participant_conversation(id, sender)?;
        conv.messages.push(Message {
            id: MessageId::new(),
            conversation_id: id,
            sender_id: sender,
            content: content.to_string(),
            timestamp: now,
            is_read: false,
            attachments: Vec::new(),
        });
        tracing::debug!(conversation_id = %id, sender_id = %sender, "message sent");

        conv.messages
            .last()
            .ok_or_else(|| DomainError::invariant("message was not appended"))
    }

    /// Unread messages across the viewer's conversations.
    pub fn unread_total(&self, viewer: UserId) -> u32 {
        self.conversations_for(viewer).map(|c| c.unread_count).sum()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn participant_conversation(
        &mut self,
        id: ConversationId,
        user: UserId,
    ) -> DomainResult<&mut Conversation> {
        let conv = entity::find_mut(&mut self.conversations, id)
            .ok_or_else(|| DomainError::not_found(format!("conversation {id}")))?;
        if !conv.has_participant(user) {
            return Err(DomainError::unauthorized("not a participant of this conversation"));
        }
        Ok(conv)
    }
}
