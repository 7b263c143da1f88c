use std::collections::HashSet;

use crate::errors::StoreError;
use crate::models::{Message, MessageRole};

/// The visible transcript: append-only, in insertion order, ids unique.
///
/// The last element of [`snapshot`](Self::snapshot) is always the most
/// recently appended message, which is what "scroll to latest" relies on.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
    ids: HashSet<String>,
}

impl ConversationStore {
    /// Creates the store holding only the assistant's welcome message.
    pub fn seed(greeting: Message) -> Self {
        debug_assert_eq!(
            greeting.role,
            MessageRole::Assistant,
            "greeting must come from the assistant"
        );
        let mut ids = HashSet::new();
        ids.insert(greeting.id.clone());
        Self { messages: vec![greeting], ids }
    }

    pub fn append(&mut self, message: Message) -> Result<(), StoreError> {
        if !self.ids.insert(message.id.clone()) {
            return Err(StoreError::DuplicateMessageId { id: message.id });
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
