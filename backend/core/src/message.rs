use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single line in the interview transcript.
///
/// Messages are immutable once created: fields are private and only exposed
/// through read accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    text: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current instant.
    /// Returns `None` when `text` is empty or whitespace only.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        Self::at(text, Utc::now())
    }

    pub fn at(text: impl Into<String>, timestamp: DateTime<Utc>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            text,
            timestamp,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Append-only, ordered log of messages. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append `text` as a new message. Blank text is dropped and `false` returned.
    pub fn append_text(&mut self, text: impl Into<String>) -> bool {
        match Message::new(text) {
            Some(message) => {
                self.push(message);
                true
            }
            None => false,
        }
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

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message_rejected() {
        assert!(Message::new("").is_none());
        assert!(Message::new("   \n\t").is_none());
        assert!(Message::new("hi").is_some());
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Message::new("a").unwrap();
        let b = Message::new("a").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::new();
        for text in ["first", "second", "third"] {
            assert!(transcript.append_text(text));
        }
        assert!(!transcript.append_text("  "));

        let texts: Vec<&str> = transcript.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(transcript.last().unwrap().text(), "third");
    }

    #[test]
    fn test_message_keeps_text_verbatim() {
        let msg = Message::new("  padded answer ").unwrap();
        assert_eq!(msg.text(), "  padded answer ");
    }
}
