//! Domain and wire types for the document-chat API
//!
//! The remote service uses lowercase wire names (`userid`,
//! `conversationid`, `created`); the client renames them to its own field
//! names via serde. Messages travel in a nested `{ type, data }` envelope
//! and are flattened into [`Message`] on the way in.

use serde::{Deserialize, Deserializer, Serialize};

/// A conversation summary: identifies a thread without its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "userid", default)]
    pub owner_id: String,
    #[serde(rename = "conversationid")]
    pub conversation_id: String,
    /// ISO 8601 creation timestamp, kept opaque. The create endpoint may
    /// omit it; the list endpoint always carries it.
    #[serde(rename = "created", default)]
    pub created_at: String,
}

/// A conversation with its full message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetail {
    #[serde(rename = "userid", default)]
    pub owner_id: String,
    #[serde(rename = "conversationid")]
    pub conversation_id: String,
    #[serde(rename = "created", default)]
    pub created_at: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// A single conversation message.
///
/// `is_example` distinguishes synthetic entries from persisted ones. An
/// optimistic preview is appended locally with kind `"text"` and replaced
/// wholesale by the server's sequence on the next detail refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireMessage", into = "WireMessage")]
pub struct Message {
    pub kind: String,
    pub content: String,
    pub is_example: bool,
}

impl Message {
    /// The locally appended optimistic preview of a submitted prompt.
    pub fn preview(content: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            content: content.into(),
            is_example: false,
        }
    }
}

/// Wire envelope for messages: `{ "type": ..., "data": { ... } }`.
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: String,
    data: WireMessageData,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessageData {
    #[serde(default)]
    content: String,
    #[serde(default)]
    example: bool,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self {
            kind: wire.kind,
            content: wire.data.content,
            is_example: wire.data.example,
        }
    }
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        Self {
            kind: message.kind,
            data: WireMessageData {
                content: message.content,
                example: message.is_example,
            },
        }
    }
}

/// An uploaded document, read-only to this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "documentid")]
    pub document_id: String,
    #[serde(rename = "userid", default)]
    pub owner_id: String,
    pub filename: String,
    /// The service serializes sizes and page counts as strings.
    #[serde(rename = "filesize", deserialize_with = "lenient_u64", default)]
    pub size_bytes: u64,
    #[serde(rename = "created", default)]
    pub created_at: String,
    #[serde(rename = "pages", deserialize_with = "lenient_u64", default)]
    pub page_count: u64,
}

/// Response envelope for the conversation detail endpoint
#[derive(Debug, Deserialize)]
pub struct ConversationEnvelope {
    pub conversation: ConversationDetail,
}

/// Request body for posting a message
#[derive(Debug, Serialize)]
pub struct PostMessageRequest<'a> {
    pub prompt: &'a str,
}

/// Accept `"42"`, `42`, or garbage (as 0) for numeric document fields.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0),
    })
}
