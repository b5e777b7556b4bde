//! Remote API gateway: authenticated HTTP access to the document-chat
//! service.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiErrorKind};
pub use types::{Conversation, ConversationDetail, Document, Message};
