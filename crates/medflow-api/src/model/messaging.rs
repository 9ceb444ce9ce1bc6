use jiff::Timestamp;
use medflow_core::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Someone taking part in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "user_type", default)]
    pub role: Role,
}

/// Preview of the latest message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessage {
    pub id: i64,
    #[serde(default)]
    pub sender_name: Option<String>,
    /// First hundred characters of the message.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// A message thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub clinic: Option<i64>,
    #[serde(default)]
    pub participants: Vec<i64>,
    #[serde(default)]
    pub participants_data: Vec<Participant>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for opening a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewConversation {
    pub clinic: i64,
    pub subject: String,
    pub participants: Vec<i64>,
}

/// Filters for listing conversations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    pub clinic: Option<i64>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ConversationFilter {
    /// Returns the query string pairs for the set filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(clinic) = self.clinic {
            query.push(("clinic", clinic.to_string()));
        }
        if let Some(ref search) = self.search {
            query.push(("search", search.clone()));
        }
        if let Some(ref ordering) = self.ordering {
            query.push(("ordering", ordering.clone()));
        }
        query
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation: i64,
    #[serde(default)]
    pub sender: Option<i64>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for posting a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub conversation: i64,
    pub content: String,
}
