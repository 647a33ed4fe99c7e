//! Wire schemas shared by the HTTP handlers and the room event stream.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn new_id() -> String { uuid::Uuid::new_v4().to_string() }

/* ------------ messages -------------- */

/// One chat line. Immutable once created; ordering is append order in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id:        String,
    pub room_id:   Option<String>,
    pub sender:    String,
    pub text:      String,
    pub embedding: Option<Vec<f64>>,
    #[serde(alias = "nomiId")]
    pub agent_id:  Option<String>,
}

impl Message {
    pub fn new(room_id: Option<String>, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            room_id,
            sender: sender.into(),
            text: text.into(),
            embedding: None,
            agent_id: None,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn from_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}

/// Envelope pushed to room subscribers.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum RoomEvent<'a> {
    #[serde(rename = "history")]
    History(&'a Message),
    #[serde(rename = "message")]
    Live(&'a Message),
}

impl RoomEvent<'_> {
    pub fn encode(&self) -> serde_json::Result<String> { serde_json::to_string(self) }
}

/* ------------ rooms -------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id:   String,
    pub name: String,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self { Self { id: new_id(), name: name.into() } }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoom {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    pub message_text: String,
    pub sender:       Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub delivered: usize,
    pub message:   Message,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomMessagesResponse {
    pub messages: Vec<Message>,
}

/* ------------ nomis -------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nomi {
    pub id:      String,
    pub name:    String,
    #[serde(default)]
    pub persona: HashMap<String, String>,
}

impl Nomi {
    pub fn new(name: impl Into<String>, persona: HashMap<String, String>) -> Self {
        Self { id: new_id(), name: name.into(), persona }
    }

    /// Stand-in reply: the nomi repeats what it was told.
    pub fn reply_to(&self, text: &str) -> String { format!("{} echoes: {text}", self.name) }

    pub fn sender_label(&self) -> String { format!("nomi:{}", self.name) }
}

#[derive(Debug, Deserialize)]
pub struct CreateNomi {
    pub name:    String,
    #[serde(default)]
    pub persona: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNomi {
    pub name:    Option<String>,
    pub persona: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub message_text: String,
    pub room_id:      Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: Message,
}

/* ------------ embeddings -------------- */

#[derive(Debug, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f64>,
}
