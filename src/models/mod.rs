use serde::{Deserialize, Serialize};

/// Server-assigned note identifier.
pub(crate) type NoteId = i64;

/// A note as returned by the notes backend.
///
/// Timestamps are kept as the server sends them; they are only parsed for display.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NoteInput {
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub username: String,
}
