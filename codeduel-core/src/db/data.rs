use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A problem from the question catalog
#[derive(Debug, Clone)]
pub struct QuestionData {
    pub id: PrimaryKey,
    pub title: String,
    /// URL-safe identifier, unique within the catalog
    pub slug: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    /// Full problem statement (markdown)
    pub statement: String,
    pub examples: Vec<QuestionExample>,
}

/// An input/output pair illustrating a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionExample {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "difficulty")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// An active pairing session between two participants
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomData {
    pub id: PrimaryKey,
    /// The shareable code identifying the room externally
    pub code: String,
    /// Display names, waiting user first
    pub participants: Vec<String>,
    /// The assigned problem, if the catalog had any content at pairing time
    pub question_slug: Option<String>,
    pub editor_content: String,
    pub created_at: DateTime<Utc>,
}

/// A chat or system event scoped to a room
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageData {
    pub id: PrimaryKey,
    pub room_id: PrimaryKey,
    /// A display name, or the literal `system` for pairing notifications
    pub sender: String,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "message_kind", rename_all = "lowercase")]
pub enum MessageKind {
    Chat,
    System,
}

/// A user queued for pairing.
/// Entries are deleted when consumed, never flipped to `Paired` in place.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaitingData {
    pub id: PrimaryKey,
    pub name: String,
    pub status: WaitingStatus,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "waiting_status", rename_all = "lowercase")]
pub enum WaitingStatus {
    Waiting,
    Paired,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };

        f.write_str(result)
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Self::Chat => "chat",
            Self::System => "system",
        };

        f.write_str(result)
    }
}
