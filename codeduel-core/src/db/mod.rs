use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod memory;
pub use memory::*;

mod pg;
pub use pg::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the store
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the store doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn conflict_or(self, resource: &'static str, field: &'static str, value: &str)
        -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Represents a type that can persist and fetch codeduel data.
///
/// Implementors own all shared state. The services layered on top are
/// stateless, so every method must be safe under concurrent callers, and
/// [`Database::claim_waiting_entry`] must be atomic: a given entry is
/// returned to exactly one claimant.
#[async_trait]
pub trait Database: Send + Sync + 'static {
    /// Probes the store, for the health surface
    async fn ping(&self) -> Result<()>;

    async fn list_questions(&self) -> Result<Vec<QuestionData>>;
    async fn question_by_slug(&self, slug: &str) -> Result<QuestionData>;
    /// One question sampled uniformly, or `None` if the catalog is empty
    async fn random_question(&self) -> Result<Option<QuestionData>>;
    async fn count_questions(&self) -> Result<i64>;
    async fn create_question(&self, new_question: NewQuestion) -> Result<QuestionData>;

    /// The oldest entry still waiting whose name differs from `exclude_name`
    async fn first_waiting_entry(&self, exclude_name: &str) -> Result<Option<WaitingData>>;
    async fn create_waiting_entry(&self, new_entry: NewWaitingEntry) -> Result<WaitingData>;
    /// Conditionally deletes the entry. `Some` for exactly one caller per
    /// entry, `None` for everyone who lost the race.
    async fn claim_waiting_entry(&self, id: PrimaryKey) -> Result<Option<WaitingData>>;

    async fn room_by_code(&self, code: &str) -> Result<RoomData>;
    async fn create_room(&self, new_room: NewRoom) -> Result<RoomData>;
    /// Wholesale replacement, last write wins
    async fn update_editor_content(&self, room_id: PrimaryKey, content: &str) -> Result<()>;

    async fn create_message(&self, new_message: NewMessage) -> Result<MessageData>;
    /// Up to `limit` messages ordered by `(created_at, id)` ascending
    async fn messages_by_room(&self, room_id: PrimaryKey, limit: i64) -> Result<Vec<MessageData>>;
}

#[derive(Debug)]
pub struct NewQuestion {
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub statement: String,
    pub examples: Vec<QuestionExample>,
}

#[derive(Debug)]
pub struct NewRoom {
    pub code: String,
    /// Display names, waiting user first
    pub participants: [String; 2],
    pub question_slug: Option<String>,
}

#[derive(Debug)]
pub struct NewMessage {
    pub room_id: PrimaryKey,
    pub sender: String,
    pub content: String,
    pub kind: MessageKind,
}

#[derive(Debug)]
pub struct NewWaitingEntry {
    pub name: String,
}
