use std::sync::Arc;

use crate::{Database, DatabaseError, MessageData, MessageKind, NewMessage, QuestionData, RoomData};

/// Read and mutate rooms created by the matchmaker.
///
/// Rooms only ever move forward: once created they stay active, and the only
/// mutations are message appends and editor replacement.
pub struct Rooms<Db> {
    db: Arc<Db>,
}

/// A room with its question resolved against the catalog at read time
#[derive(Debug)]
pub struct ResolvedRoom {
    pub room: RoomData,
    pub question: Option<QuestionData>,
}

impl<Db> Rooms<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Fetches a room by its shareable code, with the assigned question
    /// embedded
    pub async fn room_by_code(&self, code: &str) -> Result<ResolvedRoom, DatabaseError> {
        let room = self.db.room_by_code(code).await?;

        let question = match &room.question_slug {
            Some(slug) => match self.db.question_by_slug(slug).await {
                Ok(question) => Some(question),
                // A slug with no catalog entry behind it reads as no question
                Err(DatabaseError::NotFound { .. }) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        Ok(ResolvedRoom { room, question })
    }

    /// Appends a chat message to the room
    pub async fn send_message(
        &self,
        code: &str,
        sender: &str,
        content: &str,
    ) -> Result<MessageData, DatabaseError> {
        let room = self.db.room_by_code(code).await?;

        self.db
            .create_message(NewMessage {
                room_id: room.id,
                sender: sender.to_string(),
                content: content.to_string(),
                kind: MessageKind::Chat,
            })
            .await
    }

    /// Up to `limit` of the room's messages, oldest first
    pub async fn list_messages(
        &self,
        code: &str,
        limit: i64,
    ) -> Result<Vec<MessageData>, DatabaseError> {
        let room = self.db.room_by_code(code).await?;

        self.db.messages_by_room(room.id, limit).await
    }

    /// Replaces the shared editor content. Last write wins, concurrent
    /// writers clobber each other.
    pub async fn update_editor(&self, code: &str, content: &str) -> Result<(), DatabaseError> {
        let room = self.db.room_by_code(code).await?;

        self.db.update_editor_content(room.id, content).await
    }
}
