use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::{
    Database, DatabaseError, MessageData, NewMessage, NewQuestion, NewRoom, NewWaitingEntry,
    PrimaryKey, QuestionData, Result, RoomData, WaitingData, WaitingStatus,
};

/// An in-memory database, used by tests and for running the server without a
/// postgres instance.
///
/// Timestamps come from a logical clock (one second per write, starting at
/// the epoch), which keeps ordering deterministic.
#[derive(Default)]
pub struct MemoryDatabase {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    questions: Vec<QuestionData>,
    rooms: Vec<RoomData>,
    messages: Vec<MessageData>,
    waiting: Vec<WaitingData>,

    next_id: PrimaryKey,
    ticks: i64,
}

impl State {
    fn next_id(&mut self) -> PrimaryKey {
        self.next_id += 1;
        self.next_id
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(self.ticks)
    }
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently in the waiting queue, oldest first
    pub fn waiting_names(&self) -> Vec<String> {
        let state = self.state.lock();

        let mut entries: Vec<_> = state
            .waiting
            .iter()
            .filter(|w| w.status == WaitingStatus::Waiting)
            .collect();

        entries.sort_by_key(|w| (w.enqueued_at, w.id));
        entries.into_iter().map(|w| w.name.clone()).collect()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<QuestionData>> {
        let mut questions = self.state.lock().questions.clone();
        questions.sort_by(|a, b| a.title.cmp(&b.title));

        Ok(questions)
    }

    async fn question_by_slug(&self, slug: &str) -> Result<QuestionData> {
        self.state
            .lock()
            .questions
            .iter()
            .find(|q| q.slug == slug)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "question",
                identifier: "slug",
            })
    }

    async fn random_question(&self) -> Result<Option<QuestionData>> {
        let state = self.state.lock();

        Ok(state.questions.choose(&mut thread_rng()).cloned())
    }

    async fn count_questions(&self) -> Result<i64> {
        Ok(self.state.lock().questions.len() as i64)
    }

    async fn create_question(&self, new_question: NewQuestion) -> Result<QuestionData> {
        let mut state = self.state.lock();

        if state.questions.iter().any(|q| q.slug == new_question.slug) {
            return Err(DatabaseError::Conflict {
                resource: "question",
                field: "slug",
                value: new_question.slug,
            });
        }

        let question = QuestionData {
            id: state.next_id(),
            title: new_question.title,
            slug: new_question.slug,
            difficulty: new_question.difficulty,
            tags: new_question.tags,
            statement: new_question.statement,
            examples: new_question.examples,
        };

        state.questions.push(question.clone());

        Ok(question)
    }

    async fn first_waiting_entry(&self, exclude_name: &str) -> Result<Option<WaitingData>> {
        let state = self.state.lock();

        let entry = state
            .waiting
            .iter()
            .filter(|w| w.status == WaitingStatus::Waiting && w.name != exclude_name)
            .min_by_key(|w| (w.enqueued_at, w.id))
            .cloned();

        Ok(entry)
    }

    async fn create_waiting_entry(&self, new_entry: NewWaitingEntry) -> Result<WaitingData> {
        let mut state = self.state.lock();

        let already_waiting = state
            .waiting
            .iter()
            .any(|w| w.status == WaitingStatus::Waiting && w.name == new_entry.name);

        if already_waiting {
            return Err(DatabaseError::Conflict {
                resource: "waiting entry",
                field: "name",
                value: new_entry.name,
            });
        }

        let entry = WaitingData {
            id: state.next_id(),
            name: new_entry.name,
            status: WaitingStatus::Waiting,
            enqueued_at: state.tick(),
        };

        state.waiting.push(entry.clone());

        Ok(entry)
    }

    async fn claim_waiting_entry(&self, id: PrimaryKey) -> Result<Option<WaitingData>> {
        let mut state = self.state.lock();

        // Find and remove under one lock, so only one claimant wins
        let index = state
            .waiting
            .iter()
            .position(|w| w.id == id && w.status == WaitingStatus::Waiting);

        Ok(index.map(|i| state.waiting.remove(i)))
    }

    async fn room_by_code(&self, code: &str) -> Result<RoomData> {
        self.state
            .lock()
            .rooms
            .iter()
            .find(|r| r.code == code)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "room",
                identifier: "code",
            })
    }

    async fn create_room(&self, new_room: NewRoom) -> Result<RoomData> {
        let mut state = self.state.lock();

        if state.rooms.iter().any(|r| r.code == new_room.code) {
            return Err(DatabaseError::Conflict {
                resource: "room",
                field: "code",
                value: new_room.code,
            });
        }

        let room = RoomData {
            id: state.next_id(),
            code: new_room.code,
            participants: new_room.participants.to_vec(),
            question_slug: new_room.question_slug,
            editor_content: String::new(),
            created_at: state.tick(),
        };

        state.rooms.push(room.clone());

        Ok(room)
    }

    async fn update_editor_content(&self, room_id: PrimaryKey, content: &str) -> Result<()> {
        let mut state = self.state.lock();

        let room = state
            .rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or(DatabaseError::NotFound {
                resource: "room",
                identifier: "id",
            })?;

        room.editor_content = content.to_string();

        Ok(())
    }

    async fn create_message(&self, new_message: NewMessage) -> Result<MessageData> {
        let mut state = self.state.lock();

        // Mirrors the foreign key constraint of the postgres schema
        if !state.rooms.iter().any(|r| r.id == new_message.room_id) {
            return Err(DatabaseError::NotFound {
                resource: "room",
                identifier: "id",
            });
        }

        let message = MessageData {
            id: state.next_id(),
            room_id: new_message.room_id,
            sender: new_message.sender,
            content: new_message.content,
            kind: new_message.kind,
            created_at: state.tick(),
        };

        state.messages.push(message.clone());

        Ok(message)
    }

    async fn messages_by_room(&self, room_id: PrimaryKey, limit: i64) -> Result<Vec<MessageData>> {
        let state = self.state.lock();

        let mut messages: Vec<_> = state
            .messages
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();

        messages.sort_by_key(|m| (m.created_at, m.id));
        messages.truncate(limit.max(0) as usize);

        Ok(messages)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MessageKind;

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let db = MemoryDatabase::new();

        let entry = db
            .create_waiting_entry(NewWaitingEntry {
                name: "Alice".to_string(),
            })
            .await
            .expect("entry is created");

        let first = db.claim_waiting_entry(entry.id).await.expect("claim works");
        let second = db.claim_waiting_entry(entry.id).await.expect("claim works");

        assert!(first.is_some(), "first claim should win the entry");
        assert!(second.is_none(), "second claim should lose the race");
    }

    #[tokio::test]
    async fn test_message_requires_room() {
        let db = MemoryDatabase::new();

        let result = db
            .create_message(NewMessage {
                room_id: 42,
                sender: "Alice".to_string(),
                content: "hello?".to_string(),
                kind: MessageKind::Chat,
            })
            .await;

        assert!(
            matches!(result, Err(DatabaseError::NotFound { .. })),
            "messages must reference an existing room"
        );
    }

    #[tokio::test]
    async fn test_waiting_entry_name_is_unique() {
        let db = MemoryDatabase::new();

        db.create_waiting_entry(NewWaitingEntry {
            name: "Alice".to_string(),
        })
        .await
        .expect("entry is created");

        let duplicate = db
            .create_waiting_entry(NewWaitingEntry {
                name: "Alice".to_string(),
            })
            .await;

        assert!(
            matches!(duplicate, Err(DatabaseError::Conflict { .. })),
            "a name can only wait once"
        );
    }
}
