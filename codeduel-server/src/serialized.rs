//! All schemas that are exposed from endpoints are defined here
//! along with the ToSerialized impls

use chrono::{DateTime, Utc};
use codeduel_core::{JoinOutcome, MessageData, QuestionData, ResolvedRoom, SeedSummary};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Question {
    title: String,
    slug: String,
    difficulty: String,
    tags: Vec<String>,
    statement: String,
    examples: Vec<QuestionExample>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionExample {
    input: String,
    output: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Room {
    room_id: String,
    participants: Vec<String>,
    question: Option<Question>,
    editor_content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    sender: String,
    content: String,
    #[serde(rename = "type")]
    kind: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JoinResult {
    Waiting,
    Paired { room_id: String },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedResult {
    seeded: bool,
    count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Ack {
    ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Question> for QuestionData {
    fn to_serialized(&self) -> Question {
        Question {
            title: self.title.clone(),
            slug: self.slug.clone(),
            difficulty: self.difficulty.to_string(),
            tags: self.tags.clone(),
            statement: self.statement.clone(),
            examples: self
                .examples
                .iter()
                .map(|e| QuestionExample {
                    input: e.input.clone(),
                    output: e.output.clone(),
                })
                .collect(),
        }
    }
}

impl ToSerialized<Room> for ResolvedRoom {
    fn to_serialized(&self) -> Room {
        Room {
            room_id: self.room.code.clone(),
            participants: self.room.participants.clone(),
            question: self.question.as_ref().map(|q| q.to_serialized()),
            editor_content: self.room.editor_content.clone(),
            created_at: self.room.created_at,
        }
    }
}

impl ToSerialized<Message> for MessageData {
    fn to_serialized(&self) -> Message {
        Message {
            sender: self.sender.clone(),
            content: self.content.clone(),
            kind: self.kind.to_string(),
            created_at: self.created_at,
        }
    }
}

impl ToSerialized<JoinResult> for JoinOutcome {
    fn to_serialized(&self) -> JoinResult {
        match self {
            JoinOutcome::Waiting => JoinResult::Waiting,
            JoinOutcome::Paired { room } => JoinResult::Paired {
                room_id: room.code.clone(),
            },
        }
    }
}

impl ToSerialized<SeedResult> for SeedSummary {
    fn to_serialized(&self) -> SeedResult {
        SeedResult {
            seeded: self.seeded,
            count: self.count,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_results_tag_their_status() {
        let waiting = serde_json::to_value(JoinResult::Waiting).expect("serializes");
        assert_eq!(waiting, json!({ "status": "waiting" }));

        let paired = serde_json::to_value(JoinResult::Paired {
            room_id: "AB12CD".to_string(),
        })
        .expect("serializes");
        assert_eq!(paired, json!({ "status": "paired", "room_id": "AB12CD" }));
    }

    #[test]
    fn test_messages_expose_their_kind_as_type() {
        let message = Message {
            sender: "system".to_string(),
            content: "Match found!".to_string(),
            kind: "system".to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };

        let value = serde_json::to_value(message).expect("serializes");
        assert_eq!(value["type"], "system");
        assert_eq!(value["sender"], "system");
    }
}
