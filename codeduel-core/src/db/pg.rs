use async_trait::async_trait;
use sqlx::{
    postgres::PgPoolOptions, query, query_as, query_scalar, types::Json, Error as SqlxError,
    PgPool,
};

use crate::{
    Database, DatabaseError, Difficulty, IntoDatabaseError, MessageData, NewMessage, NewQuestion,
    NewRoom, NewWaitingEntry, PrimaryKey, QuestionData, QuestionExample, Result, RoomData,
    WaitingData,
};

/// A postgres database implementation for codeduel
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self { pool })
    }
}

/// Row shape for `questions`. `examples` is JSONB, so it needs unwrapping
/// before the data type is handed out.
#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: PrimaryKey,
    title: String,
    slug: String,
    difficulty: Difficulty,
    tags: Vec<String>,
    statement: String,
    examples: Json<Vec<QuestionExample>>,
}

impl From<QuestionRow> for QuestionData {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            difficulty: row.difficulty,
            tags: row.tags,
            statement: row.statement,
            examples: row.examples.0,
        }
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn ping(&self) -> Result<()> {
        query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn list_questions(&self) -> Result<Vec<QuestionData>> {
        let rows = query_as::<_, QuestionRow>("SELECT * FROM questions ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn question_by_slug(&self, slug: &str) -> Result<QuestionData> {
        query_as::<_, QuestionRow>("SELECT * FROM questions WHERE slug = $1")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("question", "slug"))
    }

    async fn random_question(&self) -> Result<Option<QuestionData>> {
        query_as::<_, QuestionRow>("SELECT * FROM questions ORDER BY random() LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(|e| e.any())
    }

    async fn count_questions(&self) -> Result<i64> {
        query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_question(&self, new_question: NewQuestion) -> Result<QuestionData> {
        query_as::<_, QuestionRow>(
            "
            INSERT INTO questions (title, slug, difficulty, tags, statement, examples)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(&new_question.title)
        .bind(&new_question.slug)
        .bind(new_question.difficulty)
        .bind(&new_question.tags)
        .bind(&new_question.statement)
        .bind(Json(&new_question.examples))
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.conflict_or("question", "slug", &new_question.slug))
    }

    async fn first_waiting_entry(&self, exclude_name: &str) -> Result<Option<WaitingData>> {
        query_as::<_, WaitingData>(
            "
            SELECT * FROM waiting_entries
            WHERE status = 'waiting' AND name <> $1
            ORDER BY enqueued_at ASC, id ASC
            LIMIT 1",
        )
        .bind(exclude_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn create_waiting_entry(&self, new_entry: NewWaitingEntry) -> Result<WaitingData> {
        query_as::<_, WaitingData>("INSERT INTO waiting_entries (name) VALUES ($1) RETURNING *")
            .bind(&new_entry.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.conflict_or("waiting entry", "name", &new_entry.name))
    }

    async fn claim_waiting_entry(&self, id: PrimaryKey) -> Result<Option<WaitingData>> {
        // A single conditional delete, so at most one claimant gets the row
        query_as::<_, WaitingData>(
            "DELETE FROM waiting_entries WHERE id = $1 AND status = 'waiting' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn room_by_code(&self, code: &str) -> Result<RoomData> {
        query_as::<_, RoomData>("SELECT * FROM rooms WHERE code = $1")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("room", "code"))
    }

    async fn create_room(&self, new_room: NewRoom) -> Result<RoomData> {
        query_as::<_, RoomData>(
            "
            INSERT INTO rooms (code, participants, question_slug)
            VALUES ($1, $2, $3)
            RETURNING *",
        )
        .bind(&new_room.code)
        .bind(new_room.participants.to_vec())
        .bind(&new_room.question_slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.conflict_or("room", "code", &new_room.code))
    }

    async fn update_editor_content(&self, room_id: PrimaryKey, content: &str) -> Result<()> {
        let result = query("UPDATE rooms SET editor_content = $1 WHERE id = $2")
            .bind(content)
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "room",
                identifier: "id",
            });
        }

        Ok(())
    }

    async fn create_message(&self, new_message: NewMessage) -> Result<MessageData> {
        query_as::<_, MessageData>(
            "
            INSERT INTO messages (room_id, sender, content, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
        )
        .bind(new_message.room_id)
        .bind(&new_message.sender)
        .bind(&new_message.content)
        .bind(new_message.kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn messages_by_room(&self, room_id: PrimaryKey, limit: i64) -> Result<Vec<MessageData>> {
        query_as::<_, MessageData>(
            "
            SELECT * FROM messages
            WHERE room_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2",
        )
        .bind(room_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => e.any(),
        }
    }

    fn conflict_or(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> DatabaseError {
        let is_unique_violation = self
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);

        if is_unique_violation {
            DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }
        } else {
            self.any()
        }
    }
}
