use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::{
    util::random_room_code, Database, DatabaseError, MessageKind, NewMessage, NewRoom,
    NewWaitingEntry, RoomData,
};

/// How many lost claim races are retried before the caller is enqueued
/// instead.
const MAX_CLAIM_ATTEMPTS: usize = 3;
/// How many room codes are generated before a collision is given up on.
const MAX_CODE_ATTEMPTS: usize = 4;
/// Length of the shareable room code.
const ROOM_CODE_LENGTH: usize = 6;

/// Sender name used for automated room notifications.
pub const SYSTEM_SENDER: &str = "system";
/// First message of every room.
pub const PAIRED_NOTIFICATION: &str = "Match found!";

/// Pairs joining users with whoever has been waiting the longest.
///
/// The matchmaker itself holds no state. Everything it decides on lives in
/// the database, so any number of instances can serve joins concurrently.
pub struct Matchmaker<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum MatchmakingError {
    /// The display name was empty after trimming
    #[error("Name is required")]
    EmptyName,
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
}

/// The result of a join: queued, or matched into a fresh room.
#[derive(Debug)]
pub enum JoinOutcome {
    Waiting,
    Paired { room: RoomData },
}

impl<Db> Matchmaker<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Pairs the named user with the oldest waiting user, or queues them if
    /// nobody is waiting.
    ///
    /// Two joins racing for the same waiting entry are resolved by the
    /// store's conditional delete: the loser re-reads the queue, and falls
    /// back to waiting once the attempts run out. A waiting entry is
    /// consumed by exactly one pairing.
    pub async fn join(&self, name: &str) -> Result<JoinOutcome, MatchmakingError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(MatchmakingError::EmptyName);
        }

        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let candidate = self
                .db
                .first_waiting_entry(name)
                .await
                .map_err(MatchmakingError::Db)?;

            let Some(candidate) = candidate else { break };

            let claimed = self
                .db
                .claim_waiting_entry(candidate.id)
                .await
                .map_err(MatchmakingError::Db)?;

            if let Some(claimed) = claimed {
                let room = self
                    .create_paired_room(&claimed.name, name)
                    .await
                    .map_err(MatchmakingError::Db)?;

                return Ok(JoinOutcome::Paired { room });
            }

            // Someone else claimed the entry first. Look for another one.
        }

        self.enqueue(name).await.map_err(MatchmakingError::Db)?;

        Ok(JoinOutcome::Waiting)
    }

    async fn enqueue(&self, name: &str) -> Result<(), DatabaseError> {
        let result = self
            .db
            .create_waiting_entry(NewWaitingEntry {
                name: name.to_string(),
            })
            .await;

        match result {
            Ok(entry) => {
                info!("{} is waiting for a peer", entry.name);
                Ok(())
            }
            // The name is already queued, so a repeated join is a no-op
            Err(DatabaseError::Conflict { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn create_paired_room(
        &self,
        waiting_name: &str,
        joining_name: &str,
    ) -> Result<RoomData, DatabaseError> {
        let question_slug = self.db.random_question().await?.map(|q| q.slug);

        let room = self
            .create_room_with_fresh_code(waiting_name, joining_name, question_slug)
            .await?;

        self.db
            .create_message(NewMessage {
                room_id: room.id,
                sender: SYSTEM_SENDER.to_string(),
                content: PAIRED_NOTIFICATION.to_string(),
                kind: MessageKind::System,
            })
            .await?;

        info!(
            "Paired {} with {} in room {}",
            waiting_name, joining_name, room.code
        );

        Ok(room)
    }

    async fn create_room_with_fresh_code(
        &self,
        waiting_name: &str,
        joining_name: &str,
        question_slug: Option<String>,
    ) -> Result<RoomData, DatabaseError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let result = self
                .db
                .create_room(NewRoom {
                    code: random_room_code(ROOM_CODE_LENGTH),
                    participants: [waiting_name.to_string(), joining_name.to_string()],
                    question_slug: question_slug.clone(),
                })
                .await;

            match result {
                // Generated code is taken, roll a new one
                Err(DatabaseError::Conflict { .. }) if attempts < MAX_CODE_ATTEMPTS => continue,
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MemoryDatabase, Platform};

    fn platform() -> Platform<MemoryDatabase> {
        Platform::new(MemoryDatabase::new())
    }

    #[tokio::test]
    async fn test_first_join_waits() {
        let platform = platform();

        let outcome = platform.matchmaking.join("Alice").await.expect("join works");

        assert!(
            matches!(outcome, JoinOutcome::Waiting),
            "first joiner should wait"
        );
    }

    #[tokio::test]
    async fn test_second_join_pairs() {
        let platform = platform();

        platform.matchmaking.join("Alice").await.expect("join works");
        let outcome = platform.matchmaking.join("Bob").await.expect("join works");

        let JoinOutcome::Paired { room } = outcome else {
            panic!("second joiner should be paired");
        };

        assert_eq!(
            room.participants,
            vec!["Alice", "Bob"],
            "waiting user comes first"
        );
        assert_eq!(room.code.len(), ROOM_CODE_LENGTH);

        let messages = platform
            .rooms
            .list_messages(&room.code, 50)
            .await
            .expect("room exists");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, SYSTEM_SENDER);
        assert_eq!(messages[0].content, PAIRED_NOTIFICATION);
        assert_eq!(messages[0].kind, MessageKind::System);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let platform = platform();

        let outcome = platform.matchmaking.join("   ").await;

        assert!(
            matches!(outcome, Err(MatchmakingError::EmptyName)),
            "whitespace-only names are invalid"
        );
    }

    #[tokio::test]
    async fn test_name_is_trimmed() {
        let platform = platform();

        platform
            .matchmaking
            .join("  Alice  ")
            .await
            .expect("join works");
        let outcome = platform.matchmaking.join("Bob").await.expect("join works");

        let JoinOutcome::Paired { room } = outcome else {
            panic!("second joiner should be paired");
        };

        assert_eq!(room.participants, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_repeated_join_is_idempotent() {
        let db = Arc::new(MemoryDatabase::new());
        let matchmaker = Matchmaker::new(&db);

        let first = matchmaker.join("Alice").await.expect("join works");
        let second = matchmaker.join("Alice").await.expect("join works");

        assert!(matches!(first, JoinOutcome::Waiting));
        assert!(
            matches!(second, JoinOutcome::Waiting),
            "a user cannot pair with themselves"
        );
        assert_eq!(
            db.waiting_names(),
            vec!["Alice"],
            "re-joining must not duplicate the entry"
        );
    }

    #[tokio::test]
    async fn test_oldest_waiting_entry_pairs_first() {
        let db = Arc::new(MemoryDatabase::new());
        let matchmaker = Matchmaker::new(&db);

        // Enqueue directly, since joins would pair the second user already
        db.create_waiting_entry(NewWaitingEntry {
            name: "Alice".to_string(),
        })
        .await
        .expect("entry is created");
        db.create_waiting_entry(NewWaitingEntry {
            name: "Bob".to_string(),
        })
        .await
        .expect("entry is created");

        let outcome = matchmaker.join("Cara").await.expect("join works");

        let JoinOutcome::Paired { room } = outcome else {
            panic!("joiner should be paired");
        };

        assert_eq!(
            room.participants,
            vec!["Alice", "Cara"],
            "the oldest entry pairs first"
        );
        assert_eq!(db.waiting_names(), vec!["Bob"], "newer entries keep waiting");
    }

    #[tokio::test]
    async fn test_claimed_entries_are_skipped() {
        let db = Arc::new(MemoryDatabase::new());
        let matchmaker = Matchmaker::new(&db);

        let alice = db
            .create_waiting_entry(NewWaitingEntry {
                name: "Alice".to_string(),
            })
            .await
            .expect("entry is created");
        db.create_waiting_entry(NewWaitingEntry {
            name: "Bob".to_string(),
        })
        .await
        .expect("entry is created");

        // A racing join consumed Alice's entry before ours got to it
        db.claim_waiting_entry(alice.id)
            .await
            .expect("claim works")
            .expect("entry still exists");

        let outcome = matchmaker.join("Cara").await.expect("join works");

        let JoinOutcome::Paired { room } = outcome else {
            panic!("joiner should be paired");
        };

        assert_eq!(
            room.participants,
            vec!["Bob", "Cara"],
            "consumed entries are never paired again"
        );
    }

    #[tokio::test]
    async fn test_concurrent_joins_consume_each_entry_once() {
        let db = Arc::new(MemoryDatabase::new());
        let matchmaker = Arc::new(Matchmaker::new(&db));

        let names = [
            "Alice", "Bob", "Cara", "Dan", "Eve", "Finn", "Gwen", "Hugo",
        ];

        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let matchmaker = matchmaker.clone();
                tokio::spawn(async move { matchmaker.join(name).await.expect("join works") })
            })
            .collect();

        let mut rooms = vec![];

        for handle in handles {
            if let JoinOutcome::Paired { room } = handle.await.expect("task finishes") {
                rooms.push(room);
            }
        }

        let mut seen: Vec<String> = db.waiting_names();

        for room in &rooms {
            assert_eq!(room.participants.len(), 2, "rooms always hold two users");
            seen.extend(room.participants.iter().cloned());
        }

        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total, "no waiting entry is consumed twice");
        assert_eq!(
            seen.len(),
            names.len(),
            "every user ends up in exactly one room or the queue"
        );

        let mut codes: Vec<_> = rooms.iter().map(|r| r.code.clone()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), rooms.len(), "room codes are unique");
    }
}
