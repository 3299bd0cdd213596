mod db;
mod matchmaking;
mod questions;
mod rooms;
mod util;

use std::sync::Arc;

pub use db::*;
pub use matchmaking::*;
pub use questions::*;
pub use rooms::*;

/// The codeduel backend system: matchmaking, rooms, and the question bank
/// layered over a shared database.
pub struct Platform<Db> {
    database: Arc<Db>,

    pub matchmaking: Matchmaker<Db>,
    pub rooms: Rooms<Db>,
    pub questions: QuestionBank<Db>,
}

impl<Db> Platform<Db>
where
    Db: Database,
{
    pub fn new(database: Db) -> Self {
        let database = Arc::new(database);

        Self {
            matchmaking: Matchmaker::new(&database),
            rooms: Rooms::new(&database),
            questions: QuestionBank::new(&database),
            database,
        }
    }

    /// Direct access to the underlying store
    pub fn database(&self) -> &Arc<Db> {
        &self.database
    }

    /// Probes the underlying store, for the health surface
    pub async fn ping(&self) -> Result<()> {
        self.database.ping().await
    }
}
