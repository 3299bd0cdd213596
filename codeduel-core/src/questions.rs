use std::sync::Arc;

use log::info;

use crate::{Database, DatabaseError, Difficulty, NewQuestion, QuestionData, QuestionExample};

/// The static problem catalog. Read-only at matchmaking time, populated only
/// through [`QuestionBank::seed`].
pub struct QuestionBank<Db> {
    db: Arc<Db>,
}

/// Outcome of a seeding pass
#[derive(Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub seeded: bool,
    /// Number of problems inserted by this call
    pub count: usize,
}

impl<Db> QuestionBank<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// All problems in the catalog, ordered by title
    pub async fn list(&self) -> Result<Vec<QuestionData>, DatabaseError> {
        self.db.list_questions().await
    }

    /// Inserts the starter problems, unless the catalog already has content
    pub async fn seed(&self) -> Result<SeedSummary, DatabaseError> {
        if self.db.count_questions().await? > 0 {
            return Ok(SeedSummary {
                seeded: false,
                count: 0,
            });
        }

        let mut count = 0;

        for question in starter_questions() {
            match self.db.create_question(question).await {
                Ok(_) => count += 1,
                // Another seeding call got this one in first
                Err(DatabaseError::Conflict { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        if count > 0 {
            info!("Seeded the question catalog with {} problems", count);
        }

        Ok(SeedSummary {
            seeded: count > 0,
            count,
        })
    }
}

fn starter_questions() -> Vec<NewQuestion> {
    vec![
        NewQuestion {
            title: "Two Sum".to_string(),
            slug: "two-sum".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["array".to_string(), "hashmap".to_string()],
            statement: "Given an array of integers nums and an integer target, return indices \
                        of the two numbers such that they add up to target."
                .to_string(),
            examples: vec![QuestionExample {
                input: "nums=[2,7,11,15], target=9".to_string(),
                output: "[0,1]".to_string(),
            }],
        },
        NewQuestion {
            title: "Valid Parentheses".to_string(),
            slug: "valid-parentheses".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["stack".to_string(), "string".to_string()],
            statement: "Given a string s containing only the characters '()[]{}', determine if \
                        the input string is valid."
                .to_string(),
            examples: vec![QuestionExample {
                input: "s=()[]{}".to_string(),
                output: "true".to_string(),
            }],
        },
        NewQuestion {
            title: "Longest Substring Without Repeating Characters".to_string(),
            slug: "longest-substring".to_string(),
            difficulty: Difficulty::Medium,
            tags: vec!["hashmap".to_string(), "sliding-window".to_string()],
            statement: "Given a string s, find the length of the longest substring without \
                        repeating characters."
                .to_string(),
            examples: vec![QuestionExample {
                input: "abcabcbb".to_string(),
                output: "3".to_string(),
            }],
        },
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MemoryDatabase, Platform};

    #[tokio::test]
    async fn test_seed_fills_the_catalog() {
        let platform = Platform::new(MemoryDatabase::new());

        let summary = platform.questions.seed().await.expect("seed works");

        assert!(summary.seeded);
        assert_eq!(summary.count, 3);

        let questions = platform.questions.list().await.expect("list works");
        let slugs: Vec<_> = questions.iter().map(|q| q.slug.as_str()).collect();

        assert!(slugs.contains(&"two-sum"));
        assert!(slugs.contains(&"valid-parentheses"));
        assert!(slugs.contains(&"longest-substring"));
    }

    #[tokio::test]
    async fn test_seeding_twice_is_a_no_op() {
        let platform = Platform::new(MemoryDatabase::new());

        platform.questions.seed().await.expect("seed works");
        let second = platform.questions.seed().await.expect("seed works");

        assert_eq!(
            second,
            SeedSummary {
                seeded: false,
                count: 0
            }
        );

        let questions = platform.questions.list().await.expect("list works");
        assert_eq!(questions.len(), 3, "no duplicate catalog entries");
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_title() {
        let platform = Platform::new(MemoryDatabase::new());

        platform.questions.seed().await.expect("seed works");

        let questions = platform.questions.list().await.expect("list works");
        let titles: Vec<_> = questions.iter().map(|q| q.title.as_str()).collect();

        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(titles, sorted);
    }
}
