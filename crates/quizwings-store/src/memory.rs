//! In-process implementations of the storage and identity collaborators.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use quizwings_core::error::DomainError;
use quizwings_core::identity::{IdentityDirectory, compose_label};
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::{QuizRepository, ResultRecord, ResultRepository, StoredQuiz};

// Every critical section below leaves the map consistent, so a poisoned
// lock still guards valid data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Quizzes kept in a map ordered by id.
#[derive(Debug, Default)]
pub struct InMemoryQuizRepository {
    quizzes: Mutex<BTreeMap<QuizId, StoredQuiz>>,
}

impl InMemoryQuizRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn load_quiz(&self, quiz_id: QuizId) -> Result<Option<StoredQuiz>, DomainError> {
        Ok(lock(&self.quizzes).get(&quiz_id).cloned())
    }

    async fn set_active(&self, quiz_id: QuizId, active: bool) -> Result<(), DomainError> {
        let mut quizzes = lock(&self.quizzes);
        let quiz = quizzes
            .get_mut(&quiz_id)
            .ok_or(DomainError::QuizNotFound(quiz_id))?;
        quiz.active = active;
        Ok(())
    }

    async fn next_quiz_id(&self) -> Result<QuizId, DomainError> {
        Ok(lock(&self.quizzes)
            .keys()
            .next_back()
            .map_or(QuizId::new(1), |last| last.next()))
    }

    async fn insert_quiz(&self, quiz: &StoredQuiz) -> Result<bool, DomainError> {
        match lock(&self.quizzes).entry(quiz.id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(quiz.clone());
                Ok(true)
            }
        }
    }

    async fn save_quiz(&self, quiz: &StoredQuiz) -> Result<(), DomainError> {
        lock(&self.quizzes).insert(quiz.id, quiz.clone());
        Ok(())
    }

    async fn quizzes_by_owner(&self, owner_id: UserId) -> Result<Vec<StoredQuiz>, DomainError> {
        Ok(lock(&self.quizzes)
            .values()
            .filter(|quiz| quiz.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

/// Results appended in completion order. Ids come from a counter so two
/// participants finishing at once never share one.
#[derive(Debug)]
pub struct InMemoryResultRepository {
    next_id: AtomicI64,
    results: Mutex<Vec<ResultRecord>>,
}

impl InMemoryResultRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every stored result.
    #[must_use]
    pub fn all(&self) -> Vec<ResultRecord> {
        lock(&self.results).clone()
    }
}

impl Default for InMemoryResultRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn next_result_id(&self) -> Result<i64, DomainError> {
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn save_result(&self, result: &ResultRecord) -> Result<(), DomainError> {
        let mut results = lock(&self.results);
        match results.iter_mut().find(|existing| existing.id == result.id) {
            Some(existing) => *existing = result.clone(),
            None => results.push(result.clone()),
        }
        Ok(())
    }

    async fn results_for_quiz(&self, quiz_id: QuizId) -> Result<Vec<ResultRecord>, DomainError> {
        let mut results: Vec<_> = lock(&self.results)
            .iter()
            .filter(|result| result.quiz_id == quiz_id)
            .cloned()
            .collect();
        results.sort_by_key(|result| result.id);
        Ok(results)
    }
}

#[derive(Debug, Default)]
struct Names {
    friendly: Option<String>,
    platform: Option<String>,
}

/// Display names held in memory.
#[derive(Debug, Default)]
pub struct InMemoryIdentityDirectory {
    names: Mutex<HashMap<UserId, Names>>,
}

impl InMemoryIdentityDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn display_label(&self, user_id: UserId) -> String {
        let names = lock(&self.names);
        let entry = names.get(&user_id);
        compose_label(
            user_id,
            entry.and_then(|n| n.friendly.as_deref()),
            entry.and_then(|n| n.platform.as_deref()),
        )
    }

    async fn set_friendly_name(&self, user_id: UserId, name: String) -> Result<(), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("display name must not be empty".into()));
        }
        lock(&self.names).entry(user_id).or_default().friendly = Some(name.to_owned());
        Ok(())
    }

    async fn set_platform_name(&self, user_id: UserId, name: String) -> Result<(), DomainError> {
        lock(&self.names).entry(user_id).or_default().platform = Some(name);
        Ok(())
    }
}
