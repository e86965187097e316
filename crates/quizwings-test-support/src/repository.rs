//! Test repositories: storage collaborators that always fail.

use async_trait::async_trait;
use quizwings_core::error::DomainError;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::{QuizRepository, ResultRecord, ResultRepository, StoredQuiz};

fn refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

/// A quiz repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingQuizRepository;

#[async_trait]
impl QuizRepository for FailingQuizRepository {
    async fn load_quiz(&self, _quiz_id: QuizId) -> Result<Option<StoredQuiz>, DomainError> {
        Err(refused())
    }

    async fn set_active(&self, _quiz_id: QuizId, _active: bool) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn next_quiz_id(&self) -> Result<QuizId, DomainError> {
        Err(refused())
    }

    async fn insert_quiz(&self, _quiz: &StoredQuiz) -> Result<bool, DomainError> {
        Err(refused())
    }

    async fn save_quiz(&self, _quiz: &StoredQuiz) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn quizzes_by_owner(&self, _owner_id: UserId) -> Result<Vec<StoredQuiz>, DomainError> {
        Err(refused())
    }
}

/// A result repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingResultRepository;

#[async_trait]
impl ResultRepository for FailingResultRepository {
    async fn next_result_id(&self) -> Result<i64, DomainError> {
        Err(refused())
    }

    async fn save_result(&self, _result: &ResultRecord) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn results_for_quiz(&self, _quiz_id: QuizId) -> Result<Vec<ResultRecord>, DomainError> {
        Err(refused())
    }
}
