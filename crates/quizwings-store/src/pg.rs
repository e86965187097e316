//! `PostgreSQL` implementations of the quiz and result repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use quizwings_core::error::DomainError;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::{QuizRepository, ResultRecord, ResultRepository, StoredQuiz};

fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database error: {err}"))
}

#[derive(sqlx::FromRow)]
struct QuizRow {
    id: i64,
    name: String,
    owner_id: i64,
    content: String,
    active: bool,
}

impl From<QuizRow> for StoredQuiz {
    fn from(row: QuizRow) -> Self {
        Self {
            id: QuizId::new(row.id),
            name: row.name,
            owner_id: UserId::new(row.owner_id),
            content: row.content,
            active: row.active,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResultRow {
    id: i64,
    participant_id: i64,
    participant_label: String,
    quiz_id: i64,
    correct_count: i32,
    total_questions: i32,
    completed_at: DateTime<Utc>,
}

impl TryFrom<ResultRow> for ResultRecord {
    type Error = DomainError;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        let count = |value: i32| {
            u32::try_from(value).map_err(|_| {
                DomainError::Infrastructure(format!("negative count stored in result {}", row.id))
            })
        };
        Ok(Self {
            id: row.id,
            participant_id: UserId::new(row.participant_id),
            participant_label: row.participant_label,
            quiz_id: QuizId::new(row.quiz_id),
            correct_count: count(row.correct_count)?,
            total_questions: count(row.total_questions)?,
            completed_at: row.completed_at,
        })
    }
}

fn to_db_count(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::Validation(format!("count {value} does not fit the store")))
}

/// PostgreSQL-backed quiz repository.
#[derive(Debug, Clone)]
pub struct PgQuizRepository {
    pool: PgPool,
}

impl PgQuizRepository {
    /// Creates a new `PgQuizRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizRepository for PgQuizRepository {
    async fn load_quiz(&self, quiz_id: QuizId) -> Result<Option<StoredQuiz>, DomainError> {
        let row = sqlx::query_as::<_, QuizRow>(
            "SELECT id, name, owner_id, content, active FROM quizzes WHERE id = $1",
        )
        .bind(quiz_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(row.map(StoredQuiz::from))
    }

    async fn set_active(&self, quiz_id: QuizId, active: bool) -> Result<(), DomainError> {
        let updated = sqlx::query("UPDATE quizzes SET active = $2 WHERE id = $1")
            .bind(quiz_id.value())
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        if updated.rows_affected() == 0 {
            return Err(DomainError::QuizNotFound(quiz_id));
        }
        debug!(%quiz_id, active, "quiz active flag updated");
        Ok(())
    }

    async fn next_quiz_id(&self) -> Result<QuizId, DomainError> {
        let next: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM quizzes")
            .fetch_one(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(QuizId::new(next))
    }

    async fn insert_quiz(&self, quiz: &StoredQuiz) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT INTO quizzes (id, name, owner_id, content, active) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(quiz.id.value())
        .bind(&quiz.name)
        .bind(quiz.owner_id.value())
        .bind(&quiz.content)
        .bind(quiz.active)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(result.rows_affected() == 1)
    }

    async fn save_quiz(&self, quiz: &StoredQuiz) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO quizzes (id, name, owner_id, content, active) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, owner_id = EXCLUDED.owner_id, \
                 content = EXCLUDED.content, active = EXCLUDED.active",
        )
        .bind(quiz.id.value())
        .bind(&quiz.name)
        .bind(quiz.owner_id.value())
        .bind(&quiz.content)
        .bind(quiz.active)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(())
    }

    async fn quizzes_by_owner(&self, owner_id: UserId) -> Result<Vec<StoredQuiz>, DomainError> {
        let rows = sqlx::query_as::<_, QuizRow>(
            "SELECT id, name, owner_id, content, active FROM quizzes \
             WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(rows.into_iter().map(StoredQuiz::from).collect())
    }
}

/// PostgreSQL-backed result repository. Ids come from a sequence so
/// concurrent finishers never collide.
#[derive(Debug, Clone)]
pub struct PgResultRepository {
    pool: PgPool,
}

impl PgResultRepository {
    /// Creates a new `PgResultRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultRepository for PgResultRepository {
    async fn next_result_id(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT nextval('quiz_results_id_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(infrastructure)
    }

    async fn save_result(&self, result: &ResultRecord) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO quiz_results \
                 (id, participant_id, participant_label, quiz_id, correct_count, total_questions, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET \
                 correct_count = EXCLUDED.correct_count, \
                 total_questions = EXCLUDED.total_questions, \
                 completed_at = EXCLUDED.completed_at",
        )
        .bind(result.id)
        .bind(result.participant_id.value())
        .bind(&result.participant_label)
        .bind(result.quiz_id.value())
        .bind(to_db_count(result.correct_count)?)
        .bind(to_db_count(result.total_questions)?)
        .bind(result.completed_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(())
    }

    async fn results_for_quiz(&self, quiz_id: QuizId) -> Result<Vec<ResultRecord>, DomainError> {
        let rows = sqlx::query_as::<_, ResultRow>(
            "SELECT id, participant_id, participant_label, quiz_id, correct_count, \
                    total_questions, completed_at \
             FROM quiz_results WHERE quiz_id = $1 ORDER BY id",
        )
        .bind(quiz_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;
        rows.into_iter().map(ResultRecord::try_from).collect()
    }
}
