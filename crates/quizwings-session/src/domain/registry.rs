//! The session registry: which quizzes are enrolling or running, and the
//! progress of every participant in each.
//!
//! Locking order is always the outer map first, then at most one session
//! mutex. Structural changes (creating or removing a session) take the
//! outer write lock; everything else takes the outer read lock and then the
//! session's own mutex, so participants of different quizzes never contend
//! and two answers from one participant are always serialized. No lock is
//! ever held across an `.await`, except a quiz's lifecycle gate, which is an
//! async mutex held by `start` and `stop` while they persist the active flag.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use quizwings_core::error::InvalidState;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_quiz::domain::quiz::QuizDefinition;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use super::outcome::IgnoreReason;
use super::phase::{SessionEvent, SessionPhase, SessionState};
use super::progress::ParticipantProgress;

// Every critical section leaves its session consistent before it can
// panic, so a poisoned lock still guards valid data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct SessionEntry {
    phase: SessionPhase,
    // Enrollment order; only trackers still in `trackers` are listed.
    order: Vec<UserId>,
    trackers: HashMap<UserId, ParticipantProgress>,
}

impl SessionEntry {
    fn enrolling() -> Self {
        Self {
            phase: SessionPhase::Enrolling,
            order: Vec::new(),
            trackers: HashMap::new(),
        }
    }

    fn enroll(&mut self, participant_id: UserId, now: DateTime<Utc>) -> Result<bool, InvalidState> {
        if !self.phase.state().accepts(SessionEvent::Join) {
            return Err(InvalidState::AlreadyStarted);
        }
        if self.trackers.contains_key(&participant_id) {
            return Ok(false);
        }
        self.trackers
            .insert(participant_id, ParticipantProgress::new(participant_id, now));
        self.order.push(participant_id);
        Ok(true)
    }

    fn remove_tracker(&mut self, participant_id: UserId) -> Option<ParticipantProgress> {
        let removed = self.trackers.remove(&participant_id)?;
        self.order.retain(|id| *id != participant_id);
        Some(removed)
    }

    fn snapshot(&self) -> Vec<ParticipantProgress> {
        self.order
            .iter()
            .filter_map(|id| self.trackers.get(id).cloned())
            .collect()
    }
}

/// In-memory source of truth for running sessions.
///
/// A quiz appears here exactly while it is accepting or running
/// participants. Created once per process and shared by reference; it is
/// never ambient global state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<QuizId, Mutex<SessionEntry>>>,
    gates: Mutex<HashMap<QuizId, Arc<AsyncMutex<()>>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of the quiz's lifecycle. Only the holder of
    /// the guard may start or stop the quiz, so the stored active flag and
    /// the registry cannot drift apart.
    pub async fn lifecycle_gate(&self, quiz_id: QuizId) -> OwnedMutexGuard<()> {
        let gate = Arc::clone(lock(&self.gates).entry(quiz_id).or_default());
        gate.lock_owned().await
    }

    /// Enrolls a participant, creating the session on first join. Returns
    /// `true` if a new tracker was created and `false` if the participant
    /// was already enrolled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState::AlreadyStarted` once the session is running.
    pub fn enroll(
        &self,
        quiz_id: QuizId,
        participant_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, InvalidState> {
        {
            let sessions = read(&self.sessions);
            if let Some(entry) = sessions.get(&quiz_id) {
                return lock(entry).enroll(participant_id, now);
            }
        }
        let mut sessions = write(&self.sessions);
        let entry = sessions
            .entry(quiz_id)
            .or_insert_with(|| Mutex::new(SessionEntry::enrolling()));
        entry
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .enroll(participant_id, now)
    }

    /// Whether the quiz has a registry entry, enrolling or running.
    #[must_use]
    pub fn is_running(&self, quiz_id: QuizId) -> bool {
        read(&self.sessions).contains_key(&quiz_id)
    }

    /// The state of a quiz's session; `Idle` when it has no entry.
    #[must_use]
    pub fn state(&self, quiz_id: QuizId) -> SessionState {
        read(&self.sessions)
            .get(&quiz_id)
            .map_or(SessionState::Idle, |entry| lock(entry).phase.state())
    }

    /// Snapshot of the quiz's trackers in enrollment order. Empty when the
    /// quiz is not in the registry.
    #[must_use]
    pub fn participants_of(&self, quiz_id: QuizId) -> Vec<ParticipantProgress> {
        read(&self.sessions)
            .get(&quiz_id)
            .map(|entry| lock(entry).snapshot())
            .unwrap_or_default()
    }

    /// Number of quizzes enrolling or running.
    #[must_use]
    pub fn session_count(&self) -> usize {
        read(&self.sessions).len()
    }

    /// Number of trackers currently held for the quiz.
    #[must_use]
    pub fn participant_count(&self, quiz_id: QuizId) -> usize {
        read(&self.sessions)
            .get(&quiz_id)
            .map_or(0, |entry| lock(entry).trackers.len())
    }

    /// Removes the quiz's entry and every tracker in it. Returns how many
    /// trackers were discarded.
    pub fn remove(&self, quiz_id: QuizId) -> usize {
        let removed = write(&self.sessions).remove(&quiz_id);
        removed.map_or(0, |entry| {
            entry
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .trackers
                .len()
        })
    }

    /// Removes one participant's tracker. Returns whether one was removed.
    pub fn remove_participant(&self, quiz_id: QuizId, participant_id: UserId) -> bool {
        read(&self.sessions)
            .get(&quiz_id)
            .is_some_and(|entry| lock(entry).remove_tracker(participant_id).is_some())
    }

    /// Moves an enrolling session to running with `quiz` as the definition
    /// answers are graded against. Returns the roster in enrollment order,
    /// captured in the same critical section as the flip, so every
    /// participant either is in it or was refused enrollment.
    ///
    /// # Errors
    ///
    /// `NoParticipants` if nobody has enrolled, `AlreadyStarted` if the
    /// session is running, `NoQuestions` if `quiz` is empty.
    pub fn begin(
        &self,
        quiz_id: QuizId,
        quiz: Arc<QuizDefinition>,
    ) -> Result<Vec<UserId>, InvalidState> {
        let sessions = read(&self.sessions);
        let Some(entry) = sessions.get(&quiz_id) else {
            return Err(InvalidState::NoParticipants);
        };
        let mut entry = lock(entry);
        if !entry.phase.state().accepts(SessionEvent::Start) {
            return Err(InvalidState::AlreadyStarted);
        }
        if entry.trackers.is_empty() {
            return Err(InvalidState::NoParticipants);
        }
        if quiz.is_empty() {
            return Err(InvalidState::NoQuestions);
        }
        entry.phase = SessionPhase::Running(quiz);
        Ok(entry.order.clone())
    }

    /// Undoes [`begin`](Self::begin): the session accepts enrollments again
    /// and every tracker goes back to the first question.
    pub fn revert_to_enrolling(&self, quiz_id: QuizId) {
        let sessions = read(&self.sessions);
        let Some(entry) = sessions.get(&quiz_id) else {
            return;
        };
        let mut entry = lock(entry);
        entry.phase = SessionPhase::Enrolling;
        for tracker in entry.trackers.values_mut() {
            *tracker = ParticipantProgress::new(tracker.participant_id(), tracker.last_activity());
        }
    }

    /// Runs `update` on a participant's tracker while holding the session
    /// lock, so no other answer, stop, or eviction for the quiz can
    /// interleave. If the tracker has reached the end of the quiz afterwards
    /// it is removed in the same critical section.
    ///
    /// # Errors
    ///
    /// `NotStarted` if the session is still enrolling, `NotTracked` if the
    /// quiz is not in the registry or the participant has no tracker, or
    /// whatever `update` returns.
    pub fn with_running_tracker<R>(
        &self,
        quiz_id: QuizId,
        participant_id: UserId,
        update: impl FnOnce(&Arc<QuizDefinition>, &mut ParticipantProgress) -> Result<R, IgnoreReason>,
    ) -> Result<R, IgnoreReason> {
        let sessions = read(&self.sessions);
        let entry = sessions.get(&quiz_id).ok_or(IgnoreReason::NotTracked)?;
        let mut entry = lock(entry);
        if !entry.phase.state().accepts(SessionEvent::Answer) {
            return Err(IgnoreReason::NotStarted);
        }
        let quiz = entry
            .phase
            .quiz()
            .map(Arc::clone)
            .ok_or(IgnoreReason::NotStarted)?;
        let tracker = entry
            .trackers
            .get_mut(&participant_id)
            .ok_or(IgnoreReason::NotTracked)?;
        let result = update(&quiz, tracker)?;
        if tracker.is_finished(quiz.len()) {
            entry.remove_tracker(participant_id);
            debug!(%quiz_id, %participant_id, "tracker retired");
        }
        Ok(result)
    }

    /// The running quiz in which the participant currently has a tracker.
    /// The lowest quiz id wins if there are several.
    #[must_use]
    pub fn quiz_of_participant(&self, participant_id: UserId) -> Option<QuizId> {
        read(&self.sessions)
            .iter()
            .filter_map(|(quiz_id, entry)| {
                let entry = lock(entry);
                (entry.phase.state().accepts(SessionEvent::Answer)
                    && entry.trackers.contains_key(&participant_id))
                .then_some(*quiz_id)
            })
            .min()
    }

    /// Drops trackers of running sessions whose last activity is more than
    /// `max_idle` before `now`. No results are recorded for them. Returns
    /// the evicted `(quiz, participant)` pairs.
    pub fn evict_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> Vec<(QuizId, UserId)> {
        let sessions = read(&self.sessions);
        let mut evicted = Vec::new();
        for (quiz_id, entry) in sessions.iter() {
            let mut entry = lock(entry);
            if !entry.phase.state().accepts(SessionEvent::Answer) {
                continue;
            }
            let idle: Vec<UserId> = entry
                .trackers
                .values()
                .filter(|tracker| now - tracker.last_activity() > max_idle)
                .map(ParticipantProgress::participant_id)
                .collect();
            for participant_id in idle {
                entry.remove_tracker(participant_id);
                evicted.push((*quiz_id, participant_id));
            }
        }
        evicted
    }
}
