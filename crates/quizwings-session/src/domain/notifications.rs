//! Texts sent to organizers and participants.

use quizwings_quiz::domain::question::Verdict;

/// Sent to the organizer after each graded answer. `ordinal` is 1-based;
/// `submitted` is only shown for wrong answers.
#[must_use]
pub fn answer_graded(label: &str, ordinal: usize, verdict: Verdict, submitted: &str) -> String {
    match verdict {
        Verdict::Correct => format!("{label} answered question {ordinal} correctly"),
        Verdict::Incorrect => {
            format!("{label} answered question {ordinal} incorrectly: {submitted}")
        }
    }
}

/// Sent to the participant after their last answer.
#[must_use]
pub fn participant_finished(correct_count: u32, total_questions: u32) -> String {
    format!("Quiz complete! You answered {correct_count} of {total_questions} questions correctly.")
}

/// Sent to the organizer when a participant answers their last question.
#[must_use]
pub fn organizer_finished(label: &str, correct_count: u32, total_questions: u32) -> String {
    format!("{label} finished the quiz. Correct answers: {correct_count} of {total_questions}.")
}

/// Sent to a participant whose enrollment succeeded.
#[must_use]
pub fn joined(label: &str, quiz_name: &str) -> String {
    format!("{label}, you have joined \"{quiz_name}\". Waiting for the organizer to start the quiz.")
}
