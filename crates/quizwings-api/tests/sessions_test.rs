//! Integration tests for running a quiz over HTTP, from join to results.

mod common;

use axum::http::StatusCode;
use quizwings_api::state::AppState;
use serde_json::{Value, json};

const ORGANIZER: i64 = 1;
const PARTICIPANT: i64 = 100;

async fn post(state: &AppState, uri: &str, body: &Value) -> (StatusCode, Value) {
    common::post_json(common::build_test_app(state), uri, body).await
}

async fn inbox(state: &AppState, user_id: i64) -> Vec<Value> {
    let (status, json) = common::get_json(
        common::build_test_app(state),
        &format!("/api/v1/inbox/{user_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().unwrap().clone()
}

async fn join(state: &AppState, quiz_id: i64, participant_id: i64) -> (StatusCode, Value) {
    post(
        state,
        "/api/v1/sessions/join",
        &json!({ "quiz_id": quiz_id, "participant_id": participant_id }),
    )
    .await
}

async fn start(state: &AppState, quiz_id: i64) -> (StatusCode, Value) {
    post(
        state,
        "/api/v1/sessions/start",
        &json!({ "quiz_id": quiz_id, "requester_id": ORGANIZER }),
    )
    .await
}

#[tokio::test]
async fn test_full_quiz_run_over_http() {
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;

    // Join with a display name; the participant is told they are in.
    let (status, json) = post(
        &state,
        "/api/v1/sessions/join",
        &json!({
            "quiz_id": quiz_id,
            "participant_id": PARTICIPANT,
            "display_name": "Ivan Petrov 5406",
            "platform_name": "ivan"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["newly_enrolled"], true);
    let messages = inbox(&state, PARTICIPANT).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["type"], "text");
    assert!(
        messages[0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Ivan Petrov 5406 (ivan), you have joined \"Capitals\"")
    );

    // Start; question 1 lands in the participant's inbox without the key.
    let (status, json) = start(&state, quiz_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["participants"], 1);
    assert_eq!(json["failed_deliveries"], 0);
    let messages = inbox(&state, PARTICIPANT).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["type"], "question");
    assert_eq!(messages[0]["ordinal"], 1);
    assert_eq!(messages[0]["question"]["kind"], "multiple_choice");
    assert_eq!(
        messages[0]["question"]["options"],
        json!(["Lyon", "Paris", "Nice"])
    );
    assert!(messages[0]["question"].get("correct").is_none());

    // Answer question 1 without naming the quiz.
    let (status, json) = post(
        &state,
        "/api/v1/sessions/answer",
        &json!({ "participant_id": PARTICIPANT, "answer": { "choices": [1] } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "dispatch");
    assert_eq!(json["verdict"], "correct");
    assert_eq!(json["next_ordinal"], 2);
    let messages = inbox(&state, PARTICIPANT).await;
    assert_eq!(messages[0]["question"]["kind"], "free_text");
    assert_eq!(messages[0]["question"]["prompt"], "Name the capital of France");

    // Answer question 2 with sloppy casing and whitespace.
    let (status, json) = post(
        &state,
        "/api/v1/sessions/answer",
        &json!({ "quiz_id": quiz_id, "participant_id": PARTICIPANT, "answer": { "text": "  PARIS " } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "finalize");
    assert_eq!(json["correct_count"], 2);
    assert_eq!(json["total_questions"], 2);

    let messages = inbox(&state, PARTICIPANT).await;
    assert_eq!(
        messages,
        vec![json!({
            "type": "text",
            "text": "Quiz complete! You answered 2 of 2 questions correctly."
        })]
    );
    let organizer_texts: Vec<String> = inbox(&state, ORGANIZER)
        .await
        .iter()
        .map(|m| m["text"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(
        organizer_texts,
        vec![
            "Ivan Petrov 5406 (ivan) answered question 1 correctly",
            "Ivan Petrov 5406 (ivan) answered question 2 correctly",
            "Ivan Petrov 5406 (ivan) finished the quiz. Correct answers: 2 of 2.",
        ]
    );

    // The result is on record and the session keeps running until stopped.
    let (status, json) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/quizzes/{quiz_id}/results?requester_id={ORGANIZER}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["participant_id"], PARTICIPANT);
    assert_eq!(results[0]["participant_label"], "Ivan Petrov 5406 (ivan)");
    assert_eq!(results[0]["correct_count"], 2);

    let (_, json) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/sessions/{quiz_id}?requester_id={ORGANIZER}"),
    )
    .await;
    assert_eq!(json["state"], "running");
    assert_eq!(json["participants"], json!([]));

    let (status, json) = post(
        &state,
        "/api/v1/sessions/stop",
        &json!({ "quiz_id": quiz_id, "requester_id": ORGANIZER }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discarded"], 0);

    let (_, json) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/quizzes?owner_id={ORGANIZER}"),
    )
    .await;
    assert_eq!(json[0]["active"], false);
}

#[tokio::test]
async fn test_wrong_answer_is_reported_with_submitted_options() {
    // Arrange
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;
    join(&state, quiz_id, PARTICIPANT).await;
    start(&state, quiz_id).await;
    inbox(&state, ORGANIZER).await;

    // Act
    let (status, json) = post(
        &state,
        "/api/v1/sessions/answer",
        &json!({ "quiz_id": quiz_id, "participant_id": PARTICIPANT, "answer": { "choices": [0, 2] } }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["verdict"], "incorrect");
    let messages = inbox(&state, ORGANIZER).await;
    assert_eq!(
        messages[0]["text"],
        "user 100 answered question 1 incorrectly: Lyon; Nice"
    );
}

#[tokio::test]
async fn test_join_after_start_returns_409() {
    // Arrange
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;
    join(&state, quiz_id, PARTICIPANT).await;
    start(&state, quiz_id).await;

    // Act
    let (status, json) = join(&state, quiz_id, 200).await;

    // Assert
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_state");
}

#[tokio::test]
async fn test_second_start_returns_409() {
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;
    join(&state, quiz_id, PARTICIPANT).await;
    start(&state, quiz_id).await;

    let (status, _) = start(&state, quiz_id).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_join_unknown_quiz_returns_404() {
    let state = common::test_state();

    let (status, json) = join(&state, 999, PARTICIPANT).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "quiz_not_found");
}

#[tokio::test]
async fn test_join_with_blank_display_name_returns_400() {
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;

    let (status, _) = post(
        &state,
        "/api/v1/sessions/join",
        &json!({ "quiz_id": quiz_id, "participant_id": PARTICIPANT, "display_name": "  " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_answer_before_start_is_ignored() {
    // Arrange
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;
    join(&state, quiz_id, PARTICIPANT).await;

    // Act
    let (status, json) = post(
        &state,
        "/api/v1/sessions/answer",
        &json!({ "quiz_id": quiz_id, "participant_id": PARTICIPANT, "answer": { "choices": [1] } }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "ignored");
    assert_eq!(json["reason"], "not_started");
}

#[tokio::test]
async fn test_stop_discards_unfinished_participants_and_ignores_their_answers() {
    // Arrange
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;
    join(&state, quiz_id, PARTICIPANT).await;
    join(&state, quiz_id, 200).await;
    start(&state, quiz_id).await;

    // Act
    let (status, json) = post(
        &state,
        "/api/v1/sessions/stop",
        &json!({ "quiz_id": quiz_id, "requester_id": ORGANIZER }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discarded"], 2);

    let (_, json) = post(
        &state,
        "/api/v1/sessions/answer",
        &json!({ "quiz_id": quiz_id, "participant_id": PARTICIPANT, "answer": { "choices": [1] } }),
    )
    .await;
    assert_eq!(json["outcome"], "ignored");
    assert_eq!(json["reason"], "not_tracked");

    let (_, json) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/quizzes/{quiz_id}/results?requester_id={ORGANIZER}"),
    )
    .await;
    assert_eq!(json["results"], json!([]));
}

#[tokio::test]
async fn test_session_status_lists_progress_while_running() {
    // Arrange
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, ORGANIZER).await;
    join(&state, quiz_id, PARTICIPANT).await;
    join(&state, quiz_id, 200).await;
    start(&state, quiz_id).await;
    post(
        &state,
        "/api/v1/sessions/answer",
        &json!({ "participant_id": 200, "answer": { "choices": [1] } }),
    )
    .await;

    // Act
    let (status, json) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/sessions/{quiz_id}?requester_id={ORGANIZER}"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "running");
    let participants = json["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["participant_id"], PARTICIPANT);
    assert_eq!(participants[0]["current_question"], 1);
    assert_eq!(participants[1]["participant_id"], 200);
    assert_eq!(participants[1]["current_question"], 2);
    assert_eq!(participants[1]["correct_count"], 1);
}
