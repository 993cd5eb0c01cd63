use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::timeout;

use sat_quiz::{
    Action, InMemoryRepository, JsonFileRepository, OptionKey, Phase, QuestionRecord, QuizConfig,
    QuizHandle, QuizRunner, RemoteRepository, Session, server,
};

fn bank() -> serde_json::Value {
    json!([
        {
            "exam": 3,
            "exam_question_index": 1,
            "passage_or_sentence": "The committee's report was both thorough and ______.",
            "question_text": "Which choice completes the text?",
            "A": "concise", "B": "verbose", "C": "tardy", "D": "opaque",
            "correct": "A",
            "explanation": "Concise contrasts with thorough."
        },
        {
            "exam": "3",
            "exam_question_index": 2,
            "passage_or_sentence": "",
            "question_text": "",
            "A": "one", "B": "two", "C": "three", "D": "four",
            "correct": "c",
            "explanation": ""
        },
        {
            "exam": "3",
            "exam_question_index": 3,
            "question_text": "Pick D.",
            "A": "no", "B": "no", "C": "no", "D": "yes",
            "correct": "D"
        },
        {
            "exam": "4",
            "exam_question_index": 1,
            "question_text": "Another test.",
            "A": "a", "B": "b", "C": "c", "D": "d",
            "correct": "B"
        }
    ])
}

fn records() -> Vec<QuestionRecord> {
    serde_json::from_value(bank()).unwrap()
}

async fn wait_for_phase(handle: &QuizHandle, phase: Phase) -> Session {
    let mut rx = handle.subscribe();
    let session = timeout(Duration::from_secs(10), rx.wait_for(|s| s.phase == phase))
        .await
        .expect("timed out waiting for phase")
        .unwrap();
    session.clone()
}

fn start(handle: &QuizHandle, test_id: &str, count: Option<i64>) {
    assert!(handle.dispatch(Action::Start {
        test_id: test_id.to_string(),
        requested_count: count,
    }));
}

#[tokio::test(start_paused = true)]
async fn test_full_session_against_in_memory_bank() {
    let repo = InMemoryRepository::from_records(records());
    let (handle, _runner) = QuizRunner::spawn(QuizConfig::default(), Arc::new(repo)).unwrap();

    start(&handle, " 3 ", Some(99));
    let session = wait_for_phase(&handle, Phase::Active).await;
    assert_eq!(session.test_id, "3");
    assert_eq!(session.total_questions(), 3);
    assert_eq!(session.time_remaining_secs, 213);
    assert_eq!(session.clock(), "03:33");

    let second = &session.questions[1];
    assert_eq!(second.prompt, "Question text missing.");
    assert_eq!(second.passage, None);
    assert_eq!(second.correct, OptionKey::C);

    handle.dispatch(Action::SelectAnswer(OptionKey::A));
    handle.dispatch(Action::Next);
    handle.dispatch(Action::SelectAnswer(OptionKey::B));
    handle.dispatch(Action::Next);
    handle.dispatch(Action::SelectAnswer(OptionKey::D));
    handle.dispatch(Action::Submit);

    let session = wait_for_phase(&handle, Phase::Results).await;
    let review = session.review.unwrap();
    assert_eq!(review.total_correct, 2);
    assert_eq!(review.total_wrong, 1);
    assert_eq!(review.items[1].selection_label(), "B (two)");
    assert_eq!(review.items[1].correct_label(), "C (three)");
    assert_eq!(
        review.items[0].explanation.as_deref(),
        Some("Concise contrasts with thorough.")
    );
}

#[tokio::test]
async fn test_remote_session_times_out() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", bank()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let repository = Arc::new(JsonFileRepository::new(file.path()));
    let server_task = tokio::spawn(server::serve(listener, repository, async move {
        let _ = stop_rx.await;
    }));

    // One second per question, ticking every 100ms.
    let config = QuizConfig {
        total_budget_secs: 54,
        reference_question_count: 54,
        tick_interval_ms: 100,
    };
    let remote = RemoteRepository::new(format!("ws://{}", addr));
    let (handle, _runner) = QuizRunner::spawn(config, Arc::new(remote)).unwrap();

    start(&handle, "9", None);
    let session = wait_for_phase(&handle, Phase::Error).await;
    assert!(session.error.unwrap().is_not_found());

    handle.dispatch(Action::Retry);
    wait_for_phase(&handle, Phase::Setup).await;

    start(&handle, "3", Some(2));
    let session = wait_for_phase(&handle, Phase::Active).await;
    assert_eq!(session.total_questions(), 2);
    assert_eq!(session.time_remaining_secs, 2);

    handle.dispatch(Action::SelectAnswer(OptionKey::A));

    let session = wait_for_phase(&handle, Phase::Results).await;
    assert_eq!(session.time_remaining_secs, 0);
    let review = session.review.unwrap();
    assert_eq!(review.total_correct, 1);
    assert_eq!(review.total_wrong, 1);
    assert_eq!(review.unanswered(), 1);

    stop_tx.send(()).unwrap();
    server_task.await.unwrap();
}
