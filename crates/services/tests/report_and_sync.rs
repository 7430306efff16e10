mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use quiz_core::model::{Answer, QuizId};
use quiz_core::time::fixed_clock;
use services::{
    AppServices, QuestionPatch, QuestionSync, QuizSettings, ReportError, ReportService,
};
use storage::repository::Storage;
use support::{Call, FakeQuizApi, sample_questions};

#[tokio::test]
async fn question_patches_arrive_in_queue_order() {
    let api = Arc::new(FakeQuizApi::new("q1", sample_questions()));
    let sync = QuestionSync::spawn(api.clone());
    let quiz = QuizId::new("q1");

    sync.send(&quiz, 0, QuestionPatch::visited());
    sync.send(&quiz, 0, QuestionPatch::answered(Answer::single("Paris")));
    sync.send(&quiz, 0, QuestionPatch::time_spent(7));
    sync.send(&quiz, 1, QuestionPatch::visited());
    sync.flush().await;

    let patches: Vec<(usize, QuestionPatch)> = api
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Update { index, patch, .. } => Some((index, patch)),
            _ => None,
        })
        .collect();
    assert_eq!(
        patches,
        vec![
            (0, QuestionPatch::visited()),
            (0, QuestionPatch::answered(Answer::single("Paris"))),
            (0, QuestionPatch::time_spent(7)),
            (1, QuestionPatch::visited()),
        ]
    );
}

#[tokio::test]
async fn report_uses_detailed_results() {
    let api = Arc::new(FakeQuizApi::new("q1", sample_questions()));
    let service = AppServices::from_parts(
        fixed_clock(),
        api.clone(),
        &Storage::in_memory(),
        QuizSettings::default(),
    );

    let mut quiz = service
        .quiz_loop()
        .start_quiz("ada@example.com")
        .await
        .unwrap();
    quiz.answer(Answer::single("Paris")).unwrap();
    quiz.go_to(2).unwrap();
    quiz.select_option("A").unwrap();
    quiz.select_option("C").unwrap();
    let submitted = quiz.submit().await.unwrap();

    let report = service
        .reports()
        .load_report(quiz.quiz_id().unwrap(), Some(&submitted))
        .await
        .unwrap();

    assert_eq!(report.score, 2);
    assert_eq!(report.total_questions, 3);
    assert_eq!(report.percentage, 67);
    assert_eq!(report.difficulty_accuracy.easy, 100);
    assert_eq!(report.difficulty_accuracy.medium, 0);
    assert_eq!(report.difficulty_accuracy.hard, 100);
    assert_eq!(api.calls().last(), Some(&Call::Results("q1".into())));
}

#[tokio::test]
async fn report_falls_back_to_submit_payload() {
    let api = Arc::new(FakeQuizApi::new("q1", sample_questions()));
    let reports = ReportService::new(api.clone());
    let quiz = QuizId::new("q1");

    let submitted = api_submit(&api, &quiz).await;
    api.fail_results.store(true, Ordering::SeqCst);

    let report = reports.load_report(&quiz, Some(&submitted)).await.unwrap();
    assert_eq!(report.total_questions, 3);
    assert_eq!(report.time_taken, 42);

    let err = reports.load_report(&quiz, None).await.unwrap_err();
    assert!(matches!(err, ReportError::Api(_)));
}

async fn api_submit(api: &FakeQuizApi, quiz: &QuizId) -> quiz_core::model::QuizResults {
    use services::QuizApi;
    api.submit_quiz(quiz, 42).await.unwrap()
}
