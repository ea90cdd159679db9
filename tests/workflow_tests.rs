use lingurepo::backend::AnalysisBackend;
use lingurepo::error::{TransportError, ValidationError, WorkflowError};
use lingurepo::workflow::NotificationLevel;
use lingurepo::{FileEntry, Step, WorkflowApp};
use std::sync::Arc;

// Use our centralized test infrastructure
#[path = "test_utils.rs"]
mod test_utils;
use test_utils::{MockBackend, MockDataBuilder};

fn session(backend: &Arc<MockBackend>) -> WorkflowApp {
    let backend: Arc<dyn AnalysisBackend> = backend.clone();
    WorkflowApp::new(backend)
}

async fn fetched_session(backend: &Arc<MockBackend>) -> WorkflowApp {
    let mut app = session(backend);
    app.submit("octo/demo", "main").expect("submit accepted");
    let step = app.wait_until_settled().await.expect("fetch settles");
    assert_eq!(step, Step::SelectingFiles);
    app
}

#[tokio::test]
async fn test_full_workflow_against_mock_backend() {
    let backend = Arc::new(MockBackend::new());
    let mut app = fetched_session(&backend).await;

    app.select_all().expect("select all");
    assert!(app.state().selection().is_all_selected());

    app.analyze().expect("analyze accepted");
    assert_eq!(app.state().step(), Step::Analyzing);
    assert_eq!(app.wait_until_settled().await, Ok(Step::Complete));

    assert_eq!(backend.list_count(), 1);
    assert_eq!(backend.generate_count(), 1);
    let request = backend.last_generate().expect("generate request recorded");
    assert_eq!(request.repo_name, "octo/demo");
    assert_eq!(request.branch_name, "main");
    assert_eq!(request.selected_files, vec!["a.ts", "src/b.ts"]);

    let result = app.state().result().expect("result");
    assert_eq!(result.raw_document, MockDataBuilder::demo_document());
    assert_eq!(app.state().progress(), 100);
}

#[tokio::test]
async fn test_busy_session_refuses_duplicate_requests() {
    let backend = Arc::new(MockBackend::held());
    let mut app = session(&backend);

    app.submit("octo/demo", "main").expect("first submit");
    assert!(app.state().is_busy());

    let err = app
        .submit("octo/demo", "main")
        .expect_err("second submit while fetching");
    assert!(matches!(err, WorkflowError::IllegalTransition(_)));

    backend.release();
    assert_eq!(app.wait_until_settled().await, Ok(Step::SelectingFiles));
    assert_eq!(backend.list_count(), 1);
}

#[tokio::test]
async fn test_empty_selection_issues_no_generate_call() {
    let backend = Arc::new(MockBackend::new());
    let mut app = fetched_session(&backend).await;

    app.toggle_file("a.ts", true).expect("toggle on");
    app.toggle_file("a.ts", false).expect("toggle off");

    assert_eq!(
        app.analyze(),
        Err(WorkflowError::Validation(ValidationError::EmptySelection))
    );
    assert_eq!(backend.generate_count(), 0);
    assert_eq!(app.state().step(), Step::SelectingFiles);
}

#[tokio::test]
async fn test_blank_repository_rejected_before_network() {
    let backend = Arc::new(MockBackend::new());
    let mut app = session(&backend);

    assert_eq!(
        app.submit("", "main"),
        Err(WorkflowError::Validation(ValidationError::EmptyRepository))
    );
    assert_eq!(app.state().step(), Step::Idle);
    assert_eq!(backend.list_count(), 0);
}

#[tokio::test]
async fn test_server_error_detail_reaches_user() {
    let backend = Arc::new(MockBackend::new());
    backend.set_files(Err(TransportError::status(
        404,
        Some("Repository octo/missing not found".to_string()),
    )));
    let mut app = session(&backend);

    app.submit("octo/missing", "main").expect("submit");
    assert_eq!(app.wait_until_settled().await, Ok(Step::Idle));

    let errors: Vec<_> = app
        .take_notifications()
        .into_iter()
        .filter(|n| n.level == NotificationLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Repository octo/missing not found"));
}

#[tokio::test]
async fn test_status_without_detail_uses_generic_message() {
    let backend = Arc::new(MockBackend::new());
    backend.set_document(Err(TransportError::status(502, None)));
    let mut app = fetched_session(&backend).await;

    app.select_all().expect("select all");
    app.analyze().expect("analyze");
    assert_eq!(app.wait_until_settled().await, Ok(Step::SelectingFiles));

    let error = app.state().last_error().expect("error recorded");
    assert!(error.contains(lingurepo::error::GENERIC_NETWORK_FAILURE));
    assert_eq!(app.state().selection().selected_count(), 2);
}

#[tokio::test]
async fn test_non_object_document_is_malformed() {
    let backend = Arc::new(MockBackend::new());
    backend.set_document(Ok(serde_json::json!(["not", "an", "object"])));
    let mut app = fetched_session(&backend).await;

    app.select_all().expect("select all");
    app.analyze().expect("analyze");
    assert_eq!(app.wait_until_settled().await, Ok(Step::SelectingFiles));
    assert!(
        app.state()
            .last_error()
            .is_some_and(|e| e.starts_with("Malformed response"))
    );
}

#[tokio::test]
async fn test_refetch_after_reset_replaces_tree() {
    let backend = Arc::new(MockBackend::new());
    let mut app = fetched_session(&backend).await;
    app.select_all().expect("select all");
    app.analyze().expect("analyze");
    assert_eq!(app.wait_until_settled().await, Ok(Step::Complete));

    app.reset().expect("reset from complete");
    assert_eq!(app.state().step(), Step::Idle);
    assert!(app.state().result().is_none());

    backend.set_files(Ok(MockDataBuilder::nested_files()));
    app.submit("octo/other", "dev").expect("submit again");
    assert_eq!(app.wait_until_settled().await, Ok(Step::SelectingFiles));

    let selection = app.state().selection();
    assert_eq!(selection.tree().file_count(), 4);
    assert_eq!(selection.selected_count(), 0);
    assert!(!selection.tree().is_file("a.ts"));
    assert_eq!(
        selection.tree().all_file_paths().collect::<Vec<_>>(),
        vec![
            "README.md",
            "src/main.rs",
            "src/workflow/mod.rs",
            "src/workflow/reducer.rs"
        ]
    );
}

#[tokio::test]
async fn test_empty_repository_warns() {
    let backend = Arc::new(MockBackend::new());
    backend.set_files(Ok(vec![FileEntry::dir("docs", "docs", Vec::new())]));
    let mut app = session(&backend);

    app.submit("octo/empty", "main").expect("submit");
    assert_eq!(app.wait_until_settled().await, Ok(Step::SelectingFiles));

    assert!(
        app.take_notifications()
            .iter()
            .any(|n| n.level == NotificationLevel::Warning)
    );
    // Nothing to select, so the selection is trivially "all"
    app.deselect_all().expect("deselect all");
    assert!(app.state().selection().is_all_selected());
    assert!(app.analyze().is_err());
}
