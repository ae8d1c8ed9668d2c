use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use quiz_form::error::{ApiError, AppError, FormError};
use quiz_form::models::DragTarget;
use quiz_form::{App, Config, DraftResult, FormController, Locale, QuizClient, SaveOutcome, SaveState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// 收到的请求：路径、Content-Type 与 body
#[derive(Debug)]
struct Captured {
    path: String,
    content_type: Option<String>,
    body: String,
}

/// 本地服务的固定回复
#[derive(Debug, Clone, Copy)]
struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
    /// 模拟慢响应
    delay: Duration,
}

impl Reply {
    fn json(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body,
            delay: Duration::ZERO,
        }
    }

    fn with_status(self, status: StatusCode) -> Self {
        Self { status, ..self }
    }

    fn with_content_type(self, content_type: &'static str) -> Self {
        Self { content_type, ..self }
    }

    fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    tx: mpsc::UnboundedSender<Captured>,
}

type ReplyParts = (StatusCode, [(header::HeaderName, &'static str); 1], &'static str);

async fn respond(state: &ServerState, path: String, headers: &HeaderMap, body: String) -> ReplyParts {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let _ = state.tx.send(Captured {
        path,
        content_type,
        body,
    });

    tokio::time::sleep(state.reply.delay).await;
    (
        state.reply.status,
        [(header::CONTENT_TYPE, state.reply.content_type)],
        state.reply.body,
    )
}

async fn create(State(state): State<ServerState>, headers: HeaderMap, body: String) -> ReplyParts {
    respond(&state, "/create".to_string(), &headers, body).await
}

async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: String,
) -> ReplyParts {
    respond(&state, format!("/{}/edit", id), &headers, body).await
}

/// 启动本地测验服务，返回地址和收到的请求
async fn spawn_server(reply: Reply) -> (String, mpsc::UnboundedReceiver<Captured>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/create", post(create))
        .route("/:id/edit", post(edit))
        .with_state(ServerState { reply, tx });

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });

    (format!("http://{}", addr), rx)
}

fn config_for(base_url: &str) -> Config {
    Config {
        server_base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Default::default()
    }
}

fn controller_for(base_url: &str) -> FormController {
    let client = QuizClient::new(&config_for(base_url)).unwrap();
    FormController::new(Arc::new(client), Locale::default())
}

fn fill_sample(controller: &mut FormController) {
    controller.set_quiz_name("Quiz1");
    let id = controller.add_question();
    controller.set_question_text(id, "2+2=?").unwrap();
    controller.set_option_text(id, 0, "3").unwrap();
    controller.set_option_text(id, 1, "4").unwrap();
    controller.select_correct(id, 1).unwrap();
}

#[tokio::test]
async fn test_create_posts_expected_body_and_redirects() {
    let (base, mut rx) = spawn_server(Reply::json(r#"{"result":"success","url":"/quiz/42"}"#)).await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    let outcome = controller.save_and_wait(None).await.unwrap();

    let captured = rx.recv().await.unwrap();
    assert_eq!(captured.path, "/create");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(captured.body, r#"{"Quiz1":{"2+2=?":{"3":false,"4":true}}}"#);

    assert_eq!(
        outcome,
        SaveOutcome::Redirect {
            url: "/quiz/42".to_string()
        }
    );
    assert_eq!(controller.location(), Some("/quiz/42"));
    assert_eq!(controller.state(), SaveState::Saved);
}

#[tokio::test]
async fn test_edit_uses_quiz_id_path() {
    let (base, mut rx) = spawn_server(Reply::json(r#"{"result":"success","url":"/"}"#)).await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    controller.save_and_wait(Some(7)).await.unwrap();

    assert_eq!(rx.recv().await.unwrap().path, "/7/edit");
}

#[tokio::test]
async fn test_rejection_shows_single_banner() {
    let (base, _rx) = spawn_server(Reply::json(r#"{"result":"error","error":"Name required"}"#)).await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    controller.save_and_wait(None).await.unwrap();
    controller.save_and_wait(None).await.unwrap();

    assert_eq!(controller.state(), SaveState::Rejected);
    assert_eq!(controller.banner().map(|b| b.message.as_str()), Some("Name required"));
    assert_eq!(controller.location(), None);
    let html = controller.render();
    assert_eq!(html.matches("alert-row").count(), 1);
    assert!(html.contains("Name required"));
}

#[tokio::test]
async fn test_bad_request_with_json_error_shows_banner() {
    let (base, _rx) =
        spawn_server(Reply::json(r#"{"error":"Name required"}"#).with_status(StatusCode::BAD_REQUEST)).await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    let outcome = controller.save_and_wait(None).await.unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Rejected {
            message: "Name required".to_string()
        }
    );
    assert_eq!(controller.state(), SaveState::Rejected);
    assert_eq!(controller.banner().map(|b| b.message.as_str()), Some("Name required"));
    assert_eq!(controller.location(), None);
}

#[tokio::test]
async fn test_server_error_page_is_bad_status() {
    let (base, _rx) = spawn_server(
        Reply::json("<html><body>Internal Server Error</body></html>")
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            .with_content_type("text/html"),
    )
    .await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    let err = controller.save_and_wait(None).await.unwrap_err();

    match err {
        AppError::Api(ApiError::BadStatus { endpoint, status }) => {
            assert_eq!(status, 500);
            assert!(endpoint.ends_with("/create"));
        }
        other => panic!("应当是 BadStatus: {:?}", other),
    }
    assert_eq!(controller.state(), SaveState::Failed);
    assert!(controller.banner().is_none());
    assert_eq!(controller.location(), None);
}

#[tokio::test]
async fn test_success_status_with_non_json_body() {
    let (base, _rx) = spawn_server(Reply::json("saved!").with_content_type("text/plain")).await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    let err = controller.save_and_wait(None).await.unwrap_err();

    assert!(matches!(err, AppError::Api(ApiError::JsonParseFailed { .. })));
    assert_eq!(controller.state(), SaveState::Failed);
    assert!(controller.banner().is_none());
}

#[tokio::test]
async fn test_saving_state_and_cancel_on_navigate_away() {
    let (base, _rx) = spawn_server(Reply::json(r#"{"result":"success","url":"/"}"#).with_delay(Duration::from_secs(3))).await;
    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    controller.save_quiz(None).unwrap();
    assert!(controller.is_saving());
    assert_eq!(controller.save_quiz(None), Err(FormError::SaveInProgress));

    controller.navigate_away();
    assert_eq!(controller.state(), SaveState::Cancelled);
    assert_eq!(controller.location(), None);
    assert!(controller.banner().is_none());
}

#[tokio::test]
async fn test_connection_failure_keeps_banner_untouched() {
    // 绑定后立即释放端口，连接会被拒绝
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut controller = controller_for(&base);
    fill_sample(&mut controller);

    let err = controller.save_and_wait(None).await.unwrap_err();
    assert!(matches!(err, AppError::Api(_)));
    assert_eq!(controller.state(), SaveState::Failed);
    assert!(controller.banner().is_none());
}

#[tokio::test]
async fn test_reordered_blocks_post_in_new_order() {
    let (base, mut rx) = spawn_server(Reply::json(r#"{"result":"success","url":"/"}"#)).await;
    let mut controller = controller_for(&base);
    controller.set_quiz_name("Order");
    let first = controller.add_question();
    controller.set_question_text(first, "first").unwrap();
    controller.set_option_text(first, 0, "a").unwrap();
    let second = controller.add_question();
    controller.set_question_text(second, "second").unwrap();
    controller.set_option_text(second, 0, "b").unwrap();

    assert!(controller.move_question(second, 0, DragTarget::Handle).unwrap());
    controller.save_and_wait(None).await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap().body,
        r#"{"Order":{"second":{"b":false},"first":{"a":false}}}"#
    );
}

#[tokio::test]
async fn test_app_submits_drafts_from_folder() {
    let (base, mut rx) = spawn_server(Reply::json(r#"{"result":"success","url":"/"}"#)).await;

    let dir = std::env::temp_dir().join(format!("quiz_form_app_{}", std::process::id()));
    let drafts = dir.join("drafts");
    std::fs::create_dir_all(&drafts).unwrap();
    std::fs::write(
        drafts.join("quiz1.toml"),
        "name = \"Quiz1\"\n\n[[questions]]\ntext = \"2+2=?\"\noptions = [\"3\", \"4\"]\ncorrect = 2\n",
    )
    .unwrap();
    std::fs::write(
        drafts.join("too_many.toml"),
        "name = \"Big\"\n\n[[questions]]\ntext = \"?\"\noptions = [\"1\", \"2\", \"3\", \"4\", \"5\"]\n",
    )
    .unwrap();

    let config = Config {
        draft_folder: drafts.to_string_lossy().to_string(),
        preview_folder: Some(dir.join("preview").to_string_lossy().to_string()),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        ..config_for(&base)
    };

    let app = App::initialize(config).unwrap();
    let stats = app.run().await.unwrap();

    assert_eq!(stats.saved, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(
        rx.recv().await.unwrap().body,
        r#"{"Quiz1":{"2+2=?":{"3":false,"4":true}}}"#
    );
    assert!(dir.join("preview").join("quiz1.html").exists());
    let log = std::fs::read_to_string(dir.join("output.txt")).unwrap();
    assert!(log.contains("quiz1"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_process_draft_reports_invalid_draft() {
    let (base, _rx) = spawn_server(Reply::json(r#"{"result":"success","url":"/"}"#)).await;
    let dir = std::env::temp_dir().join(format!("quiz_form_invalid_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = Config {
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        ..config_for(&base)
    };
    let app = App::initialize(config).unwrap();

    let draft = quiz_form::models::loaders::parse_draft(
        "name = \"Q\"\n[[questions]]\ntext = \"?\"\noptions = [\"a\"]\ncorrect = 5\n",
        "inline.toml",
    )
    .unwrap();
    let result = app.process_draft(1, &draft).await;
    std::fs::remove_dir_all(&dir).unwrap();

    assert!(matches!(result, DraftResult::Failed { .. }));
}
