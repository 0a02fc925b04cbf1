//! API route handlers for the gateway.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::State};
use minibot_core::{ConversationRecord, MiniBotError};
use std::sync::Arc;

use super::server::AppState;

fn error_response(status: StatusCode, err: &MiniBotError) -> Response {
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

/// Pull a non-blank `question` string out of the request body.
fn extract_question(payload: Result<Json<serde_json::Value>, JsonRejection>) -> Option<String> {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Rejected /ask body: {e}");
            return None;
        }
    };
    body.get("question")
        .and_then(|q| q.as_str())
        .filter(|q| !q.trim().is_empty())
        .map(String::from)
}

/// Answer a question: `{ "question": "..." }` → `{ "question", "answer" }`.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Some(question) = extract_question(payload) else {
        return error_response(StatusCode::BAD_REQUEST, &MiniBotError::MissingInput);
    };

    // Scoring is CPU-bound; keep it off the async workers.
    let responder = state.responder.clone();
    let query = question.clone();
    let answered = tokio::task::spawn_blocking(move || responder.answer(&query))
        .await
        .unwrap_or_else(|e| Err(MiniBotError::Config(format!("Matcher task failed: {e}"))));

    let answer = match answered {
        Ok(answer) => answer,
        Err(e @ MiniBotError::MissingInput) => {
            return error_response(StatusCode::BAD_REQUEST, &e);
        }
        Err(e @ MiniBotError::QuestionTooLong { .. }) => {
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, &e);
        }
        Err(e) => {
            tracing::error!("❌ Failed to answer {:?}: {e}", question);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e);
        }
    };

    let record = ConversationRecord::new(question.clone(), answer.answer.clone());
    if let Err(e) = state.history.append(&record) {
        tracing::warn!("⚠️ Failed to save chat history ({}): {e}", state.history.name());
    }

    Json(serde_json::json!({
        "question": question,
        "answer": answer.answer,
    }))
    .into_response()
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "minibot-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// System information endpoint.
pub async fn system_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = state.start_time.elapsed();
    Json(serde_json::json!({
        "name": "MiniBot",
        "version": env!("CARGO_PKG_VERSION"),
        "platform": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        "uptime_secs": uptime.as_secs(),
        "knowledge": {
            "questions": state.responder.corpus().len(),
            "threshold": state.responder.acceptance_threshold(),
        },
        "history": state.history.name(),
        "gateway": {
            "host": state.gateway_config.host,
            "port": state.gateway_config.port,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use minibot_core::QaEntry;
    use minibot_core::config::{DEFAULT_FALLBACK_ANSWER, GatewayConfig};
    use minibot_history::{HistorySink, NoHistory};
    use minibot_knowledge::{CorpusIndex, Responder};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records appends in memory so tests can assert on them.
    #[derive(Default)]
    struct MemoryHistory {
        records: Mutex<Vec<ConversationRecord>>,
    }

    impl HistorySink for MemoryHistory {
        fn name(&self) -> &'static str {
            "memory"
        }

        fn append(&self, record: &ConversationRecord) -> minibot_core::Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingHistory;

    impl HistorySink for FailingHistory {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn append(&self, _record: &ConversationRecord) -> minibot_core::Result<()> {
            Err(MiniBotError::History("disk full".into()))
        }
    }

    fn hours_corpus() -> CorpusIndex {
        CorpusIndex::new(vec![QaEntry::new("What are your hours?", "9am-5pm")])
    }

    fn test_state_with(corpus: CorpusIndex, history: Arc<dyn HistorySink>) -> Arc<AppState> {
        test_state_for(Responder::new(corpus), history)
    }

    fn test_state_for(responder: Responder, history: Arc<dyn HistorySink>) -> Arc<AppState> {
        Arc::new(AppState::new(GatewayConfig::default(), responder, history))
    }

    fn test_router() -> axum::Router {
        crate::server::build_router_from_arc(test_state_with(hours_corpus(), Arc::new(NoHistory)))
    }

    async fn ask_json(
        state: Arc<AppState>,
        payload: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        json_of(ask(State(state), body(payload)).await).await
    }

    fn test_state() -> State<Arc<AppState>> {
        State(test_state_with(hours_corpus(), Arc::new(NoHistory)))
    }

    fn body(value: serde_json::Value) -> Result<Json<serde_json::Value>, JsonRejection> {
        Ok(Json(value))
    }

    async fn json_of(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // ---- Health & Info ----

    #[tokio::test]
    async fn test_health_check() {
        let json = health_check().await.0;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_system_info() {
        let json = system_info(test_state()).await.0;
        assert_eq!(json["name"], "MiniBot");
        assert_eq!(json["knowledge"]["questions"], 1);
        assert_eq!(json["knowledge"]["threshold"], 80);
        assert_eq!(json["history"], "none");
    }

    // ---- Ask ----

    #[tokio::test]
    async fn test_ask_near_match() {
        let question = serde_json::json!({"question": "what r ur hours"});
        let (status, json) = json_of(ask(test_state(), body(question)).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({"question": "what r ur hours", "answer": "9am-5pm"})
        );
    }

    #[tokio::test]
    async fn test_ask_nonsense_falls_back() {
        let question = serde_json::json!({"question": "xyzabc nonsense"});
        let (status, json) = json_of(ask(test_state(), body(question)).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], DEFAULT_FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_ask_empty_corpus() {
        let state = test_state_with(CorpusIndex::default(), Arc::new(NoHistory));
        let (status, json) =
            ask_json(state, serde_json::json!({"question": "What are your hours?"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], DEFAULT_FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_ask_missing_question() {
        let history = Arc::new(MemoryHistory::default());
        let shared = test_state_with(hours_corpus(), history.clone());

        for payload in [
            serde_json::json!({}),
            serde_json::json!({"question": ""}),
            serde_json::json!({"question": "   "}),
            serde_json::json!({"question": 42}),
            serde_json::json!({"question": null}),
        ] {
            let response = ask(State(shared.clone()), body(payload)).await;
            let (status, json) = json_of(response).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json, serde_json::json!({"error": "No question provided"}));
        }
        assert!(history.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ask_records_history() {
        let history = Arc::new(MemoryHistory::default());
        let state = test_state_with(hours_corpus(), history.clone());
        ask_json(state, serde_json::json!({"question": "What are your hours?"})).await;

        let records = history.records.lock().unwrap();
        assert_eq!(
            *records,
            vec![ConversationRecord::new("What are your hours?", "9am-5pm")]
        );
    }

    #[tokio::test]
    async fn test_ask_history_failure_still_answers() {
        let state = test_state_with(hours_corpus(), Arc::new(FailingHistory));
        let (status, json) =
            ask_json(state, serde_json::json!({"question": "What are your hours?"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], "9am-5pm");
    }

    #[tokio::test]
    async fn test_ask_overlong_question_rejected() {
        let history = Arc::new(MemoryHistory::default());
        let responder = Responder::new(hours_corpus()).max_question_len(32);
        let state = test_state_for(responder, history.clone());

        let question = serde_json::json!({"question": "hours ".repeat(10)});
        let (status, json) = ask_json(state, question).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"], "Question too long (60 chars, max 32)");
        assert!(history.records.lock().unwrap().is_empty());
    }

    // ---- Router ----

    #[tokio::test]
    async fn test_router_ask_roundtrip() {
        let app = test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question":"What are your hours?"}"#))
            .unwrap();
        let (status, json) = json_of(app.oneshot(request).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], "9am-5pm");
    }

    #[tokio::test]
    async fn test_router_invalid_body_is_missing_input() {
        let app = test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, json) = json_of(app.oneshot(request).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No question provided");
    }

    #[tokio::test]
    async fn test_router_cors_preflight() {
        let app = test_router();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/ask")
            .header("origin", "https://chat.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert!(
            response
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }
}
