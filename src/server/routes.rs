//! Axum route handlers for the Muza HTTP server.
//!
//! # Routes
//!
//! - `GET    /`                       — Single-page UI
//! - `GET    /health`                 — `{"status": "ok", "version": .., "service": "muza"}`
//! - `POST   /analyze`                — Feel a message, imprint it, let Муза answer
//! - `GET    /sessions/:id/stats`     — Bit stats
//! - `GET    /sessions/:id/history`   — Stats plus full snapshot history
//! - `GET    /sessions/:id/profile`   — Agent profile
//! - `POST   /sessions/:id/mutate`    — Mutate the bit (`{"strength": f64}` optional)
//! - `POST   /sessions/:id/meditate`  — Agent meditation
//! - `DELETE /sessions/:id`           — Drop the session

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{delete, get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use tera::Tera;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::session::{Session, SessionStore};
use crate::config::ServerConfig;
use crate::hyperbit::{HyperBitState, Rgb, DEFAULT_MUTATION_STRENGTH};
use crate::utilities::errors::MuzaError;

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Build state from configuration, loading the emotion table if one is set.
    pub fn new(config: ServerConfig) -> Result<Self, MuzaError> {
        let classifier = config.classifier()?;
        let mut tera = Tera::default();
        tera.add_raw_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self {
            sessions: Arc::new(SessionStore::new(config, classifier)),
            templates: Arc::new(tera),
        })
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/sessions/:id", delete(delete_session_handler))
        .route("/sessions/:id/stats", get(stats_handler))
        .route("/sessions/:id/history", get(history_handler))
        .route("/sessions/:id/profile", get(profile_handler))
        .route("/sessions/:id/mutate", post(mutate_handler))
        .route("/sessions/:id/meditate", post(meditate_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MutateRequest {
    pub strength: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Square SVG filled with `rgb`, base64-encoded for a `data:` URL.
pub fn color_swatch(rgb: Rgb) -> String {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="100" height="100" fill="{}"/></svg>"#,
        rgb.hex()
    );
    BASE64.encode(svg)
}

/// Short three-line state readout shown above the agent's reply.
fn describe(bit: &HyperBitState, text: &str) -> String {
    format!(
        "🌀 [{}] → '{}'\nBASE: {:.3} | ENERGY: {:.2}\nCOLOR: {} | FREQ: {:.1} Гц",
        bit.name(),
        text,
        bit.base(),
        bit.energy(),
        bit.rgb(),
        bit.frequency()
    )
}

fn in_session<T>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut Session) -> T,
) -> Result<T, ApiError> {
    state
        .sessions
        .with_session(id, f)
        .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET / — the single-page UI.
async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let config = state.sessions.config();
    let mut context = tera::Context::new();
    context.insert("version", crate::VERSION);
    context.insert("sender", &config.sender);
    context.insert("personality", config.personality.as_str());
    Ok(Html(state.templates.render("index.html", &context)?))
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "muza",
    }))
}

/// POST /analyze — analyze, imprint, and collect the agent's reply.
///
/// Without `session_id` a new session is opened; an unknown id is a 404.
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }
    let session_id = match request.session_id {
        Some(id) => id,
        None => state.sessions.create(),
    };
    let text = request.text;
    let sender = state.sessions.config().sender.clone();

    let (analysis, report, muza_response, rgb) = in_session(&state, &session_id, |session| {
        let Session { bit, agent, rng, .. } = session;
        let report = bit.analyze(&text, rng);
        let analysis = describe(bit, &text);
        bit.imprint(&text);
        let reply = agent.perceive(&text, &sender, rng);
        (analysis, report, reply, bit.rgb())
    })?;

    tracing::info!(
        "session {}: {} chars, emotion={}, frequency={:.1}",
        session_id,
        text.chars().count(),
        report.emotion,
        report.frequency
    );

    Ok(Json(serde_json::json!({
        "session_id": session_id,
        "analysis": analysis,
        "report": report,
        "muza_response": muza_response,
        "color": rgb.hex(),
        "color_img": color_swatch(rgb),
    })))
}

/// GET /sessions/:id/stats
async fn stats_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let stats = in_session(&state, &id, |s| s.bit.stats())?;
    Ok(Json(serde_json::to_value(stats)?))
}

/// GET /sessions/:id/history
async fn history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let export = in_session(&state, &id, |s| serde_json::to_value(s.bit.export()))??;
    Ok(Json(export))
}

/// GET /sessions/:id/profile
async fn profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile = in_session(&state, &id, |s| s.agent.profile())?;
    Ok(Json(serde_json::to_value(profile)?))
}

/// POST /sessions/:id/mutate — body is optional.
async fn mutate_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<MutateRequest>>,
) -> Result<Json<Value>, ApiError> {
    let strength = body
        .and_then(|Json(req)| req.strength)
        .unwrap_or(DEFAULT_MUTATION_STRENGTH);
    let stats = in_session(&state, &id, |s| {
        let Session { bit, rng, .. } = s;
        bit.mutate(strength, rng);
        bit.stats()
    })?;
    tracing::info!("session {}: mutated with strength {}", id, strength);
    Ok(Json(serde_json::to_value(stats)?))
}

/// POST /sessions/:id/meditate
async fn meditate_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let reflection = in_session(&state, &id, |s| s.agent.meditate())?;
    Ok(Json(serde_json::json!({ "reflection": reflection })))
}

/// DELETE /sessions/:id
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id) {
        tracing::info!("session {} deleted", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(ServerConfig {
            seed: Some(2024),
            ..ServerConfig::default()
        })
        .unwrap()
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn analyze(state: &AppState, text: &str, session_id: Option<&str>) -> (StatusCode, Value) {
        let mut body = serde_json::json!({ "text": text });
        if let Some(id) = session_id {
            body["session_id"] = Value::from(id);
        }
        send(app_router(state.clone()), "POST", "/analyze", Some(body)).await
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, json) = send(app_router(test_state()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "muza");
    }

    #[tokio::test]
    async fn test_index_page_renders() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Кира"));
        assert!(html.contains("creative"));
        assert!(html.contains("/analyze"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_text() {
        let state = test_state();
        for text in ["", "   "] {
            let (status, json) = analyze(&state, text, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Текст пустой");
        }
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_missing_text_field() {
        let (status, json) = send(
            app_router(test_state()),
            "POST",
            "/analyze",
            Some(serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Текст пустой");
    }

    #[tokio::test]
    async fn test_analyze_opens_session() {
        let state = test_state();
        let (status, json) = analyze(&state, "Я люблю код и творчество!", None).await;
        assert_eq!(status, StatusCode::OK);

        let id = json["session_id"].as_str().unwrap();
        assert!(state.sessions.contains(id));
        assert_eq!(json["report"]["emotion"], "код");
        assert_eq!(json["report"]["name"], "Кира");
        assert!(json["analysis"].as_str().unwrap().starts_with("🌀 [Кира] → 'Я люблю код и творчество!'"));
        assert!(!json["muza_response"].as_str().unwrap().is_empty());

        let svg = BASE64.decode(json["color_img"].as_str().unwrap()).unwrap();
        let svg = String::from_utf8(svg).unwrap();
        assert!(svg.contains(json["color"].as_str().unwrap()));

        // imprint took the SHA-256 color of the text
        let expected = crate::hyperbit::Hsv::from_text_digest("Я люблю код и творчество!");
        assert_eq!(
            state.sessions.with_session(id, |s| s.bit.color()).unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn test_analyze_continues_session() {
        let state = test_state();
        let (_, first) = analyze(&state, "привет", None).await;
        let id = first["session_id"].as_str().unwrap().to_string();
        let (status, second) = analyze(&state, "мне грустно", Some(&id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["session_id"], id.as_str());
        assert_eq!(state.sessions.len(), 1);

        let (status, stats) = send(app_router(state.clone()), "GET", &format!("/sessions/{}/stats", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_analyses"], 2);

        let (_, profile) = send(app_router(state.clone()), "GET", &format!("/sessions/{}/profile", id), None).await;
        assert_eq!(profile["total_memories"], 2);
        assert_eq!(profile["mood"], "сочувствующая");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let state = test_state();
        let (status, json) = analyze(&state, "привет", Some("nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("nope"));

        for (method, path) in [
            ("GET", "/sessions/nope/stats"),
            ("GET", "/sessions/nope/history"),
            ("GET", "/sessions/nope/profile"),
            ("POST", "/sessions/nope/mutate"),
            ("POST", "/sessions/nope/meditate"),
            ("DELETE", "/sessions/nope"),
        ] {
            let (status, _) = send(app_router(state.clone()), method, path, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, path);
        }
    }

    #[tokio::test]
    async fn test_mutate_and_history() {
        let state = test_state();
        let id = state.sessions.create();

        let (status, stats) = send(
            app_router(state.clone()),
            "POST",
            &format!("/sessions/{}/mutate", id),
            Some(serde_json::json!({ "strength": 0.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_analyses"], 1);
        let energy = stats["current_energy"].as_f64().unwrap();
        assert!((0.1..=5.0).contains(&energy));

        // empty body falls back to the default strength
        let (status, _) = send(app_router(state.clone()), "POST", &format!("/sessions/{}/mutate", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, export) = send(app_router(state.clone()), "GET", &format!("/sessions/{}/history", id), None).await;
        assert_eq!(export["hyperbit"]["name"], "Кира");
        let history = export["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["text"], "MUTATION");
        assert_eq!(history[0]["emotion"], "мутация");
    }

    #[tokio::test]
    async fn test_mutate_accepts_any_finite_strength() {
        let state = test_state();
        let id = state.sessions.create();
        let uri = format!("/sessions/{}/mutate", id);

        for (i, strength) in [-0.5, 0.0, 1e308, -1e308, f64::MAX].into_iter().enumerate() {
            let (status, stats) = send(
                app_router(state.clone()),
                "POST",
                &uri,
                Some(serde_json::json!({ "strength": strength })),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "strength {}", strength);
            assert_eq!(stats["total_analyses"], i + 1);
            let energy = stats["current_energy"].as_f64().unwrap();
            assert!((0.1..=5.0).contains(&energy), "energy {}", energy);
        }

        let hue = state
            .sessions
            .with_session(&id, |s| s.bit.color().hue)
            .unwrap();
        assert!((0.0..1.0).contains(&hue));
    }

    #[tokio::test]
    async fn test_meditate() {
        let state = test_state();
        let id = state.sessions.create();
        let (status, json) = send(app_router(state.clone()), "POST", &format!("/sessions/{}/meditate", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["reflection"].as_str().unwrap().starts_with("🌟 Размышления Муза:"));
        let energy = state.sessions.with_session(&id, |s| s.agent.core_bit().energy()).unwrap();
        assert!((energy - 2.4).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let state = test_state();
        let id = state.sessions.create();
        let (status, body) = send(app_router(state.clone()), "DELETE", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        assert!(!state.sessions.contains(&id));
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_state() {
        let state = test_state();
        let (_, a) = analyze(&state, "хаос", None).await;
        let (_, b) = analyze(&state, "код", None).await;
        let a = a["session_id"].as_str().unwrap().to_string();
        let b = b["session_id"].as_str().unwrap().to_string();
        assert_ne!(a, b);

        analyze(&state, "ещё хаос", Some(&a)).await;
        let count = |id: &str| state.sessions.with_session(id, |s| s.bit.history().len()).unwrap();
        assert_eq!(count(&a), 2);
        assert_eq!(count(&b), 1);
    }

    #[test]
    fn test_color_swatch_is_svg() {
        let encoded = color_swatch(Rgb { r: 255, g: 0, b: 16 });
        let svg = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"fill="#ff0010""##));
    }
}
