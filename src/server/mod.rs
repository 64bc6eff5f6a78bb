//! HTTP server exposing HyperBit sessions and the Муза agent.
//!
//! Every browser conversation is a session owning its own bit, agent and
//! generator; see [`session::SessionStore`].
//!
//! # Endpoints
//!
//! - `GET  /`         — Single-page UI
//! - `GET  /health`   — Liveness probe
//! - `POST /analyze`  — Analyze text within a session
//! - `/sessions/:id/*` — Inspect, mutate, meditate, delete

pub mod error;
pub mod routes;
pub mod session;

pub use error::ApiError;
pub use routes::{app_router, AppState};
pub use session::{Session, SessionStore};
