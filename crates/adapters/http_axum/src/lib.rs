//! # winctl-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON API** over the entity store
//!   (`/api/entities`, `/api/devices`, `/api/events/stream`)
//! - Let an operator press a button or send a key by writing an entity value
//!   (`PUT /api/entities/{path}`); the write goes through the store, so the
//!   bridge listener reacts to it like to any other change
//! - Map store results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `winctl-app` (for port traits) and `winctl-domain` (for domain
//! types used in request/response mapping). Never leaks axum types into the
//! domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
