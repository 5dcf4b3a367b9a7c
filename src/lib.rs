//! # Stud-Bud backend
//!
//! Small multi-tenant study assistant API. Clients register and log in with a
//! username/password pair, receive a signed bearer token, and call tutoring
//! routes (`/elia5`, `/revision`, `/quiz`) that forward a topic to the Gemini
//! `generateContent` API behind a fixed instructional prefix.
//!
//! ## Sessions
//!
//! Sessions are stateless: a token is an HS256 JWT carrying `{username, id}`
//! plus an expiry, verified on every protected request. There is no server-side
//! session record, which means no revocation before expiry — an accepted
//! trade-off for running without a session store.
//!
//! ## Request pipeline
//!
//! Every inbound request passes origin admission, then the fixed-window rate
//! limiter, then (on protected routes) the bearer-token guard, before reaching
//! its handler. Failures are translated into a uniform
//! `{ success, data, message }` envelope; provider and database detail is
//! logged server-side and never serialized to clients.

pub mod api;
pub mod cli;
pub mod genai;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
