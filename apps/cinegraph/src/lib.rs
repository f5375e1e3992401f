//! # cinegraph
//!
//! The Cinegraph application library: HTTP API and CLI over the
//! deterministic catalogue engine in `cinegraph-core`.

pub mod api;
pub mod cli;
