//! flowscope - Terminal inspector for server-driven authentication flows
//!
//! Tracks a flow's execution state through its inspection endpoint:
//! on each advance signal the observer fetches a fresh snapshot, and the
//! projection layer turns it into a renderable model (next stage, plan
//! history, plan context, session id) or an error panel.

pub mod api;
pub mod app;
pub mod config;
pub mod inspector;
pub mod logging;
pub mod types;
pub mod ui;
