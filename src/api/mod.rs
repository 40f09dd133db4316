//! Backend API client for the flow inspection endpoint.

pub mod error;
pub mod flows;

pub use error::ApiError;
pub use flows::{FlowsClient, SnapshotSource};
