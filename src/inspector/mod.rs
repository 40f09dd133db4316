//! Core flow-inspection state model.
//!
//! This module is the heart of flowscope: it keeps a local view of a
//! server-driven, multi-stage flow consistent as the flow advances.
//!
//! - [`signal`]: the advance-signal bus (subscribe/notify)
//! - [`observer`]: the synchronization protocol around a single flow's
//!   view state
//! - [`sanitize`]: stage-object sanitization before display
//! - [`view`]: projection of the view state into a renderable model

pub mod observer;
pub mod sanitize;
pub mod signal;
pub mod view;

pub use observer::{FlowObserver, RefreshTicket, ViewState};
pub use sanitize::{sanitize_stage, sanitize_stage_value};
pub use signal::{AdvanceBus, AdvanceSubscription};
pub use view::{
    project, HistoryEntry, InspectionView, NextStageBlock, RenderModel, StageDetail, StepMark,
};
