//! Projection of the tracked view state into a renderable model.
//!
//! `project` is pure and total: any combination of missing optional
//! fields renders as placeholders or omitted entries, never an error.
//! The output is plain data; the TUI panel (or the one-shot CLI printer)
//! only draws it.

use serde_json::Value;

use crate::types::{FlowInspection, PlanStageBinding};

use super::observer::ViewState;
use super::sanitize::sanitize_stage;

/// Placeholder for absent stage names in the next-stage block.
const PLACEHOLDER: &str = "-";

/// One of three mutually exclusive render modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderModel {
    /// Neither snapshot nor error yet
    Loading,
    /// A fetch failed; snapshot content is not shown
    Denied { status_text: String },
    /// A snapshot is available
    Populated(InspectionView),
}

/// Renderable projection of an inspection snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionView {
    pub next_stage: NextStageBlock,
    pub history: Vec<HistoryEntry>,
    /// Pretty-printed plan context; `null` when absent
    pub plan_context: String,
    /// Opaque session token, may be arbitrarily long
    pub session_id: String,
}

/// The upcoming-stage block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextStageBlock {
    pub name: String,
    pub verbose_name: String,
    pub detail: StageDetail,
}

/// Body of the next-stage block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageDetail {
    /// The flow has finished; no stage object is shown
    FlowCompleted,
    /// Pretty-printed sanitized stage object
    Object(String),
}

/// One row of the plan history stepper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub name: String,
    pub verbose_name: String,
    pub mark: StepMark,
}

/// How a history row is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    /// Step ran successfully
    Completed,
    /// The stage that just executed
    Current,
    /// The stage about to run
    Pending,
}

/// Derive the render model for the current view state.
pub fn project(view: &ViewState) -> RenderModel {
    match view {
        ViewState::Loading => RenderModel::Loading,
        ViewState::Failed(error) => RenderModel::Denied {
            status_text: error.status_text(),
        },
        ViewState::Populated(snapshot) => RenderModel::Populated(project_snapshot(snapshot)),
    }
}

fn project_snapshot(snapshot: &FlowInspection) -> InspectionView {
    let current_plan = snapshot.current_plan.as_ref();
    let next_binding = current_plan.and_then(|p| p.next_planned_stage.as_ref());
    let next_stage_obj = next_binding.and_then(|b| b.stage_obj.as_ref());

    let next_stage = NextStageBlock {
        name: display_or_placeholder(next_stage_obj.map(|s| s.name.as_str())),
        verbose_name: display_or_placeholder(
            next_stage_obj.and_then(|s| s.verbose_name.as_deref()),
        ),
        detail: if snapshot.is_completed {
            StageDetail::FlowCompleted
        } else {
            StageDetail::Object(pretty(&sanitize_stage(next_stage_obj).unwrap_or(Value::Null)))
        },
    };

    let mut history: Vec<HistoryEntry> = snapshot
        .plans
        .iter()
        .map(|entry| history_entry(&entry.current_stage, StepMark::Completed))
        .collect();

    // Nothing is current or pending once the flow has completed
    if !snapshot.is_completed {
        if let Some(binding) = current_plan.and_then(|p| p.current_stage.as_ref()) {
            history.push(history_entry(binding, StepMark::Current));
        }
        if let Some(binding) = next_binding {
            history.push(history_entry(binding, StepMark::Pending));
        }
    }

    let plan_context = pretty(
        current_plan
            .and_then(|p| p.plan_context.as_ref())
            .unwrap_or(&Value::Null),
    );

    let session_id = current_plan
        .and_then(|p| p.session_id.clone())
        .unwrap_or_default();

    InspectionView {
        next_stage,
        history,
        plan_context,
        session_id,
    }
}

fn history_entry(binding: &PlanStageBinding, mark: StepMark) -> HistoryEntry {
    let stage = binding.stage_obj.as_ref();
    HistoryEntry {
        name: stage.map(|s| s.name.clone()).unwrap_or_default(),
        verbose_name: stage
            .and_then(|s| s.verbose_name.clone())
            .unwrap_or_default(),
        mark,
    }
}

fn display_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
