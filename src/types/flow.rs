//! Flow inspection snapshot types.
//!
//! These mirror the backend's camelCase JSON for the flow inspector
//! endpoint. A snapshot is a point-in-time read of a flow's execution
//! plan: which stages ran, which is current, which is planned next.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The state of a flow's execution at a point in time.
///
/// A fresh snapshot fully replaces the previous one on every refresh;
/// there is no incremental patching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowInspection {
    /// The plan currently being executed, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<CurrentInspectionPlan>,

    /// Historical plan entries for completed steps.
    /// Insertion order is execution order and must be preserved.
    #[serde(default)]
    pub plans: Vec<InspectionPlanEntry>,

    /// True once the flow has finished; after that, `next_planned_stage`
    /// is no longer pending work.
    #[serde(default)]
    pub is_completed: bool,
}

/// The in-progress plan of the inspected flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentInspectionPlan {
    /// The stage that just executed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<PlanStageBinding>,

    /// The stage about to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_planned_stage: Option<PlanStageBinding>,

    /// Accumulated workflow data, arbitrary key→value map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_context: Option<Value>,

    /// Opaque session token for the flow execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// One completed step in the plan history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionPlanEntry {
    /// The stage binding that was executed for this step
    #[serde(default)]
    pub current_stage: PlanStageBinding,
}

/// A stage slot in a plan, binding the plan position to a stage object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStageBinding {
    /// The bound stage, absent when the backend elides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_obj: Option<Stage>,
}

/// A unit of workflow execution.
///
/// `flow_set` is the back-reference to the owning flow definition. It is
/// large and cyclic on the server side and must never reach the display;
/// see [`crate::inspector::sanitize_stage`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Machine name of the stage
    #[serde(default)]
    pub name: String,

    /// Human label for the stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,

    /// Stage kind (e.g. "identification", "password")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Back-reference to the owning flow definition; stripped before display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_set: Option<Value>,

    /// Stage-specific configuration fields, passed through for display
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
