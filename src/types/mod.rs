//! Wire types shared between the API client and the inspector core.

pub mod flow;

pub use flow::{
    CurrentInspectionPlan, FlowInspection, InspectionPlanEntry, PlanStageBinding, Stage,
};
