//! End-to-end tests of the flow-inspection state protocol: advance
//! signals, fetch outcomes, render modes, and teardown.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use flowscope::api::{ApiError, SnapshotSource};
use flowscope::inspector::{
    project, AdvanceBus, FlowObserver, RenderModel, StageDetail, StepMark, ViewState,
};
use flowscope::types::FlowInspection;

/// Snapshot source that serves scripted outcomes in order and counts
/// calls, so tests can assert that teardown stops fetching.
struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<FlowInspection, ApiError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(outcomes: Vec<Result<FlowInspection, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_inspection(&self, _flow_slug: &str) -> Result<FlowInspection, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(FlowInspection::default()))
    }
}

fn snapshot(value: serde_json::Value) -> FlowInspection {
    serde_json::from_value(value).unwrap()
}

fn observer_with(
    source: &Arc<ScriptedSource>,
    bus: &AdvanceBus,
) -> FlowObserver {
    let handle: Arc<dyn SnapshotSource> = source.clone();
    FlowObserver::new("default-authentication-flow", handle, bus)
}

#[tokio::test]
async fn advance_signal_drives_fetch_and_populates_view() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![Ok(snapshot(json!({
        "isCompleted": false,
        "currentPlan": {"sessionId": "s1"},
        "plans": []
    })))]);
    let mut observer = observer_with(&source, &bus);

    assert!(matches!(project(observer.view()), RenderModel::Loading));

    bus.notify();
    assert!(observer.signal_pending());
    observer.refresh().await;

    assert_eq!(source.calls(), 1);
    match project(observer.view()) {
        RenderModel::Populated(view) => assert_eq!(view.session_id, "s1"),
        other => panic!("expected Populated, got {:?}", other),
    }
}

#[tokio::test]
async fn state_is_always_exactly_one_variant() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![
        Ok(snapshot(json!({"plans": [], "isCompleted": false}))),
        Err(ApiError::Forbidden),
        Ok(snapshot(json!({"plans": [], "isCompleted": true}))),
    ]);
    let mut observer = observer_with(&source, &bus);

    for _ in 0..3 {
        observer.refresh().await;
        // The tagged union makes stale combinations unrepresentable;
        // check the projection agrees: exactly one mode at a time.
        let model = project(observer.view());
        match model {
            RenderModel::Loading | RenderModel::Denied { .. } | RenderModel::Populated(_) => {}
        }
    }

    // Last outcome was a success; no trace of the earlier error remains
    assert!(matches!(observer.view(), ViewState::Populated(_)));
}

#[tokio::test]
async fn scenario_a_next_stage_is_sanitized() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![Ok(snapshot(json!({
        "isCompleted": false,
        "currentPlan": {
            "nextPlannedStage": {
                "stageObj": {
                    "name": "Login",
                    "verboseName": "Login Stage",
                    "flowSet": [{"slug": "default-authentication-flow"}]
                }
            }
        },
        "plans": []
    })))]);
    let mut observer = observer_with(&source, &bus);

    observer.refresh().await;

    let view = match project(observer.view()) {
        RenderModel::Populated(view) => view,
        other => panic!("expected Populated, got {:?}", other),
    };
    assert_eq!(view.next_stage.name, "Login");
    assert_eq!(view.next_stage.verbose_name, "Login Stage");
    match &view.next_stage.detail {
        StageDetail::Object(body) => assert!(!body.contains("flowSet")),
        StageDetail::FlowCompleted => panic!("flow is not completed"),
    }
}

#[tokio::test]
async fn scenario_b_completion_message_replaces_stage_object() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![Ok(snapshot(json!({
        "isCompleted": true,
        "currentPlan": {
            "nextPlannedStage": {"stageObj": {"name": "Done"}}
        }
    })))]);
    let mut observer = observer_with(&source, &bus);

    observer.refresh().await;

    let view = match project(observer.view()) {
        RenderModel::Populated(view) => view,
        other => panic!("expected Populated, got {:?}", other),
    };
    assert_eq!(view.next_stage.detail, StageDetail::FlowCompleted);
    // Nothing is current or pending after completion
    assert!(view.history.iter().all(|e| e.mark == StepMark::Completed));
}

#[tokio::test]
async fn scenario_c_error_supersedes_populated_snapshot() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![
        Ok(snapshot(json!({
            "isCompleted": false,
            "currentPlan": {"sessionId": "visible-before-error"},
            "plans": []
        }))),
        Err(ApiError::Forbidden),
    ]);
    let mut observer = observer_with(&source, &bus);

    observer.refresh().await;
    assert!(matches!(project(observer.view()), RenderModel::Populated(_)));

    observer.refresh().await;
    match project(observer.view()) {
        RenderModel::Denied { status_text } => assert_eq!(status_text, "Forbidden"),
        other => panic!("expected Denied, got {:?}", other),
    }
}

#[tokio::test]
async fn scenario_d_stale_completion_is_discarded() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![]);
    let mut observer = observer_with(&source, &bus);

    // Two advance signals fire before either fetch resolves
    let first = observer.begin_refresh();
    let second = observer.begin_refresh();

    let s2 = snapshot(json!({
        "isCompleted": false,
        "currentPlan": {"sessionId": "s2"},
        "plans": []
    }));
    let s1 = snapshot(json!({
        "isCompleted": false,
        "currentPlan": {"sessionId": "s1"},
        "plans": []
    }));

    // The second (newest) request resolves first and is applied
    assert!(observer.complete_refresh(second, Ok(s2)));
    // The first request resolves afterwards and must be discarded
    assert!(!observer.complete_refresh(first, Ok(s1)));

    match project(observer.view()) {
        RenderModel::Populated(view) => assert_eq!(view.session_id, "s2"),
        other => panic!("expected Populated, got {:?}", other),
    }
}

#[tokio::test]
async fn plan_history_preserves_order_and_marks() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![Ok(snapshot(json!({
        "isCompleted": false,
        "currentPlan": {
            "currentStage": {"stageObj": {"name": "password", "verboseName": "Password Stage"}},
            "nextPlannedStage": {"stageObj": {"name": "mfa", "verboseName": "MFA Stage"}}
        },
        "plans": [
            {"currentStage": {"stageObj": {"name": "identification"}}},
            {"currentStage": {"stageObj": {"name": "captcha"}}},
            {"currentStage": {"stageObj": {"name": "consent"}}}
        ]
    })))]);
    let mut observer = observer_with(&source, &bus);

    observer.refresh().await;

    let view = match project(observer.view()) {
        RenderModel::Populated(view) => view,
        other => panic!("expected Populated, got {:?}", other),
    };
    let rows: Vec<(&str, StepMark)> = view
        .history
        .iter()
        .map(|e| (e.name.as_str(), e.mark))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("identification", StepMark::Completed),
            ("captcha", StepMark::Completed),
            ("consent", StepMark::Completed),
            ("password", StepMark::Current),
            ("mfa", StepMark::Pending),
        ]
    );
}

#[tokio::test]
async fn detached_observer_ignores_broadcasts() {
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![]);
    let observer = observer_with(&source, &bus);
    assert_eq!(bus.subscriber_count(), 1);

    observer.detach();

    // The broadcast reaches nobody and no fetch happens
    assert_eq!(bus.notify(), 0);
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn long_session_token_survives_projection() {
    let token = "x".repeat(4096);
    let bus = AdvanceBus::default();
    let source = ScriptedSource::new(vec![Ok(snapshot(json!({
        "isCompleted": false,
        "currentPlan": {"sessionId": token},
        "plans": []
    })))]);
    let mut observer = observer_with(&source, &bus);

    observer.refresh().await;

    match project(observer.view()) {
        RenderModel::Populated(view) => assert_eq!(view.session_id.len(), 4096),
        other => panic!("expected Populated, got {:?}", other),
    }
}
