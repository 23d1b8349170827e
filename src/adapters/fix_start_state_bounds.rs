// adapters/fix_start_state_bounds.rs

// Planning request adapter that makes sure the planner starts from a state
// inside the joint limits. Encoder noise that leaves a joint just outside its
// range is corrected in a working copy of the start state; after planning, the
// reported state is spliced back in as the first waypoint so the trajectory
// still starts where the robot actually is. Joints far out of range are only
// reported; the planner decides whether to reject them.

// Dependencies
use super::corrector::correct_bounds;
use super::normalizer::normalize_joints;
use super::patcher::patch_trajectory;
use super::{AdapterOutcome, PlanningRequestAdapter};
use crate::AdapterError;
use crate::config::{FixStartStateBoundsConfig, ParameterSource};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::RobotState;
use crate::planning::{MotionPlanRequest, MotionPlanResponse, Planner, PlanningScene};
use std::borrow::Cow;

/// Name the adapter is registered under
pub const ADAPTER_NAME: &str = "fix_start_state_bounds";

const DESCRIPTION: &str = "Fix Start State Bounds";

/// Start state bounds correction and trajectory repair
#[derive(Debug, Clone)]
pub struct FixStartStateBounds {
    config: FixStartStateBoundsConfig, // Read-only after construction
}

impl FixStartStateBounds {
    /// Creates the adapter from validated tolerances
    pub fn new(config: FixStartStateBoundsConfig) -> Result<Self, AdapterError> {
        config.validate()?;
        Ok(FixStartStateBounds { config })
    }

    /// Reads the tolerances from `namespace` of `params`
    pub fn from_params(params: &ParameterSource, namespace: &str) -> Result<Self, AdapterError> {
        Self::new(FixStartStateBoundsConfig::from_params(params, namespace)?)
    }

    /// Active tolerances
    pub fn config(&self) -> &FixStartStateBoundsConfig {
        &self.config
    }
}

impl PlanningRequestAdapter for FixStartStateBounds {
    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn adapt(
        &self,
        planner: &dyn Planner,
        scene: &PlanningScene,
        request: &MotionPlanRequest,
        mut added_path_index: Vec<usize>,
        diagnostics: &dyn DiagnosticSink,
    ) -> AdapterOutcome {
        diagnostics.emit(Diagnostic::debug(format!("Running '{}'", self.description())));

        // Resolve the start state the request refers to
        let model = scene.robot_model();
        let mut start_state = scene.current_state().clone();
        if let Err(e) = start_state.apply_message(model, &request.start_state) {
            diagnostics.emit(Diagnostic::warning(
                None,
                format!("Unable to interpret the requested start state ({}); forwarding request unchanged", e),
            ));
            let mut response = MotionPlanResponse::default();
            let success = planner.plan(scene, request, &mut response);
            return AdapterOutcome { response, success, added_path_index };
        }

        // Normalize, then correct what is within tolerance
        let joints = model.active_joint_models(&request.group_name);
        let normalized = normalize_joints(&mut start_state, &joints);
        let correction = correct_bounds(&mut start_state, &joints, self.config.bounds_tolerance, diagnostics);
        let change_req = normalized || correction.changed();

        // Plan from the amended request
        let forwarded = rewrite_request(request, &start_state, change_req);
        let mut response = MotionPlanResponse::default();
        let success = planner.plan(scene, &forwarded, &mut response);

        // Prepend the reported start state if anything was corrected
        if let Some(snapshot) = correction.snapshot {
            if let Err(e) =
                patch_trajectory(&mut response, snapshot, self.config.max_prefix_duration, &mut added_path_index)
            {
                diagnostics.emit(Diagnostic::warning(None, format!("Unable to prepend start state: {}", e)));
            }
        }

        AdapterOutcome { response, success, added_path_index }
    }
}

/// Returns `request` untouched when nothing changed, otherwise a clone whose
/// start state is replaced by `start_state`
pub fn rewrite_request<'a>(
    request: &'a MotionPlanRequest,
    start_state: &RobotState,
    change_req: bool,
) -> Cow<'a, MotionPlanRequest> {
    if !change_req {
        return Cow::Borrowed(request);
    }
    let mut amended = request.clone();
    amended.start_state = start_state.to_message();
    Cow::Owned(amended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, Severity};
    use crate::model::{JointModel, RobotModel, RobotStateMsg};
    use crate::planning::{MockPlanner, PlanningErrorCode, RobotTrajectory};
    use std::sync::Arc;

    fn scene() -> PlanningScene {
        let model = RobotModel::new("r")
            .with_joint(JointModel::revolute("shoulder", -1.0, 1.0))
            .and_then(|m| m.with_joint(JointModel::continuous("elbow")))
            .and_then(|m| m.with_group("arm", &["shoulder", "elbow"]))
            .unwrap();
        PlanningScene::new("test", Arc::new(model))
    }

    fn adapter() -> FixStartStateBounds {
        FixStartStateBounds::new(FixStartStateBoundsConfig::default()).unwrap()
    }

    // Planner that returns a two-waypoint trajectory starting at the request's start state
    fn echo_planner(success: bool) -> MockPlanner {
        let mut planner = MockPlanner::new();
        planner.expect_plan().times(1).returning(move |scene, request, response| {
            let model = scene.robot_model();
            let mut start = scene.current_state().clone();
            start.apply_message(model, &request.start_state).unwrap();
            let mut trajectory = RobotTrajectory::new(&request.group_name);
            trajectory.add_suffix_waypoint(start.clone(), 0.0);
            trajectory.add_suffix_waypoint(start, 2.0);
            response.trajectory = Some(trajectory);
            response.error_code = if success { PlanningErrorCode::Success } else { PlanningErrorCode::PlanningFailed };
            success
        });
        planner
    }

    #[test]
    fn test_description() {
        assert_eq!(adapter().description(), "Fix Start State Bounds");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FixStartStateBoundsConfig { bounds_tolerance: -1.0, max_prefix_duration: 0.5 };
        assert!(FixStartStateBounds::new(config).is_err());
    }

    #[test]
    fn test_rewrite_only_when_changed() {
        let scene = scene();
        let request = MotionPlanRequest { group_name: "arm".to_string(), ..Default::default() };
        let state = scene.current_state().clone();

        assert!(matches!(rewrite_request(&request, &state, false), Cow::Borrowed(_)));
        let amended = rewrite_request(&request, &state, true);
        assert_eq!(amended.start_state, state.to_message());
        assert_eq!(amended.group_name, "arm");
    }

    #[test]
    fn test_correctable_start_gets_prefix() {
        let scene = scene();
        let request = MotionPlanRequest {
            group_name: "arm".to_string(),
            start_state: RobotStateMsg::default().with_joint("shoulder", &[1.02]),
            ..Default::default()
        };
        let sink = CollectingSink::new();
        let outcome = adapter().adapt(&echo_planner(true), &scene, &request, vec![1], &sink);

        assert!(outcome.success);
        let trajectory = outcome.response.trajectory.unwrap();
        assert_eq!(trajectory.len(), 3);
        let shoulder = scene.robot_model().joint_model("shoulder").unwrap();
        assert_eq!(trajectory.waypoint(0).unwrap().joint_positions(shoulder), &[1.02]);
        assert_eq!(trajectory.waypoint(1).unwrap().joint_positions(shoulder), &[1.0]);
        assert_eq!(trajectory.duration_from_previous(1), Some(0.5));
        assert_eq!(outcome.added_path_index, vec![2, 0]);
        assert_eq!(sink.with_severity(Severity::Debug)[0].message, "Running 'Fix Start State Bounds'");
    }

    #[test]
    fn test_failed_plan_still_reported_as_failure() {
        let scene = scene();
        let request = MotionPlanRequest {
            start_state: RobotStateMsg::default().with_joint("shoulder", &[-1.01]),
            ..Default::default()
        };
        let outcome = adapter().adapt(&echo_planner(false), &scene, &request, Vec::new(), &CollectingSink::new());

        assert!(!outcome.success);
        assert_eq!(outcome.response.error_code, PlanningErrorCode::PlanningFailed);
    }

    #[test]
    fn test_unknown_joint_forwards_original_request() {
        let scene = scene();
        let request = MotionPlanRequest {
            start_state: RobotStateMsg::default().with_joint("gripper", &[0.3]),
            ..Default::default()
        };
        let expected = request.clone();
        let mut planner = MockPlanner::new();
        planner.expect_plan().times(1).returning(move |_, forwarded, _| {
            assert_eq!(forwarded, &expected);
            false
        });

        let sink = CollectingSink::new();
        let outcome = adapter().adapt(&planner, &scene, &request, vec![3], &sink);

        assert!(!outcome.success);
        assert_eq!(outcome.added_path_index, vec![3]);
        let warnings = sink.with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("gripper"));
    }
}
