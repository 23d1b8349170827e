// src/main.rs
// Demo entry point: runs the start state bounds adapter in front of a simple
// joint-space planner and logs the trajectory it produces.

// Imports dependencies and Eos adapter modules.
// - env_logger: Logging for debugging (set RUST_LOG=info to see diagnostics).
// - eos_adapters: Robot model, planning types and the adapter registry.
use eos_adapters::adapters::FIX_START_STATE_BOUNDS;
use eos_adapters::{
    AdapterRegistry, LogSink, MotionPlanRequest, MotionPlanResponse, ParameterSource, PlanningErrorCode,
    PlanningScene, RobotModel, RobotState, RobotStateMsg, RobotTrajectory,
};
use log::{error, info};
use std::error::Error;
use std::sync::Arc;

const DEFAULT_ROBOT: &str = "config/demo_robot.yaml";
const DEFAULT_PARAMS: &str = "config/adapters.yaml";
const PARAM_NAMESPACE: &str = "planning_adapters.fix_start_state_bounds";

// Interpolation steps between start and goal, and time per step (seconds)
const STEPS: usize = 4;
const STEP_DT: f64 = 0.8;

/// Straight line in joint space from the request's start state to its goal.
/// Stands in for a real planner; it rejects start states outside the limits.
fn straight_line_planner(scene: &PlanningScene, request: &MotionPlanRequest, response: &mut MotionPlanResponse) -> bool {
    let model = scene.robot_model();
    let mut start = scene.current_state().clone();
    let mut goal = scene.current_state().clone();
    if start.apply_message(model, &request.start_state).is_err() || goal.apply_message(model, &request.goal_state).is_err() {
        response.error_code = PlanningErrorCode::PlanningFailed;
        return false;
    }

    let joints = model.active_joint_models(&request.group_name);
    if let Some(joint) = joints.iter().find(|jm| !start.satisfies_bounds(jm, 0.0)) {
        error!("Planner rejected start state: joint '{}' is out of bounds", joint.name());
        response.error_code = PlanningErrorCode::InvalidStartState;
        return false;
    }

    let mut trajectory = RobotTrajectory::new(&request.group_name);
    for step in 0..=STEPS {
        let t = step as f64 / STEPS as f64;
        let mut waypoint: RobotState = start.clone();
        for jm in &joints {
            let values: Vec<f64> = start
                .joint_positions(jm)
                .iter()
                .zip(goal.joint_positions(jm))
                .map(|(a, b)| a + (b - a) * t)
                .collect();
            waypoint.set_joint_positions(jm, &values);
            waypoint.enforce_bounds(jm);
        }
        trajectory.add_suffix_waypoint(waypoint, if step == 0 { 0.0 } else { STEP_DT });
    }

    response.trajectory = Some(trajectory);
    response.error_code = PlanningErrorCode::Success;
    true
}

/// Main function: loads the robot and parameters, then plans once from a
/// start state that sits slightly outside the shoulder's limits.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let robot_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_ROBOT);
    let params_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_PARAMS);

    let model = Arc::new(RobotModel::from_file(robot_path)?);
    let params = ParameterSource::from_file(params_path)?;
    info!("Robot '{}' loaded from {}", model.name(), robot_path);
    info!("Planning groups: {}", model.group_names().collect::<Vec<_>>().join(", "));

    let registry = AdapterRegistry::with_defaults();
    let adapter = registry.create(FIX_START_STATE_BOUNDS, &params, PARAM_NAMESPACE)?;

    let scene = PlanningScene::new("demo", model.clone());
    let request = MotionPlanRequest {
        group_name: "arm".to_string(),
        start_state: RobotStateMsg::default()
            .with_joint("shoulder", &[1.59])
            .with_joint("elbow", &[7.5]),
        goal_state: RobotStateMsg::default()
            .with_joint("shoulder", &[0.0])
            .with_joint("elbow", &[1.0]),
        ..Default::default()
    };

    info!("Planning for group '{}' in scene '{}'", request.group_name, scene.name());
    let outcome = adapter.adapt(&straight_line_planner, &scene, &request, Vec::new(), &LogSink::default());
    info!("Planning {} ({:?})", if outcome.success { "succeeded" } else { "failed" }, outcome.response.error_code);

    if let Some(trajectory) = &outcome.response.trajectory {
        info!("Trajectory for '{}' has {} waypoints", trajectory.group_name(), trajectory.len());
        for index in 0..trajectory.len() {
            if let Some(waypoint) = trajectory.waypoint(index) {
                let positions: Vec<String> =
                    waypoint.positions().map(|(name, values)| format!("{}={:?}", name, values)).collect();
                info!(
                    "#{} +{:.2}s {}",
                    index,
                    trajectory.duration_from_previous(index).unwrap_or(0.0),
                    positions.join(" ")
                );
            }
        }
        info!("Waypoints added by adapters: {:?}", outcome.added_path_index);
    }

    Ok(())
}
