// adapters/patcher.rs

// Re-inserts the reported start state in front of a planned trajectory once the
// planner has worked from a corrected copy. The new first segment gets a
// heuristic duration: the trajectory's average segment duration, capped.

// Dependencies
use crate::AdapterError;
use crate::model::RobotState;
use crate::planning::{MotionPlanResponse, RobotTrajectory};

/// Duration of the synthetic first segment
pub fn prefix_duration(trajectory: &RobotTrajectory, max_prefix_duration: f64) -> f64 {
    max_prefix_duration.min(trajectory.average_segment_duration())
}

/// Prepends `snapshot` to the response trajectory and shifts the tracked
/// waypoint indices to match. Does nothing when the response has no
/// trajectory or an empty one; returns whether the trajectory was patched.
pub fn patch_trajectory(
    response: &mut MotionPlanResponse,
    snapshot: RobotState,
    max_prefix_duration: f64,
    added_path_index: &mut Vec<usize>,
) -> Result<bool, AdapterError> {
    let trajectory = match response.trajectory.as_mut() {
        Some(trajectory) if !trajectory.is_empty() => trajectory,
        _ => return Ok(false),
    };

    let dt = prefix_duration(trajectory, max_prefix_duration);
    trajectory.set_waypoint_duration_from_previous(0, dt)?;
    trajectory.add_prefix_waypoint(snapshot, 0.0);

    for index in added_path_index.iter_mut() {
        *index += 1;
    }
    added_path_index.push(0);
    Ok(true)
}
