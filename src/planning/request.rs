// planning/request.rs

// Motion plan request and response. Requests are treated as immutable input;
// adapters that need to change them work on a clone.

// Dependencies
use super::trajectory::RobotTrajectory;
use crate::model::RobotStateMsg;
use serde::{Deserialize, Serialize};

/// Input to a planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPlanRequest {
    /// Planning group; empty means the whole robot
    #[serde(default)]
    pub group_name: String,
    /// Start state, overlaid on the scene's current state
    #[serde(default)]
    pub start_state: RobotStateMsg,
    /// Goal joint positions
    #[serde(default)]
    pub goal_state: RobotStateMsg,
    /// Planner to use; empty selects the default
    #[serde(default)]
    pub planner_id: String,
    /// Time budget in seconds
    #[serde(default = "default_planning_time")]
    pub allowed_planning_time: f64,
    /// Number of planning attempts
    #[serde(default = "default_attempts")]
    pub num_planning_attempts: u32,
}

fn default_planning_time() -> f64 {
    5.0
}

fn default_attempts() -> u32 {
    1
}

impl Default for MotionPlanRequest {
    fn default() -> Self {
        MotionPlanRequest {
            group_name: String::new(),
            start_state: RobotStateMsg::default(),
            goal_state: RobotStateMsg::default(),
            planner_id: String::new(),
            allowed_planning_time: default_planning_time(),
            num_planning_attempts: default_attempts(),
        }
    }
}

/// Planner result code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanningErrorCode {
    /// Not set by the planner
    #[default]
    Unset,
    /// Plan found
    Success,
    /// Generic failure
    PlanningFailed,
    /// The start state was rejected
    InvalidStartState,
    /// The goal could not be reached
    InvalidGoal,
    /// Time budget exhausted
    TimedOut,
}

/// Output of a planner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionPlanResponse {
    /// Planned trajectory, if any
    pub trajectory: Option<RobotTrajectory>,
    /// Planner result code
    pub error_code: PlanningErrorCode,
    /// Seconds spent planning
    pub planning_time: f64,
}

impl MotionPlanResponse {
    /// Number of waypoints in the trajectory, 0 if there is none
    pub fn waypoint_count(&self) -> usize {
        self.trajectory.as_ref().map_or(0, RobotTrajectory::len)
    }
}
