// planning/scene.rs

// Planning scene: the robot model plus the robot's current state. Adapters only
// read the scene; they clone the current state before changing anything.

// Dependencies
use crate::model::{RobotModel, RobotState};
use std::sync::Arc;

/// World snapshot a planner works against
#[derive(Debug, Clone)]
pub struct PlanningScene {
    name: String,
    robot_model: Arc<RobotModel>,
    current_state: RobotState,
}

impl PlanningScene {
    /// Scene with the robot in its default state
    pub fn new(name: &str, robot_model: Arc<RobotModel>) -> Self {
        let current_state = RobotState::from_model(&robot_model);
        PlanningScene {
            name: name.to_string(),
            robot_model,
            current_state,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared robot model
    pub fn robot_model(&self) -> &Arc<RobotModel> {
        &self.robot_model
    }

    /// Robot state as last reported
    pub fn current_state(&self) -> &RobotState {
        &self.current_state
    }

    /// Replaces the current state
    pub fn set_current_state(&mut self, state: RobotState) {
        self.current_state = state;
    }
}
