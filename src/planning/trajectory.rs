// planning/trajectory.rs

// Planned robot trajectory: a sequence of waypoints, each stored with the time
// elapsed since the waypoint before it. Waypoints and durations are kept in
// lock-step so index i always refers to the same sample in both.

// Dependencies
use crate::AdapterError;
use crate::model::RobotState;
use std::collections::VecDeque;

/// Timed sequence of robot states for one planning group
#[derive(Debug, Clone, PartialEq)]
pub struct RobotTrajectory {
    group_name: String,
    waypoints: VecDeque<RobotState>,
    durations_from_previous: VecDeque<f64>, // Seconds, one per waypoint
}

impl RobotTrajectory {
    /// Creates an empty trajectory for `group_name`
    pub fn new(group_name: &str) -> Self {
        RobotTrajectory {
            group_name: group_name.to_string(),
            waypoints: VecDeque::new(),
            durations_from_previous: VecDeque::new(),
        }
    }

    /// Group the trajectory was planned for
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True if the trajectory holds no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`
    pub fn waypoint(&self, index: usize) -> Option<&RobotState> {
        self.waypoints.get(index)
    }

    /// First waypoint
    pub fn first_waypoint(&self) -> Option<&RobotState> {
        self.waypoints.front()
    }

    /// Last waypoint
    pub fn last_waypoint(&self) -> Option<&RobotState> {
        self.waypoints.back()
    }

    /// Time between waypoint `index` and its predecessor
    pub fn duration_from_previous(&self, index: usize) -> Option<f64> {
        self.durations_from_previous.get(index).copied()
    }

    /// Appends a waypoint reached `dt` seconds after the current last one
    pub fn add_suffix_waypoint(&mut self, state: RobotState, dt: f64) {
        self.waypoints.push_back(state);
        self.durations_from_previous.push_back(dt);
    }

    /// Inserts a waypoint in front of the current first one
    pub fn add_prefix_waypoint(&mut self, state: RobotState, dt: f64) {
        self.waypoints.push_front(state);
        self.durations_from_previous.push_front(dt);
    }

    /// Sets the time between waypoint `index` and its predecessor
    pub fn set_waypoint_duration_from_previous(&mut self, index: usize, dt: f64) -> Result<(), AdapterError> {
        let len = self.len();
        let slot = self
            .durations_from_previous
            .get_mut(index)
            .ok_or(AdapterError::WaypointIndex { index, len })?;
        *slot = dt;
        Ok(())
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f64 {
        self.durations_from_previous.iter().sum()
    }

    /// Total duration divided by the number of waypoints; 0.0 when empty
    pub fn average_segment_duration(&self) -> f64 {
        if self.durations_from_previous.is_empty() {
            log::warn!("Trajectory for group '{}' has no waypoint durations", self.group_name);
            return 0.0;
        }
        self.duration() / self.durations_from_previous.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JointModel, RobotModel};

    fn state_at(model: &RobotModel, value: f64) -> RobotState {
        let mut state = RobotState::from_model(model);
        let joint = model.joint_model("j").unwrap();
        state.set_joint_positions(joint, &[value]);
        state
    }

    fn model() -> RobotModel {
        RobotModel::new("r").with_joint(JointModel::revolute("j", -2.0, 2.0)).unwrap()
    }

    #[test]
    fn test_prefix_and_suffix_order() {
        let model = model();
        let mut trajectory = RobotTrajectory::new("arm");
        trajectory.add_suffix_waypoint(state_at(&model, 0.1), 0.0);
        trajectory.add_suffix_waypoint(state_at(&model, 0.2), 1.0);
        trajectory.add_prefix_waypoint(state_at(&model, 0.0), 0.0);

        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.first_waypoint(), Some(&state_at(&model, 0.0)));
        assert_eq!(trajectory.last_waypoint(), Some(&state_at(&model, 0.2)));
        assert_eq!(trajectory.duration_from_previous(2), Some(1.0));
    }

    #[test]
    fn test_average_segment_duration() {
        let model = model();
        let mut trajectory = RobotTrajectory::new("arm");
        assert_eq!(trajectory.average_segment_duration(), 0.0);

        trajectory.add_suffix_waypoint(state_at(&model, 0.0), 0.0);
        trajectory.add_suffix_waypoint(state_at(&model, 0.5), 1.0);
        trajectory.add_suffix_waypoint(state_at(&model, 1.0), 2.0);
        assert_eq!(trajectory.duration(), 3.0);
        assert_eq!(trajectory.average_segment_duration(), 1.0);
    }

    #[test]
    fn test_set_duration_out_of_range() {
        let model = model();
        let mut trajectory = RobotTrajectory::new("arm");
        trajectory.add_suffix_waypoint(state_at(&model, 0.0), 0.0);

        trajectory.set_waypoint_duration_from_previous(0, 0.3).unwrap();
        assert_eq!(trajectory.duration_from_previous(0), Some(0.3));
        assert!(matches!(
            trajectory.set_waypoint_duration_from_previous(1, 0.3),
            Err(AdapterError::WaypointIndex { index: 1, len: 1 })
        ));
    }
}
