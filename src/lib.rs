//! Eos Planning Adapters - start state repair for motion planning
//!
//! This library provides planning request adapters for the Eos robotics stack.
//! The main adapter, [`FixStartStateBounds`], corrects start states that sit just
//! outside joint limits before they reach a planner, and splices the originally
//! reported state back into the planned trajectory afterwards.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Planning request adapters and their registry
pub mod adapters;
/// Adapter parameters
pub mod config;
/// Diagnostics emitted while adapting a request
pub mod diagnostics;
/// Robot model and state
pub mod model;
/// Planner-facing types
pub mod planning;

// Re-export commonly used items for easier access
pub use adapters::{AdapterOutcome, AdapterRegistry, FixStartStateBounds, PlanningRequestAdapter};
pub use config::{FixStartStateBoundsConfig, ParameterSource};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, Severity};
pub use model::{JointModel, JointType, RobotModel, RobotState, RobotStateMsg, VariableBounds};
pub use planning::{
    MotionPlanRequest, MotionPlanResponse, Planner, PlanningErrorCode, PlanningScene, RobotTrajectory,
};

/// Eos adapter error types
#[derive(Debug)]
pub enum AdapterError {
    /// Configuration could not be read or holds invalid values
    ConfigError(String),
    /// Robot model description is inconsistent
    ModelError(String),
    /// A joint name does not exist in the robot model
    UnknownJoint(String),
    /// A joint received the wrong number of variable values
    VariableCount {
        /// Joint name
        joint: String,
        /// Number of variables the joint model declares
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
    /// No adapter is registered under this name
    UnknownAdapter(String),
    /// An adapter is already registered under this name
    DuplicateAdapter(String),
    /// Waypoint index outside the trajectory
    WaypointIndex {
        /// Requested index
        index: usize,
        /// Trajectory length
        len: usize,
    },
    /// File system error
    Io(std::io::Error),
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AdapterError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AdapterError::ModelError(msg) => write!(f, "Robot model error: {}", msg),
            AdapterError::UnknownJoint(name) => write!(f, "Unknown joint '{}'", name),
            AdapterError::VariableCount { joint, expected, actual } => write!(
                f,
                "Joint '{}' expects {} variable values but {} were given",
                joint, expected, actual
            ),
            AdapterError::UnknownAdapter(name) => write!(f, "No planning adapter registered as '{}'", name),
            AdapterError::DuplicateAdapter(name) => {
                write!(f, "A planning adapter is already registered as '{}'", name)
            }
            AdapterError::WaypointIndex { index, len } => {
                write!(f, "Waypoint index {} out of range for trajectory of length {}", index, len)
            }
            AdapterError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdapterError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(e: std::io::Error) -> Self {
        AdapterError::Io(e)
    }
}

impl From<serde_yaml::Error> for AdapterError {
    fn from(e: serde_yaml::Error) -> Self {
        AdapterError::ConfigError(e.to_string())
    }
}
