//! Robot model and robot state
//!
//! Joint descriptors, the robot model that owns them, and the robot state values
//! the planning pipeline copies and corrects.

/// Joint descriptors
pub mod joint;
/// Robot model
pub mod robot;
/// Robot state values
pub mod state;

pub use joint::{JointModel, JointType, VariableBounds, wrap_angle};
pub use robot::RobotModel;
pub use state::{RobotState, RobotStateMsg};
