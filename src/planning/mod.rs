//! Planning collaborators for Eos adapters
//!
//! Requests, responses, trajectories and the planning scene, plus the
//! [`Planner`] capability adapters wrap. The search itself lives elsewhere.

/// Plan requests and responses
pub mod request;
/// Planning scene
pub mod scene;
/// Timed waypoint sequences
pub mod trajectory;

pub use request::{MotionPlanRequest, MotionPlanResponse, PlanningErrorCode};
pub use scene::PlanningScene;
pub use trajectory::RobotTrajectory;

#[cfg(test)]
use mockall::automock;

/// A motion planner, or the rest of an adapter chain ending in one.
///
/// Returns true on success, in which case the response carries a trajectory.
/// Implementations may block for as long as the search takes.
#[cfg_attr(test, automock)]
pub trait Planner: Send + Sync {
    /// Plans `request` against `scene`, filling `response`
    fn plan(&self, scene: &PlanningScene, request: &MotionPlanRequest, response: &mut MotionPlanResponse) -> bool;
}

impl<F> Planner for F
where
    F: Fn(&PlanningScene, &MotionPlanRequest, &mut MotionPlanResponse) -> bool + Send + Sync,
{
    fn plan(&self, scene: &PlanningScene, request: &MotionPlanRequest, response: &mut MotionPlanResponse) -> bool {
        self(scene, request, response)
    }
}
