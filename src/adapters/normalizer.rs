// adapters/normalizer.rs

// Canonicalizes periodic joint representations in a working start state:
// continuous revolute joints are wrapped into (-pi, pi], planar yaw into
// [-pi, pi] and floating orientations are scaled to unit quaternions. Encoders may report
// continuous joints several turns away from zero; those values are wrapped,
// never rejected. This pass cannot fail.

// Dependencies
use crate::model::{JointModel, JointType, RobotState};

/// Normalizes every joint in `joints`; returns true if any value changed
pub fn normalize_joints(state: &mut RobotState, joints: &[&JointModel]) -> bool {
    let mut changed = false;
    for joint in joints {
        changed |= normalize_joint(state, joint);
    }
    changed
}

fn normalize_joint(state: &mut RobotState, joint: &JointModel) -> bool {
    match joint.joint_type() {
        JointType::Revolute if joint.is_continuous() => {
            let initial = state.joint_positions(joint).first().copied();
            state.enforce_bounds(joint);
            let after = state.joint_positions(joint).first().copied();
            match (initial, after) {
                (Some(initial), Some(after)) => (initial - after).abs() > f64::EPSILON,
                _ => false,
            }
        }
        JointType::Planar | JointType::Floating => {
            let mut copy = state.joint_positions(joint).to_vec();
            if !joint.normalize_rotation(&mut copy) {
                return false;
            }
            state.set_joint_positions(joint, &copy);
            true
        }
        _ => false,
    }
}
