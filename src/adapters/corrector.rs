// adapters/corrector.rs

// Classifies every joint of the working start state against its limits and
// repairs the ones that are only slightly out of range. Before the first repair
// a copy of the untouched working state is kept; the trajectory patcher later
// puts that copy back in front of the planned path. Joints that are far out of
// range are reported and passed on unchanged.

// Dependencies
use crate::config::BOUNDS_PARAM_NAME;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{JointModel, RobotState};

/// How a joint's values relate to its limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointBoundsStatus {
    /// Inside the strict limits
    Satisfied,
    /// Outside the strict limits but within tolerance
    Correctable,
    /// Further outside than the tolerance allows
    Invalid,
}

/// Classifies one joint of `state`
pub fn classify(state: &RobotState, joint: &JointModel, tolerance: f64) -> JointBoundsStatus {
    if state.satisfies_bounds(joint, 0.0) {
        JointBoundsStatus::Satisfied
    } else if state.satisfies_bounds(joint, tolerance) {
        JointBoundsStatus::Correctable
    } else {
        JointBoundsStatus::Invalid
    }
}

/// Outcome of one correction pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsCorrection {
    /// State before the first correction; `None` if nothing was corrected
    pub snapshot: Option<RobotState>,
    /// Joints brought back inside their limits, in evaluation order
    pub corrected: Vec<String>,
    /// Joints left out of range
    pub invalid: Vec<String>,
}

impl BoundsCorrection {
    /// True if any joint value was modified
    pub fn changed(&self) -> bool {
        !self.corrected.is_empty()
    }
}

/// Corrects `state` in place, evaluating `joints` in order
pub fn correct_bounds(
    state: &mut RobotState,
    joints: &[&JointModel],
    tolerance: f64,
    sink: &dyn DiagnosticSink,
) -> BoundsCorrection {
    let mut outcome = BoundsCorrection::default();

    for joint in joints {
        match classify(state, joint, tolerance) {
            JointBoundsStatus::Satisfied => {}
            JointBoundsStatus::Correctable => {
                if outcome.snapshot.is_none() {
                    outcome.snapshot = Some(state.clone());
                }
                state.enforce_bounds(joint);
                outcome.corrected.push(joint.name().to_string());
                sink.emit(Diagnostic::info(
                    joint.name(),
                    format!(
                        "Starting state is just outside bounds (joint '{}'). Assuming within bounds.",
                        joint.name()
                    ),
                ));
            }
            JointBoundsStatus::Invalid => {
                outcome.invalid.push(joint.name().to_string());
                sink.emit(Diagnostic::warning(Some(joint.name()), out_of_bounds_message(state, joint, tolerance)));
            }
        }
    }

    outcome
}

fn out_of_bounds_message(state: &RobotState, joint: &JointModel, tolerance: f64) -> String {
    let join = |values: Vec<f64>| values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
    let bounds = joint.variable_bounds();
    format!(
        "Joint '{}' from the starting state is outside bounds by a significant margin: [{}] should be in the range \
         [{}], [{}] but the error is above the '{}' parameter (currently set to {})",
        joint.name(),
        join(state.joint_positions(joint).to_vec()),
        join(bounds.iter().map(|b| b.min_position).collect()),
        join(bounds.iter().map(|b| b.max_position).collect()),
        BOUNDS_PARAM_NAME,
        tolerance
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, MockDiagnosticSink, Severity};
    use crate::model::RobotModel;
    use rstest::rstest;

    const TOLERANCE: f64 = 0.05;

    fn model() -> RobotModel {
        RobotModel::new("r")
            .with_joint(JointModel::revolute("shoulder", -1.0, 1.0))
            .and_then(|m| m.with_joint(JointModel::prismatic("lift", 0.0, 0.5)))
            .and_then(|m| m.with_joint(JointModel::revolute("wrist", -2.0, 2.0)))
            .unwrap()
    }

    #[rstest]
    #[case(0.3, JointBoundsStatus::Satisfied)]
    #[case(1.0, JointBoundsStatus::Satisfied)]
    #[case(-1.0 - TOLERANCE / 2.0, JointBoundsStatus::Correctable)]
    #[case(1.0 + TOLERANCE, JointBoundsStatus::Correctable)]
    #[case(-1.0 - TOLERANCE - 1e-6, JointBoundsStatus::Invalid)]
    fn test_classify(#[case] value: f64, #[case] expected: JointBoundsStatus) {
        let model = model();
        let shoulder = model.joint_model("shoulder").unwrap();
        let mut state = RobotState::from_model(&model);
        state.set_joint_positions(shoulder, &[value]);
        assert_eq!(classify(&state, shoulder, TOLERANCE), expected);
    }

    #[test]
    fn test_in_bounds_state_untouched() {
        let model = model();
        let mut state = RobotState::from_model(&model);
        let before = state.clone();

        let mut sink = MockDiagnosticSink::new();
        sink.expect_emit().never();
        let outcome = correct_bounds(&mut state, &model.active_joint_models(""), TOLERANCE, &sink);

        assert!(!outcome.changed());
        assert!(outcome.snapshot.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_correctable_joint_clamped_with_snapshot() {
        let model = model();
        let shoulder = model.joint_model("shoulder").unwrap();
        let mut state = RobotState::from_model(&model);
        state.set_joint_positions(shoulder, &[-1.0 - TOLERANCE / 2.0]);
        let reported = state.clone();

        let mut sink = MockDiagnosticSink::new();
        sink.expect_emit()
            .withf(|d| d.severity == Severity::Info && d.joint.as_deref() == Some("shoulder"))
            .times(1)
            .return_const(());
        let outcome = correct_bounds(&mut state, &model.active_joint_models(""), TOLERANCE, &sink);

        assert!(outcome.changed());
        assert_eq!(outcome.corrected, vec!["shoulder".to_string()]);
        assert_eq!(outcome.snapshot, Some(reported));
        assert_eq!(state.joint_positions(shoulder), &[-1.0]);
    }

    #[test]
    fn test_invalid_joint_reported_and_left_alone() {
        let model = model();
        let shoulder = model.joint_model("shoulder").unwrap();
        let mut state = RobotState::from_model(&model);
        state.set_joint_positions(shoulder, &[-1.0 - TOLERANCE - 1e-6]);
        let reported = state.clone();

        let sink = CollectingSink::new();
        let outcome = correct_bounds(&mut state, &model.active_joint_models(""), TOLERANCE, &sink);

        assert!(!outcome.changed());
        assert!(outcome.snapshot.is_none());
        assert_eq!(outcome.invalid, vec!["shoulder".to_string()]);
        assert_eq!(state, reported);

        let warnings = sink.with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        let message = &warnings[0].message;
        assert!(message.contains("'shoulder'"));
        assert!(message.contains("[-1], [1]"));
        assert!(message.contains("start_state_max_bounds_error"));
        assert!(message.contains("0.05"));
    }

    #[test]
    fn test_single_snapshot_covers_all_corrections() {
        let model = model();
        let shoulder = model.joint_model("shoulder").unwrap();
        let lift = model.joint_model("lift").unwrap();
        let wrist = model.joint_model("wrist").unwrap();
        let mut state = RobotState::from_model(&model);
        state.set_joint_positions(shoulder, &[1.01]);
        state.set_joint_positions(lift, &[-0.02]);
        state.set_joint_positions(wrist, &[2.5]);
        let reported = state.clone();

        let sink = CollectingSink::new();
        let outcome = correct_bounds(&mut state, &model.active_joint_models(""), TOLERANCE, &sink);

        assert_eq!(outcome.corrected, vec!["shoulder".to_string(), "lift".to_string()]);
        assert_eq!(outcome.invalid, vec!["wrist".to_string()]);
        // the snapshot predates every correction
        assert_eq!(outcome.snapshot, Some(reported));
        assert_eq!(state.joint_positions(shoulder), &[1.0]);
        assert_eq!(state.joint_positions(lift), &[0.0]);
        assert_eq!(state.joint_positions(wrist), &[2.5]);
        assert_eq!(sink.with_severity(Severity::Info).len(), 2);
    }
}
