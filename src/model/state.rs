// model/state.rs

// Robot state: joint name -> position values. States are plain values; every
// copy is an explicit clone, so a working state never aliases the scene's live
// state. Also converts to and from the partial state message carried by requests.

// Dependencies
use super::joint::JointModel;
use super::robot::RobotModel;
use crate::AdapterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Start state as carried by a planning request: joint name -> positions.
/// May name only a subset of the model's joints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotStateMsg {
    /// Joint positions keyed by joint name
    pub joints: BTreeMap<String, Vec<f64>>,
}

impl RobotStateMsg {
    /// Builder helper: sets the positions of one joint
    pub fn with_joint(mut self, name: &str, positions: &[f64]) -> Self {
        self.joints.insert(name.to_string(), positions.to_vec());
        self
    }

    /// True if the message names no joints
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// Full set of joint positions for one robot model
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    positions: BTreeMap<String, Vec<f64>>,
}

impl RobotState {
    /// State holding every joint's default positions
    pub fn from_model(model: &RobotModel) -> Self {
        let positions = model
            .joint_models()
            .iter()
            .map(|jm| (jm.name().to_string(), jm.default_positions()))
            .collect();
        RobotState { positions }
    }

    /// Position values of a joint
    pub fn joint_positions(&self, joint: &JointModel) -> &[f64] {
        self.positions.get(joint.name()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Overwrites the position values of a joint
    pub fn set_joint_positions(&mut self, joint: &JointModel, values: &[f64]) {
        self.positions.insert(joint.name().to_string(), values.to_vec());
    }

    /// Checks a joint's values against its limits widened by `margin`
    pub fn satisfies_bounds(&self, joint: &JointModel, margin: f64) -> bool {
        joint.satisfies_position_bounds(self.joint_positions(joint), margin)
    }

    /// Wraps or clamps a joint back inside its limits; true if anything changed
    pub fn enforce_bounds(&mut self, joint: &JointModel) -> bool {
        match self.positions.get_mut(joint.name()) {
            Some(values) => joint.enforce_position_bounds(values),
            None => false,
        }
    }

    /// Iterates over (joint name, positions) in name order
    pub fn positions(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.positions.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Overlays the joints named in `msg` onto this state.
    ///
    /// Fails without modifying the state if the message names a joint the model
    /// does not know or carries the wrong number of values for one.
    pub fn apply_message(&mut self, model: &RobotModel, msg: &RobotStateMsg) -> Result<(), AdapterError> {
        for (name, values) in &msg.joints {
            let joint = model
                .joint_model(name)
                .ok_or_else(|| AdapterError::UnknownJoint(name.clone()))?;
            if values.len() != joint.variable_count() {
                return Err(AdapterError::VariableCount {
                    joint: name.clone(),
                    expected: joint.variable_count(),
                    actual: values.len(),
                });
            }
        }
        for (name, values) in &msg.joints {
            self.positions.insert(name.clone(), values.clone());
        }
        Ok(())
    }

    /// Full message describing every joint of this state
    pub fn to_message(&self) -> RobotStateMsg {
        RobotStateMsg { joints: self.positions.clone() }
    }
}
