// model/robot.rs

// Robot model: an ordered list of joint models plus named planning groups.
// Models are built in code or loaded from a YAML description, and are validated
// once on construction so the planning pipeline can index joints without checks.

// Dependencies
use super::joint::{JointModel, JointType, VariableBounds};
use crate::AdapterError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Robot kinematic description shared by planning scenes
#[derive(Debug, Clone, PartialEq)]
pub struct RobotModel {
    name: String,
    joints: Vec<JointModel>,
    joint_index: HashMap<String, usize>,
    groups: BTreeMap<String, Vec<usize>>, // Group name -> joint indices, declared order
}

// YAML layout of a robot description
#[derive(Deserialize, Debug)]
struct RobotDescription {
    name: String,
    joints: Vec<JointDescription>,
    #[serde(default)]
    groups: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize, Debug)]
struct JointDescription {
    name: String,
    #[serde(rename = "type")]
    joint_type: JointType,
    #[serde(default)]
    continuous: bool,
    #[serde(default)]
    bounds: Vec<[f64; 2]>,
}

impl RobotModel {
    /// Creates an empty model
    pub fn new(name: &str) -> Self {
        RobotModel {
            name: name.to_string(),
            joints: Vec::new(),
            joint_index: HashMap::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Appends a joint; joint names must be unique and bounds well formed
    pub fn with_joint(mut self, joint: JointModel) -> Result<Self, AdapterError> {
        if self.joint_index.contains_key(joint.name()) {
            return Err(AdapterError::ModelError(format!("duplicate joint '{}'", joint.name())));
        }
        if let Some(b) = joint.variable_bounds().iter().find(|b| b.min_position > b.max_position) {
            return Err(AdapterError::ModelError(format!(
                "joint '{}' has inverted bounds [{}, {}]",
                joint.name(),
                b.min_position,
                b.max_position
            )));
        }
        self.joint_index.insert(joint.name().to_string(), self.joints.len());
        self.joints.push(joint);
        Ok(self)
    }

    /// Declares a planning group over existing joints, in the given order
    pub fn with_group(mut self, group: &str, joint_names: &[&str]) -> Result<Self, AdapterError> {
        let indices = joint_names
            .iter()
            .map(|name| {
                self.joint_index
                    .get(*name)
                    .copied()
                    .ok_or_else(|| AdapterError::UnknownJoint(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.groups.insert(group.to_string(), indices);
        Ok(self)
    }

    /// Parses and validates a YAML robot description
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AdapterError> {
        let description: RobotDescription = serde_yaml::from_str(yaml)?;
        let mut model = RobotModel::new(&description.name);

        for joint in description.joints {
            model = model.with_joint(joint.into_model()?)?;
        }
        for (group, joint_names) in &description.groups {
            let names: Vec<&str> = joint_names.iter().map(String::as_str).collect();
            model = model.with_group(group, &names)?;
        }

        log::info!(
            "Loaded robot model '{}' with {} joints and {} groups",
            model.name,
            model.joints.len(),
            model.groups.len()
        );
        Ok(model)
    }

    /// Loads a YAML robot description from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AdapterError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All joints in model order
    pub fn joint_models(&self) -> &[JointModel] {
        &self.joints
    }

    /// Looks up a joint by name
    pub fn joint_model(&self, name: &str) -> Option<&JointModel> {
        self.joint_index.get(name).map(|&i| &self.joints[i])
    }

    /// True if a planning group with this name exists
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Planning group names, sorted
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Joints of a planning group in declared order
    pub fn group_joint_models(&self, group: &str) -> Option<Vec<&JointModel>> {
        self.groups
            .get(group)
            .map(|indices| indices.iter().map(|&i| &self.joints[i]).collect())
    }

    /// Joints of `group`, or every joint when the group is empty or unknown
    pub fn active_joint_models(&self, group: &str) -> Vec<&JointModel> {
        self.group_joint_models(group)
            .unwrap_or_else(|| self.joints.iter().collect())
    }
}

impl JointDescription {
    fn into_model(self) -> Result<JointModel, AdapterError> {
        let bound = |i: usize| -> Result<VariableBounds, AdapterError> {
            self.bounds
                .get(i)
                .map(|b| VariableBounds::new(b[0], b[1]))
                .ok_or_else(|| AdapterError::ModelError(format!("joint '{}' is missing bounds #{}", self.name, i)))
        };

        let model = match self.joint_type {
            JointType::Revolute if self.continuous => JointModel::continuous(&self.name),
            JointType::Revolute => {
                let b = bound(0)?;
                JointModel::revolute(&self.name, b.min_position, b.max_position)
            }
            JointType::Prismatic => {
                let b = bound(0)?;
                JointModel::prismatic(&self.name, b.min_position, b.max_position)
            }
            JointType::Planar => JointModel::planar(&self.name, bound(0)?, bound(1)?),
            JointType::Floating => JointModel::floating(&self.name, bound(0)?, bound(1)?, bound(2)?),
            JointType::Fixed => JointModel::fixed(&self.name),
        };
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARM_YAML: &str = r#"
name: demo_arm
joints:
  - name: base
    type: planar
    bounds: [[-5.0, 5.0], [-5.0, 5.0]]
  - name: shoulder
    type: revolute
    bounds: [[-1.57, 1.57]]
  - name: elbow
    type: revolute
    continuous: true
  - name: tool
    type: fixed
groups:
  arm: [shoulder, elbow]
"#;

    #[test]
    fn test_load_from_yaml() {
        let model = RobotModel::from_yaml_str(ARM_YAML).unwrap();
        assert_eq!(model.name(), "demo_arm");
        assert_eq!(model.joint_models().len(), 4);
        assert!(model.joint_model("elbow").unwrap().is_continuous());
        assert_eq!(model.joint_model("base").unwrap().variable_count(), 3);

        let arm: Vec<&str> = model.group_joint_models("arm").unwrap().iter().map(|j| j.name()).collect();
        assert_eq!(arm, vec!["shoulder", "elbow"]);
    }

    #[test]
    fn test_active_joints_fall_back_to_all() {
        let model = RobotModel::from_yaml_str(ARM_YAML).unwrap();
        assert_eq!(model.active_joint_models("arm").len(), 2);
        assert_eq!(model.active_joint_models("").len(), 4);
        assert_eq!(model.active_joint_models("legs").len(), 4);
    }

    #[test]
    fn test_missing_bounds_rejected() {
        let yaml = "name: r\njoints:\n  - name: lift\n    type: prismatic\n";
        assert!(matches!(RobotModel::from_yaml_str(yaml), Err(AdapterError::ModelError(_))));
    }

    #[test]
    fn test_group_with_unknown_joint_rejected() {
        let result = RobotModel::new("r")
            .with_joint(JointModel::revolute("a", -1.0, 1.0))
            .and_then(|m| m.with_group("g", &["a", "b"]));
        assert!(matches!(result, Err(AdapterError::UnknownJoint(name)) if name == "b"));
    }

    #[test]
    fn test_duplicate_and_inverted_joints_rejected() {
        let model = RobotModel::new("r").with_joint(JointModel::revolute("a", -1.0, 1.0)).unwrap();
        assert!(model.clone().with_joint(JointModel::continuous("a")).is_err());
        assert!(model.with_joint(JointModel::prismatic("b", 1.0, 0.0)).is_err());
    }
}
