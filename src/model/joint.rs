// model/joint.rs

// Joint descriptors for the robot model. Each joint knows its type, its ordered
// variable bounds and how to check, enforce and normalize a slice of its own
// variable values. Joint models are immutable once the robot model is built.

// Dependencies
use nalgebra::Quaternion;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

// Quaternions whose squared norm is this close to 1 are left untouched
const QUATERNION_NORMALIZE_EPS: f64 = f64::EPSILON * 100.0;
// Bounds checks accept a looser norm, float precision as upstream encoders report it
const QUATERNION_BOUNDS_EPS: f64 = f32::EPSILON as f64 * 10.0;

/// Position limits of a single joint variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableBounds {
    /// Lower position limit
    pub min_position: f64,
    /// Upper position limit
    pub max_position: f64,
}

impl VariableBounds {
    /// Creates bounds spanning `[min_position, max_position]`
    pub fn new(min_position: f64, max_position: f64) -> Self {
        VariableBounds { min_position, max_position }
    }

    /// Checks `value` against the bounds widened by `margin` on both sides
    pub fn contains(&self, value: f64, margin: f64) -> bool {
        value >= self.min_position - margin && value <= self.max_position + margin
    }

    /// Clamps `value` into the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min_position).min(self.max_position)
    }
}

/// Joint type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    /// One angle; may be continuous
    Revolute,
    /// One linear offset
    Prismatic,
    /// x, y, theta
    Planar,
    /// x, y, z, qx, qy, qz, qw
    Floating,
    /// No variables
    Fixed,
}

impl JointType {
    /// Number of position variables a joint of this type carries
    pub fn variable_count(&self) -> usize {
        match self {
            JointType::Revolute | JointType::Prismatic => 1,
            JointType::Planar => 3,
            JointType::Floating => 7,
            JointType::Fixed => 0,
        }
    }
}

/// Immutable descriptor of one joint
#[derive(Debug, Clone, PartialEq)]
pub struct JointModel {
    name: String,
    joint_type: JointType,
    continuous: bool,
    bounds: Vec<VariableBounds>,
}

impl JointModel {
    /// Bounded revolute joint
    pub fn revolute(name: &str, min_position: f64, max_position: f64) -> Self {
        Self::with_bounds(name, JointType::Revolute, false, vec![VariableBounds::new(min_position, max_position)])
    }

    /// Revolute joint without motion limits, represented in (-pi, pi]
    pub fn continuous(name: &str) -> Self {
        Self::with_bounds(name, JointType::Revolute, true, vec![VariableBounds::new(-PI, PI)])
    }

    /// Prismatic joint
    pub fn prismatic(name: &str, min_position: f64, max_position: f64) -> Self {
        Self::with_bounds(name, JointType::Prismatic, false, vec![VariableBounds::new(min_position, max_position)])
    }

    /// Planar joint with bounded x and y and a free yaw
    pub fn planar(name: &str, x: VariableBounds, y: VariableBounds) -> Self {
        Self::with_bounds(name, JointType::Planar, false, vec![x, y, VariableBounds::new(-PI, PI)])
    }

    /// Floating joint with bounded translation and a quaternion orientation
    pub fn floating(name: &str, x: VariableBounds, y: VariableBounds, z: VariableBounds) -> Self {
        let unit = VariableBounds::new(-1.0, 1.0);
        Self::with_bounds(name, JointType::Floating, false, vec![x, y, z, unit, unit, unit, unit])
    }

    /// Fixed joint, carries no variables
    pub fn fixed(name: &str) -> Self {
        Self::with_bounds(name, JointType::Fixed, false, Vec::new())
    }

    fn with_bounds(name: &str, joint_type: JointType, continuous: bool, bounds: Vec<VariableBounds>) -> Self {
        JointModel {
            name: name.to_string(),
            joint_type,
            continuous,
            bounds,
        }
    }

    /// Joint name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Joint type tag
    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    /// True for revolute joints without motion limits
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Number of position variables
    pub fn variable_count(&self) -> usize {
        self.bounds.len()
    }

    /// Per-variable bounds in variable order
    pub fn variable_bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    /// Default positions: zero clamped into bounds, identity orientation
    pub fn default_positions(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.bounds.iter().map(|b| b.clamp(0.0)).collect();
        if self.joint_type == JointType::Floating {
            values[3..7].copy_from_slice(&[0.0, 0.0, 0.0, 1.0]);
        }
        values
    }

    /// Checks `values` against the joint limits widened by `margin`.
    ///
    /// Continuous revolute joints always pass. Planar joints only check x and y,
    /// floating joints check translation and the quaternion norm.
    pub fn satisfies_position_bounds(&self, values: &[f64], margin: f64) -> bool {
        if values.len() != self.variable_count() {
            return false;
        }
        match self.joint_type {
            JointType::Revolute if self.continuous => true,
            JointType::Revolute | JointType::Prismatic => self.bounds[0].contains(values[0], margin),
            JointType::Planar => self.within(values, 0..2, margin),
            JointType::Floating => {
                if !self.within(values, 0..3, margin) {
                    return false;
                }
                let norm_sqr = orientation(values).norm_squared();
                (norm_sqr - 1.0).abs() <= QUATERNION_BOUNDS_EPS
            }
            JointType::Fixed => true,
        }
    }

    /// Brings `values` back inside the joint limits. Continuous joints are
    /// wrapped, bounded variables clamped and rotations normalized.
    /// Returns true if any value changed.
    pub fn enforce_position_bounds(&self, values: &mut [f64]) -> bool {
        if values.len() != self.variable_count() {
            return false;
        }
        match self.joint_type {
            JointType::Revolute if self.continuous => {
                let wrapped = wrap_angle(values[0]);
                let changed = wrapped != values[0];
                values[0] = wrapped;
                changed
            }
            JointType::Revolute | JointType::Prismatic => self.clamp_range(values, 0..1),
            JointType::Planar => {
                let clamped = self.clamp_range(values, 0..2);
                self.normalize_rotation(values) || clamped
            }
            JointType::Floating => {
                let clamped = self.clamp_range(values, 0..3);
                self.normalize_rotation(values) || clamped
            }
            JointType::Fixed => false,
        }
    }

    /// Puts the rotational part of a planar or floating joint in canonical form:
    /// yaw wrapped into [-pi, pi], orientation quaternion scaled to unit length.
    /// Returns true if the values changed. Other joint types are untouched.
    pub fn normalize_rotation(&self, values: &mut [f64]) -> bool {
        if values.len() != self.variable_count() {
            return false;
        }
        match self.joint_type {
            JointType::Planar => {
                let yaw = values[2];
                if (-PI..=PI).contains(&yaw) {
                    return false;
                }
                let mut wrapped = yaw % TAU;
                if wrapped < -PI {
                    wrapped += TAU;
                } else if wrapped > PI {
                    wrapped -= TAU;
                }
                values[2] = wrapped;
                true
            }
            JointType::Floating => {
                let q = orientation(values);
                let norm_sqr = q.norm_squared();
                if (norm_sqr - 1.0).abs() <= QUATERNION_NORMALIZE_EPS {
                    return false;
                }
                let norm = norm_sqr.sqrt();
                let q = if norm < QUATERNION_NORMALIZE_EPS { Quaternion::identity() } else { q / norm };
                values[3] = q.i;
                values[4] = q.j;
                values[5] = q.k;
                values[6] = q.w;
                true
            }
            _ => false,
        }
    }

    fn within(&self, values: &[f64], range: std::ops::Range<usize>, margin: f64) -> bool {
        range.into_iter().all(|i| self.bounds[i].contains(values[i], margin))
    }

    fn clamp_range(&self, values: &mut [f64], range: std::ops::Range<usize>) -> bool {
        let mut changed = false;
        for i in range {
            let clamped = self.bounds[i].clamp(values[i]);
            if clamped != values[i] {
                values[i] = clamped;
                changed = true;
            }
        }
        changed
    }
}

// Layout is x, y, z, qx, qy, qz, qw; nalgebra takes w first
fn orientation(values: &[f64]) -> Quaternion<f64> {
    Quaternion::new(values[6], values[3], values[4], values[5])
}

/// Wraps an angle into (-pi, pi]
pub fn wrap_angle(value: f64) -> f64 {
    if value > -PI && value <= PI {
        return value;
    }
    let wrapped = value % TAU;
    if wrapped <= -PI {
        wrapped + TAU
    } else if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
