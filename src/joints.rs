// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! FLIC joint table.
//!
//! The heatmap arrays carry one channel per joint, in exactly the order of
//! [`JOINTS`]: channel 0 is the left shoulder, channel 1 the left elbow, and
//! so on. Both the loader and the visualizer read this one table.

use crate::error::{FlicError, Result};
use crate::visualizer::Color;

/// A tracked keypoint and the color its heatmap channel is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joint {
    /// Short FLIC identifier, e.g. `lsho`.
    pub name: &'static str,
    /// Display color of the heatmap overlay.
    pub color: Color,
}

/// Joints in heatmap channel order.
pub static JOINTS: [Joint; 10] = [
    Joint { name: "lsho", color: Color::RED },        // left shoulder
    Joint { name: "lelb", color: Color::GREEN },      // left elbow
    Joint { name: "lwri", color: Color::BLUE },       // left wrist
    Joint { name: "rsho", color: Color::YELLOW },     // right shoulder
    Joint { name: "relb", color: Color::PURPLE },     // right elbow
    Joint { name: "rwri", color: Color::ORANGE },     // right wrist
    Joint { name: "lhip", color: Color::BLACK },      // left hip
    Joint { name: "rhip", color: Color::WHITE },      // right hip
    Joint { name: "nose", color: Color::CYAN },       // nose
    Joint { name: "torso", color: Color::DARK_BLUE }, // torso
];

/// Joint for heatmap channel `index`.
///
/// # Errors
///
/// Returns [`FlicError::IndexError`] when the heatmap has more channels than
/// there are configured joints.
pub fn joint(index: usize) -> Result<&'static Joint> {
    JOINTS.get(index).ok_or_else(|| {
        FlicError::IndexError(format!(
            "joint index {index} out of range for {} configured joints",
            JOINTS.len()
        ))
    })
}

/// Joint with the given identifier.
#[must_use]
pub fn joint_by_name(name: &str) -> Option<&'static Joint> {
    JOINTS.iter().find(|j| j.name == name)
}

/// Channel index of the given identifier.
#[must_use]
pub fn channel_of(name: &str) -> Option<usize> {
    JOINTS.iter().position(|j| j.name == name)
}
