pub mod transform;

pub use transform::{quat_from_axis_angle, quat_from_euler, rotation_from_matrix, LocalTransform};
