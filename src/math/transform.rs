use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local transform of a node: translation and orientation relative to its parent.
///
/// Scale is always unit. Decomposing a scaled or skewed matrix into a `LocalTransform` discards the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
	/// X Y Z
	pub position: Vec3,
	/// Unit quaternion, the authoritative orientation.
	pub rotation: Quat,
}

impl Default for LocalTransform {
	fn default() -> Self {
		Self {
			position: Vec3::ZERO,
			rotation: Quat::IDENTITY,
		}
	}
}

impl LocalTransform {
	pub fn new(position: Vec3, rotation: Quat) -> Self {
		Self { position, rotation }
	}

	/// Translation * Rotation, with unit scale.
	pub fn to_matrix(&self) -> Mat4 {
		Mat4::from_rotation_translation(self.rotation, self.position)
	}

	/// Split an affine matrix into translation and rotation.
	pub fn from_matrix(mat: &Mat4) -> Self {
		Self {
			position: mat.w_axis.truncate(),
			rotation: rotation_from_matrix(mat),
		}
	}

	/// Orientation as XYZ Euler angles in radians.
	pub fn euler(&self) -> Vec3 {
		let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
		Vec3::new(x, y, z)
	}
}

/// Unit quaternion for a rotation of `angle` radians around `axis`.
///
/// The axis is normalized first. A zero-length (or non-finite) axis yields the identity rotation.
pub fn quat_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
	match axis.try_normalize() {
		Some(axis) if angle.is_finite() => Quat::from_axis_angle(axis, angle),
		_ => Quat::IDENTITY,
	}
}

/// Unit quaternion from XYZ Euler angles in radians.
pub fn quat_from_euler(euler: Vec3) -> Quat {
	let q = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
	if q.is_finite() {
		q
	} else {
		Quat::IDENTITY
	}
}

/// Rotation part of an affine matrix, with any scale in the upper 3x3 removed.
///
/// Degenerate matrices (a zero-length basis vector) yield the identity rotation.
pub fn rotation_from_matrix(mat: &Mat4) -> Quat {
	let (_scale, rotation, _translation) = mat.to_scale_rotation_translation();
	if rotation.is_finite() {
		rotation.normalize()
	} else {
		Quat::IDENTITY
	}
}

/// Normalize a quaternion handed in from outside, falling back to identity if it can't be.
pub fn sanitize_quat(q: Quat) -> Quat {
	let len = q.length();
	if len.is_finite() && len > f32::EPSILON {
		q / len
	} else {
		Quat::IDENTITY
	}
}

#[cfg(test)]
mod tests {
	use std::f32::consts::{FRAC_PI_2, PI};

	use super::*;

	const EPS: f32 = 1e-5;

	/// q and -q are the same rotation.
	fn same_rotation(a: Quat, b: Quat) -> bool {
		a.dot(b).abs() > 1.0 - EPS
	}

	#[test]
	fn identity_matrix() {
		assert_eq!(LocalTransform::default().to_matrix(), Mat4::IDENTITY);
	}

	#[test]
	fn compose_then_decompose() {
		let trans = LocalTransform::new(Vec3::new(1.0, -2.0, 3.5), Quat::from_rotation_y(0.7));
		let back = LocalTransform::from_matrix(&trans.to_matrix());

		assert!(back.position.abs_diff_eq(trans.position, EPS));
		assert!(same_rotation(back.rotation, trans.rotation));
	}

	#[test]
	fn decompose_discards_scale() {
		let rotation = Quat::from_rotation_z(FRAC_PI_2);
		let mat = Mat4::from_scale_rotation_translation(Vec3::new(2.0, 3.0, 4.0), rotation, Vec3::X);
		let trans = LocalTransform::from_matrix(&mat);

		assert!(trans.position.abs_diff_eq(Vec3::X, EPS));
		assert!(same_rotation(trans.rotation, rotation));
		assert!((trans.rotation.length() - 1.0).abs() < EPS);
	}

	#[test]
	fn degenerate_axis_is_identity() {
		assert_eq!(quat_from_axis_angle(Vec3::ZERO, PI), Quat::IDENTITY);
		assert_eq!(quat_from_axis_angle(Vec3::new(f32::NAN, 0.0, 0.0), PI), Quat::IDENTITY);
	}

	#[test]
	fn axis_is_normalized() {
		let q = quat_from_axis_angle(Vec3::new(0.0, 5.0, 0.0), FRAC_PI_2);
		assert!(same_rotation(q, Quat::from_rotation_y(FRAC_PI_2)));
	}

	#[test]
	fn degenerate_matrix_rotation() {
		assert_eq!(rotation_from_matrix(&Mat4::ZERO), Quat::IDENTITY);
	}

	#[test]
	fn euler_single_axis() {
		let q = quat_from_euler(Vec3::new(0.0, 0.4, 0.0));
		assert!(same_rotation(q, Quat::from_rotation_y(0.4)));
	}

	#[test]
	fn sanitize() {
		assert_eq!(sanitize_quat(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
		let q = sanitize_quat(Quat::from_xyzw(0.0, 2.0, 0.0, 0.0));
		assert!(same_rotation(q, Quat::from_rotation_y(PI)));
	}
}
