use std::fmt;

use glam::{Mat4, Quat, Vec3};

use crate::math::transform::{self, LocalTransform};

/// Identifier of a node, unique within the `Scene` that allocated it and never reused.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct NodeUuid(pub(crate) u64);

impl NodeUuid {
	/// The scene's own root node.
	pub const ROOT: NodeUuid = NodeUuid(0);

	pub fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for NodeUuid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// A node of the transform graph.
///
/// Everything here concerns the node alone: its local transform and cached matrices.
/// Operations that need the parent or children (world updates, reparenting) are on [`crate::Scene`].
#[derive(Debug, Clone)]
pub struct Node {
	pub(crate) uuid: NodeUuid,
	trans: LocalTransform,
	local: Mat4,
	pub(crate) world: Mat4,
	local_auto_update: bool,
	world_auto_update: bool,
	pub(crate) world_dirty: bool,
}

impl Node {
	pub(crate) fn new(uuid: NodeUuid) -> Self {
		Self {
			uuid,
			trans: LocalTransform::default(),
			local: Mat4::IDENTITY,
			world: Mat4::IDENTITY,
			local_auto_update: true,
			world_auto_update: true,
			world_dirty: true,
		}
	}

	pub fn uuid(&self) -> NodeUuid {
		self.uuid
	}

	pub fn position(&self) -> Vec3 {
		self.trans.position
	}

	pub fn set_position(&mut self, position: Vec3) {
		self.trans.position = position;
	}

	pub fn rotation(&self) -> Quat {
		self.trans.rotation
	}

	/// XYZ Euler angles, derived from the rotation quaternion.
	pub fn rotation_euler(&self) -> Vec3 {
		self.trans.euler()
	}

	pub fn local_transform(&self) -> &LocalTransform {
		&self.trans
	}

	/// Local matrix as of the last [`Node::update_matrix`].
	pub fn local_matrix(&self) -> Mat4 {
		self.local
	}

	/// World matrix as of the last update pass that reached this node.
	pub fn world_matrix(&self) -> Mat4 {
		self.world
	}

	pub fn world_position(&self) -> Vec3 {
		self.world.w_axis.truncate()
	}

	pub fn world_rotation(&self) -> Quat {
		transform::rotation_from_matrix(&self.world)
	}

	pub fn local_auto_update(&self) -> bool {
		self.local_auto_update
	}

	pub fn set_local_auto_update(&mut self, on: bool) {
		self.local_auto_update = on;
	}

	pub fn world_auto_update(&self) -> bool {
		self.world_auto_update
	}

	pub fn set_world_auto_update(&mut self, on: bool) {
		self.world_auto_update = on;
	}

	pub fn is_world_dirty(&self) -> bool {
		self.world_dirty
	}

	/// Mark the world matrix stale so the next batch pass recomputes this node and its subtree.
	pub fn mark_world_dirty(&mut self) {
		self.world_dirty = true;
	}

	// translation

	/// Move along `axis`, expressed in this node's local orientation, by `distance`.
	///
	/// The axis is not normalized: a non-unit axis scales the translation.
	pub fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
		let axis = self.trans.rotation * axis;
		self.trans.position += axis * distance;
	}

	pub fn translate_x(&mut self, distance: f32) {
		self.translate_on_axis(Vec3::X, distance);
	}

	pub fn translate_y(&mut self, distance: f32) {
		self.translate_on_axis(Vec3::Y, distance);
	}

	pub fn translate_z(&mut self, distance: f32) {
		self.translate_on_axis(Vec3::Z, distance);
	}

	// rotation

	fn set_rotation(&mut self, rotation: Quat) {
		self.trans.rotation = rotation;
	}

	/// Rotate around one of this node's own current axes (post-multiply).
	pub fn rotate_on_local_axis(&mut self, axis: Vec3, angle: f32) {
		let q = transform::quat_from_axis_angle(axis, angle);
		self.set_rotation((self.trans.rotation * q).normalize());
	}

	/// Rotate around a fixed axis of the parent frame, regardless of current orientation (pre-multiply).
	pub fn rotate_on_world_axis(&mut self, axis: Vec3, angle: f32) {
		let q = transform::quat_from_axis_angle(axis, angle);
		self.set_rotation((q * self.trans.rotation).normalize());
	}

	pub fn rotate_x(&mut self, angle: f32) {
		self.rotate_on_local_axis(Vec3::X, angle);
	}

	pub fn rotate_y(&mut self, angle: f32) {
		self.rotate_on_local_axis(Vec3::Y, angle);
	}

	pub fn rotate_z(&mut self, angle: f32) {
		self.rotate_on_local_axis(Vec3::Z, angle);
	}

	/// `rotation = q * rotation`
	pub fn apply_quaternion(&mut self, q: Quat) {
		let q = transform::sanitize_quat(q);
		self.set_rotation((q * self.trans.rotation).normalize());
	}

	pub fn set_rotation_from_axis_angle(&mut self, axis: Vec3, angle: f32) {
		self.set_rotation(transform::quat_from_axis_angle(axis, angle));
	}

	/// XYZ Euler angles in radians.
	pub fn set_rotation_from_euler(&mut self, euler: Vec3) {
		self.set_rotation(transform::quat_from_euler(euler));
	}

	/// Only the rotation part of `mat` is used.
	pub fn set_rotation_from_matrix(&mut self, mat: &Mat4) {
		self.set_rotation(transform::rotation_from_matrix(mat));
	}

	pub fn set_rotation_from_quaternion(&mut self, q: Quat) {
		self.set_rotation(transform::sanitize_quat(q));
	}

	// matrices

	/// Premultiply the local matrix by `mat` and read position and rotation back out of the result.
	///
	/// Any scale or skew that `mat` introduces is discarded by the decomposition.
	pub fn apply_matrix4(&mut self, mat: &Mat4) {
		if self.local_auto_update {
			self.update_matrix();
		}

		self.local = *mat * self.local;
		self.trans = LocalTransform::from_matrix(&self.local);
		self.world_dirty = true;
	}

	/// Recompose the local matrix from position and rotation, marking the world matrix stale.
	pub fn update_matrix(&mut self) {
		self.local = self.trans.to_matrix();
		self.world_dirty = true;
	}

	pub(crate) fn compute_world(&mut self, parent_world: Option<&Mat4>) {
		self.world = match parent_world {
			Some(parent_world) => *parent_world * self.local,
			None => self.local,
		};
	}
}
