use glam::{Mat4, Vec3};
use indextree::NodeId;

use super::{Scene, SceneResult};
use crate::node::NodeUuid;

impl Scene {
	fn parent_world(&self, node_id: NodeId) -> Option<Mat4> {
		let parent_id = self.arena[node_id].parent()?;
		Some(self.arena[parent_id].get().world)
	}

	/// Unconditional recomputation of one node from its parent's current world matrix.
	fn refresh_world(&mut self, node_id: NodeId) {
		let parent_world = self.parent_world(node_id);
		let node = self.arena[node_id].get_mut();

		if node.local_auto_update() {
			node.update_matrix();
		}
		node.compute_world(parent_world.as_ref());
	}

	fn update_world_matrix_internal(&mut self, node_id: NodeId, update_parent: bool, update_children: bool) {
		if update_parent {
			// nearest first, up to the first ancestor that opted out of world updates
			let chain = node_id
				.ancestors(&self.arena)
				.skip(1)
				.take_while(|id| self.arena[*id].get().world_auto_update())
				.collect::<Vec<_>>();
			for ancestor in chain.into_iter().rev() {
				self.refresh_world(ancestor);
			}
		}

		self.refresh_world(node_id);

		if update_children {
			let mut stack = node_id.children(&self.arena).rev().collect::<Vec<_>>();
			while let Some(child) = stack.pop() {
				if !self.arena[child].get().world_auto_update() {
					continue;
				}
				self.refresh_world(child);
				stack.extend(child.children(&self.arena).rev());
			}
		}
	}

	/// Recompute the world matrix of `uuid` right now, regardless of dirty state.
	///
	/// With `update_parent`, ancestors are refreshed first, top-down, stopping at the first one with
	/// world auto-update off. With `update_children`, the whole subtree is refreshed too, skipping
	/// any branch whose top node has world auto-update off. Dirty flags are neither read nor cleared.
	pub fn update_world_matrix(&mut self, uuid: NodeUuid, update_parent: bool, update_children: bool) -> SceneResult<()> {
		let node_id = self.node_id(uuid)?;
		self.update_world_matrix_internal(node_id, update_parent, update_children);
		Ok(())
	}

	fn update_matrix_world_internal(&mut self, node_id: NodeId, force: bool) {
		let mut visited = 0usize;
		let mut recomputed = 0usize;

		// Pre-order traversal, so that a parent's world matrix is final before any child reads it
		let mut stack = vec![(node_id, force)];
		while let Some((id, force)) = stack.pop() {
			visited += 1;

			let parent_world = self.parent_world(id);
			let node = self.arena[id].get_mut();

			// recomposing marks the node dirty
			if node.local_auto_update() {
				node.update_matrix();
			}

			// a recomputed node drags its entire subtree along, whatever the children's own flags say
			let mut force = force;
			if node.world_dirty || force {
				node.compute_world(parent_world.as_ref());
				node.world_dirty = false;
				force = true;
				recomputed += 1;
			}

			for child in id.children(&self.arena).rev() {
				if force || self.arena[child].get().world_auto_update() {
					stack.push((child, force));
				}
			}
		}

		tracing::trace!("World update pass: visited {}, recomputed {}", visited, recomputed);
	}

	/// Batch refresh of the subtree at `uuid`, meant to run once per root per frame.
	///
	/// Every visited node with local auto-update on is recomposed. A node that is dirty (or reached with
	/// `force`) gets its world matrix recomputed, and then forces its whole subtree, including
	/// children with world auto-update off.
	pub fn update_matrix_world(&mut self, uuid: NodeUuid, force: bool) -> SceneResult<()> {
		let node_id = self.node_id(uuid)?;
		self.update_matrix_world_internal(node_id, force);
		Ok(())
	}

	/// Batch refresh of everything attached under the scene root.
	pub fn update(&mut self, force: bool) {
		self.update_matrix_world_internal(self.root, force);
	}

	/// Batch refresh of every tree in the scene, unattached ones included.
	pub fn update_forest(&mut self, force: bool) {
		self.update_matrix_world_internal(self.root, force);
		for uuid in self.detached_roots() {
			let node_id = self.uuids[&uuid];
			self.update_matrix_world_internal(node_id, force);
		}
	}

	/// Map a point from the local space of `uuid` to world space.
	///
	/// The node's ancestors are brought up to date first; its descendants are left alone.
	pub fn local_to_world(&mut self, uuid: NodeUuid, v: Vec3) -> SceneResult<Vec3> {
		let node_id = self.node_id(uuid)?;
		self.update_world_matrix_internal(node_id, true, false);
		Ok(self.arena[node_id].get().world.transform_point3(v))
	}

	/// Map a point from world space to the local space of `uuid`.
	pub fn world_to_local(&mut self, uuid: NodeUuid, v: Vec3) -> SceneResult<Vec3> {
		let node_id = self.node_id(uuid)?;
		self.update_world_matrix_internal(node_id, true, false);
		Ok(self.arena[node_id].get().world.inverse().transform_point3(v))
	}
}
