use super::{Scene, SceneError, SceneResult};
use crate::node::{Node, NodeUuid};

impl Scene {
	/// Attach `child` as the last child of `parent`.
	///
	/// A child already under another parent is moved, not copied. Adding a node to the parent it
	/// already has changes nothing, not even its position among its siblings.
	/// Fails without touching the tree if `child` is `parent` itself or one of its ancestors.
	pub fn add(&mut self, parent: NodeUuid, child: NodeUuid) -> SceneResult<()> {
		if child == NodeUuid::ROOT {
			return Err(SceneError::RootNode);
		}
		let parent_id = self.node_id(parent)?;
		let child_id = self.node_id(child)?;

		if parent_id.ancestors(&self.arena).any(|id| id == child_id) {
			tracing::warn!("Refusing to add {} under {}: would create a cycle", child, parent);
			return Err(SceneError::WouldCreateCycle { parent, child });
		}

		if self.arena[child_id].parent() == Some(parent_id) {
			return Ok(());
		}

		// detach first, so a move out of another parent and a fresh attach look the same
		child_id.detach(&mut self.arena);
		parent_id.append(child_id, &mut self.arena);
		self.arena[child_id].get_mut().mark_world_dirty();

		tracing::debug!("Added {} under {}", child, parent);
		Ok(())
	}

	/// [`Scene::add`] each of `children` in order, stopping at the first failure.
	pub fn add_many(&mut self, parent: NodeUuid, children: impl IntoIterator<Item = NodeUuid>) -> SceneResult<()> {
		for child in children {
			self.add(parent, child)?;
		}
		Ok(())
	}

	pub fn add_to_root(&mut self, child: NodeUuid) -> SceneResult<()> {
		self.add(NodeUuid::ROOT, child)
	}

	/// Detach `child` from `parent`. The child becomes an unattached root and stays alive.
	///
	/// Nothing happens if `child` is not a child of `parent`.
	pub fn remove(&mut self, parent: NodeUuid, child: NodeUuid) -> SceneResult<()> {
		let parent_id = self.node_id(parent)?;
		let Ok(child_id) = self.node_id(child) else {
			return Ok(());
		};

		if self.arena[child_id].parent() != Some(parent_id) {
			return Ok(());
		}

		child_id.detach(&mut self.arena);
		self.arena[child_id].get_mut().mark_world_dirty();

		tracing::debug!("Removed {} from {}", child, parent);
		Ok(())
	}

	pub fn remove_many(&mut self, parent: NodeUuid, children: impl IntoIterator<Item = NodeUuid>) -> SceneResult<()> {
		for child in children {
			self.remove(parent, child)?;
		}
		Ok(())
	}

	/// Direct child of `parent` with identifier `uuid`. Grandchildren are not searched.
	pub fn get_node_by_id(&self, parent: NodeUuid, uuid: NodeUuid) -> Option<&Node> {
		let parent_id = self.node_id(parent).ok()?;
		parent_id
			.children(&self.arena)
			.map(|id| self.arena[id].get())
			.find(|node| node.uuid == uuid)
	}

	pub fn parent(&self, uuid: NodeUuid) -> Option<NodeUuid> {
		let node_id = self.node_id(uuid).ok()?;
		let parent_id = self.arena[node_id].parent()?;
		Some(self.arena[parent_id].get().uuid)
	}

	/// Children in insertion order, or `None` for an unknown node.
	pub fn children(&self, uuid: NodeUuid) -> Option<Vec<NodeUuid>> {
		let node_id = self.node_id(uuid).ok()?;
		Some(
			node_id
				.children(&self.arena)
				.map(|id| self.arena[id].get().uuid)
				.collect::<Vec<_>>(),
		)
	}

	/// Parent, grandparent... up to the top of the tree. The node itself is excluded.
	pub fn ancestors(&self, uuid: NodeUuid) -> Option<Vec<NodeUuid>> {
		let node_id = self.node_id(uuid).ok()?;
		Some(
			node_id
				.ancestors(&self.arena)
				.skip(1)
				.map(|id| self.arena[id].get().uuid)
				.collect::<Vec<_>>(),
		)
	}

	/// The node and everything below it, parents before children.
	pub fn descendants(&self, uuid: NodeUuid) -> Option<Vec<NodeUuid>> {
		let node_id = self.node_id(uuid).ok()?;
		Some(
			node_id
				.descendants(&self.arena)
				.map(|id| self.arena[id].get().uuid)
				.collect::<Vec<_>>(),
		)
	}

	/// Whether `ancestor` is a strict ancestor of `uuid`.
	pub fn is_ancestor(&self, ancestor: NodeUuid, uuid: NodeUuid) -> bool {
		let (Ok(ancestor_id), Ok(node_id)) = (self.node_id(ancestor), self.node_id(uuid)) else {
			return false;
		};
		node_id.ancestors(&self.arena).skip(1).any(|id| id == ancestor_id)
	}
}
