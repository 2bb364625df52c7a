mod hierarchy;
mod transforms;

use std::collections::HashMap;
use std::fmt::Display;

use indextree::{Arena, NodeEdge, NodeId};

use crate::node::{Node, NodeUuid};

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
	#[error("No node {0} in this scene")]
	NodeNotFound(NodeUuid),
	#[error("Adding {child} under {parent} would make {child} its own ancestor")]
	WouldCreateCycle { parent: NodeUuid, child: NodeUuid },
	#[error("The scene root cannot be reparented or destroyed")]
	RootNode,
}

/// Owner of a forest of nodes.
///
/// The scene has a root node of its own (`NodeUuid::ROOT`) that independent trees can hang from.
/// Nodes created by [`Scene::new_node`] start out unattached, as the root of their own tree.
#[derive(Debug)]
pub struct Scene {
	root: NodeId,
	arena: Arena<Node>,
	uuids: HashMap<NodeUuid, NodeId>,
	/// last handed out uuid
	counter: u64,
}

impl Scene {
	pub fn new() -> Self {
		let mut arena = Arena::new();
		let root = arena.new_node(Node::new(NodeUuid::ROOT));

		let mut uuids = HashMap::new();
		uuids.insert(NodeUuid::ROOT, root);

		Self {
			root,
			arena,
			uuids,
			counter: 0,
		}
	}

	/// Allocate a node with the next identifier. Identifiers start at 1 and are never reused.
	pub fn new_node(&mut self) -> NodeUuid {
		// u64 never runs out at any realistic allocation rate
		self.counter += 1;
		let uuid = NodeUuid(self.counter);

		let node_id = self.arena.new_node(Node::new(uuid));
		self.uuids.insert(uuid, node_id);

		uuid
	}

	pub fn root(&self) -> NodeUuid {
		NodeUuid::ROOT
	}

	pub fn contains(&self, uuid: NodeUuid) -> bool {
		self.uuids.contains_key(&uuid)
	}

	/// Number of live nodes, the scene root included.
	pub fn len(&self) -> usize {
		self.uuids.len()
	}

	/// No nodes besides the scene root.
	pub fn is_empty(&self) -> bool {
		self.uuids.len() == 1
	}

	pub(crate) fn node_id(&self, uuid: NodeUuid) -> SceneResult<NodeId> {
		self.uuids.get(&uuid).copied().ok_or(SceneError::NodeNotFound(uuid))
	}

	fn get_internal_node(&self, uuid: NodeUuid) -> Option<&indextree::Node<Node>> {
		self.arena.get(*self.uuids.get(&uuid)?)
	}

	fn get_internal_node_mut(&mut self, uuid: NodeUuid) -> Option<&mut indextree::Node<Node>> {
		self.arena.get_mut(*self.uuids.get(&uuid)?)
	}

	pub fn node(&self, uuid: NodeUuid) -> Option<&Node> {
		Some(self.get_internal_node(uuid)?.get())
	}

	pub fn node_mut(&mut self, uuid: NodeUuid) -> Option<&mut Node> {
		Some(self.get_internal_node_mut(uuid)?.get_mut())
	}

	/// Unattached nodes other than the scene root, in allocation order.
	pub fn detached_roots(&self) -> Vec<NodeUuid> {
		let mut roots = self
			.uuids
			.iter()
			.filter(|(uuid, node_id)| **uuid != NodeUuid::ROOT && self.arena[**node_id].parent().is_none())
			.map(|(uuid, _)| *uuid)
			.collect::<Vec<_>>();
		roots.sort_by_key(|uuid| uuid.0);
		roots
	}

	/// Take a node out of the scene.
	///
	/// The node is detached from its parent, its children are detached from it and become unattached roots
	/// (they are not destroyed), and its identifier is retired.
	pub fn destroy(&mut self, uuid: NodeUuid) -> SceneResult<()> {
		if uuid == NodeUuid::ROOT {
			return Err(SceneError::RootNode);
		}
		let node_id = self.node_id(uuid)?;

		node_id.detach(&mut self.arena);

		let children = node_id.children(&self.arena).collect::<Vec<_>>();
		for child in &children {
			child.detach(&mut self.arena);
			self.arena[*child].get_mut().mark_world_dirty();
		}

		node_id.remove(&mut self.arena);
		self.uuids.remove(&uuid);

		tracing::debug!("Destroyed node {}, orphaning {} children", uuid, children.len());
		Ok(())
	}
}

impl Default for Scene {
	fn default() -> Self {
		Self::new()
	}
}

impl Scene {
	/// One line per node of the tree at `top`, children indented under their parent.
	fn fmt_tree(&self, f: &mut std::fmt::Formatter<'_>, top: NodeId, mut depth: usize) -> std::fmt::Result {
		for edge in top.traverse(&self.arena) {
			let node_id = match edge {
				NodeEdge::Start(node_id) => node_id,
				NodeEdge::End(_) => {
					depth -= 1;
					continue;
				}
			};

			let node = self.arena[node_id].get();
			let uuid = node.uuid();
			#[cfg(feature = "owo")]
			let uuid = {
				use owo_colors::OwoColorize;
				uuid.magenta()
			};

			let pos = node.position();
			write!(f, "{}- [{}] ({}, {}, {})", "  ".repeat(depth), uuid, pos.x, pos.y, pos.z)?;
			if node.is_world_dirty() {
				write!(f, " *")?;
			}
			writeln!(f)?;
			depth += 1;
		}

		Ok(())
	}
}

/// Tree dump. A trailing `*` marks a node whose world matrix is stale.
impl Display for Scene {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.fmt_tree(f, self.root, 0)?;

		let detached = self.detached_roots();
		if !detached.is_empty() {
			writeln!(f, "(unattached)")?;
			for uuid in detached {
				self.fmt_tree(f, self.uuids[&uuid], 1)?;
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uuids_are_sequential_from_one() {
		let mut scene = Scene::new();

		assert_eq!(scene.new_node(), NodeUuid(1));
		assert_eq!(scene.new_node(), NodeUuid(2));
		assert_eq!(scene.new_node(), NodeUuid(3));
		assert_eq!(scene.root(), NodeUuid(0));
		assert_eq!(scene.len(), 4);
	}

	#[test]
	fn uuids_are_not_reused() {
		let mut scene = Scene::new();
		let a = scene.new_node();
		let b = scene.new_node();

		scene.destroy(b).unwrap();
		let c = scene.new_node();

		assert_ne!(c, b);
		assert_eq!(c, NodeUuid(3));
		assert!(scene.contains(a));
		assert!(!scene.contains(b));
	}

	#[test]
	fn new_node_is_unattached() {
		let mut scene = Scene::new();
		let a = scene.new_node();

		assert!(scene.parent(a).is_none());
		assert_eq!(scene.detached_roots(), vec![a]);
		assert!(scene.children(scene.root()).unwrap().is_empty());
	}

	#[test]
	fn destroy_orphans_children() {
		let mut scene = Scene::new();
		let a = scene.new_node();
		let b = scene.new_node();
		let c = scene.new_node();
		scene.add_to_root(a).unwrap();
		scene.add(a, b).unwrap();
		scene.add(b, c).unwrap();

		scene.destroy(b).unwrap();

		assert!(scene.node(b).is_none());
		assert!(scene.children(a).unwrap().is_empty());
		assert!(scene.parent(c).is_none());
		assert!(scene.node(c).unwrap().is_world_dirty());
		assert_eq!(scene.detached_roots(), vec![c]);
	}

	#[test]
	fn empty_scene_only_has_root() {
		let mut scene = Scene::new();
		assert!(scene.is_empty());
		assert_eq!(scene.len(), 1);

		let a = scene.new_node();
		assert!(!scene.is_empty());

		scene.destroy(a).unwrap();
		assert!(scene.is_empty());
	}

	#[test]
	fn destroy_errors() {
		let mut scene = Scene::new();

		assert_eq!(scene.destroy(scene.root()), Err(SceneError::RootNode));
		assert_eq!(scene.destroy(NodeUuid(7)), Err(SceneError::NodeNotFound(NodeUuid(7))));
	}

	#[test]
	fn display_tree() {
		let mut scene = Scene::new();
		let a = scene.new_node();
		let b = scene.new_node();
		let c = scene.new_node();
		scene.add_to_root(a).unwrap();
		scene.add(a, b).unwrap();
		scene.update(false);
		scene.node_mut(b).unwrap().set_position(glam::Vec3::new(1.0, 2.0, 3.0));

		let dump = scene.to_string();
		#[cfg(not(feature = "owo"))]
		assert_eq!(
			dump,
			format!("- [#0] (0, 0, 0)\n  - [#1] (0, 0, 0)\n    - [#2] (1, 2, 3)\n(unattached)\n  - [{c}] (0, 0, 0) *\n")
		);
		#[cfg(feature = "owo")]
		assert!(dump.contains("(unattached)"));
	}

	#[test]
	fn display_siblings_return_to_parent_depth() {
		let mut scene = Scene::new();
		let a = scene.new_node();
		let b = scene.new_node();
		let c = scene.new_node();
		scene.add_to_root(a).unwrap();
		scene.add(a, b).unwrap();
		scene.add_to_root(c).unwrap();
		scene.update(false);

		let dump = scene.to_string();
		let lines = dump.lines().collect::<Vec<_>>();
		assert_eq!(lines.len(), 4);
		assert!(lines[2].starts_with("    - ["));
		assert!(lines[3].starts_with("  - ["));
	}
}
