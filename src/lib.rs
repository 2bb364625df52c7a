//! Hierarchical transform graph.
//!
//! A [`Scene`] owns a forest of [`Node`]s. Each node holds a local position and rotation relative to
//! its parent; world matrices are derived by composing down from the roots, either on demand
//! ([`Scene::update_world_matrix`], [`Scene::local_to_world`]) or in a once-per-frame batch pass
//! driven by dirty flags ([`Scene::update`], [`Scene::update_matrix_world`]).
//!
//! Matrices are column-major `glam` matrices acting on column vectors: `world = parent_world * local`.

pub mod math;
pub mod node;
pub mod scene;

pub use node::{Node, NodeUuid};
pub use scene::{Scene, SceneError, SceneResult};
