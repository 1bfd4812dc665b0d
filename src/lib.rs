//! Pre-made tree data structure.
//!
//! A tree is a set of [`TreeNode`]s stored in a [`TreeArena`]: each node
//! carries an optional integer identifier, an arbitrary [`Value`] payload, an
//! ordered list of children, and at most one parent back-reference. Every
//! mutation path goes through the same validation, whether it originates in
//! the constructor or a later setter call, and fails with a [`TreeError`] on
//! shape mismatches. Nodes can also be built from nested raw attribute maps,
//! expanding each map into a node recursively.
//!
//! ```
//! use woodland::{NodeAttrs, TreeArena};
//!
//! let mut arena = TreeArena::new();
//! let root = arena
//!     .new_node(NodeAttrs::new().identifier(1).payload("root"))
//!     .unwrap();
//! let child = arena
//!     .new_node(NodeAttrs::new().identifier(2).parent(root))
//!     .unwrap();
//!
//! assert_eq!(arena.root_of(child).unwrap(), root);
//! ```

pub mod arena;
pub mod errors;
pub mod tree_traits;
pub mod util;
pub mod value;

pub use arena::{NodeDisplay, TreeArena, TreeNode};
pub use errors::{TreeError, TreeResult};
pub use tree_traits::TreeNodeConvert;
pub use value::{AttrMap, NodeAttrs, Value, ValueKind};
