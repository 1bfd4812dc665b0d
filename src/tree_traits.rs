use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::arena::TreeArena;

/// Conversion of an arena subtree into a printable [`termtree::Tree`].
pub trait TreeNodeConvert {
    fn to_tree_string(&self, idx: Index) -> Tree<String>;
}

impl TreeNodeConvert for TreeArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, idx: Index) -> Tree<String> {
        fn label(arena: &TreeArena, idx: Index) -> String {
            match arena.get_node(idx) {
                Some(node) => match node.identifier() {
                    Some(id) => format!("{}: {}", id, node.payload()),
                    None => node.payload().to_string(),
                },
                None => "<stale node>".to_string(),
            }
        }

        // Recursively construct the children
        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in node.children() {
                    let mut child_tree = Tree::new(label(arena, child_idx));
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let mut tree = Tree::new(label(self, idx));
        build_tree(self, idx, &mut tree);
        tree
    }
}
