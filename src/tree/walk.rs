//! Depth-first traversal over any [`Node`]

use super::node::{DirEntry, Node};
use super::utils::join_relative;
use crate::error::Error;

/// Visit `root` and everything below it, depth first, in directory order.
///
/// `visit` is called with each node's path relative to `root` (the root
/// itself is `""`). The first error it returns stops the traversal and is
/// returned unchanged; errors from building a child are converted into `E`.
///
/// `walk` never closes a node. Each child is owned by the traversal only until
/// its subtree is finished, and is dropped before the next sibling is
/// requested, so a visitor that does not close or keep nodes still holds at
/// most one open node per level. Use [`Node::take_file`] to keep a file
/// beyond its visit. Closing a directory inside `visit` skips its children.
pub fn walk<F, E>(root: &mut Node, mut visit: F) -> Result<(), E>
where
    F: FnMut(&str, &mut Node) -> Result<(), E>,
    E: From<Error>,
{
    walk_node("", root, &mut visit)
}

fn walk_node<F, E>(path: &str, node: &mut Node, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&str, &mut Node) -> Result<(), E>,
    E: From<Error>,
{
    visit(path, node)?;

    let Node::Directory(dir) = node else {
        return Ok(());
    };
    while let Some(DirEntry { name, mut node }) = dir.next_entry()? {
        let child_path = join_relative(path, &name);
        walk_node(&child_path, &mut node, visit)?;
    }
    Ok(())
}
