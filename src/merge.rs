use crate::cache::NodeMap;
use crate::node::FileNode;

/// Compute the compaction chain starting at `node`.
///
/// The chain extends while the current directory has exactly one visible
/// child and that child is itself a directory; fetched state is consulted
/// through `map`, with hidden children excluded unless `show_hidden`. A
/// non-directory start, an unfetched directory, or any branching stops the
/// chain, so the result always has length ≥ 1.
pub fn compaction_chain(node: &FileNode, map: &NodeMap, show_hidden: bool) -> Vec<FileNode> {
    let mut chain = vec![node.clone()];
    if !node.is_dir {
        return chain;
    }

    let mut current = node.key.clone();
    loop {
        let Some(children) = map.get(&current) else {
            break;
        };
        let mut visible = children.iter().filter(|c| show_hidden || !c.is_hidden);
        let (Some(only), None) = (visible.next(), visible.next()) else {
            break;
        };
        if !only.is_dir {
            break;
        }
        current = only.key.clone();
        chain.push(only.clone());
    }
    chain
}
