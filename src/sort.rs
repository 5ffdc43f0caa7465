use std::cmp::Ordering;

use crate::node::FileNode;
use crate::options::{BuildOptions, SortMode};

/// Compare two nodes under the given sort mode.
///
/// Name is ascending case-insensitive; Size and Date are descending
/// (largest / most recent first).
pub fn compare(a: &FileNode, b: &FileNode, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortMode::Size => b.size.cmp(&a.size),
        SortMode::Date => b.modified.cmp(&a.modified),
    }
}

/// Filter and order one fetched child sequence for emission.
///
/// Hidden entries are dropped unless `show_hidden`. The sort is stable, and
/// folders-on-top is applied as a second stable partition rather than being
/// folded into the comparator, so ties within each group keep the primary
/// order.
pub fn visible_children(children: &[FileNode], options: &BuildOptions) -> Vec<FileNode> {
    let visible: Vec<FileNode> = children
        .iter()
        .filter(|c| options.show_hidden || !c.is_hidden)
        .cloned()
        .collect();
    order(visible, options)
}

/// Order one child sequence without the hidden filter.
///
/// Used for Root's sequence: the workspace root is always shown even when
/// dot-named (a workspace opened at `~/.config` must still project).
pub fn ordered_children(children: &[FileNode], options: &BuildOptions) -> Vec<FileNode> {
    order(children.to_vec(), options)
}

fn order(mut visible: Vec<FileNode>, options: &BuildOptions) -> Vec<FileNode> {
    visible.sort_by(|a, b| compare(a, b, options.sort_mode));

    if options.folders_on_top {
        let (dirs, files): (Vec<FileNode>, Vec<FileNode>) =
            visible.into_iter().partition(|c| c.is_dir);
        visible = dirs;
        visible.extend(files);
    }
    visible
}
