use std::collections::HashSet;

use tracing::debug;

use crate::cache::NodeMap;
use crate::merge::compaction_chain;
use crate::node::{FileNode, NodeKey};
use crate::options::BuildOptions;
use crate::search::{search, SearchOutcome};
use crate::sort::{ordered_children, visible_children};

/// How rows are emitted for one build. Exactly one applies, picked in
/// priority order: an active search beats compaction beats standard.
#[derive(Debug)]
enum Strategy {
    /// Emit filtered+sorted children; recurse into expanded directories.
    Standard,
    /// Emit only keys in the search result set; recurse into every emitted
    /// directory regardless of its expansion state.
    Search(HashSet<NodeKey>),
    /// Collapse singleton-directory chains into single merged rows.
    Compaction,
}

impl Strategy {
    fn select(map: &NodeMap, options: &BuildOptions) -> Self {
        if options.is_searching {
            // A blank query means the search UI is open but inactive; it
            // must not render as "zero matches".
            if let SearchOutcome::Matches(set) = search(map, &options.search_query) {
                return Strategy::Search(set);
            }
        }
        if options.compact_packages {
            return Strategy::Compaction;
        }
        Strategy::Standard
    }
}

/// Turns one consistent (map, options) snapshot into the flat, ordered,
/// render-ready row list.
///
/// The builder never mutates the cache; rows are owned clones with their
/// `depth` already resolved, so an index-based list view renders them
/// without any further tree-walking. Rebuilding from an unchanged snapshot
/// yields an identical sequence.
pub struct DisplayListBuilder<'a> {
    map: &'a NodeMap,
    options: &'a BuildOptions,
    strategy: Strategy,
}

impl<'a> DisplayListBuilder<'a> {
    pub fn new(map: &'a NodeMap, options: &'a BuildOptions) -> Self {
        let strategy = Strategy::select(map, options);
        Self {
            map,
            options,
            strategy,
        }
    }

    pub fn build(&self) -> Vec<FileNode> {
        let mut rows = Vec::new();
        self.emit_children(&NodeKey::Root, 0, &mut rows);
        debug!(rows = rows.len(), strategy = ?self.strategy, "display list built");
        rows
    }

    fn emit_children(&self, parent: &NodeKey, depth: usize, out: &mut Vec<FileNode>) {
        let Some(children) = self.map.get(parent) else {
            return;
        };
        // Root's sequence holds the workspace root, which stays visible
        // even when dot-named; the hidden filter applies from there down.
        let siblings = if parent.is_root() {
            ordered_children(children, self.options)
        } else {
            visible_children(children, self.options)
        };
        for mut child in siblings {
            child.depth = depth;
            match &self.strategy {
                Strategy::Standard => {
                    let recurse = child.is_dir && child.is_expanded;
                    let key = child.key.clone();
                    out.push(child);
                    if recurse {
                        self.emit_children(&key, depth + 1, out);
                    }
                }
                Strategy::Search(visible) => {
                    if !visible.contains(&child.key) {
                        continue;
                    }
                    // Search defeats lazy-collapse: always descend into an
                    // emitted directory so nested matches stay reachable.
                    let recurse = child.is_dir;
                    let key = child.key.clone();
                    out.push(child);
                    if recurse {
                        self.emit_children(&key, depth + 1, out);
                    }
                }
                Strategy::Compaction => {
                    if child.is_dir {
                        let chain =
                            compaction_chain(&child, self.map, self.options.show_hidden);
                        if chain.len() > 1 {
                            let mut row = FileNode::merged(&chain);
                            row.depth = depth;
                            let recurse = row.is_expanded;
                            let key = row.key.clone();
                            out.push(row);
                            if recurse {
                                self.emit_children(&key, depth + 1, out);
                            }
                            continue;
                        }
                    }
                    let recurse = child.is_dir && child.is_expanded;
                    let key = child.key.clone();
                    out.push(child);
                    if recurse {
                        self.emit_children(&key, depth + 1, out);
                    }
                }
            }
        }
    }
}

/// Convenience wrapper for one-shot builds.
pub fn build_display_list(map: &NodeMap, options: &BuildOptions) -> Vec<FileNode> {
    DisplayListBuilder::new(map, options).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::BackendId;
    use std::path::MAIN_SEPARATOR;

    fn key(path: &str) -> NodeKey {
        NodeKey::entry(BackendId::local(), path)
    }

    fn dir(path: &str, name: &str, expanded: bool) -> FileNode {
        let mut node = FileNode::new(key(path), name, true);
        node.is_expanded = expanded;
        node
    }

    fn file(path: &str, name: &str) -> FileNode {
        FileNode::new(key(path), name, false)
    }

    /// Root → w(expanded) → {docs(collapsed) → report.txt, src(expanded) →
    /// main.rs, readme.md}
    fn workspace_map() -> NodeMap {
        let mut map = NodeMap::new();
        map.insert(NodeKey::Root, vec![dir("/w", "w", true)]);
        map.insert(
            key("/w"),
            vec![
                dir("/w/docs", "docs", false),
                dir("/w/src", "src", true),
                file("/w/readme.md", "readme.md"),
            ],
        );
        map.insert(key("/w/docs"), vec![file("/w/docs/report.txt", "report.txt")]);
        map.insert(key("/w/src"), vec![file("/w/src/main.rs", "main.rs")]);
        map
    }

    fn rendered(rows: &[FileNode]) -> Vec<(String, usize)> {
        rows.iter()
            .map(|r| (r.display_name().to_string(), r.depth))
            .collect()
    }

    #[test]
    fn standard_emits_expanded_directories_only() {
        let map = workspace_map();
        let rows = build_display_list(&map, &BuildOptions::default());
        assert_eq!(
            rendered(&rows),
            [
                ("w".into(), 0),
                ("docs".into(), 1),
                ("readme.md".into(), 1),
                ("src".into(), 1),
                ("main.rs".into(), 2),
            ]
        );
    }

    #[test]
    fn search_surfaces_matches_inside_collapsed_directories() {
        let map = workspace_map();
        let options = BuildOptions::searching("report");
        let rows = build_display_list(&map, &options);
        // docs is collapsed but its match must surface with ancestors
        assert_eq!(
            rendered(&rows),
            [("w".into(), 0), ("docs".into(), 1), ("report.txt".into(), 2)]
        );
    }

    #[test]
    fn search_with_no_hits_renders_nothing() {
        let map = workspace_map();
        let options = BuildOptions::searching("zzznope");
        assert!(build_display_list(&map, &options).is_empty());
    }

    #[test]
    fn blank_query_falls_back_to_standard() {
        let map = workspace_map();
        let options = BuildOptions::searching("   ");
        let standard = build_display_list(&map, &BuildOptions::default());
        assert_eq!(rendered(&build_display_list(&map, &options)), rendered(&standard));
    }

    #[test]
    fn search_takes_priority_over_compaction() {
        let map = workspace_map();
        let options = BuildOptions {
            compact_packages: true,
            ..BuildOptions::searching("main")
        };
        let rows = build_display_list(&map, &options);
        assert_eq!(
            rendered(&rows),
            [("w".into(), 0), ("src".into(), 1), ("main.rs".into(), 2)]
        );
    }

    /// w(expanded) → a → b → c(expanded) → {f1, f2}; a, b are singletons.
    fn chain_map(tail_expanded: bool) -> NodeMap {
        let mut map = NodeMap::new();
        map.insert(NodeKey::Root, vec![dir("/w", "w", true)]);
        map.insert(key("/w"), vec![dir("/w/a", "a", false)]);
        map.insert(key("/w/a"), vec![dir("/w/a/b", "b", false)]);
        map.insert(key("/w/a/b"), vec![dir("/w/a/b/c", "c", tail_expanded)]);
        map.insert(
            key("/w/a/b/c"),
            vec![file("/w/a/b/c/f1", "f1"), file("/w/a/b/c/f2", "f2")],
        );
        map
    }

    #[test]
    fn compaction_merges_singleton_chain_into_one_row() {
        let map = chain_map(false);
        let options = BuildOptions {
            compact_packages: true,
            ..BuildOptions::default()
        };
        let rows = build_display_list(&map, &options);
        let sep = MAIN_SEPARATOR.to_string();
        assert_eq!(
            rendered(&rows),
            [("w".into(), 0), (format!("a{sep}b{sep}c"), 1)]
        );
    }

    #[test]
    fn merged_row_recurses_when_chain_tail_is_expanded() {
        let map = chain_map(true);
        let options = BuildOptions {
            compact_packages: true,
            ..BuildOptions::default()
        };
        let rows = build_display_list(&map, &options);
        let sep = MAIN_SEPARATOR.to_string();
        assert_eq!(
            rendered(&rows),
            [
                ("w".into(), 0),
                (format!("a{sep}b{sep}c"), 1),
                ("f1".into(), 2),
                ("f2".into(), 2),
            ]
        );
    }

    #[test]
    fn compaction_leaves_branching_directories_alone() {
        let map = workspace_map();
        let options = BuildOptions {
            compact_packages: true,
            ..BuildOptions::default()
        };
        // docs has one child but it is a file; src likewise: no merging
        let rows = build_display_list(&map, &options);
        let standard = build_display_list(&map, &BuildOptions::default());
        assert_eq!(rendered(&rows), rendered(&standard));
    }

    #[test]
    fn hidden_rows_follow_show_hidden() {
        let mut map = workspace_map();
        map.get_mut(&key("/w")).unwrap().push(file("/w/.env", ".env"));

        let rows = build_display_list(&map, &BuildOptions::default());
        assert!(!rows.iter().any(|r| r.name == ".env"));

        let options = BuildOptions {
            show_hidden: true,
            ..BuildOptions::default()
        };
        let rows = build_display_list(&map, &options);
        assert!(rows.iter().any(|r| r.name == ".env"));
    }

    #[test]
    fn dot_named_workspace_root_is_always_projected() {
        // Opening a workspace at e.g. ~/.config must not blank the list
        // when hidden files are off.
        let mut map = NodeMap::new();
        map.insert(NodeKey::Root, vec![dir("/home/u/.config", ".config", true)]);
        map.insert(
            key("/home/u/.config"),
            vec![file("/home/u/.config/app.toml", "app.toml")],
        );

        let rows = build_display_list(&map, &BuildOptions::default());
        assert_eq!(
            rendered(&rows),
            [(".config".into(), 0), ("app.toml".into(), 1)]
        );

        // Hidden entries below the root still honor the filter
        let options = BuildOptions {
            compact_packages: true,
            ..BuildOptions::default()
        };
        let rows = build_display_list(&map, &options);
        assert_eq!(rows[0].name, ".config");

        let rows = build_display_list(&map, &BuildOptions::searching("app"));
        assert_eq!(
            rendered(&rows),
            [(".config".into(), 0), ("app.toml".into(), 1)]
        );
    }

    #[test]
    fn rebuild_from_unchanged_snapshot_is_identical() {
        let map = workspace_map();
        let options = BuildOptions {
            compact_packages: true,
            folders_on_top: true,
            ..BuildOptions::default()
        };
        let first = rendered(&build_display_list(&map, &options));
        let second = rendered(&build_display_list(&map, &options));
        assert_eq!(first, second);
    }

    #[test]
    fn unfetched_expanded_directory_emits_no_children() {
        let mut map = workspace_map();
        map.get_mut(&key("/w"))
            .unwrap()
            .push(dir("/w/pending", "pending", true));
        // No map entry for /w/pending: fetch not done yet
        let rows = build_display_list(&map, &BuildOptions::default());
        assert!(rows.iter().any(|r| r.name == "pending"));
        assert!(!rows.iter().any(|r| r.depth == 2 && r.name != "main.rs"));
    }
}
