use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use explorer_tree::{config, FileNode, LocalBackend, ProjectionEngine, SortMode};

/// Print the projected file tree for a directory.
#[derive(Parser, Debug)]
#[command(name = "xtree", version, about)]
struct Cli {
    /// Root path to project (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Show hidden files
    #[arg(long)]
    hidden: bool,

    /// Sort order: name, size, date
    #[arg(long)]
    sort: Option<String>,

    /// Collapse singleton directory chains into one row
    #[arg(long)]
    compact: bool,

    /// Search query (matches surface with their ancestors)
    #[arg(long)]
    search: Option<String>,

    /// How many directory levels to fetch
    #[arg(long, default_value_t = 3)]
    depth: usize,
}

#[tokio::main]
async fn main() -> explorer_tree::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut options = config::load().build_options();
    if cli.hidden {
        options.show_hidden = true;
    }
    if let Some(sort) = &cli.sort {
        options.sort_mode = SortMode::from_config(sort);
    }
    if cli.compact {
        options.compact_packages = true;
    }
    if let Some(query) = &cli.search {
        options.is_searching = true;
        options.search_query = query.clone();
    }

    let backend = LocalBackend::new();
    let mut root = backend.root_node(&cli.path)?;
    root.is_expanded = true;

    let (engine, mut results) = ProjectionEngine::new();
    engine.with_cache(|cache| cache.set_root(root.clone()));

    // Fetch directories down to the requested depth; every directory is
    // marked expanded so the projection shows what was fetched.
    let mut frontier = vec![(root, 0usize)];
    while let Some((node, level)) = frontier.pop() {
        if level >= cli.depth {
            continue;
        }
        engine
            .fetch_children(&backend, &node, options.clone())
            .await;
        let children = engine.with_cache(|cache| cache.get(&node.key).to_vec());
        for child in children {
            if child.is_dir {
                engine.with_cache(|cache| {
                    cache.update_node(&child.key, |n| n.is_expanded = true)
                });
                frontier.push((child, level + 1));
            }
        }
    }

    let generation = engine.request_build(options);
    while let Some(result) = results.recv().await {
        if result.generation < generation {
            continue;
        }
        print_rows(&result.rows);
        break;
    }
    Ok(())
}

fn print_rows(rows: &[FileNode]) {
    for row in rows {
        let indent = "  ".repeat(row.depth);
        let marker = if row.is_dir { "/" } else { "" };
        match &row.error {
            Some(error) => println!("{indent}{}{marker}  [error: {error}]", row.display_name()),
            None => println!("{indent}{}{marker}", row.display_name()),
        }
    }
}
