use colored::*;
use std::path::Path;
use walkdir::WalkDir;

/// Enumerates every file and directory under `root` (the root itself is
/// excluded), as forward-slash path strings in walk order. This is the
/// snapshot embedded into the outbound prompt.
pub fn snapshot_paths(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.depth() > 0)
        .map(|e| e.path().to_string_lossy().replace('\\', "/"))
        .collect()
}

pub fn print_tree(path: &Path, prefix: &str, is_last: bool) {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    let connector = if is_last { "└── " } else { "├── " };
    println!("{}{}{}", prefix, connector, name.blue());

    if path.is_dir() {
        let new_prefix = if is_last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };

        if let Ok(entries) = std::fs::read_dir(path) {
            let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
            entries.sort_by_key(|e| e.path());

            let count = entries.len();
            for (i, entry) in entries.iter().enumerate() {
                print_tree(&entry.path(), &new_prefix, i == count - 1);
            }
        }
    }
}
