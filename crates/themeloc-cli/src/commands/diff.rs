use std::path::PathBuf;

use color_eyre::eyre::eyre;
use owo_colors::OwoColorize;
use themeloc_domain::ChangeSet;
use themeloc_services::{
    discover_tasks, read_tree, read_tree_or_empty, StorageError, SyncTask, SCHEMA_KIND,
    STOREFRONT_KIND,
};
use themeloc_tree::diff;
use tracing::error;

fn kind_changes(task: &SyncTask) -> Result<ChangeSet, StorageError> {
    let current = read_tree(&task.current_path)?;
    let previous = read_tree_or_empty(&task.previous_path)?;
    Ok(diff(&previous, &current))
}

pub fn run_diff(
    locales_dir: Option<PathBuf>,
    source_lang: Option<String>,
    kind: Option<String>,
    format: String,
    use_color: bool,
) -> color_eyre::Result<()> {
    let cfg = themeloc_config::load_config().unwrap_or_default();

    let locales_dir = locales_dir
        .or_else(|| cfg.locales_dir.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("locales"));
    let source_lang = source_lang
        .or_else(|| cfg.source_lang.clone())
        .unwrap_or_else(|| "en".to_string());
    if let Some(kind) = kind.as_deref() {
        if kind != STOREFRONT_KIND && kind != SCHEMA_KIND {
            return Err(eyre!("unknown document kind: {kind}"));
        }
    }

    let mut failures = 0usize;
    let mut reports = Vec::new();
    for task in discover_tasks(&locales_dir, &source_lang) {
        if kind.as_deref().is_some_and(|k| k != task.kind) {
            continue;
        }
        if !task.current_path.exists() {
            continue;
        }
        match kind_changes(&task) {
            Ok(changes) => reports.push((task.kind.clone(), changes)),
            Err(err) => {
                error!(kind = %task.kind, error = %err, "diff failed");
                failures += 1;
            }
        }
    }

    if format == "json" {
        let payload: Vec<_> = reports
            .iter()
            .map(|(kind, changes)| serde_json::json!({ "kind": kind, "changes": changes }))
            .collect();
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        for (kind, changes) in &reports {
            let header = format!(
                "{kind}: {} added, {} removed, {} changed",
                changes.added.len(),
                changes.removed.len(),
                changes.changed.len()
            );
            if use_color {
                println!("{}", header.bold());
            } else {
                println!("{header}");
            }
            for path in &changes.added {
                println!("  + {path}");
            }
            for path in &changes.removed {
                println!("  - {path}");
            }
            for path in &changes.changed {
                println!("  ~ {path}");
            }
        }
    }

    if failures > 0 {
        return Err(eyre!("{failures} document kind(s) failed to diff"));
    }
    Ok(())
}
