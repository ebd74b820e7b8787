use std::path::{Path, PathBuf};

use themeloc_core::LanguageCode;
use walkdir::WalkDir;

pub const STOREFRONT_KIND: &str = "storefront";
pub const SCHEMA_KIND: &str = "schema";

/// One target locale document within a document kind.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    pub lang: LanguageCode,
    pub path: PathBuf,
}

/// Everything needed to synchronize one document kind: the authoritative
/// document, its snapshot from the last successful run, and the target
/// documents keyed by language.
#[derive(Debug, Clone)]
pub struct SyncTask {
    pub kind: String,
    pub current_path: PathBuf,
    pub previous_path: PathBuf,
    pub targets: Vec<SyncTarget>,
}

/// Walks the locales directory and builds one task per document kind.
///
/// Layout: `<code>.json` / `<code>.schema.json` are targets,
/// `<code>.default[.schema].json` is authoritative and
/// `<code>.default.old[.schema].json` is its snapshot. The authoritative
/// language's own files are never targets.
pub fn discover_tasks(locales_dir: &Path, source_lang: &str) -> Vec<SyncTask> {
    let mut storefront = Vec::new();
    let mut schema = Vec::new();
    for entry in WalkDir::new(locales_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") || name.contains(".default.") {
            continue;
        }
        let Some(code) = name.split('.').next() else {
            continue;
        };
        if code.is_empty() || code == source_lang {
            continue;
        }
        let target = SyncTarget {
            lang: code.to_string(),
            path: path.to_path_buf(),
        };
        if name.ends_with(".schema.json") {
            schema.push(target);
        } else {
            storefront.push(target);
        }
    }
    storefront.sort_by(|a, b| a.lang.cmp(&b.lang));
    schema.sort_by(|a, b| a.lang.cmp(&b.lang));

    vec![
        SyncTask {
            kind: STOREFRONT_KIND.to_string(),
            current_path: locales_dir.join(format!("{source_lang}.default.json")),
            previous_path: locales_dir.join(format!("{source_lang}.default.old.json")),
            targets: storefront,
        },
        SyncTask {
            kind: SCHEMA_KIND.to_string(),
            current_path: locales_dir.join(format!("{source_lang}.default.schema.json")),
            previous_path: locales_dir.join(format!("{source_lang}.default.old.schema.json")),
            targets: schema,
        },
    ]
}
