use std::collections::BTreeSet;

use serde_json::Value;
use themeloc_domain::{ChangeSet, LanguagePlan, LanguageStat, SyncPlan, SyncSummary};
use themeloc_translate::{TranslateError, Translator};
use themeloc_tree::{
    diff, flatten, leaf_at, node_at, remove_path, set_leaf, KeyPath, Node,
};
use tracing::{debug, info, warn};

use crate::locales::SyncTask;
use crate::storage::{self, StorageError};

/// Translates one leaf value for a target language. String leaves go
/// through the guard and the provider; anything else is copied verbatim.
/// The bool reports whether the provider was actually consulted.
fn translate_value(
    translator: &dyn Translator,
    value: &Value,
    lang: &str,
) -> Result<(Value, bool), TranslateError> {
    match value.as_str() {
        Some(text) => {
            let guarded = themeloc_guard::protect(text);
            let translated = translator.translate(&guarded.text, lang)?;
            Ok((
                Value::String(themeloc_guard::restore(&translated, &guarded.spans)),
                true,
            ))
        }
        None => Ok((value.clone(), false)),
    }
}

// On failure the key must end up absent, not hold a placeholder, so the
// next run retries it. `drop_stale` additionally removes whatever stale
// value the target still holds (the changed-key case).
fn apply_leaf(
    target: &mut Node,
    path: &KeyPath,
    value: &Value,
    lang: &str,
    translator: &dyn Translator,
    drop_stale: bool,
    stat: &mut LanguageStat,
) {
    match translate_value(translator, value, lang) {
        Ok((translated, via_provider)) => {
            set_leaf(target, path, translated);
            if via_provider {
                stat.translated += 1;
            } else {
                stat.copied += 1;
            }
            debug!(key = %path, lang, "translated");
        }
        Err(err) => {
            warn!(key = %path, lang, error = %err, "translation failed, key left unset for retry");
            if drop_stale {
                remove_path(target, path);
            }
            stat.failed += 1;
        }
    }
}

/// Applies one full pass to a single target tree, in memory.
///
/// The missing-key sweep runs before the change set is applied, so a key
/// that is both missing and added is translated exactly once. Shape
/// conflicts always resolve to the authoritative side's shape.
pub fn sync_language(
    target: &mut Node,
    current: &Node,
    changes: &ChangeSet,
    lang: &str,
    translator: &dyn Translator,
) -> LanguageStat {
    let mut stat = LanguageStat {
        lang: lang.to_string(),
        ..Default::default()
    };

    // Values present before the sweep were contributed by hand; they win
    // over the provider for added keys.
    let manual: BTreeSet<&str> = changes
        .added
        .iter()
        .filter(|dotted| leaf_at(target, &KeyPath::from_dotted(dotted.as_str())).is_some())
        .map(String::as_str)
        .collect();

    // 1. Missing-key sweep: every authoritative leaf the target lacks.
    // Handled paths are recorded so the changed-key step never sends the
    // same value a second time within one pass.
    let mut swept: BTreeSet<KeyPath> = BTreeSet::new();
    for (path, value) in &flatten(current) {
        if leaf_at(target, path).is_some() {
            continue;
        }
        apply_leaf(target, path, value, lang, translator, false, &mut stat);
        swept.insert(path.clone());
    }

    // 2. Added keys. The sweep has already filled every absent leaf, so
    // what remains is honoring manual contributions.
    for dotted in &changes.added {
        if manual.contains(dotted.as_str()) {
            debug!(key = %dotted, lang, "translation already provided, keeping manual value");
            stat.skipped += 1;
        }
    }

    // 3. Changed keys overwrite unconditionally, manual edits included.
    for dotted in &changes.changed {
        let path = KeyPath::from_dotted(dotted);
        // The sweep already carried the current value to this path.
        if swept.contains(&path) {
            continue;
        }
        match node_at(current, &path) {
            Some(Node::Leaf(value)) => {
                apply_leaf(target, &path, value, lang, translator, true, &mut stat);
            }
            Some(subtree @ Node::Branch(_)) => {
                // The leaf became a subtree. Drop whatever still hangs
                // from the old value and fill the authoritative shape;
                // leaves the sweep just handled stay as they are.
                if leaf_at(target, &path).is_some() {
                    remove_path(target, &path);
                }
                for (rel, value) in &flatten(subtree) {
                    let full = path.join(rel);
                    if leaf_at(target, &full).is_none() && !swept.contains(&full) {
                        apply_leaf(target, &full, value, lang, translator, false, &mut stat);
                    }
                }
            }
            None => {
                debug!(key = %dotted, lang, "changed key no longer in the authoritative tree, skipping");
            }
        }
    }

    // 4. Removed keys take their whole subtree with them.
    for dotted in &changes.removed {
        if remove_path(target, &KeyPath::from_dotted(dotted)) {
            stat.removed += 1;
        }
    }

    stat
}

fn plan_language(target: &Node, current: &Node, changes: &ChangeSet, lang: &str) -> LanguagePlan {
    let mut translate: BTreeSet<String> = flatten(current)
        .keys()
        .filter(|path| leaf_at(target, path).is_none())
        .map(|path| path.to_string())
        .collect();
    translate.extend(changes.changed.iter().cloned());
    LanguagePlan {
        lang: lang.to_string(),
        translate: translate.into_iter().collect(),
        remove: changes.removed.clone(),
    }
}

/// Synchronizes every target language of one document kind.
///
/// With `dry_run` the filesystem and the provider stay untouched and a
/// plan comes back; otherwise the pass is applied, every target tree is
/// persisted sorted, and the snapshot advances to the current
/// authoritative tree. A `StorageError` aborts this kind only.
pub fn sync_locales(
    task: &SyncTask,
    translator: &dyn Translator,
    dry_run: bool,
) -> Result<(Option<SyncPlan>, Option<SyncSummary>), StorageError> {
    let current = storage::read_tree(&task.current_path)?;
    let previous = storage::read_tree_or_empty(&task.previous_path)?;
    let changes = diff(&previous, &current);

    if dry_run {
        let mut languages = Vec::new();
        for target in &task.targets {
            let tree = storage::read_tree_or_empty(&target.path)?;
            languages.push(plan_language(&tree, &current, &changes, &target.lang));
        }
        return Ok((
            Some(SyncPlan {
                kind: task.kind.clone(),
                changes,
                languages,
            }),
            None,
        ));
    }

    let mut languages = Vec::new();
    for target in &task.targets {
        let mut tree = storage::read_tree_or_empty(&target.path)?;
        let stat = sync_language(&mut tree, &current, &changes, &target.lang, translator);
        storage::write_tree(&target.path, &tree)?;
        info!(
            kind = %task.kind,
            lang = %target.lang,
            translated = stat.translated,
            copied = stat.copied,
            skipped = stat.skipped,
            removed = stat.removed,
            failed = stat.failed,
            "locale synchronized"
        );
        languages.push(stat);
    }

    // The snapshot only advances once every target of this kind has been
    // written, so an aborted pass is retried in full on the next run.
    storage::write_tree(&task.previous_path, &current)?;

    Ok((
        None,
        Some(SyncSummary {
            kind: task.kind.clone(),
            changes,
            languages,
        }),
    ))
}
