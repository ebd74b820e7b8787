use std::path::PathBuf;

use color_eyre::eyre::eyre;
use owo_colors::OwoColorize;
use themeloc_services::{discover_tasks, sync_locales, SCHEMA_KIND, STOREFRONT_KIND};
use themeloc_translate::{
    AzureTranslator, DummyTranslator, TranslateProvider, Translator, DEFAULT_TIMEOUT_MS,
};
use tracing::{debug, error};

#[allow(clippy::too_many_arguments)]
pub fn run_sync(
    locales_dir: Option<PathBuf>,
    source_lang: Option<String>,
    provider: Option<String>,
    kind: Option<String>,
    dry_run: bool,
    format: String,
    timeout_ms: Option<u64>,
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
    let provider: TranslateProvider = provider
        .or_else(|| cfg.sync.as_ref().and_then(|s| s.provider.clone()))
        .unwrap_or_else(|| "azure".to_string())
        .parse()
        .map_err(|e: String| eyre!(e))?;
    let timeout_ms = timeout_ms
        .or_else(|| cfg.sync.as_ref().and_then(|s| s.timeout_ms))
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    let translator: Box<dyn Translator> = if dry_run {
        // Dry runs never reach the provider; no credentials needed.
        Box::new(DummyTranslator)
    } else {
        match provider {
            TranslateProvider::Dummy => Box::new(DummyTranslator),
            TranslateProvider::Azure => {
                let t = cfg.translator.clone().unwrap_or_default();
                Box::new(AzureTranslator::from_env(
                    t.endpoint,
                    t.region,
                    &source_lang,
                    timeout_ms,
                )?)
            }
        }
    };

    let mut failures = 0usize;
    let mut plans = Vec::new();
    let mut summaries = Vec::new();
    for task in discover_tasks(&locales_dir, &source_lang) {
        if kind.as_deref().is_some_and(|k| k != task.kind) {
            continue;
        }
        if !task.current_path.exists() {
            debug!(kind = %task.kind, "no authoritative document, skipping kind");
            continue;
        }
        match sync_locales(&task, translator.as_ref(), dry_run) {
            Ok((plan, summary)) => {
                plans.extend(plan);
                summaries.extend(summary);
            }
            Err(err) => {
                error!(kind = %task.kind, error = %err, "synchronization pass aborted");
                failures += 1;
            }
        }
    }

    if format == "json" {
        if dry_run {
            println!("{}", serde_json::to_string(&plans)?);
        } else {
            println!("{}", serde_json::to_string(&summaries)?);
        }
    } else {
        for plan in &plans {
            for lang in &plan.languages {
                println!(
                    "DRY-RUN {}/{}: {} to translate, {} to remove",
                    plan.kind,
                    lang.lang,
                    lang.translate.len(),
                    lang.remove.len()
                );
            }
        }
        for summary in &summaries {
            for stat in &summary.languages {
                let line = format!(
                    "{}/{}: {} translated, {} copied, {} skipped, {} removed, {} failed",
                    summary.kind,
                    stat.lang,
                    stat.translated,
                    stat.copied,
                    stat.skipped,
                    stat.removed,
                    stat.failed
                );
                if !use_color {
                    println!("✔ {line}");
                } else if stat.failed > 0 {
                    println!("{} {}", "⚠".yellow(), line.yellow());
                } else {
                    println!("{} {}", "✔".green(), line);
                }
            }
        }
    }

    if failures > 0 {
        return Err(eyre!("{failures} document kind(s) failed to synchronize"));
    }
    Ok(())
}
