use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeLocConfig {
    /// Language code of the authoritative documents (defaults to "en").
    pub source_lang: Option<String>,
    /// Directory holding the locale documents (defaults to "locales").
    pub locales_dir: Option<String>,
    pub sync: Option<SyncCfg>,
    pub translator: Option<TranslatorCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncCfg {
    /// Translation provider name: "azure" or "dummy".
    pub provider: Option<String>,
    /// Per-call timeout at the provider boundary.
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslatorCfg {
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

/// Search order: CWD/themeloc.toml, then $CONFIG_DIR/themeloc/themeloc.toml.
/// Earlier files win per field.
pub fn load_config() -> Result<ThemeLocConfig, ConfigError> {
    let mut merged = ThemeLocConfig::default();
    if let Ok(p) = std::env::current_dir() {
        let path = p.join("themeloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<ThemeLocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("themeloc").join("themeloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<ThemeLocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: ThemeLocConfig, b: ThemeLocConfig) -> ThemeLocConfig {
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    if a.locales_dir.is_none() {
        a.locales_dir = b.locales_dir;
    }
    a.sync = merge_opt(a.sync, b.sync, merge_sync);
    a.translator = merge_opt(a.translator, b.translator, merge_translator);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_sync(mut a: SyncCfg, b: SyncCfg) -> SyncCfg {
    if a.provider.is_none() {
        a.provider = b.provider;
    }
    if a.timeout_ms.is_none() {
        a.timeout_ms = b.timeout_ms;
    }
    a
}

fn merge_translator(mut a: TranslatorCfg, b: TranslatorCfg) -> TranslatorCfg {
    if a.endpoint.is_none() {
        a.endpoint = b.endpoint;
    }
    if a.region.is_none() {
        a.region = b.region;
    }
    a
}
