use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Language code as it appears in locale file names and in calls to the
/// translation provider (e.g. "de", "pt-BR").
pub type LanguageCode = String;

/// Keep a lightweight error type for crates that still import it.
#[derive(Debug, Error)]
pub enum ThemeLocError {
    #[error("{0}")]
    Other(String),
}
