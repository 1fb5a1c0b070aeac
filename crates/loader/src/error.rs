use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by loader lifecycle calls.
///
/// Expected outcomes such as rejected bindings or empty lookups are not
/// errors; they surface as `bool`/`Option` plus a log line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
	#[error("code loader is already initialized")]
	AlreadyInitialized,
	#[error("code loader is not initialized")]
	NotInitialized,
}

/// Errors raised while reading loader configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid loader config: {0}")]
	Parse(#[from] toml::de::Error),
}
