//! Loader configuration.
//!
//! Configuration is TOML:
//!
//! ```toml
//! namespaces = ["game", "ui"]
//!
//! [categories.event]
//! priority = 40
//!
//! [categories.notice]
//! enabled = false
//!
//! [[bean]]
//! name = "main_player"
//! class = "Player"
//! priority = 5
//! ```
//!
//! `namespaces` restricts which modules are scanned (prefix match on the
//! module path, empty means everything). `categories` overrides the default
//! priority of a category loader or disables it. Each `[[bean]]` binds a name
//! to a class, matched against the class name or the full `module::Class`
//! name.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
	pub namespaces: Vec<String>,
	pub categories: BTreeMap<String, CategoryConfig>,
	#[serde(rename = "bean")]
	pub beans: Vec<BeanEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
	pub priority: Option<i16>,
	pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeanEntry {
	pub name: String,
	pub class: String,
	#[serde(default)]
	pub priority: i16,
	#[serde(default = "default_singleton")]
	pub singleton: bool,
}

fn default_singleton() -> bool {
	true
}

impl LoaderConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}

	/// Whether a module path passes the namespace filter.
	pub fn scans_module(&self, module: &str) -> bool {
		self.namespaces.is_empty()
			|| self.namespaces.iter().any(|ns| {
				module == ns
					|| module
						.strip_prefix(ns.as_str())
						.is_some_and(|rest| rest.starts_with("::"))
			})
	}

	/// Effective priority of a category loader.
	pub fn category_priority(&self, name: &str, default: i16) -> i16 {
		self.categories
			.get(name)
			.and_then(|c| c.priority)
			.unwrap_or(default)
	}

	pub fn category_enabled(&self, name: &str) -> bool {
		self.categories
			.get(name)
			.and_then(|c| c.enabled)
			.unwrap_or(true)
	}
}
