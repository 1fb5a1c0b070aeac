//! Reload, unload and teardown of a loader built from the fixture catalog.

use std::sync::Arc;

use hotbind_loader::{ConfigError, Events, LoaderConfig, LoaderError, Messages};
use hotbind_meta::TypeKey;
use pretty_assertions::assert_eq;

use crate::common;
use crate::game::{ChatRoom, LOADED_TYPES, Player, RELOADS};

#[test]
fn reload_types_rebuilds_tables_and_broadcasts() {
	RELOADS.set(0);
	let mut loader = common::loader();
	let player = TypeKey::of::<Player>();
	let before = loader.symbol_of::<Player>().unwrap().clone();
	let bindings = loader.lookup::<Events>(player).unwrap().len();

	assert_eq!(loader.reload_types(), Ok(LOADED_TYPES));
	assert_eq!(RELOADS.get(), 1);
	assert_eq!(loader.lookup::<Events>(player).unwrap().len(), bindings);
	assert!(!Arc::ptr_eq(&before, loader.symbol_of::<Player>().unwrap()));
	assert_eq!(loader.bean_by_name("main_player").unwrap().symbol.key(), player);
}

#[test]
fn unload_all_keeps_processors() {
	let mut loader = common::loader();
	loader.unload_all();

	assert!(loader.symbols().is_empty());
	assert_eq!(loader.processors().len(), 7);
	assert!(loader.category::<Events>().unwrap().is_empty());
	assert!(loader.bean_by_name("main_player").is_none());
}

#[test]
fn cleanup_then_initialize_again() {
	let mut loader = common::loader();
	assert_eq!(loader.cleanup(), Ok(()));
	assert_eq!(loader.cleanup(), Err(LoaderError::NotInitialized));
	assert!(loader.category::<Events>().is_none());

	assert_eq!(loader.initialize(), Ok(LOADED_TYPES));
	assert!(loader.lookup::<Events>(TypeKey::of::<Player>()).is_some());
}

#[test]
fn disabled_category_is_not_instantiated() {
	let mut config = common::config();
	config.categories.entry("message".into()).or_default().enabled = Some(false);
	let loader = common::loader_with(config);

	assert_eq!(loader.processors().len(), 6);
	assert!(loader.category::<Messages>().is_none());
	assert!(loader.symbol_of::<ChatRoom>().is_some());
}

#[test]
fn config_loads_from_disk() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let path = dir.path().join("loader.toml");
	std::fs::write(&path, common::CONFIG).expect("write config");

	assert_eq!(LoaderConfig::load(&path).unwrap(), common::config());
}

#[test]
fn config_errors() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let missing = LoaderConfig::load(dir.path().join("missing.toml"));
	assert!(matches!(missing, Err(ConfigError::Io { .. })));

	assert!(matches!(LoaderConfig::from_toml_str("namespaces = ["), Err(ConfigError::Parse(_))));
	assert!(matches!(LoaderConfig::from_toml_str("unknown = 1"), Err(ConfigError::Parse(_))));
}
