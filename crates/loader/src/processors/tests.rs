use std::cell::Cell;

use hotbind_meta::{Described, describe};
use pretty_assertions::assert_eq;

use super::*;
use crate::config::CategoryConfig;
use crate::domains::{Events, Notices};
use crate::symbols::SymbolRegistry;

thread_local! {
	static SHUTDOWNS: Cell<u32> = const { Cell::new(0) };
}

trait Widget {}

struct Button;
struct Plain;

describe!(Button {
	roles: [dyn Widget],
});

describe!(Plain {});

fn events_loader() -> Box<dyn BindingProcessor> {
	Box::new(CategoryLoader::<Events>::default())
}

fn counting_cleanup(processor: &mut dyn BindingProcessor) {
	processor.cleanup();
	SHUTDOWNS.set(SHUTDOWNS.get() + 1);
}

fn def(name: &'static str, priority: i16) -> ProcessorDef {
	ProcessorDef {
		name,
		priority,
		init: Some(events_loader),
		cleanup: Some(counting_cleanup),
	}
}

#[test]
fn builtin_processors_are_registered_and_ordered() {
	let mut registry = ProcessorRegistry::new();
	registry.instantiate(&LoaderConfig::default());
	assert_eq!(
		registry.names().collect::<Vec<_>>(),
		vec!["aspect", "inject", "extend", "event", "input", "message", "notice"]
	);
	assert!(registry.category::<Events>().is_some());
	assert!(registry.category_mut::<Notices>().is_some());
	assert_eq!(registry.by_name("input").map(|p| p.marker()), Some(ClassMarker::InputSystem));
}

#[test]
fn config_overrides_priority_and_disables() {
	let mut config = LoaderConfig::default();
	config.categories.insert(
		"notice".into(),
		CategoryConfig {
			priority: Some(100),
			enabled: None,
		},
	);
	config.categories.insert(
		"aspect".into(),
		CategoryConfig {
			priority: None,
			enabled: Some(false),
		},
	);

	let mut registry = ProcessorRegistry::new();
	registry.instantiate(&config);
	let names: Vec<_> = registry.names().collect();
	assert_eq!(names.first(), Some(&"notice"));
	assert!(!names.contains(&"aspect"));
}

#[test]
fn equal_priorities_order_by_name() {
	let config = LoaderConfig::default();
	let mut registry = ProcessorRegistry::new();
	assert!(registry.install(&def("zeta", 5), &config));
	assert!(registry.install(&def("alpha", 5), &config));
	assert!(registry.install(&def("top", 9), &config));
	assert_eq!(registry.names().collect::<Vec<_>>(), vec!["top", "alpha", "zeta"]);
}

#[test]
fn incomplete_or_duplicate_definitions_are_excluded() {
	let config = LoaderConfig::default();
	let mut registry = ProcessorRegistry::new();

	let mut no_cleanup = def("broken", 1);
	no_cleanup.cleanup = None;
	assert!(!registry.install(&no_cleanup, &config));

	let mut no_init = def("broken", 1);
	no_init.init = None;
	assert!(!registry.install(&no_init, &config));

	assert!(registry.install(&def("custom", 1), &config));
	assert!(!registry.install(&def("custom", 2), &config));
	assert_eq!(registry.len(), 1);
}

#[test]
fn shutdown_runs_every_cleanup_function() {
	SHUTDOWNS.set(0);
	let config = LoaderConfig::default();
	let mut registry = ProcessorRegistry::new();
	registry.install(&def("one", 1), &config);
	registry.install(&def("two", 2), &config);

	registry.shutdown();
	assert_eq!(SHUTDOWNS.get(), 2);
	assert!(registry.is_empty());
}

#[test]
fn loaded_callbacks_fire_for_assignable_symbols() {
	let mut symbols = SymbolRegistry::new();
	let button = symbols.build(Button::type_def());
	let plain = symbols.build(Plain::type_def());

	let mut registry = ProcessorRegistry::new();
	let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
	let sink = seen.clone();
	registry.on_type_loaded(
		TypeKey::of::<dyn Widget>(),
		Arc::new(move |symbol: &Symbol, reload: bool| {
			sink.lock().unwrap().push((symbol.class_name(), reload));
			Ok(())
		}),
	);
	registry.on_all_unloaded(Arc::new(|| Err(InvokeError::MissingFlag)));

	assert!(registry.wants(&button));
	assert!(!registry.wants(&plain));
	assert_eq!(registry.notify_loaded(&button, true), 1);
	assert_eq!(registry.notify_loaded(&plain, false), 0);
	assert_eq!(*seen.lock().unwrap(), vec![("Button", true)]);

	assert_eq!(registry.notify_unloaded(), 0);
	assert_eq!(registry.callback_counts(), (1, 1));
}
