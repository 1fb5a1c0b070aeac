//! Code loader façade.
//!
//! [`CodeLoader`] owns every table the engine keeps: the symbol registry, the
//! bean table, the binding processors and the consumer callbacks. It is a
//! single-threaded context; every mutation takes `&mut self`.

use std::any::Any;
use std::sync::Arc;

use hotbind_meta::{Described, InventoryCatalog, MarkerKind, ModuleCatalog, Notice, TypeDef, TypeKey};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::collector::CallbackCollector;
use crate::config::LoaderConfig;
use crate::domains::{Category, CategoryLoader, CodeInfo, Notices};
use crate::error::LoaderError;
use crate::processors::ProcessorRegistry;
use crate::symbols::{Bean, Symbol, SymbolRegistry};

/// Extra predicate over `(module, type)` applied after the namespace filter.
pub type TypeFilter = Box<dyn Fn(&str, &TypeDef) -> bool>;

pub struct CodeLoader {
	config: LoaderConfig,
	catalog: Box<dyn ModuleCatalog>,
	filter: Option<TypeFilter>,
	symbols: SymbolRegistry,
	processors: ProcessorRegistry,
	consumers: IndexMap<TypeKey, CallbackCollector, FxBuildHasher>,
	initialized: bool,
}

impl Default for CodeLoader {
	fn default() -> Self {
		Self::new(LoaderConfig::default())
	}
}

impl CodeLoader {
	/// Loader scanning every type registered through `describe!`.
	pub fn new(config: LoaderConfig) -> Self {
		Self {
			config,
			catalog: Box::new(InventoryCatalog),
			filter: None,
			symbols: SymbolRegistry::new(),
			processors: ProcessorRegistry::new(),
			consumers: IndexMap::default(),
			initialized: false,
		}
	}

	pub fn with_catalog(mut self, catalog: impl ModuleCatalog + 'static) -> Self {
		self.catalog = Box::new(catalog);
		self
	}

	pub fn with_filter(mut self, filter: impl Fn(&str, &TypeDef) -> bool + 'static) -> Self {
		self.filter = Some(Box::new(filter));
		self
	}

	pub fn config(&self) -> &LoaderConfig {
		&self.config
	}

	/// Replaces the configuration. Beans follow on the next [`reload`](Self::reload).
	pub fn set_config(&mut self, config: LoaderConfig) {
		self.config = config;
	}

	pub fn is_initialized(&self) -> bool {
		self.initialized
	}

	/// Instantiates the binding processors and loads every cataloged type that
	/// passes the filters. Returns the number of types loaded.
	pub fn initialize(&mut self) -> Result<usize, LoaderError> {
		if self.initialized {
			return Err(LoaderError::AlreadyInitialized);
		}
		self.processors.instantiate(&self.config);

		let defs = self.catalog.types();
		self.symbols.index_catalog(&defs);

		let candidates: Vec<&'static TypeDef> = defs.into_iter().filter(|def| self.scans(def)).collect();
		for def in candidates.iter().copied().filter(|def| declares_callbacks(def)) {
			self.register_consumer_def(def);
		}

		let mut loaded = 0;
		for def in candidates {
			if self.load_type(def, false) {
				loaded += 1;
			}
		}

		self.initialized = true;
		tracing::info!(
			types = loaded,
			symbols = self.symbols.len(),
			processors = self.processors.len(),
			"code loader initialized"
		);
		Ok(loaded)
	}

	/// Unloads everything, runs processor cleanup and forgets consumers.
	pub fn cleanup(&mut self) -> Result<(), LoaderError> {
		if !self.initialized {
			return Err(LoaderError::NotInitialized);
		}
		self.unload_all();
		self.processors.shutdown();
		self.processors = ProcessorRegistry::new();
		self.consumers.clear();
		self.initialized = false;
		tracing::info!("code loader cleaned up");
		Ok(())
	}

	fn scans(&self, def: &TypeDef) -> bool {
		self.config.scans_module(def.module) && self.filter.as_ref().is_none_or(|f| f(def.module, def))
	}

	/// Loads one type into the symbol registry and the first matching category.
	///
	/// Returns false for unclassifiable types, for a repeated load without
	/// `reload`, and when the matching category accepts no binding. In the
	/// last case the symbol stays registered.
	pub fn load_type(&mut self, def: &'static TypeDef, reload: bool) -> bool {
		let key = def.key();
		if !reload && self.symbols.contains(key) {
			tracing::warn!(class = def.name, module = def.module, "type already loaded; keeping existing");
			return false;
		}

		if reload {
			for processor in self.processors.iter_mut() {
				processor.unload(key);
			}
		}
		let symbol = self.symbols.resolve(def, reload);
		let category = self.processors.iter().find(|p| p.matches(&symbol, None)).map(|p| p.name());
		if category.is_none() && !self.processors.wants(&symbol) && !symbol.is_describable() {
			self.symbols.unregister(key);
			tracing::debug!(class = symbol.full_name(), "unclassifiable type; skipped");
			return false;
		}
		self.symbols.bind_beans(&symbol, &self.config.beans);

		let accepted = match self.processors.find_match(&symbol) {
			Some(processor) => processor.load(&symbol, reload),
			None => true,
		};
		debug_assert!(self.symbols.contains(key), "accepted symbol missing from the registry");

		if accepted {
			let fired = self.processors.notify_loaded(&symbol, reload);
			tracing::debug!(
				class = symbol.full_name(),
				category = category.unwrap_or("-"),
				callbacks = fired,
				reload,
				"type loaded"
			);
		}
		accepted
	}

	pub fn load<T: Described>(&mut self, reload: bool) -> bool {
		self.load_type(T::type_def(), reload)
	}

	/// Clears every category table, fires the "all unloaded" callbacks and
	/// drops every symbol and bean.
	pub fn unload_all(&mut self) {
		self.processors.cleanup_tables();
		let fired = self.processors.notify_unloaded();
		let types = self.symbols.len();
		self.symbols.clear();
		tracing::info!(types, callbacks = fired, "unloaded all types");
	}

	/// Rebinds beans from the current configuration without re-scanning types.
	pub fn reload(&mut self) {
		self.symbols.rebind_beans(&self.config.beans);
		tracing::info!(beans = self.symbols.beans().count(), "beans rebound");
	}

	/// Clears every category table and reloads each registered type.
	pub fn reload_types(&mut self) -> Result<usize, LoaderError> {
		if !self.initialized {
			return Err(LoaderError::NotInitialized);
		}
		let defs: Vec<&'static TypeDef> = self.symbols.iter().map(|s| s.def()).collect();
		self.processors.cleanup_tables();

		let mut reloaded = 0;
		for def in defs {
			if self.load_type(def, true) {
				reloaded += 1;
			}
		}
		if let Some(notices) = self.category::<Notices>() {
			notices.broadcast(Notice::ReloadCompleted, None);
		}
		tracing::info!(types = reloaded, "types reloaded");
		Ok(reloaded)
	}

	/// Collects the callbacks of consumer `T` and publishes them. Types already
	/// loaded are replayed to the new callbacks.
	pub fn register_consumer<T: Described>(&mut self) -> bool {
		self.register_consumer_def(T::type_def())
	}

	fn register_consumer_def(&mut self, def: &'static TypeDef) -> bool {
		let key = def.key();
		if self.consumers.contains_key(&key) {
			tracing::debug!(consumer = def.name, "consumer already registered");
			return false;
		}

		let symbol = self.symbols.build(def);
		let collector = CallbackCollector::collect(&symbol, MarkerKind::ClassLoaded, MarkerKind::ClassesUnloaded);
		if collector.is_empty() {
			tracing::warn!(consumer = symbol.full_name(), "consumer declares no valid callbacks");
			return false;
		}

		collector.forward(&mut self.processors);
		for loaded in self.symbols.iter() {
			collector.replay(loaded, false);
		}
		self.consumers.insert(key, collector);
		true
	}

	pub fn symbol_by_name(&self, name: &str) -> Option<&Arc<Symbol>> {
		self.symbols.by_name(name)
	}

	pub fn symbol_by_type(&self, key: TypeKey) -> Option<&Arc<Symbol>> {
		self.symbols.by_type(key)
	}

	pub fn symbol_of<T: ?Sized + 'static>(&self) -> Option<&Arc<Symbol>> {
		self.symbols.by_type(TypeKey::of::<T>())
	}

	pub fn symbols_inherited_from(&self, base: TypeKey) -> Vec<Arc<Symbol>> {
		self.symbols.inherited_from(base)
	}

	pub fn symbols_by_feature(&self, name: &str) -> Vec<Arc<Symbol>> {
		self.symbols.with_feature(name)
	}

	pub fn symbols_by_role(&self, role: TypeKey) -> Vec<Arc<Symbol>> {
		self.symbols.with_role(role)
	}

	pub fn bean_by_name(&self, name: &str) -> Option<&Bean> {
		self.symbols.bean(name)
	}

	pub fn bean_by_type(&self, key: TypeKey) -> Option<&Bean> {
		self.symbols.bean_for_type(key)
	}

	/// Builds a fresh instance of the bean's type through its constructor.
	pub fn instantiate_bean(&self, name: &str) -> Option<Box<dyn Any>> {
		let bean = self.symbols.bean(name)?;
		let instance = bean.symbol.create_instance();
		if instance.is_none() {
			tracing::warn!(bean = name, class = bean.symbol.full_name(), "bean type has no constructor");
		}
		instance
	}

	pub fn category<C: Category>(&self) -> Option<&CategoryLoader<C>> {
		self.processors.category::<C>()
	}

	pub fn category_mut<C: Category>(&mut self) -> Option<&mut CategoryLoader<C>> {
		self.processors.category_mut::<C>()
	}

	pub fn lookup<C: Category>(&self, class: TypeKey) -> Option<&Arc<CodeInfo<C::Key>>> {
		self.category::<C>()?.lookup(class)
	}

	pub fn symbols(&self) -> &SymbolRegistry {
		&self.symbols
	}

	pub fn processors(&self) -> &ProcessorRegistry {
		&self.processors
	}

	pub fn consumers(&self) -> impl Iterator<Item = &CallbackCollector> {
		self.consumers.values()
	}
}

fn declares_callbacks(def: &TypeDef) -> bool {
	def.methods.iter().flat_map(|m| m.markers).any(|m| {
		matches!(m.kind(), MarkerKind::ClassLoaded | MarkerKind::ClassesUnloaded)
	})
}
