//! Binding processor registry.
//!
//! Category loaders are registered statically with [`ProcessorDef`] and
//! instantiated by [`ProcessorRegistry::instantiate`] in priority order. The
//! registry also holds consumer callbacks fired when a type loads or when every
//! type is unloaded.

use std::any::Any;
use std::sync::Arc;

use hotbind_meta::{ClassMarker, InvokeError, TypeKey};

use crate::config::LoaderConfig;
use crate::domains::{Category, CategoryLoader};
use crate::symbols::Symbol;

/// Object-safe contract every category loader fulfils.
pub trait BindingProcessor: Any {
	fn name(&self) -> &'static str;
	fn marker(&self) -> ClassMarker;
	fn matches(&self, symbol: &Symbol, filter: Option<ClassMarker>) -> bool;
	fn load(&mut self, symbol: &Symbol, reload: bool) -> bool;
	fn contains(&self, class: TypeKey) -> bool;
	fn unload(&mut self, class: TypeKey) -> bool;
	fn cleanup(&mut self);
	fn len(&self) -> usize;
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub type InitFn = fn() -> Box<dyn BindingProcessor>;
pub type CleanupFn = fn(&mut dyn BindingProcessor);

/// Static registration of a binding processor.
///
/// Definitions missing either lifecycle function are excluded at startup.
#[derive(Debug, Clone, Copy)]
pub struct ProcessorDef {
	pub name: &'static str,
	pub priority: i16,
	pub init: Option<InitFn>,
	pub cleanup: Option<CleanupFn>,
}

impl ProcessorDef {
	/// Definition of the category loader for `C`.
	pub const fn of<C: Category>() -> Self {
		Self {
			name: C::LABEL,
			priority: C::DEFAULT_PRIORITY,
			init: Some(init_category::<C> as InitFn),
			cleanup: Some(cleanup_category as CleanupFn),
		}
	}
}

fn init_category<C: Category>() -> Box<dyn BindingProcessor> {
	Box::new(CategoryLoader::<C>::default())
}

fn cleanup_category(processor: &mut dyn BindingProcessor) {
	processor.cleanup();
}

/// Wrapper for `inventory::collect!`.
pub struct ProcessorReg(pub &'static ProcessorDef);

inventory::collect!(ProcessorReg);

/// Fired for every loaded symbol assignable to the callback's target. The flag
/// is the reload indicator.
pub type LoadedCallback = Arc<dyn Fn(&Symbol, bool) -> Result<(), InvokeError>>;
/// Fired once every type has been unloaded.
pub type UnloadedCallback = Arc<dyn Fn() -> Result<(), InvokeError>>;

struct Installed {
	name: &'static str,
	priority: i16,
	cleanup: CleanupFn,
	processor: Box<dyn BindingProcessor>,
}

/// Live processors in match order plus the consumer callback tables.
#[derive(Default)]
pub struct ProcessorRegistry {
	installed: Vec<Installed>,
	loaded: Vec<(TypeKey, LoadedCallback)>,
	unloaded: Vec<UnloadedCallback>,
}

impl ProcessorRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every statically registered definition.
	pub fn registered() -> Vec<&'static ProcessorDef> {
		inventory::iter::<ProcessorReg>.into_iter().map(|reg| reg.0).collect()
	}

	/// Installs every registered definition enabled by `config`.
	pub fn instantiate(&mut self, config: &LoaderConfig) {
		for def in Self::registered() {
			self.install(def, config);
		}
		tracing::debug!(
			processors = ?self.names().collect::<Vec<_>>(),
			"binding processors ready"
		);
	}

	/// Installs one definition. Returns false when it was excluded.
	pub fn install(&mut self, def: &ProcessorDef, config: &LoaderConfig) -> bool {
		let (Some(init), Some(cleanup)) = (def.init, def.cleanup) else {
			tracing::warn!(
				processor = def.name,
				has_init = def.init.is_some(),
				has_cleanup = def.cleanup.is_some(),
				"binding processor lacks a lifecycle function; excluded"
			);
			return false;
		};
		if !config.category_enabled(def.name) {
			tracing::debug!(processor = def.name, "binding processor disabled by config");
			return false;
		}
		if self.installed.iter().any(|p| p.name == def.name) {
			tracing::warn!(processor = def.name, "binding processor registered twice; keeping first");
			return false;
		}

		let priority = config.category_priority(def.name, def.priority);
		let at = self
			.installed
			.iter()
			.position(|p| priority > p.priority || (priority == p.priority && def.name < p.name))
			.unwrap_or(self.installed.len());
		self.installed.insert(
			at,
			Installed {
				name: def.name,
				priority,
				cleanup,
				processor: init(),
			},
		);
		true
	}

	/// Runs every cleanup function and drops the processors.
	pub fn shutdown(&mut self) {
		for mut installed in self.installed.drain(..) {
			(installed.cleanup)(installed.processor.as_mut());
			tracing::trace!(processor = installed.name, "binding processor cleaned up");
		}
	}

	pub fn len(&self) -> usize {
		self.installed.len()
	}

	pub fn is_empty(&self) -> bool {
		self.installed.is_empty()
	}

	/// Processor names in match order.
	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.installed.iter().map(|p| p.name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &dyn BindingProcessor> {
		self.installed.iter().map(|p| p.processor.as_ref())
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn BindingProcessor + 'static)> {
		self.installed.iter_mut().map(|p| p.processor.as_mut())
	}

	/// First processor in match order accepting `symbol`.
	pub fn find_match(&mut self, symbol: &Symbol) -> Option<&mut (dyn BindingProcessor + 'static)> {
		self.iter_mut().find(|p| p.matches(symbol, None))
	}

	pub fn by_name(&self, name: &str) -> Option<&dyn BindingProcessor> {
		self.iter().find(|p| p.name() == name)
	}

	pub fn category<C: Category>(&self) -> Option<&CategoryLoader<C>> {
		self.iter().find_map(|p| p.as_any().downcast_ref())
	}

	pub fn category_mut<C: Category>(&mut self) -> Option<&mut CategoryLoader<C>> {
		self.iter_mut().find_map(|p| p.as_any_mut().downcast_mut())
	}

	/// Clears every binding table.
	pub fn cleanup_tables(&mut self) {
		for processor in self.iter_mut() {
			processor.cleanup();
		}
	}

	pub fn on_type_loaded(&mut self, target: TypeKey, callback: LoadedCallback) {
		self.loaded.push((target, callback));
	}

	pub fn on_all_unloaded(&mut self, callback: UnloadedCallback) {
		self.unloaded.push(callback);
	}

	/// Whether any loaded callback targets a type `symbol` is assignable to.
	pub fn wants(&self, symbol: &Symbol) -> bool {
		self.loaded.iter().any(|(target, _)| symbol.is_assignable_to(*target))
	}

	/// Fires the loaded callbacks matching `symbol`. Returns how many succeeded.
	pub fn notify_loaded(&self, symbol: &Symbol, reload: bool) -> usize {
		let mut fired = 0;
		for (target, callback) in &self.loaded {
			if !symbol.is_assignable_to(*target) {
				continue;
			}
			match callback(symbol, reload) {
				Ok(()) => fired += 1,
				Err(err) => tracing::warn!(
					class = symbol.full_name(),
					target = target.name(),
					error = %err,
					"type loaded callback failed"
				),
			}
		}
		fired
	}

	pub fn notify_unloaded(&self) -> usize {
		let mut fired = 0;
		for callback in &self.unloaded {
			match callback() {
				Ok(()) => fired += 1,
				Err(err) => tracing::warn!(error = %err, "all unloaded callback failed"),
			}
		}
		fired
	}

	pub fn callback_counts(&self) -> (usize, usize) {
		(self.loaded.len(), self.unloaded.len())
	}
}

#[cfg(test)]
mod tests;
