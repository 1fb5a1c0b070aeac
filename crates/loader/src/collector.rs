//! Consumer callback collection.

use std::sync::Arc;

use hotbind_meta::{Invocation, MarkerKind, TypeKey};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::inspect::{LoadedCallbackRules, SignatureRules, UnloadedCallbackRules};
use crate::processors::{LoadedCallback, ProcessorRegistry, UnloadedCallback};
use crate::symbols::Symbol;

/// Callbacks a consumer class declares through its static methods.
///
/// Methods tagged with the register marker become "type loaded" callbacks
/// keyed by the marker's target type; methods tagged with the unregister
/// marker become "all unloaded" callbacks.
pub struct CallbackCollector {
	consumer: String,
	loaded: IndexMap<TypeKey, Vec<LoadedCallback>, FxBuildHasher>,
	unloaded: Vec<UnloadedCallback>,
}

impl CallbackCollector {
	pub fn collect(symbol: &Symbol, register: MarkerKind, unregister: MarkerKind) -> Self {
		let mut collector = Self {
			consumer: symbol.full_name().to_string(),
			loaded: IndexMap::default(),
			unloaded: Vec::new(),
		};

		for method in symbol.methods() {
			for marker in method.markers() {
				let kind = marker.kind();
				if kind == register {
					if !LoadedCallbackRules::is_valid_signature(method) {
						tracing::warn!(
							consumer = %collector.consumer,
							method = method.name(),
							params = ?method.slots(),
							"invalid type loaded callback signature"
						);
						continue;
					}
					let Some(target) = marker.target() else {
						tracing::warn!(consumer = %collector.consumer, method = method.name(), "callback marker names no target");
						continue;
					};
					let thunk = method.thunk();
					let callback: LoadedCallback = Arc::new(move |symbol: &Symbol, reload: bool| {
						thunk(&mut Invocation::new().with_payload(symbol).with_flag(reload))
					});
					collector.loaded.entry(target).or_default().push(callback);
				} else if kind == unregister {
					if !UnloadedCallbackRules::is_valid_signature(method) {
						tracing::warn!(
							consumer = %collector.consumer,
							method = method.name(),
							params = ?method.slots(),
							"invalid all unloaded callback signature"
						);
						continue;
					}
					let thunk = method.thunk();
					collector
						.unloaded
						.push(Arc::new(move || thunk(&mut Invocation::new())));
				}
			}
		}
		collector
	}

	pub fn consumer(&self) -> &str {
		&self.consumer
	}

	pub fn targets(&self) -> impl Iterator<Item = TypeKey> + '_ {
		self.loaded.keys().copied()
	}

	pub fn loaded_for(&self, target: TypeKey) -> &[LoadedCallback] {
		self.loaded.get(&target).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn unloaded_count(&self) -> usize {
		self.unloaded.len()
	}

	pub fn is_empty(&self) -> bool {
		self.loaded.is_empty() && self.unloaded.is_empty()
	}

	/// Fires this consumer's loaded callbacks matching `symbol`.
	pub fn replay(&self, symbol: &Symbol, reload: bool) -> usize {
		let mut fired = 0;
		for (target, callbacks) in &self.loaded {
			if !symbol.is_assignable_to(*target) {
				continue;
			}
			for callback in callbacks {
				match callback(symbol, reload) {
					Ok(()) => fired += 1,
					Err(err) => tracing::warn!(
						consumer = %self.consumer,
						class = symbol.full_name(),
						error = %err,
						"type loaded callback failed"
					),
				}
			}
		}
		fired
	}

	/// Publishes every collected callback to the processor registry.
	pub fn forward(&self, registry: &mut ProcessorRegistry) {
		for (target, callbacks) in &self.loaded {
			for callback in callbacks {
				registry.on_type_loaded(*target, callback.clone());
			}
		}
		for callback in &self.unloaded {
			registry.on_all_unloaded(callback.clone());
		}
		tracing::debug!(
			consumer = %self.consumer,
			targets = self.loaded.len(),
			unloaded = self.unloaded.len(),
			"consumer callbacks forwarded"
		);
	}
}
