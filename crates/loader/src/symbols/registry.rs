use std::sync::Arc;

use hotbind_meta::{FeatureTag, TypeDef, TypeKey};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap, FxHashSet as HashSet};

use super::{Bean, BeanSource, Symbol};
use crate::config::BeanEntry;

/// Resolver and cache of [`Symbol`]s, plus the bean table.
///
/// A reload unregisters the stale symbol (names, type entry, beans) before the
/// replacement is registered.
#[derive(Default)]
pub struct SymbolRegistry {
	catalog: HashMap<TypeKey, &'static TypeDef>,
	by_type: IndexMap<TypeKey, Arc<Symbol>, FxBuildHasher>,
	by_name: HashMap<String, Arc<Symbol>>,
	beans: IndexMap<String, Bean, FxBuildHasher>,
}

impl SymbolRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes descriptors known for base-chain walks.
	pub fn index_catalog<'a>(&mut self, defs: impl IntoIterator<Item = &'a &'static TypeDef>) {
		for def in defs {
			self.catalog.insert(def.key(), *def);
		}
	}

	pub fn catalog_def(&self, key: TypeKey) -> Option<&'static TypeDef> {
		self.catalog.get(&key).copied()
	}

	/// Derives a fresh symbol without registering it.
	pub fn build(&mut self, def: &'static TypeDef) -> Symbol {
		self.catalog.entry(def.key()).or_insert(def);

		let mut features: Vec<FeatureTag> = def.features.to_vec();
		let mut roles: Vec<TypeKey> = def.roles.iter().map(|r| r()).collect();
		let mut ancestors = Vec::new();
		let mut seen = HashSet::default();
		seen.insert(def.key());

		let mut next = def.base();
		while let Some(base) = next {
			if !seen.insert(base) {
				tracing::warn!(class = def.name, base = base.name(), "inheritance cycle; stopping walk");
				break;
			}
			ancestors.push(base);

			let Some(base_def) = self.catalog.get(&base).copied() else {
				break;
			};
			for feature in base_def.features.iter().filter(|f| f.inheritable) {
				if !features.iter().any(|f| f.name == feature.name) {
					features.push(*feature);
				}
			}
			for role in base_def.roles.iter().map(|r| r()) {
				if !roles.contains(&role) {
					roles.push(role);
				}
			}
			next = base_def.base();
		}

		Symbol::new(def, features, roles, ancestors)
	}

	/// Returns the registered symbol for `def`, building it on first encounter
	/// or when `reload` is set.
	pub fn resolve(&mut self, def: &'static TypeDef, reload: bool) -> Arc<Symbol> {
		if !reload && let Some(existing) = self.by_type.get(&def.key()) {
			return existing.clone();
		}
		let symbol = Arc::new(self.build(def));
		self.register(symbol, reload)
	}

	/// Registers `symbol`. Without `reload` an existing entry wins and is
	/// returned; with `reload` the existing entry is unregistered first.
	pub fn register(&mut self, symbol: Arc<Symbol>, reload: bool) -> Arc<Symbol> {
		let key = symbol.key();
		if let Some(existing) = self.by_type.get(&key) {
			if !reload {
				tracing::warn!(class = symbol.class_name(), "symbol already registered; keeping existing");
				return existing.clone();
			}
			self.unregister(key);
		}

		for name in [symbol.class_name(), symbol.full_name(), symbol.default_name()] {
			match self.by_name.get(name) {
				Some(owner) if owner.key() != key => {
					tracing::warn!(
						name,
						existing = owner.full_name(),
						new = symbol.full_name(),
						"symbol name collision; keeping existing"
					);
				}
				Some(_) => {}
				None => {
					self.by_name.insert(name.to_string(), symbol.clone());
				}
			}
		}
		self.by_type.insert(key, symbol.clone());
		symbol
	}

	/// Removes a symbol together with every bean that targets it.
	pub fn unregister(&mut self, key: TypeKey) -> Option<Arc<Symbol>> {
		let removed = self.by_type.shift_remove(&key)?;
		self.by_name.retain(|_, s| s.key() != key);
		self.beans.retain(|_, b| b.symbol.key() != key);
		Some(removed)
	}

	pub fn clear(&mut self) {
		self.by_type.clear();
		self.by_name.clear();
		self.beans.clear();
	}

	pub fn len(&self) -> usize {
		self.by_type.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_type.is_empty()
	}

	pub fn contains(&self, key: TypeKey) -> bool {
		self.by_type.contains_key(&key)
	}

	/// Lookup by class name, full name or default bean name.
	pub fn by_name(&self, name: &str) -> Option<&Arc<Symbol>> {
		self.by_name.get(name)
	}

	pub fn by_type(&self, key: TypeKey) -> Option<&Arc<Symbol>> {
		self.by_type.get(&key)
	}

	/// Symbols in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<Symbol>> {
		self.by_type.values()
	}

	pub fn inherited_from(&self, base: TypeKey) -> Vec<Arc<Symbol>> {
		self.iter()
			.filter(|s| s.is_subclass_of(base))
			.cloned()
			.collect()
	}

	pub fn with_feature(&self, name: &str) -> Vec<Arc<Symbol>> {
		self.iter()
			.filter(|s| s.has_feature(name))
			.cloned()
			.collect()
	}

	pub fn with_role(&self, role: TypeKey) -> Vec<Arc<Symbol>> {
		self.iter()
			.filter(|s| s.implements(role))
			.cloned()
			.collect()
	}

	/// Adds the declared bean of `symbol` and every configured bean naming it.
	pub fn bind_beans(&mut self, symbol: &Arc<Symbol>, config: &[BeanEntry]) {
		if let Some(bean) = Bean::declared(symbol) {
			self.insert_bean(bean);
		}
		for entry in config {
			if entry.class == symbol.class_name() || entry.class == symbol.full_name() {
				self.insert_bean(Bean {
					name: entry.name.clone(),
					symbol: symbol.clone(),
					priority: entry.priority,
					singleton: entry.singleton,
					source: BeanSource::Configured,
				});
			}
		}
	}

	/// Drops every bean and rebuilds the table from declarations and `config`.
	pub fn rebind_beans(&mut self, config: &[BeanEntry]) {
		self.beans.clear();
		let symbols: Vec<Arc<Symbol>> = self.by_type.values().cloned().collect();
		for symbol in &symbols {
			self.bind_beans(symbol, config);
		}

		for entry in config {
			if !self.beans.contains_key(&entry.name) {
				tracing::warn!(bean = %entry.name, class = %entry.class, "configured bean targets an unknown class");
			}
		}
	}

	fn insert_bean(&mut self, bean: Bean) {
		match self.beans.get(&bean.name) {
			Some(existing) if !bean.outranks(existing) => {
				if existing.symbol.key() != bean.symbol.key() {
					tracing::warn!(
						bean = %bean.name,
						existing = existing.symbol.full_name(),
						new = bean.symbol.full_name(),
						"bean name collision; keeping existing"
					);
				}
			}
			_ => {
				self.beans.insert(bean.name.clone(), bean);
			}
		}
	}

	pub fn bean(&self, name: &str) -> Option<&Bean> {
		self.beans.get(name)
	}

	/// Highest-priority bean targeting `key`; the first registered wins ties.
	pub fn bean_for_type(&self, key: TypeKey) -> Option<&Bean> {
		self.beans
			.values()
			.filter(|b| b.symbol.key() == key)
			.fold(None, |best: Option<&Bean>, b| match best {
				Some(current) if current.priority >= b.priority => Some(current),
				_ => Some(b),
			})
	}

	pub fn beans(&self) -> impl Iterator<Item = &Bean> {
		self.beans.values()
	}

	pub fn beans_of(&self, key: TypeKey) -> impl Iterator<Item = &Bean> {
		self.beans.values().filter(move |b| b.symbol.key() == key)
	}
}
