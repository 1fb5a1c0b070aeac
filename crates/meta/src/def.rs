//! Static type and method descriptors.

use std::any::Any;

use crate::invoke::{MethodShape, Thunk};
use crate::key::{TypeKey, TypeKeyFn};
use crate::marker::{BeanDecl, ClassMarker, FeatureTag, MethodMarker};

/// Constructor used for name-based bean instantiation.
pub type ConstructFn = fn() -> Box<dyn Any>;

/// Descriptor of one method, emitted by `describe!`.
#[derive(Clone, Copy)]
pub struct MethodDef {
	pub name: &'static str,
	pub markers: &'static [MethodMarker],
	/// Computes the declared signature. Deferred because `TypeId` is not const.
	pub shape: fn() -> MethodShape,
	pub thunk: Thunk,
}

impl std::fmt::Debug for MethodDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MethodDef")
			.field("name", &self.name)
			.field("markers", &self.markers)
			.finish()
	}
}

/// Descriptor of one type, emitted by `describe!`.
pub struct TypeDef {
	pub key: TypeKeyFn,
	/// Class name as written at the registration site.
	pub name: &'static str,
	/// Module path of the registration site.
	pub module: &'static str,
	pub base: Option<TypeKeyFn>,
	pub markers: &'static [ClassMarker],
	pub features: &'static [FeatureTag],
	pub roles: &'static [TypeKeyFn],
	pub bean: Option<BeanDecl>,
	pub priority: i16,
	pub construct: Option<ConstructFn>,
	pub methods: &'static [MethodDef],
}

impl TypeDef {
	#[inline]
	pub fn key(&self) -> TypeKey {
		(self.key)()
	}

	pub fn base(&self) -> Option<TypeKey> {
		self.base.map(|f| f())
	}

	pub fn full_name(&self) -> String {
		format!("{}::{}", self.module, self.name)
	}

	pub fn has_marker(&self, marker: ClassMarker) -> bool {
		self.markers.contains(&marker)
	}
}

impl std::fmt::Debug for TypeDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeDef")
			.field("name", &self.name)
			.field("module", &self.module)
			.field("markers", &self.markers)
			.field("methods", &self.methods.len())
			.finish()
	}
}

/// Implemented by every type registered through `describe!`.
pub trait Described: 'static {
	fn type_def() -> &'static TypeDef;
}

/// Link-time registration entry collected via `inventory`.
pub struct TypeReg(pub fn() -> &'static TypeDef);

inventory::collect!(TypeReg);

/// Source of candidate types for a loader.
pub trait ModuleCatalog {
	fn types(&self) -> Vec<&'static TypeDef>;
}

/// Every type registered through `describe!` in the final binary, ordered
/// by module then name.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryCatalog;

impl ModuleCatalog for InventoryCatalog {
	fn types(&self) -> Vec<&'static TypeDef> {
		let mut defs: Vec<&'static TypeDef> = inventory::iter::<TypeReg>
			.into_iter()
			.map(|reg| (reg.0)())
			.collect();
		defs.sort_by(|a, b| a.module.cmp(b.module).then_with(|| a.name.cmp(b.name)));
		defs
	}
}

/// Explicit list of types, kept in insertion order.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
	defs: Vec<&'static TypeDef>,
}

impl StaticCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with<T: Described>(mut self) -> Self {
		self.defs.push(T::type_def());
		self
	}

	pub fn push(&mut self, def: &'static TypeDef) {
		self.defs.push(def);
	}
}

impl ModuleCatalog for StaticCatalog {
	fn types(&self) -> Vec<&'static TypeDef> {
		self.defs.clone()
	}
}
