use std::any::Any;
use std::sync::OnceLock;

use hotbind_meta::{
	BeanDecl, ClassMarker, FeatureTag, MarkerKind, MethodDef, MethodMarker, MethodShape, ParamKind,
	ReturnKind, Slot, Thunk, TypeDef, TypeKey,
};

bitflags::bitflags! {
	/// How a method relates to its declaring class.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct MethodFlags: u8 {
		/// No receiver of the declaring class.
		const STATIC = 1 << 0;
		/// First parameter is the declaring class.
		const INSTANCE = 1 << 1;
		/// First parameter is another type; the method extends that type.
		const EXTENSION = 1 << 2;
	}
}

/// Resolved description of a described method.
#[derive(Debug, Clone)]
pub struct SymMethod {
	name: &'static str,
	full_name: String,
	markers: &'static [MethodMarker],
	flags: MethodFlags,
	receiver: Option<TypeKey>,
	shape: MethodShape,
	thunk: Thunk,
}

impl SymMethod {
	pub(crate) fn build(owner: TypeKey, owner_name: &str, def: &MethodDef) -> Self {
		let shape = (def.shape)();
		let receiver = shape.receiver();
		let flags = match receiver {
			None => MethodFlags::STATIC,
			Some(key) if key == owner => MethodFlags::INSTANCE,
			Some(_) => MethodFlags::STATIC | MethodFlags::EXTENSION,
		};

		Self {
			name: def.name,
			full_name: format!("{owner_name}::{}", def.name),
			markers: def.markers,
			flags,
			receiver,
			shape,
			thunk: def.thunk,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// `Class::method`.
	pub fn full_name(&self) -> &str {
		&self.full_name
	}

	pub fn markers(&self) -> &'static [MethodMarker] {
		self.markers
	}

	pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &'static MethodMarker> {
		self.markers.iter().filter(move |m| m.kind() == kind)
	}

	pub fn has_marker(&self, kind: MarkerKind) -> bool {
		self.markers.iter().any(|m| m.kind() == kind)
	}

	pub fn flags(&self) -> MethodFlags {
		self.flags
	}

	pub fn is_static(&self) -> bool {
		self.flags.contains(MethodFlags::STATIC)
	}

	pub fn is_instance(&self) -> bool {
		self.flags.contains(MethodFlags::INSTANCE)
	}

	pub fn is_extension(&self) -> bool {
		self.flags.contains(MethodFlags::EXTENSION)
	}

	/// Type of the first parameter when it is a receiver.
	pub fn receiver(&self) -> Option<TypeKey> {
		self.receiver
	}

	pub fn params(&self) -> &[ParamKind] {
		&self.shape.params
	}

	pub fn slots(&self) -> Vec<Slot> {
		self.shape.slots()
	}

	pub fn payload(&self) -> Option<TypeKey> {
		self.shape.payload()
	}

	pub fn ret(&self) -> ReturnKind {
		self.shape.ret
	}

	pub fn thunk(&self) -> Thunk {
		self.thunk
	}
}

/// Resolved description of a described type.
///
/// Symbols are immutable. A reload builds a fresh symbol and swaps it in;
/// holders of the old `Arc` keep a consistent but stale view.
pub struct Symbol {
	def: &'static TypeDef,
	key: TypeKey,
	full_name: String,
	default_name: String,
	features: Vec<FeatureTag>,
	roles: Vec<TypeKey>,
	ancestors: Vec<TypeKey>,
	methods: OnceLock<Vec<SymMethod>>,
}

impl Symbol {
	pub(crate) fn new(
		def: &'static TypeDef,
		features: Vec<FeatureTag>,
		roles: Vec<TypeKey>,
		ancestors: Vec<TypeKey>,
	) -> Self {
		let default_name = def.bean.map_or_else(|| def.name.to_string(), |b| b.name.to_string());
		Self {
			def,
			key: def.key(),
			full_name: def.full_name(),
			default_name,
			features,
			roles,
			ancestors,
			methods: OnceLock::new(),
		}
	}

	pub fn def(&self) -> &'static TypeDef {
		self.def
	}

	pub fn key(&self) -> TypeKey {
		self.key
	}

	pub fn class_name(&self) -> &'static str {
		self.def.name
	}

	/// `module::Class`.
	pub fn full_name(&self) -> &str {
		&self.full_name
	}

	pub fn module(&self) -> &'static str {
		self.def.module
	}

	/// Bean name declared on the class, or the class name.
	pub fn default_name(&self) -> &str {
		&self.default_name
	}

	pub fn priority(&self) -> i16 {
		self.def.priority
	}

	pub fn markers(&self) -> &'static [ClassMarker] {
		self.def.markers
	}

	pub fn has_marker(&self, marker: ClassMarker) -> bool {
		self.def.has_marker(marker)
	}

	/// Own feature tags followed by inheritable tags of ancestors.
	pub fn features(&self) -> &[FeatureTag] {
		&self.features
	}

	pub fn has_feature(&self, name: &str) -> bool {
		self.features.iter().any(|f| f.name == name)
	}

	/// Own and inherited roles.
	pub fn roles(&self) -> &[TypeKey] {
		&self.roles
	}

	pub fn implements(&self, role: TypeKey) -> bool {
		self.roles.contains(&role)
	}

	pub fn base(&self) -> Option<TypeKey> {
		self.ancestors.first().copied()
	}

	/// Base chain, nearest first.
	pub fn ancestors(&self) -> &[TypeKey] {
		&self.ancestors
	}

	pub fn is_subclass_of(&self, base: TypeKey) -> bool {
		self.ancestors.contains(&base)
	}

	/// True when the type is `target`, derives from it, or implements it as a role.
	pub fn is_assignable_to(&self, target: TypeKey) -> bool {
		self.key == target || self.is_subclass_of(target) || self.implements(target)
	}

	pub fn bean(&self) -> Option<BeanDecl> {
		self.def.bean
	}

	/// Method records, resolved on first access.
	pub fn methods(&self) -> &[SymMethod] {
		self.methods.get_or_init(|| {
			self.def
				.methods
				.iter()
				.map(|m| SymMethod::build(self.key, self.def.name, m))
				.collect()
		})
	}

	pub fn method(&self, name: &str) -> Option<&SymMethod> {
		self.methods().iter().find(|m| m.name() == name)
	}

	/// Whether the class carries anything the engine can describe on its own.
	pub fn is_describable(&self) -> bool {
		!self.def.markers.is_empty()
			|| !self.features.is_empty()
			|| !self.roles.is_empty()
			|| self.def.bean.is_some()
	}

	pub fn create_instance(&self) -> Option<Box<dyn Any>> {
		self.def.construct.map(|construct| construct())
	}
}

impl std::fmt::Debug for Symbol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Symbol")
			.field("name", &self.full_name)
			.field("default_name", &self.default_name)
			.field("features", &self.features)
			.field("ancestors", &self.ancestors)
			.finish()
	}
}
