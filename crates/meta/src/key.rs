use std::any::TypeId;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Identity of a Rust type as seen by the binding engine.
///
/// Equality, ordering and hashing only consider the [`TypeId`]; the name is
/// carried for diagnostics and name-based lookups.
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

/// Deferred [`TypeKey`] constructor usable in `static` descriptors.
pub type TypeKeyFn = fn() -> TypeKey;

impl TypeKey {
	/// Returns the key of `T`. Unsized types are accepted so roles can be keyed by `dyn Trait`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	#[inline]
	pub fn id(self) -> TypeId {
		self.id
	}

	/// Fully qualified type name, as reported by [`std::any::type_name`].
	#[inline]
	pub fn name(self) -> &'static str {
		self.name
	}

	/// Last path segment of the type name with generic arguments stripped.
	pub fn short_name(self) -> &'static str {
		let base = self.name.split('<').next().unwrap_or(self.name);
		let base = base.strip_prefix("dyn ").unwrap_or(base);
		base.rsplit("::").next().unwrap_or(base)
	}

	#[inline]
	pub fn is<T: ?Sized + 'static>(self) -> bool {
		self.id == TypeId::of::<T>()
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl PartialOrd for TypeKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for TypeKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.id.cmp(&other.id)
	}
}

impl std::fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "TypeKey({})", self.name)
	}
}

impl std::fmt::Display for TypeKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Sample;
	trait Role {}

	#[test]
	fn keys_compare_by_type_identity() {
		assert_eq!(TypeKey::of::<Sample>(), TypeKey::of::<Sample>());
		assert_ne!(TypeKey::of::<Sample>(), TypeKey::of::<u32>());
		assert!(TypeKey::of::<Sample>().is::<Sample>());
	}

	#[test]
	fn short_name_strips_path_generics_and_dyn() {
		assert_eq!(TypeKey::of::<Sample>().short_name(), "Sample");
		assert_eq!(TypeKey::of::<Vec<u8>>().short_name(), "Vec");
		assert_eq!(TypeKey::of::<dyn Role>().short_name(), "Role");
	}
}
