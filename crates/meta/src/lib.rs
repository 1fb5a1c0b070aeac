//! Static descriptors for the hotbind binding engine.
//!
//! Rust has no runtime reflection, so types opt in through [`describe!`],
//! which emits a [`TypeDef`] and submits it to a link-time `inventory`
//! collection. The loader crate turns those descriptors into symbols and
//! verified bindings.
//!
//! - [`TypeKey`]: type identity used for every lookup
//! - [`TypeDef`] / [`MethodDef`]: per-type and per-method descriptors
//! - [`ClassMarker`] / [`MethodMarker`]: declarative markers
//! - [`Invocation`] / [`MethodParam`]: type-erased calls into described methods
//! - [`ModuleCatalog`]: enumeration of candidate types

mod def;
mod invoke;
mod key;
mod macros;
mod marker;

pub use def::{
	ConstructFn, Described, InventoryCatalog, MethodDef, ModuleCatalog, StaticCatalog, TypeDef,
	TypeReg,
};
pub use invoke::{
	Invocation, InvokeError, MethodParam, MethodShape, ParamKind, ReturnKind, Slot, Thunk,
};
pub use key::{TypeKey, TypeKeyFn};
pub use marker::{
	BeanDecl, ClassMarker, FeatureTag, InputOp, MarkerKind, MethodMarker, Notice, Phase, Timing,
};

#[doc(hidden)]
pub mod __private {
	pub use inventory;
}
