//! Category loaders.
//!
//! A category recognizes one class-marker family and turns the marked methods
//! of a symbol into verified bindings. The shared machinery lives here:
//! [`Category`] describes a family, [`CategoryLoader`] owns its binding table
//! and implements the object-safe [`BindingProcessor`] contract.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use hotbind_meta::{ClassMarker, Invocation, InvokeError, MarkerKind, MethodMarker, Slot, Thunk, TypeKey};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use thiserror::Error;

use crate::inspect::{SignatureRules, payload_matches};
use crate::processors::BindingProcessor;
use crate::symbols::{SymMethod, Symbol};

pub mod aspect;
pub mod event;
pub mod extend;
pub mod inject;
pub mod input;
pub mod message;
pub mod notice;

pub use aspect::{AdviceKey, Aspects};
pub use event::{EventKey, Events};
pub use extend::{ExtendKey, Extensions};
pub use inject::{InjectKey, Injections};
pub use input::{InputKey, Inputs};
pub use message::{MessageKey, MessageTypeDef, MessageTypeReg, Messages};
pub use notice::Notices;

/// One declarative-marker family.
pub trait Category: Default + 'static {
	/// Trigger key routing a dispatch call to a binding.
	type Key: Clone + PartialEq + std::fmt::Debug + 'static;
	/// Signature rules applied to every marked method.
	type Rules: SignatureRules;

	/// Name used in logs and configuration.
	const LABEL: &'static str;
	/// Class marker that selects this category.
	const MARKER: ClassMarker;
	/// Method markers this category interprets.
	const MARKER_KINDS: &'static [MarkerKind];
	/// Priority used when the configuration does not override it.
	const DEFAULT_PRIORITY: i16;

	/// Derives the trigger key and receiver target for one marker.
	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<Self::Key>, Rejection>;
}

/// Routing result for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<K> {
	pub key: K,
	/// Receiver type the binding runs against; `None` for static bindings.
	pub target: Option<TypeKey>,
}

impl<K> Route<K> {
	/// Routes to the method's own receiver, if it declares one.
	pub fn on(method: &SymMethod, key: K) -> Self {
		Self {
			key,
			target: method.receiver(),
		}
	}
}

/// Why a marked method produced no binding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
	#[error("invalid signature")]
	InvalidSignature,
	#[error("no numeric code or payload type to route on")]
	Unroutable,
	#[error("payload parameter is {found}, marker names {expected}")]
	PayloadMismatch { expected: &'static str, found: &'static str },
	#[error("parameterless advice needs an explicit target type")]
	MissingTarget,
	#[error("advice names target {expected} but its receiver is {found}")]
	TargetMismatch { expected: &'static str, found: &'static str },
	#[error("code parameter on a route that carries no numeric code")]
	CodeWithoutKey,
	#[error("marker is not handled by this category")]
	UnexpectedMarker,
}

/// Fails when the method declares a payload parameter of another type than `expected`.
pub(crate) fn check_payload(method: &SymMethod, expected: TypeKey) -> Result<(), Rejection> {
	if payload_matches(method, expected) {
		return Ok(());
	}
	Err(Rejection::PayloadMismatch {
		expected: expected.name(),
		found: method.payload().map_or("?", TypeKey::name),
	})
}

/// Fails when the method takes a numeric code the route never supplies.
pub(crate) fn check_no_code(method: &SymMethod) -> Result<(), Rejection> {
	if method.slots().contains(&Slot::Code) {
		return Err(Rejection::CodeWithoutKey);
	}
	Ok(())
}

/// Callable handle synthesized for a binding.
#[derive(Clone, Copy)]
pub enum CallHandle {
	/// No receiver parameter.
	Plain(Thunk),
	/// First parameter is the receiver.
	ReceiverFirst { receiver: TypeKey, thunk: Thunk },
}

impl CallHandle {
	pub fn for_method(method: &SymMethod) -> Self {
		match method.receiver() {
			Some(receiver) => Self::ReceiverFirst {
				receiver,
				thunk: method.thunk(),
			},
			None => Self::Plain(method.thunk()),
		}
	}

	pub fn call(&self, inv: &mut Invocation<'_>) -> Result<(), InvokeError> {
		match self {
			Self::Plain(thunk) => thunk(inv),
			Self::ReceiverFirst { receiver, thunk } => {
				if !inv.has_receiver() {
					return Err(InvokeError::MissingReceiver {
						expected: receiver.name(),
					});
				}
				thunk(inv)
			}
		}
	}

	/// Calls the handle with only a receiver.
	pub fn call_on(&self, receiver: &mut dyn Any) -> Result<(), InvokeError> {
		self.call(&mut Invocation::new().with_receiver(receiver))
	}

	pub fn takes_receiver(&self) -> bool {
		matches!(self, Self::ReceiverFirst { .. })
	}
}

impl std::fmt::Debug for CallHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Plain(_) => f.write_str("CallHandle::Plain"),
			Self::ReceiverFirst { receiver, .. } => write!(f, "CallHandle::ReceiverFirst({receiver})"),
		}
	}
}

/// One verified binding.
#[derive(Debug, Clone)]
pub struct MethodTypeCodeInfo<K> {
	/// `Class::method` of the bound method.
	pub full_name: String,
	pub target: Option<TypeKey>,
	pub key: K,
	pub handle: CallHandle,
}

/// Verified bindings of one symbol in one category. Never empty.
#[derive(Debug, Clone)]
pub struct CodeInfo<K> {
	pub class: TypeKey,
	/// `module::Class` of the owning symbol.
	pub class_name: String,
	pub bindings: Vec<MethodTypeCodeInfo<K>>,
}

impl<K> CodeInfo<K> {
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

/// Binding table of one category, keyed by class type.
pub struct CategoryLoader<C: Category> {
	category: C,
	table: IndexMap<TypeKey, Arc<CodeInfo<C::Key>>, FxBuildHasher>,
	_marker: PhantomData<fn() -> C>,
}

impl<C: Category> Default for CategoryLoader<C> {
	fn default() -> Self {
		Self::new(C::default())
	}
}

impl<C: Category> CategoryLoader<C> {
	pub fn new(category: C) -> Self {
		Self {
			category,
			table: IndexMap::default(),
			_marker: PhantomData,
		}
	}

	pub fn category(&self) -> &C {
		&self.category
	}

	pub fn category_mut(&mut self) -> &mut C {
		&mut self.category
	}

	/// True when the symbol carries this category's marker and, if given, `filter` names it.
	pub fn matches(&self, symbol: &Symbol, filter: Option<ClassMarker>) -> bool {
		filter.is_none_or(|f| f == C::MARKER) && symbol.has_marker(C::MARKER)
	}

	/// Verifies every marked method of `symbol` and stores the accepted bindings.
	///
	/// Returns false when nothing was accepted, or when the type is already
	/// loaded and `reload` is not set.
	pub fn load(&mut self, symbol: &Symbol, reload: bool) -> bool {
		let class = symbol.key();
		if self.table.contains_key(&class) {
			if !reload {
				tracing::warn!(
					category = C::LABEL,
					class = symbol.full_name(),
					"type already loaded; keeping existing bindings"
				);
				return false;
			}
			self.table.shift_remove(&class);
		}

		let mut bindings = Vec::new();
		for method in symbol.methods() {
			let mut markers = method
				.markers()
				.iter()
				.filter(|m| C::MARKER_KINDS.contains(&m.kind()))
				.peekable();
			if markers.peek().is_none() {
				continue;
			}
			if !C::Rules::is_valid_signature(method) {
				reject::<C>(symbol, method, &Rejection::InvalidSignature);
				continue;
			}
			for marker in markers {
				match self.category.route(method, marker) {
					Ok(route) => bindings.push(MethodTypeCodeInfo {
						full_name: method.full_name().to_string(),
						target: route.target,
						key: route.key,
						handle: CallHandle::for_method(method),
					}),
					Err(reason) => reject::<C>(symbol, method, &reason),
				}
			}
		}

		if bindings.is_empty() {
			tracing::warn!(
				category = C::LABEL,
				class = symbol.full_name(),
				"no valid bindings; type not loaded"
			);
			return false;
		}

		tracing::debug!(
			category = C::LABEL,
			class = symbol.full_name(),
			bindings = bindings.len(),
			reload,
			"loaded bindings"
		);
		self.table.insert(
			class,
			Arc::new(CodeInfo {
				class,
				class_name: symbol.full_name().to_string(),
				bindings,
			}),
		);
		true
	}

	pub fn lookup(&self, class: TypeKey) -> Option<&Arc<CodeInfo<C::Key>>> {
		self.table.get(&class)
	}

	pub fn unload(&mut self, class: TypeKey) -> bool {
		self.table.shift_remove(&class).is_some()
	}

	pub fn cleanup(&mut self) {
		self.table.clear();
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Code infos in load order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<CodeInfo<C::Key>>> {
		self.table.values()
	}

	/// Every binding of every loaded type, in load order.
	pub fn bindings(&self) -> impl Iterator<Item = &MethodTypeCodeInfo<C::Key>> {
		self.table.values().flat_map(|info| info.bindings.iter())
	}

	/// Invokes every binding whose key passes `select`.
	///
	/// Static bindings run only without a receiver; receiver-bound bindings
	/// run only when the receiver has their target type. Returns the number
	/// of successful calls.
	pub(crate) fn fire(
		&self,
		mut receiver: Option<&mut dyn Any>,
		payload: Option<&dyn Any>,
		code: Option<i64>,
		select: impl Fn(&C::Key) -> bool,
	) -> usize {
		let receiver_ty = receiver.as_deref().map(|r| (*r).type_id());
		let mut fired = 0;

		for binding in self.bindings().filter(|b| select(&b.key)) {
			match binding.target {
				Some(target) if receiver_ty != Some(target.id()) => continue,
				None if receiver_ty.is_some() => continue,
				_ => {}
			}

			let mut inv = Invocation::new();
			if let Some(r) = receiver.as_deref_mut() {
				inv = inv.with_receiver(r);
			}
			if let Some(p) = payload {
				inv = inv.with_payload(p);
			}
			if let Some(c) = code {
				inv = inv.with_code(c);
			}

			tracing::trace!(category = C::LABEL, method = %binding.full_name, key = ?binding.key, "dispatch");
			match binding.handle.call(&mut inv) {
				Ok(()) => fired += 1,
				Err(err) => tracing::warn!(
					category = C::LABEL,
					method = %binding.full_name,
					error = %err,
					"binding invocation failed"
				),
			}
		}
		fired
	}
}

fn reject<C: Category>(symbol: &Symbol, method: &SymMethod, reason: &Rejection) {
	tracing::warn!(
		category = C::LABEL,
		class = symbol.full_name(),
		method = method.name(),
		params = ?method.slots(),
		%reason,
		"rejected binding"
	);
}

impl<C: Category> BindingProcessor for CategoryLoader<C> {
	fn name(&self) -> &'static str {
		C::LABEL
	}

	fn marker(&self) -> ClassMarker {
		C::MARKER
	}

	fn matches(&self, symbol: &Symbol, filter: Option<ClassMarker>) -> bool {
		CategoryLoader::matches(self, symbol, filter)
	}

	fn load(&mut self, symbol: &Symbol, reload: bool) -> bool {
		CategoryLoader::load(self, symbol, reload)
	}

	fn contains(&self, class: TypeKey) -> bool {
		self.table.contains_key(&class)
	}

	fn unload(&mut self, class: TypeKey) -> bool {
		CategoryLoader::unload(self, class)
	}

	fn cleanup(&mut self) {
		CategoryLoader::cleanup(self);
	}

	fn len(&self) -> usize {
		self.table.len()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
