//! Network message listeners keyed by opcode or payload type.
//!
//! Payload types with a known opcode are normalized to that opcode at load
//! time, so a listener declared by type and one declared by opcode receive the
//! same messages. Opcodes are learned from [`MessageTypeReg`] submissions and
//! from runtime `register_type` calls.

use std::any::Any;

use hotbind_meta::{ClassMarker, MarkerKind, MethodMarker, TypeKey, TypeKeyFn};
use rustc_hash::FxHashMap as HashMap;

use super::{Category, CategoryLoader, Rejection, Route, check_no_code, check_payload};
use crate::inspect::MessageRules;
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
	Opcode(u32),
	/// Payload type with no known opcode.
	Payload(TypeKey),
}

/// Static association between a payload type and its opcode.
#[derive(Debug, Clone, Copy)]
pub struct MessageTypeDef {
	pub payload: TypeKeyFn,
	pub opcode: u32,
}

impl MessageTypeDef {
	pub const fn of<T: 'static>(opcode: u32) -> Self {
		Self {
			payload: TypeKey::of::<T> as TypeKeyFn,
			opcode,
		}
	}
}

/// Wrapper for `inventory::collect!`.
pub struct MessageTypeReg(pub &'static MessageTypeDef);

inventory::collect!(MessageTypeReg);

pub(crate) fn route_message(
	method: &SymMethod,
	opcode: u32,
	payload: Option<TypeKey>,
	opcodes: &HashMap<TypeKey, u32>,
) -> Result<MessageKey, Rejection> {
	if let Some(payload) = payload {
		check_payload(method, payload)?;
	}
	match (opcode, payload) {
		(0, Some(payload)) => match opcodes.get(&payload) {
			Some(&op) => Ok(MessageKey::Opcode(op)),
			None => {
				check_no_code(method)?;
				Ok(MessageKey::Payload(payload))
			}
		},
		(0, None) => Err(Rejection::Unroutable),
		(opcode, _) => Ok(MessageKey::Opcode(opcode)),
	}
}

#[derive(Debug)]
pub struct Messages {
	opcodes: HashMap<TypeKey, u32>,
}

impl Default for Messages {
	fn default() -> Self {
		let mut opcodes = HashMap::default();
		for reg in inventory::iter::<MessageTypeReg> {
			let payload = (reg.0.payload)();
			if let Some(previous) = opcodes.insert(payload, reg.0.opcode) {
				tracing::warn!(
					payload = payload.name(),
					previous,
					opcode = reg.0.opcode,
					"message type registered twice; last wins"
				);
			}
		}
		Self { opcodes }
	}
}

impl Messages {
	pub fn opcode_of(&self, payload: TypeKey) -> Option<u32> {
		self.opcodes.get(&payload).copied()
	}
}

impl Category for Messages {
	type Key = MessageKey;
	type Rules = MessageRules;

	const LABEL: &'static str = "message";
	const MARKER: ClassMarker = ClassMarker::MessageSystem;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Message];
	const DEFAULT_PRIORITY: i16 = 20;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<MessageKey>, Rejection> {
		let MethodMarker::Message { opcode, payload } = *marker else {
			return Err(Rejection::UnexpectedMarker);
		};
		let key = route_message(method, opcode, payload.map(|f| f()), &self.opcodes)?;
		Ok(Route::on(method, key))
	}
}

impl CategoryLoader<Messages> {
	/// Associates `T` with `opcode`. Types loaded from now on are keyed by the
	/// opcode; bindings already keyed by `T` stay reachable through it.
	pub fn register_type<T: 'static>(&mut self, opcode: u32) {
		self.category_mut().opcodes.insert(TypeKey::of::<T>(), opcode);
	}

	/// Fires static listeners bound to `opcode`.
	pub fn dispatch(&self, opcode: u32, payload: &dyn Any) -> usize {
		self.fire(None, Some(payload), Some(opcode.into()), |k| self.routes(k, opcode, payload))
	}

	pub fn dispatch_to(&self, receiver: &mut dyn Any, opcode: u32, payload: &dyn Any) -> usize {
		self.fire(Some(receiver), Some(payload), Some(opcode.into()), |k| {
			self.routes(k, opcode, payload)
		})
	}

	/// Fires static listeners for a typed message: those bound to its opcode,
	/// when one is known, and those bound to its type.
	pub fn dispatch_message<T: Any>(&self, payload: &T) -> usize {
		let ty = TypeKey::of::<T>();
		let opcode = self.category().opcode_of(ty);
		self.fire(None, Some(payload as &dyn Any), opcode.map(Into::into), |k| match *k {
			MessageKey::Opcode(op) => opcode == Some(op),
			MessageKey::Payload(bound) => bound == ty,
		})
	}

	fn routes(&self, key: &MessageKey, opcode: u32, payload: &dyn Any) -> bool {
		match *key {
			MessageKey::Opcode(op) => op == opcode,
			MessageKey::Payload(ty) => {
				ty.id() == (*payload).type_id() && self.category().opcode_of(ty) == Some(opcode)
			}
		}
	}
}

static MESSAGE_PROCESSOR: ProcessorDef = ProcessorDef::of::<Messages>();

inventory::submit!(ProcessorReg(&MESSAGE_PROCESSOR));
