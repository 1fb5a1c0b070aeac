//! Extension methods that route events, inputs and messages to another type.
//!
//! An extension binding lives on a class marked [`ClassMarker::Extend`] but
//! takes a receiver of a different type as its first parameter. Dispatch goes
//! to the receiver's type, not to the declaring class.

use std::any::Any;

use hotbind_meta::{ClassMarker, InputOp, MarkerKind, MethodMarker, TypeKey};
use rustc_hash::FxHashMap as HashMap;

use super::event::{EventKey, route_event};
use super::input::{InputKey, route_input};
use super::message::{MessageKey, route_message};
use super::{Category, CategoryLoader, MethodTypeCodeInfo, Rejection, Route};
use crate::inspect::ExtendRules;
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendKey {
	Event(EventKey),
	Input(InputKey),
	Message(MessageKey),
}

impl ExtendKey {
	fn accepts(&self, other: &ExtendKey) -> bool {
		match (self, other) {
			(Self::Input(bound), Self::Input(fired)) => bound.accepts(fired.code, fired.ops),
			_ => self == other,
		}
	}

	fn code(&self) -> Option<i64> {
		match self {
			Self::Event(EventKey::Id(id)) => Some((*id).into()),
			Self::Input(key) => Some(key.code.into()),
			Self::Message(MessageKey::Opcode(op)) => Some((*op).into()),
			_ => None,
		}
	}

	pub fn event(id: i32) -> Self {
		Self::Event(EventKey::Id(id))
	}

	pub fn event_of<T: 'static>() -> Self {
		Self::Event(EventKey::Payload(TypeKey::of::<T>()))
	}

	pub fn input(code: u32, op: InputOp) -> Self {
		Self::Input(InputKey { code, ops: op })
	}

	pub fn message(opcode: u32) -> Self {
		Self::Message(MessageKey::Opcode(opcode))
	}

	pub fn message_of<T: 'static>() -> Self {
		Self::Message(MessageKey::Payload(TypeKey::of::<T>()))
	}
}

#[derive(Debug, Default)]
pub struct Extensions;

impl Category for Extensions {
	type Key = ExtendKey;
	type Rules = ExtendRules;

	const LABEL: &'static str = "extend";
	const MARKER: ClassMarker = ClassMarker::Extend;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Event, MarkerKind::Input, MarkerKind::Message];
	const DEFAULT_PRIORITY: i16 = 50;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<ExtendKey>, Rejection> {
		let key = match *marker {
			MethodMarker::Event { id, payload } => ExtendKey::Event(route_event(method, id, payload.map(|f| f()))?),
			MethodMarker::Input { code, op } => ExtendKey::Input(route_input(code, op)?),
			MethodMarker::Message { opcode, payload } => {
				ExtendKey::Message(route_message(method, opcode, payload.map(|f| f()), &HashMap::default())?)
			}
			_ => return Err(Rejection::UnexpectedMarker),
		};
		Ok(Route::on(method, key))
	}
}

impl CategoryLoader<Extensions> {
	/// Invokes the extension bindings of the receiver's type matching `key`.
	///
	/// Input keys match when the code is equal and the bound mask contains the
	/// fired operation.
	pub fn dispatch_to(&self, receiver: &mut dyn Any, key: ExtendKey, payload: Option<&dyn Any>) -> usize {
		self.fire(Some(receiver), payload, key.code(), |bound| bound.accepts(&key))
	}

	/// Extension bindings targeting `ty`, whichever class declared them.
	pub fn extensions_of(&self, ty: TypeKey) -> Vec<&MethodTypeCodeInfo<ExtendKey>> {
		self.bindings().filter(|b| b.target == Some(ty)).collect()
	}
}

static EXTEND_PROCESSOR: ProcessorDef = ProcessorDef::of::<Extensions>();

inventory::submit!(ProcessorReg(&EXTEND_PROCESSOR));
