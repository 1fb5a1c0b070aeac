//! Event listeners keyed by numeric id or payload type.

use std::any::Any;

use hotbind_meta::{ClassMarker, MarkerKind, MethodMarker, TypeKey};

use super::{Category, CategoryLoader, Rejection, Route, check_no_code, check_payload};
use crate::inspect::EventRules;
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKey {
	Id(i32),
	Payload(TypeKey),
}

/// Routes an id/payload pair. A nonzero id wins over the payload type; a
/// payload-only route cannot feed a code parameter.
pub(crate) fn route_event(method: &SymMethod, id: i32, payload: Option<TypeKey>) -> Result<EventKey, Rejection> {
	if let Some(payload) = payload {
		check_payload(method, payload)?;
	}
	match (id, payload) {
		(0, Some(payload)) => {
			check_no_code(method)?;
			Ok(EventKey::Payload(payload))
		}
		(0, None) => Err(Rejection::Unroutable),
		(id, _) => Ok(EventKey::Id(id)),
	}
}

#[derive(Debug, Default)]
pub struct Events;

impl Category for Events {
	type Key = EventKey;
	type Rules = EventRules;

	const LABEL: &'static str = "event";
	const MARKER: ClassMarker = ClassMarker::EventSystem;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Event];
	const DEFAULT_PRIORITY: i16 = 40;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<EventKey>, Rejection> {
		let MethodMarker::Event { id, payload } = *marker else {
			return Err(Rejection::UnexpectedMarker);
		};
		let key = route_event(method, id, payload.map(|f| f()))?;
		Ok(Route::on(method, key))
	}
}

impl CategoryLoader<Events> {
	/// Fires static listeners bound to `id`.
	pub fn dispatch_id(&self, id: i32, payload: Option<&dyn Any>) -> usize {
		self.fire(None, payload, Some(id.into()), |k| *k == EventKey::Id(id))
	}

	/// Fires static listeners bound to the payload's type.
	pub fn dispatch_payload<T: Any>(&self, payload: &T) -> usize {
		let key = EventKey::Payload(TypeKey::of::<T>());
		self.fire(None, Some(payload as &dyn Any), None, |k| *k == key)
	}

	/// Fires listeners of the receiver's type bound to `id`.
	pub fn dispatch_id_to(&self, receiver: &mut dyn Any, id: i32, payload: Option<&dyn Any>) -> usize {
		self.fire(Some(receiver), payload, Some(id.into()), |k| *k == EventKey::Id(id))
	}

	pub fn dispatch_payload_to<T: Any>(&self, receiver: &mut dyn Any, payload: &T) -> usize {
		let key = EventKey::Payload(TypeKey::of::<T>());
		self.fire(Some(receiver), Some(payload as &dyn Any), None, |k| *k == key)
	}
}

static EVENT_PROCESSOR: ProcessorDef = ProcessorDef::of::<Events>();

inventory::submit!(ProcessorReg(&EVENT_PROCESSOR));
