//! Input handlers keyed by code and operation mask.

use std::any::Any;

use hotbind_meta::{ClassMarker, InputOp, MarkerKind, MethodMarker};

use super::{Category, CategoryLoader, Rejection, Route};
use crate::inspect::InputRules;
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputKey {
	pub code: u32,
	/// Operations the binding responds to.
	pub ops: InputOp,
}

impl InputKey {
	pub fn accepts(&self, code: u32, op: InputOp) -> bool {
		self.code == code && self.ops.contains(op)
	}
}

pub(crate) fn route_input(code: u32, op: InputOp) -> Result<InputKey, Rejection> {
	if op.is_empty() {
		return Err(Rejection::Unroutable);
	}
	Ok(InputKey { code, ops: op })
}

#[derive(Debug, Default)]
pub struct Inputs;

impl Category for Inputs {
	type Key = InputKey;
	type Rules = InputRules;

	const LABEL: &'static str = "input";
	const MARKER: ClassMarker = ClassMarker::InputSystem;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Input];
	const DEFAULT_PRIORITY: i16 = 30;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<InputKey>, Rejection> {
		let MethodMarker::Input { code, op } = *marker else {
			return Err(Rejection::UnexpectedMarker);
		};
		Ok(Route::on(method, route_input(code, op)?))
	}
}

impl CategoryLoader<Inputs> {
	/// Fires static handlers for `code` whose mask contains `op`.
	pub fn dispatch(&self, code: u32, op: InputOp) -> usize {
		self.fire(None, None, Some(code.into()), |k| k.accepts(code, op))
	}

	pub fn dispatch_to(&self, receiver: &mut dyn Any, code: u32, op: InputOp) -> usize {
		self.fire(Some(receiver), None, Some(code.into()), |k| k.accepts(code, op))
	}
}

static INPUT_PROCESSOR: ProcessorDef = ProcessorDef::of::<Inputs>();

inventory::submit!(ProcessorReg(&INPUT_PROCESSOR));
