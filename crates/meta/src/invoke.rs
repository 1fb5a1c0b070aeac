//! Type-erased invocation of described methods.
//!
//! `describe!` emits one thunk per method. The thunk pulls its arguments out of
//! an [`Invocation`] through [`MethodParam`] and calls the real function, so
//! callers can dispatch without knowing the concrete signature.

use std::any::Any;

use thiserror::Error;

use crate::key::TypeKey;

/// Generated entry point of a described method.
pub type Thunk = for<'a> fn(&mut Invocation<'a>) -> Result<(), InvokeError>;

/// Errors raised while extracting arguments for a thunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
	#[error("missing receiver of type {expected}")]
	MissingReceiver { expected: &'static str },
	#[error("receiver type mismatch: expected {expected}")]
	ReceiverMismatch { expected: &'static str },
	#[error("missing payload of type {expected}")]
	MissingPayload { expected: &'static str },
	#[error("payload type mismatch: expected {expected}")]
	PayloadMismatch { expected: &'static str },
	#[error("missing numeric code")]
	MissingCode,
	#[error("code {code} does not fit {target}")]
	CodeOutOfRange { code: i64, target: &'static str },
	#[error("missing flag argument")]
	MissingFlag,
}

/// Arguments handed to a thunk.
///
/// Each slot is consumed at most once per call; a receiver is moved out on
/// extraction so the callee gets the full borrow.
#[derive(Default)]
pub struct Invocation<'a> {
	receiver: Option<&'a mut dyn Any>,
	payload: Option<&'a dyn Any>,
	code: Option<i64>,
	flag: Option<bool>,
}

impl<'a> Invocation<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_receiver(mut self, receiver: &'a mut dyn Any) -> Self {
		self.receiver = Some(receiver);
		self
	}

	pub fn with_payload(mut self, payload: &'a dyn Any) -> Self {
		self.payload = Some(payload);
		self
	}

	pub fn with_code(mut self, code: i64) -> Self {
		self.code = Some(code);
		self
	}

	pub fn with_flag(mut self, flag: bool) -> Self {
		self.flag = Some(flag);
		self
	}

	pub fn has_receiver(&self) -> bool {
		self.receiver.is_some()
	}

	pub fn code(&self) -> Option<i64> {
		self.code
	}

	pub fn payload(&self) -> Option<&'a dyn Any> {
		self.payload
	}

	pub fn take_receiver(&mut self) -> Option<&'a mut dyn Any> {
		self.receiver.take()
	}
}

/// Kind of a single declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
	/// `&mut T`: the object the method acts on.
	Receiver(TypeKey),
	/// `&T`: event, message or dependency payload.
	Payload(TypeKey),
	/// Integer trigger code (event id, input code, opcode).
	Code(TypeKey),
	/// Boolean flag (reload indicator for load callbacks).
	Flag,
}

impl ParamKind {
	pub fn slot(self) -> Slot {
		match self {
			Self::Receiver(_) => Slot::Receiver,
			Self::Payload(_) => Slot::Payload,
			Self::Code(_) => Slot::Code,
			Self::Flag => Slot::Flag,
		}
	}

	pub fn type_key(self) -> Option<TypeKey> {
		match self {
			Self::Receiver(key) | Self::Payload(key) | Self::Code(key) => Some(key),
			Self::Flag => None,
		}
	}
}

/// Parameter position class, ignoring concrete types. Signature rules are
/// expressed as sequences of slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
	Receiver,
	Payload,
	Code,
	Flag,
}

/// Declared return kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
	Void,
	Value(&'static str),
}

impl ReturnKind {
	pub fn of<R: 'static>() -> Self {
		if TypeKey::of::<R>().is::<()>() {
			Self::Void
		} else {
			Self::Value(std::any::type_name::<R>())
		}
	}

	pub fn is_void(self) -> bool {
		self == Self::Void
	}
}

/// Full declared signature of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodShape {
	pub params: Vec<ParamKind>,
	pub ret: ReturnKind,
}

impl MethodShape {
	pub fn new(params: Vec<ParamKind>, ret: ReturnKind) -> Self {
		Self { params, ret }
	}

	pub fn slots(&self) -> Vec<Slot> {
		self.params.iter().map(|p| p.slot()).collect()
	}

	/// Receiver type when the first parameter is a receiver.
	pub fn receiver(&self) -> Option<TypeKey> {
		match self.params.first() {
			Some(ParamKind::Receiver(key)) => Some(*key),
			_ => None,
		}
	}

	pub fn payload(&self) -> Option<TypeKey> {
		self.params.iter().find_map(|p| match p {
			ParamKind::Payload(key) => Some(*key),
			_ => None,
		})
	}
}

/// A type usable as a described-method parameter.
pub trait MethodParam<'a>: Sized {
	fn kind() -> ParamKind;
	fn extract(inv: &mut Invocation<'a>) -> Result<Self, InvokeError>;
}

impl<'a, T: Any> MethodParam<'a> for &'a mut T {
	fn kind() -> ParamKind {
		ParamKind::Receiver(TypeKey::of::<T>())
	}

	fn extract(inv: &mut Invocation<'a>) -> Result<Self, InvokeError> {
		let expected = std::any::type_name::<T>();
		let receiver = inv
			.receiver
			.take()
			.ok_or(InvokeError::MissingReceiver { expected })?;
		receiver
			.downcast_mut::<T>()
			.ok_or(InvokeError::ReceiverMismatch { expected })
	}
}

impl<'a, T: Any> MethodParam<'a> for &'a T {
	fn kind() -> ParamKind {
		ParamKind::Payload(TypeKey::of::<T>())
	}

	fn extract(inv: &mut Invocation<'a>) -> Result<Self, InvokeError> {
		let expected = std::any::type_name::<T>();
		let payload = inv.payload.ok_or(InvokeError::MissingPayload { expected })?;
		payload
			.downcast_ref::<T>()
			.ok_or(InvokeError::PayloadMismatch { expected })
	}
}

impl<'a> MethodParam<'a> for bool {
	fn kind() -> ParamKind {
		ParamKind::Flag
	}

	fn extract(inv: &mut Invocation<'a>) -> Result<Self, InvokeError> {
		inv.flag.ok_or(InvokeError::MissingFlag)
	}
}

macro_rules! impl_code_param {
	($($int:ty),* $(,)?) => {
		$(
			impl<'a> MethodParam<'a> for $int {
				fn kind() -> ParamKind {
					ParamKind::Code(TypeKey::of::<$int>())
				}

				fn extract(inv: &mut Invocation<'a>) -> Result<Self, InvokeError> {
					let code = inv.code.ok_or(InvokeError::MissingCode)?;
					<$int>::try_from(code).map_err(|_| InvokeError::CodeOutOfRange {
						code,
						target: stringify!($int),
					})
				}
			}
		)*
	};
}

impl_code_param!(i32, u32, i64, u64, u16);

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Default)]
	struct Counter {
		hits: u32,
	}

	struct Hit(u32);

	fn bump(counter: &mut Counter, hit: &Hit) {
		counter.hits += hit.0;
	}

	fn thunk(inv: &mut Invocation<'_>) -> Result<(), InvokeError> {
		bump(
			<&mut Counter as MethodParam<'_>>::extract(inv)?,
			<&Hit as MethodParam<'_>>::extract(inv)?,
		);
		Ok(())
	}

	#[test]
	fn thunk_extracts_receiver_and_payload() {
		let mut counter = Counter::default();
		let hit = Hit(3);
		let mut inv = Invocation::new().with_receiver(&mut counter).with_payload(&hit);
		thunk(&mut inv).unwrap();
		assert_eq!(counter.hits, 3);
	}

	#[test]
	fn missing_receiver_is_reported() {
		let hit = Hit(1);
		let mut inv = Invocation::new().with_payload(&hit);
		let err = thunk(&mut inv).unwrap_err();
		assert!(matches!(err, InvokeError::MissingReceiver { .. }));
	}

	#[test]
	fn mismatched_payload_is_reported() {
		let mut counter = Counter::default();
		let wrong = 5u8;
		let mut inv = Invocation::new().with_receiver(&mut counter).with_payload(&wrong);
		let err = thunk(&mut inv).unwrap_err();
		assert!(matches!(err, InvokeError::PayloadMismatch { .. }));
	}

	#[test]
	fn code_params_reject_out_of_range_values() {
		let mut inv = Invocation::new().with_code(-1);
		let err = <u32 as MethodParam<'_>>::extract(&mut inv).unwrap_err();
		assert_eq!(
			err,
			InvokeError::CodeOutOfRange {
				code: -1,
				target: "u32"
			}
		);
	}

	#[test]
	fn return_kind_distinguishes_unit() {
		assert!(ReturnKind::of::<()>().is_void());
		assert!(!ReturnKind::of::<bool>().is_void());
	}
}
