//! Signature verification rules per category.
//!
//! Each rule set enumerates the parameter shapes it accepts. Anything else is
//! rejected; callers log the rejection and skip the method.

use hotbind_meta::{ParamKind, Slot, TypeKey};

use crate::symbols::{SymMethod, Symbol};

use Slot::{Code, Flag, Payload, Receiver};

/// Stateless signature predicates for one category.
pub trait SignatureRules {
	/// Accepted parameter shapes.
	const ACCEPTED: &'static [&'static [Slot]];

	fn is_valid_signature(method: &SymMethod) -> bool {
		method.ret().is_void() && Self::ACCEPTED.contains(&method.slots().as_slice())
	}

	/// The method takes no parameters at all.
	fn is_null_parameter_variant(method: &SymMethod) -> bool {
		method.params().is_empty()
	}
}

/// Checks that a declared payload parameter, if any, has the expected type.
pub fn payload_matches(method: &SymMethod, expected: TypeKey) -> bool {
	method.payload().is_none_or(|actual| actual == expected)
}

pub struct AspectRules;

impl SignatureRules for AspectRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[Receiver], &[]];
}

pub struct EventRules;

impl SignatureRules for EventRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[
		&[],
		&[Code],
		&[Payload],
		&[Code, Payload],
		&[Receiver],
		&[Receiver, Code],
		&[Receiver, Payload],
		&[Receiver, Code, Payload],
	];
}

pub struct ExtendRules;

impl SignatureRules for ExtendRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[
		&[Receiver],
		&[Receiver, Code],
		&[Receiver, Payload],
		&[Receiver, Code, Payload],
	];

	fn is_valid_signature(method: &SymMethod) -> bool {
		method.is_extension()
			&& method.ret().is_void()
			&& Self::ACCEPTED.contains(&method.slots().as_slice())
	}

	fn is_null_parameter_variant(_method: &SymMethod) -> bool {
		false
	}
}

pub struct InputRules;

impl SignatureRules for InputRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[], &[Code], &[Receiver], &[Receiver, Code]];
}

pub struct NoticeRules;

impl SignatureRules for NoticeRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[], &[Payload]];
}

pub struct InjectRules;

impl SignatureRules for InjectRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[Receiver, Payload]];

	fn is_null_parameter_variant(_method: &SymMethod) -> bool {
		false
	}
}

pub struct MessageRules;

impl SignatureRules for MessageRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[Payload], &[Code, Payload], &[Receiver, Payload]];

	fn is_null_parameter_variant(_method: &SymMethod) -> bool {
		false
	}
}

/// "Type loaded" consumer callbacks: `fn(&Symbol)` or `fn(&Symbol, bool)`.
pub struct LoadedCallbackRules;

impl SignatureRules for LoadedCallbackRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[Payload], &[Payload, Flag]];

	fn is_valid_signature(method: &SymMethod) -> bool {
		method.is_static()
			&& method.ret().is_void()
			&& Self::ACCEPTED.contains(&method.slots().as_slice())
			&& method.params().first() == Some(&ParamKind::Payload(TypeKey::of::<Symbol>()))
	}

	fn is_null_parameter_variant(_method: &SymMethod) -> bool {
		false
	}
}

/// "All types unloaded" consumer callbacks: `fn()`.
pub struct UnloadedCallbackRules;

impl SignatureRules for UnloadedCallbackRules {
	const ACCEPTED: &'static [&'static [Slot]] = &[&[]];
}

#[cfg(test)]
mod tests;
