//! Before/after advice on lifecycle phases.

use std::any::Any;

use hotbind_meta::{ClassMarker, MarkerKind, MethodMarker, Phase, Timing, TypeKey};

use super::{Category, CategoryLoader, MethodTypeCodeInfo, Rejection, Route};
use crate::inspect::{AspectRules, SignatureRules};
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

/// Phase and timing an advice binding runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdviceKey {
	pub phase: Phase,
	pub timing: Timing,
}

#[derive(Debug, Default)]
pub struct Aspects;

impl Category for Aspects {
	type Key = AdviceKey;
	type Rules = AspectRules;

	const LABEL: &'static str = "aspect";
	const MARKER: ClassMarker = ClassMarker::Aspect;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Advice];
	const DEFAULT_PRIORITY: i16 = 70;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<AdviceKey>, Rejection> {
		let MethodMarker::Advice { phase, timing, .. } = *marker else {
			return Err(Rejection::UnexpectedMarker);
		};
		let key = AdviceKey { phase, timing };

		if AspectRules::is_null_parameter_variant(method) {
			let target = marker.target().ok_or(Rejection::MissingTarget)?;
			return Ok(Route {
				key,
				target: Some(target),
			});
		}
		if let (Some(target), Some(receiver)) = (marker.target(), method.receiver())
			&& target != receiver
		{
			return Err(Rejection::TargetMismatch {
				expected: target.name(),
				found: receiver.name(),
			});
		}
		Ok(Route::on(method, key))
	}
}

impl CategoryLoader<Aspects> {
	/// Runs every advice bound to the receiver's type for `phase` and `timing`.
	pub fn advise(&self, receiver: &mut dyn Any, phase: Phase, timing: Timing) -> usize {
		let key = AdviceKey { phase, timing };
		self.fire(Some(receiver), None, None, |k| *k == key)
	}

	pub fn advice_for(&self, target: TypeKey, phase: Phase, timing: Timing) -> Vec<&MethodTypeCodeInfo<AdviceKey>> {
		let key = AdviceKey { phase, timing };
		self.bindings()
			.filter(|b| b.key == key && b.target == Some(target))
			.collect()
	}
}

static ASPECT_PROCESSOR: ProcessorDef = ProcessorDef::of::<Aspects>();

inventory::submit!(ProcessorReg(&ASPECT_PROCESSOR));
