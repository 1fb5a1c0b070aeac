//! Dependency setters resolved from beans.

use std::any::Any;

use hotbind_meta::{ClassMarker, Invocation, MarkerKind, MethodMarker, TypeKey};

use super::{Category, CategoryLoader, Rejection, Route, check_payload};
use crate::inspect::InjectRules;
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

/// Dependency a setter asks for. A bean name wins over a dependency type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectKey {
	Bean(&'static str),
	Type(TypeKey),
}

#[derive(Debug, Default)]
pub struct Injections;

impl Category for Injections {
	type Key = InjectKey;
	type Rules = InjectRules;

	const LABEL: &'static str = "inject";
	const MARKER: ClassMarker = ClassMarker::Inject;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Autowired];
	const DEFAULT_PRIORITY: i16 = 60;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<InjectKey>, Rejection> {
		let MethodMarker::Autowired { bean, ty } = *marker else {
			return Err(Rejection::UnexpectedMarker);
		};
		let ty = ty.map(|f| f());
		if let Some(ty) = ty {
			check_payload(method, ty)?;
		}

		let key = match (bean, ty.or(method.payload())) {
			(Some(name), _) => InjectKey::Bean(name),
			(None, Some(ty)) => InjectKey::Type(ty),
			(None, None) => return Err(Rejection::Unroutable),
		};
		Ok(Route::on(method, key))
	}
}

impl CategoryLoader<Injections> {
	/// Invokes every setter bound to the receiver's type with the dependency
	/// `resolve` returns for its key. Unresolved keys are skipped with a warning.
	pub fn autowire<'d>(
		&self,
		receiver: &mut dyn Any,
		mut resolve: impl FnMut(&InjectKey) -> Option<&'d dyn Any>,
	) -> usize {
		let class = (*receiver).type_id();
		let mut wired = 0;

		for binding in self.bindings().filter(|b| b.target.is_some_and(|t| t.id() == class)) {
			let Some(dependency) = resolve(&binding.key) else {
				tracing::warn!(method = %binding.full_name, key = ?binding.key, "unresolved dependency");
				continue;
			};
			let mut inv = Invocation::new()
				.with_receiver(&mut *receiver)
				.with_payload(dependency);
			match binding.handle.call(&mut inv) {
				Ok(()) => wired += 1,
				Err(err) => tracing::warn!(method = %binding.full_name, error = %err, "autowire failed"),
			}
		}
		wired
	}
}

static INJECT_PROCESSOR: ProcessorDef = ProcessorDef::of::<Injections>();

inventory::submit!(ProcessorReg(&INJECT_PROCESSOR));
