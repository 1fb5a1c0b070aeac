//! Static listeners for framework-wide notices.

use std::any::Any;

use hotbind_meta::{ClassMarker, MarkerKind, MethodMarker, Notice};

use super::{Category, CategoryLoader, Rejection, Route};
use crate::inspect::NoticeRules;
use crate::processors::{ProcessorDef, ProcessorReg};
use crate::symbols::SymMethod;

#[derive(Debug, Default)]
pub struct Notices;

impl Category for Notices {
	type Key = Notice;
	type Rules = NoticeRules;

	const LABEL: &'static str = "notice";
	const MARKER: ClassMarker = ClassMarker::NoticeSystem;
	const MARKER_KINDS: &'static [MarkerKind] = &[MarkerKind::Notice];
	const DEFAULT_PRIORITY: i16 = 10;

	fn route(&self, method: &SymMethod, marker: &MethodMarker) -> Result<Route<Notice>, Rejection> {
		match *marker {
			MethodMarker::Notice { notice } => Ok(Route::on(method, notice)),
			_ => Err(Rejection::UnexpectedMarker),
		}
	}
}

impl CategoryLoader<Notices> {
	/// Delivers `notice` to every listener. Listeners taking a payload receive `payload`.
	pub fn broadcast(&self, notice: Notice, payload: Option<&dyn Any>) -> usize {
		self.fire(None, payload, None, |k| *k == notice)
	}
}

static NOTICE_PROCESSOR: ProcessorDef = ProcessorDef::of::<Notices>();

inventory::submit!(ProcessorReg(&NOTICE_PROCESSOR));
