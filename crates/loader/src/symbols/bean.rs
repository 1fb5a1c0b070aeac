use std::sync::Arc;

use super::Symbol;

/// Where a bean association came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeanSource {
	/// Declared on the class itself.
	Declared,
	/// Supplied by the loader configuration.
	Configured,
}

/// Named association between a configured name and a target symbol.
#[derive(Debug, Clone)]
pub struct Bean {
	pub name: String,
	pub symbol: Arc<Symbol>,
	pub priority: i16,
	pub singleton: bool,
	pub source: BeanSource,
}

impl Bean {
	pub fn declared(symbol: &Arc<Symbol>) -> Option<Self> {
		let decl = symbol.bean()?;
		Some(Self {
			name: decl.name.to_string(),
			symbol: symbol.clone(),
			priority: symbol.priority(),
			singleton: decl.singleton,
			source: BeanSource::Declared,
		})
	}

	/// Returns true if `self` should replace `existing` under the same name.
	pub(crate) fn outranks(&self, existing: &Bean) -> bool {
		self.priority > existing.priority
	}
}
