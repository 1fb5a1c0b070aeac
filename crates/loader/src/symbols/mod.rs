//! Symbol model and resolver.

mod bean;
mod registry;
mod symbol;

pub use bean::{Bean, BeanSource};
pub use registry::SymbolRegistry;
pub use symbol::{MethodFlags, SymMethod, Symbol};
