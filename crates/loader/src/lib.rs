//! Runtime binding engine.
//!
//! Turns the static descriptors emitted by `hotbind_meta::describe!` into a
//! symbol model and verified, dispatchable bindings.
//!
//! # Flow
//!
//! ```text
//! ModuleCatalog ─► namespace filter ─► SymbolRegistry::build
//!                                            │
//!                       ProcessorRegistry (priority order, first match)
//!                                            │
//!                      CategoryLoader<C>::load ─► CodeInfo<C::Key>
//!                                            │
//!                               consumer "type loaded" callbacks
//! ```
//!
//! [`CodeLoader`] is the single owned entry point. Category tables are reached
//! through [`CodeLoader::category`] and dispatch through the typed methods on
//! each [`CategoryLoader`].

pub mod collector;
pub mod config;
pub mod domains;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod processors;
pub mod symbols;

#[cfg(test)]
use {tempfile as _, tracing_subscriber as _};

pub use collector::CallbackCollector;
pub use config::{BeanEntry, CategoryConfig, LoaderConfig};
pub use domains::{
	AdviceKey, Aspects, CallHandle, Category, CategoryLoader, CodeInfo, EventKey, Events, ExtendKey,
	Extensions, InjectKey, Injections, InputKey, Inputs, MessageKey, MessageTypeDef, MessageTypeReg,
	Messages, MethodTypeCodeInfo, Notices, Rejection, Route,
};
pub use error::{ConfigError, LoaderError};
pub use loader::{CodeLoader, TypeFilter};
pub use processors::{BindingProcessor, ProcessorDef, ProcessorReg, ProcessorRegistry};
pub use symbols::{Bean, BeanSource, MethodFlags, SymMethod, Symbol, SymbolRegistry};
