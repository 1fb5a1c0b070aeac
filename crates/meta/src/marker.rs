//! Declarative markers attached to described types and their methods.

use crate::key::{TypeKey, TypeKeyFn};

/// Class-level marker selecting which category loader a type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassMarker {
	/// Cross-cutting before/after advice on lifecycle phases.
	Aspect,
	/// Static or instance event listeners.
	EventSystem,
	/// Extension methods routing events, inputs or messages to another type.
	Extend,
	/// Input handlers.
	InputSystem,
	/// System notice listeners.
	NoticeSystem,
	/// Dependency setters resolved from beans.
	Inject,
	/// Network message listeners.
	MessageSystem,
	/// Marker owned by an external consumer.
	Custom(&'static str),
}

impl std::fmt::Display for ClassMarker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Aspect => f.write_str("aspect"),
			Self::EventSystem => f.write_str("event"),
			Self::Extend => f.write_str("extend"),
			Self::InputSystem => f.write_str("input"),
			Self::NoticeSystem => f.write_str("notice"),
			Self::Inject => f.write_str("inject"),
			Self::MessageSystem => f.write_str("message"),
			Self::Custom(name) => write!(f, "custom:{name}"),
		}
	}
}

/// Lifecycle phase of a framework object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
	Initialize,
	Startup,
	Awake,
	Start,
	Update,
	LateUpdate,
	Destroy,
	Shutdown,
	Cleanup,
}

/// Whether advice runs before or after the phase body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timing {
	Before,
	After,
}

bitflags::bitflags! {
	/// Input operations an input binding responds to.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct InputOp: u8 {
		const PRESSED = 1 << 0;
		const RELEASED = 1 << 1;
		const HELD = 1 << 2;
	}
}

/// Framework-wide notices broadcast to notice listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
	Startup,
	Shutdown,
	Pause,
	Resume,
	LowMemory,
	ReloadCompleted,
	Custom(u16),
}

/// Feature tag carried by a class. Inheritable tags propagate to subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureTag {
	pub name: &'static str,
	pub inheritable: bool,
}

impl FeatureTag {
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			inheritable: false,
		}
	}

	pub const fn inheritable(name: &'static str) -> Self {
		Self {
			name,
			inheritable: true,
		}
	}
}

/// Bean declared directly on a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeanDecl {
	pub name: &'static str,
	pub singleton: bool,
}

impl BeanDecl {
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			singleton: true,
		}
	}

	pub const fn prototype(name: &'static str) -> Self {
		Self {
			name,
			singleton: false,
		}
	}
}

/// Marker attached to a method. The enclosing class marker decides which
/// category interprets it.
#[derive(Debug, Clone, Copy)]
pub enum MethodMarker {
	/// Advice around a lifecycle phase. Without a receiver parameter the
	/// target must be named explicitly.
	Advice {
		phase: Phase,
		timing: Timing,
		target: Option<TypeKeyFn>,
	},
	/// Event subscription by numeric id, payload type, or both.
	Event { id: i32, payload: Option<TypeKeyFn> },
	/// Input subscription by code and operation mask.
	Input { code: u32, op: InputOp },
	/// System notice subscription.
	Notice { notice: Notice },
	/// Message subscription by opcode, payload type, or both.
	Message { opcode: u32, payload: Option<TypeKeyFn> },
	/// Dependency setter resolved by bean name or dependency type.
	Autowired {
		bean: Option<&'static str>,
		ty: Option<TypeKeyFn>,
	},
	/// Consumer callback fired when a class assignable to `target` loads.
	ClassLoaded { target: TypeKeyFn },
	/// Consumer callback fired when every class is unloaded.
	ClassesUnloaded { target: TypeKeyFn },
}

/// Discriminant of [`MethodMarker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
	Advice,
	Event,
	Input,
	Notice,
	Message,
	Autowired,
	ClassLoaded,
	ClassesUnloaded,
}

impl MethodMarker {
	pub const fn before(phase: Phase) -> Self {
		Self::Advice {
			phase,
			timing: Timing::Before,
			target: None,
		}
	}

	pub const fn after(phase: Phase) -> Self {
		Self::Advice {
			phase,
			timing: Timing::After,
			target: None,
		}
	}

	pub const fn before_of<T: 'static>(phase: Phase) -> Self {
		Self::Advice {
			phase,
			timing: Timing::Before,
			target: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	pub const fn after_of<T: 'static>(phase: Phase) -> Self {
		Self::Advice {
			phase,
			timing: Timing::After,
			target: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	pub const fn event(id: i32) -> Self {
		Self::Event { id, payload: None }
	}

	pub const fn event_of<T: 'static>() -> Self {
		Self::Event {
			id: 0,
			payload: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	/// Both keys declared; the numeric id wins when routing.
	pub const fn event_with<T: 'static>(id: i32) -> Self {
		Self::Event {
			id,
			payload: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	pub const fn input(code: u32, op: InputOp) -> Self {
		Self::Input { code, op }
	}

	pub const fn notice(notice: Notice) -> Self {
		Self::Notice { notice }
	}

	pub const fn message(opcode: u32) -> Self {
		Self::Message {
			opcode,
			payload: None,
		}
	}

	pub const fn message_of<T: 'static>() -> Self {
		Self::Message {
			opcode: 0,
			payload: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	pub const fn message_with<T: 'static>(opcode: u32) -> Self {
		Self::Message {
			opcode,
			payload: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	pub const fn autowired(bean: &'static str) -> Self {
		Self::Autowired {
			bean: Some(bean),
			ty: None,
		}
	}

	pub const fn autowired_of<T: 'static>() -> Self {
		Self::Autowired {
			bean: None,
			ty: Some(TypeKey::of::<T> as TypeKeyFn),
		}
	}

	pub const fn class_loaded<T: ?Sized + 'static>() -> Self {
		Self::ClassLoaded {
			target: TypeKey::of::<T>,
		}
	}

	pub const fn classes_unloaded<T: ?Sized + 'static>() -> Self {
		Self::ClassesUnloaded {
			target: TypeKey::of::<T>,
		}
	}

	pub const fn kind(&self) -> MarkerKind {
		match self {
			Self::Advice { .. } => MarkerKind::Advice,
			Self::Event { .. } => MarkerKind::Event,
			Self::Input { .. } => MarkerKind::Input,
			Self::Notice { .. } => MarkerKind::Notice,
			Self::Message { .. } => MarkerKind::Message,
			Self::Autowired { .. } => MarkerKind::Autowired,
			Self::ClassLoaded { .. } => MarkerKind::ClassLoaded,
			Self::ClassesUnloaded { .. } => MarkerKind::ClassesUnloaded,
		}
	}

	/// Target type named by the marker, if it carries one.
	pub fn target(&self) -> Option<TypeKey> {
		match self {
			Self::Advice { target, .. } => target.map(|f| f()),
			Self::ClassLoaded { target } | Self::ClassesUnloaded { target } => Some(target()),
			_ => None,
		}
	}
}
