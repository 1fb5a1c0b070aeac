//! Fixture types discovered through the link-time catalog, and dispatch
//! through every category.

use std::any::Any;
use std::cell::Cell;

use hotbind_loader::{
	Aspects, Events, ExtendKey, Extensions, InjectKey, Injections, Inputs, MessageKey, MessageTypeDef,
	MessageTypeReg, Messages, Notices, Symbol,
};
use hotbind_meta::{ClassMarker, FeatureTag, InputOp, MethodMarker, Notice, Phase, Timing, TypeKey, describe};
use pretty_assertions::assert_eq;

use crate::common;

thread_local! {
	pub static RENDERABLES: Cell<u32> = const { Cell::new(0) };
	pub static BUTTONS: Cell<u32> = const { Cell::new(0) };
	pub static CHATS: Cell<u32> = const { Cell::new(0) };
	pub static LOW_MEMORY: Cell<u32> = const { Cell::new(0) };
	pub static RELOADS: Cell<u32> = const { Cell::new(0) };
}

pub const POOLED: FeatureTag = FeatureTag::inheritable("pooled");

pub trait Renderable {}

pub struct Damage(pub i32);
pub struct Chat(pub &'static str);
pub struct Audio;

#[derive(Debug, Default)]
pub struct Player {
	pub hp: i32,
	pub score: i32,
	pub ticks: u32,
	pub jumps: u32,
	pub said: Vec<&'static str>,
}

impl Player {
	fn on_damage(&mut self, damage: &Damage) {
		self.hp -= damage.0;
	}

	fn on_bonus(&mut self, id: i32) {
		self.score += id;
	}
}

describe!(Player {
	markers: [ClassMarker::EventSystem],
	features: [POOLED],
	roles: [dyn Renderable],
	construct: Player::default,
	methods: {
		on_damage(&mut Player, &Damage) = Player::on_damage => [MethodMarker::event_of::<Damage>()];
		on_bonus(&mut Player, i32) = Player::on_bonus => [MethodMarker::event(100)];
	},
});

pub struct PlayerControls;

fn jump(player: &mut Player) {
	player.jumps += 1;
}

fn say(player: &mut Player, chat: &Chat) {
	player.said.push(chat.0);
}

describe!(PlayerControls {
	markers: [ClassMarker::Extend],
	methods: {
		jump(&mut Player) = jump => [MethodMarker::input(1, InputOp::PRESSED)];
		say(&mut Player, &Chat) = say => [MethodMarker::message_of::<Chat>()];
	},
});

pub struct TickAspect;

fn tick(player: &mut Player) {
	player.ticks += 1;
}

describe!(TickAspect {
	markers: [ClassMarker::Aspect],
	methods: {
		tick(&mut Player) = tick => [MethodMarker::after(Phase::Update)];
	},
});

static CHAT_TYPE: MessageTypeDef = MessageTypeDef::of::<Chat>(42);

inventory::submit!(MessageTypeReg(&CHAT_TYPE));

pub struct ChatRoom;

fn on_chat(_: &Chat) {
	CHATS.set(CHATS.get() + 1);
}

describe!(ChatRoom {
	markers: [ClassMarker::MessageSystem],
	methods: {
		on_chat(&Chat) = on_chat => [MethodMarker::message_of::<Chat>()];
	},
});

#[derive(Default)]
pub struct Speaker {
	pub wired: bool,
}

fn set_audio(speaker: &mut Speaker, _: &Audio) {
	speaker.wired = true;
}

describe!(Speaker {
	bean: "speaker",
	markers: [ClassMarker::Inject],
	methods: {
		set_audio(&mut Speaker, &Audio) = set_audio => [MethodMarker::autowired("audio")];
	},
});

pub struct Lifecycle;

fn on_low_memory() {
	LOW_MEMORY.set(LOW_MEMORY.get() + 1);
}

fn on_reload() {
	RELOADS.set(RELOADS.get() + 1);
}

describe!(Lifecycle {
	markers: [ClassMarker::NoticeSystem],
	methods: {
		on_low_memory() = on_low_memory => [MethodMarker::notice(Notice::LowMemory)];
		on_reload() = on_reload => [MethodMarker::notice(Notice::ReloadCompleted)];
	},
});

pub struct Gamepad;

fn on_button(code: u32) {
	BUTTONS.set(BUTTONS.get() + code);
}

describe!(Gamepad {
	markers: [ClassMarker::InputSystem],
	methods: {
		on_button(u32) = on_button => [MethodMarker::input(7, InputOp::PRESSED)];
	},
});

pub struct Hybrid;

fn hybrid_advice(_: &mut Hybrid) {}

fn hybrid_listen(_: &mut Hybrid) {}

describe!(Hybrid {
	markers: [ClassMarker::EventSystem, ClassMarker::Aspect],
	methods: {
		hybrid_advice(&mut Hybrid) = hybrid_advice => [MethodMarker::after(Phase::Update)];
		hybrid_listen(&mut Hybrid) = hybrid_listen => [MethodMarker::event(5)];
	},
});

pub struct Hud;

fn on_renderable(_: &Symbol) {
	RENDERABLES.set(RENDERABLES.get() + 1);
}

describe!(Hud {
	methods: {
		on_renderable(&Symbol) = on_renderable => [MethodMarker::class_loaded::<dyn Renderable>()];
	},
});

/// Types in this module a fresh loader accepts.
pub const LOADED_TYPES: usize = 8;

#[test]
fn discovers_registered_types_in_the_namespace() {
	RENDERABLES.set(0);
	let loader = common::loader();

	assert_eq!(loader.symbols().len(), LOADED_TYPES);
	assert_eq!(loader.processors().len(), 7);
	assert!(loader.symbol_of::<Hud>().is_none());
	assert_eq!(RENDERABLES.get(), 1);

	let player = loader.symbol_by_name("Player").unwrap();
	assert!(player.full_name().starts_with("integration::game"));
	assert_eq!(loader.bean_by_name("main_player").unwrap().symbol.key(), player.key());
	assert_eq!(loader.symbols_by_role(TypeKey::of::<dyn Renderable>()).len(), 1);
	assert_eq!(loader.symbols_by_feature("pooled").len(), 1);
}

#[test]
fn events_route_by_payload_and_id() {
	let loader = common::loader();
	let events = loader.category::<Events>().unwrap();

	let mut player = Player::default();
	assert_eq!(events.dispatch_payload_to(&mut player, &Damage(3)), 1);
	assert_eq!(events.dispatch_id_to(&mut player, 100, None), 1);
	assert_eq!((player.hp, player.score), (-3, 100));
}

#[test]
fn aspects_advise_foreign_receivers() {
	let loader = common::loader();
	let aspects = loader.category::<Aspects>().unwrap();

	let mut player = Player::default();
	assert_eq!(aspects.advise(&mut player, Phase::Update, Timing::After), 1);
	assert_eq!(aspects.advise(&mut player, Phase::Update, Timing::Before), 0);
	assert_eq!(player.ticks, 1);
}

#[test]
fn extensions_route_inputs_and_messages_to_the_receiver() {
	let loader = common::loader();
	let extensions = loader.category::<Extensions>().unwrap();
	assert_eq!(extensions.extensions_of(TypeKey::of::<Player>()).len(), 2);

	let mut player = Player::default();
	let pressed = ExtendKey::input(1, InputOp::PRESSED);
	assert_eq!(extensions.dispatch_to(&mut player, pressed, None), 1);

	let chat = Chat("gg");
	let said = ExtendKey::message_of::<Chat>();
	assert_eq!(extensions.dispatch_to(&mut player, said, Some(&chat as &dyn Any)), 1);
	assert_eq!(player.jumps, 1);
	assert_eq!(player.said, vec!["gg"]);
}

#[test]
fn registered_message_types_dispatch_by_opcode() {
	CHATS.set(0);
	let loader = common::loader();
	let info = loader.lookup::<Messages>(TypeKey::of::<ChatRoom>()).unwrap();
	assert_eq!(info.bindings[0].key, MessageKey::Opcode(42));

	let messages = loader.category::<Messages>().unwrap();
	assert_eq!(messages.dispatch(42, &Chat("hi")), 1);
	assert_eq!(messages.dispatch_message(&Chat("again")), 1);
	assert_eq!(CHATS.get(), 2);
}

#[test]
fn injections_wire_named_dependencies() {
	let loader = common::loader();
	let injections = loader.category::<Injections>().unwrap();

	let audio = Audio;
	let mut speaker = Speaker::default();
	let wired = injections.autowire(&mut speaker, |key| match key {
		InjectKey::Bean("audio") => Some(&audio as &dyn Any),
		_ => None,
	});
	assert_eq!(wired, 1);
	assert!(speaker.wired);
}

#[test]
fn static_inputs_and_notices() {
	BUTTONS.set(0);
	LOW_MEMORY.set(0);
	let loader = common::loader();

	let inputs = loader.category::<Inputs>().unwrap();
	assert_eq!(inputs.dispatch(7, InputOp::PRESSED), 1);
	assert_eq!(inputs.dispatch(7, InputOp::RELEASED), 0);
	assert_eq!(BUTTONS.get(), 7);

	let notices = loader.category::<Notices>().unwrap();
	assert_eq!(notices.broadcast(Notice::LowMemory, None), 1);
	assert_eq!(LOW_MEMORY.get(), 1);
}

#[test]
fn highest_priority_category_wins() {
	let loader = common::loader();
	let hybrid = TypeKey::of::<Hybrid>();
	assert!(loader.lookup::<Aspects>(hybrid).is_some());
	assert!(loader.lookup::<Events>(hybrid).is_none());

	let mut config = common::config();
	config.categories.entry("event".into()).or_default().priority = Some(90);
	let loader = common::loader_with(config);
	assert!(loader.lookup::<Events>(hybrid).is_some());
	assert!(loader.lookup::<Aspects>(hybrid).is_none());
}
