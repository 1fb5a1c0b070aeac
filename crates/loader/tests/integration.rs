#![allow(unused_crate_dependencies)]

#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/game.rs"]
mod game;

#[path = "integration/lifecycle.rs"]
mod lifecycle;
