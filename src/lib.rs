//! Grid snake simulation core and the terminal host built around it.
//!
//! The [`engine::Engine`] owns all game state and is advanced by its host one
//! discrete tick at a time. Rendering, notifications and randomness reach the
//! engine through the capabilities in [`host`].

pub mod apple;
pub mod body;
pub mod config;
pub mod engine;
pub mod host;
pub mod input;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod terminal_host;
pub mod terminal_runtime;
pub mod ui;
