//! Platform adapters
//!
//! The core is platform-free; adapters translate host events into
//! [`RawInput`](crate::input::RawInput) and drive [`GameLoop`](crate::game_loop::GameLoop).

#[cfg(target_arch = "wasm32")]
pub mod web;
