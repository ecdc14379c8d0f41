//! Interactive parts of the portfolio page: the animated canvas backgrounds,
//! the hero typewriter and pointer glow, the navigation scroll spy and the
//! contact form.
//!
//! Everything outside `wasm` is plain Rust and runs under `cargo test` on the host.

pub mod config;
pub mod contact;
pub mod cosmic;
pub mod error;
pub mod glow;
pub mod nav;
pub mod paint;
pub mod particles;
pub mod rain;
pub mod repeat;
pub mod typewriter;

// Only compile browser glue when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
