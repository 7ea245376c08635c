//! # sdl_lua
//!
//! SDL3 windowing, event polling and 2D rendering exposed to Lua.
//!
//! ## Features
//!
//! - **Handles**: window and renderer handles that exclusively own one native
//!   object, with idempotent `destroy` (also run on drop / Lua GC)
//! - **Events**: the native queue is drained into a typed [`video::Event`];
//!   scripts receive plain tables
//! - **Backends**: SDL3 through `sdl3-sys`, or a headless recording backend for
//!   tests and CI without a display
//!
//! ### Example
//!
//! ```ignore
//! use mlua::Lua;
//!
//! let lua = Lua::new();
//! let sdl = sdl_lua::scripting::open_sdl(&lua)?;
//! lua.globals().set("sdl", sdl)?;
//! lua.load(r#"
//!     sdl.init()
//!     local window, renderer = sdl.create_window_and_renderer("Demo", 800, 600)
//! "#).exec()?;
//! ```
//!
//! ## Modules
//!
//! - [`core`]: errors, logging
//! - [`config`]: TOML/JSON configuration
//! - [`platform`]: native video backends
//! - [`video`]: handles, events, the call bridge
//! - [`scripting`]: Lua module registration

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Native video backend abstraction
pub mod platform;
/// Windows, renderers and event polling
pub mod video;
/// Lua bindings
pub mod scripting;

pub use crate::core::{BindingError, BindingResult, NativeError};
pub use crate::video::{Event, EventType, Video, WindowFlags};

/// `require("sdl")` 入口 (luaopen_sdl)
#[cfg(feature = "module")]
#[mlua::lua_module]
fn sdl(lua: &mlua::Lua) -> mlua::Result<mlua::Table> {
    scripting::open_sdl(lua)
}
