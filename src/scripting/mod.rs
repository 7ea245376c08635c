//! Lua 绑定
//!
//! 基于 `mlua`。宿主程序调用 [`open_sdl`] 或 [`preload`] 得到 `sdl` 模块表；
//! 以 `module` feature 构建时，`luaopen_sdl` 让 `require("sdl")` 直接加载本库。

pub mod lua_support;
pub mod userdata;

pub use lua_support::{event_table, open_sdl, preload, register_module, MODULE_NAME};
