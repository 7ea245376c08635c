use std::rc::Rc;

use mlua::{Lua, Table, UserDataRef};

use crate::platform::{SdlBackend, VideoBackend};
use crate::video::{
    keycode, mouse_button, Event, EventType, RendererHandle, Video, WindowFlags, WindowHandle,
};

/// 模块在 `package.loaded` 中的名字
pub const MODULE_NAME: &str = "sdl";

/// 使用 SDL3 后端创建 `sdl` 模块表
pub fn open_sdl(lua: &Lua) -> mlua::Result<Table> {
    register_module(lua, Rc::new(Video::new(SdlBackend::new())))
}

/// 创建模块表并放入 `package.loaded.sdl`，之后脚本可以 `require("sdl")`
pub fn preload<B: VideoBackend + 'static>(lua: &Lua, video: Rc<Video<B>>) -> mlua::Result<Table> {
    let module = register_module(lua, video)?;
    let package: Table = lua.globals().get("package")?;
    let loaded: Table = package.get("loaded")?;
    loaded.set(MODULE_NAME, module.clone())?;
    Ok(module)
}

/// 注册全部函数与常量
pub fn register_module<B: VideoBackend + 'static>(
    lua: &Lua,
    video: Rc<Video<B>>,
) -> mlua::Result<Table> {
    let module = lua.create_table()?;
    register_functions(lua, &module, video)?;
    register_constants(&module)?;
    Ok(module)
}

fn register_functions<B: VideoBackend + 'static>(
    lua: &Lua,
    module: &Table,
    video: Rc<Video<B>>,
) -> mlua::Result<()> {
    // sdl.init()
    let v = Rc::clone(&video);
    module.set(
        "init",
        lua.create_function(move |_, ()| {
            v.init()?;
            Ok(())
        })?,
    )?;

    // sdl.create_window(title, width, height, [flags])
    let v = Rc::clone(&video);
    module.set(
        "create_window",
        lua.create_function(
            move |_, (title, width, height, flags): (String, i32, i32, Option<i64>)| {
                let window = v.create_window(&title, width, height, flags_from_lua(flags))?;
                Ok(window)
            },
        )?,
    )?;

    // sdl.create_renderer(window, [driver])
    let v = Rc::clone(&video);
    module.set(
        "create_renderer",
        lua.create_function(
            move |_, (window, driver): (UserDataRef<WindowHandle<B>>, Option<String>)| {
                let renderer = v.create_renderer(&window, driver.as_deref())?;
                Ok(renderer)
            },
        )?,
    )?;

    // sdl.create_window_and_renderer(title, width, height, [flags], [driver])
    let v = Rc::clone(&video);
    module.set(
        "create_window_and_renderer",
        lua.create_function(
            move |_,
                  (title, width, height, flags, driver): (
                String,
                i32,
                i32,
                Option<i64>,
                Option<String>,
            )| {
                let pair = v.create_window_and_renderer(
                    &title,
                    width,
                    height,
                    flags_from_lua(flags),
                    driver.as_deref(),
                )?;
                Ok(pair)
            },
        )?,
    )?;

    // sdl.poll_events() -> { event, ... }
    let v = Rc::clone(&video);
    module.set(
        "poll_events",
        lua.create_function(move |lua, ()| {
            let events = v.poll_events();
            let list = lua.create_table_with_capacity(events.len(), 0)?;
            for event in &events {
                list.push(event_table(lua, event)?)?;
            }
            Ok(list)
        })?,
    )?;

    // sdl.set_render_draw_color(renderer, r, g, b, [a])
    let v = Rc::clone(&video);
    module.set(
        "set_render_draw_color",
        lua.create_function(
            move |_,
                  (renderer, r, g, b, a): (
                UserDataRef<RendererHandle<B>>,
                i64,
                i64,
                i64,
                Option<i64>,
            )| {
                v.set_render_draw_color(&renderer, r, g, b, a.unwrap_or(255))?;
                Ok(())
            },
        )?,
    )?;

    // sdl.render_clear(renderer)
    let v = Rc::clone(&video);
    module.set(
        "render_clear",
        lua.create_function(move |_, renderer: UserDataRef<RendererHandle<B>>| {
            v.render_clear(&renderer)?;
            Ok(())
        })?,
    )?;

    // sdl.render_present(renderer)
    let v = Rc::clone(&video);
    module.set(
        "render_present",
        lua.create_function(move |_, renderer: UserDataRef<RendererHandle<B>>| {
            v.render_present(&renderer)?;
            Ok(())
        })?,
    )?;

    // sdl.log(level, message)
    module.set(
        "log",
        lua.create_function(|_, (level, msg): (String, String)| {
            match level.as_str() {
                "error" => tracing::error!(target: "script", "{}", msg),
                "warn" => tracing::warn!(target: "script", "{}", msg),
                "debug" => tracing::debug!(target: "script", "{}", msg),
                "trace" => tracing::trace!(target: "script", "{}", msg),
                _ => tracing::info!(target: "script", "{}", msg),
            }
            Ok(())
        })?,
    )?;

    Ok(())
}

/// 负数也按位透传
fn flags_from_lua(flags: Option<i64>) -> WindowFlags {
    WindowFlags::from_bits(flags.unwrap_or(0) as u64)
}

fn register_constants(module: &Table) -> mlua::Result<()> {
    // 窗口标志
    module.set("WINDOW_FULLSCREEN", WindowFlags::FULLSCREEN.bits())?;
    module.set("WINDOW_RESIZABLE", WindowFlags::RESIZABLE.bits())?;
    module.set("WINDOW_HIDDEN", WindowFlags::HIDDEN.bits())?;
    module.set("WINDOW_BORDERLESS", WindowFlags::BORDERLESS.bits())?;

    // 事件类型
    for event_type in EventType::ALL {
        module.set(event_type.name(), event_type.raw())?;
    }

    // 键码
    module.set("KEY_SPACE", keycode::SPACE)?;
    module.set("KEY_RETURN", keycode::RETURN)?;
    module.set("KEY_ESCAPE", keycode::ESCAPE)?;
    module.set("KEY_A", keycode::A)?;
    module.set("KEY_B", keycode::B)?;

    // 鼠标按键
    module.set("BUTTON_LEFT", mouse_button::LEFT)?;
    module.set("BUTTON_RIGHT", mouse_button::RIGHT)?;
    module.set("BUTTON_MIDDLE", mouse_button::MIDDLE)?;

    Ok(())
}

/// 把事件转换为以字段名为键的表，所有表都带 `type`
pub fn event_table(lua: &Lua, event: &Event) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    table.set("type", event.event_type().raw())?;

    match event {
        Event::Quit => {}
        Event::WindowClose { window_id } => {
            table.set("window_id", *window_id)?;
        }
        Event::KeyDown(key) | Event::KeyUp(key) => {
            table.set("scancode", key.scancode)?;
            table.set("scancode_name", key.scancode_name.as_str())?;
            table.set("keycode", key.keycode)?;
            table.set("key_name", key.key_name.as_str())?;
            table.set("is_repeat", key.is_repeat)?;
            table.set("window_id", key.window_id)?;
        }
        Event::MouseButtonDown(button) | Event::MouseButtonUp(button) => {
            table.set("button", button.button)?;
            table.set("clicks", button.clicks)?;
            table.set("x", button.x)?;
            table.set("y", button.y)?;
            table.set("window_id", button.window_id)?;
        }
        Event::MouseMotion(motion) => {
            table.set("x", motion.x)?;
            table.set("y", motion.y)?;
            table.set("xrel", motion.xrel)?;
            table.set("yrel", motion.yrel)?;
            table.set("window_id", motion.window_id)?;
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessBackend, Operation};
    use crate::platform::NativeEvent;
    use crate::video::MouseMotionEvent;

    fn setup() -> (Lua, Rc<Video<HeadlessBackend>>) {
        let lua = Lua::new();
        let video = Rc::new(Video::new(HeadlessBackend::new()));
        preload(&lua, Rc::clone(&video)).unwrap();
        lua.load("sdl = require('sdl')").exec().unwrap();
        (lua, video)
    }

    #[test]
    fn test_constants() {
        let (lua, _video) = setup();
        let (quit, close, esc, left, resizable): (u32, u32, u32, u8, u64) = lua
            .load(
                "return sdl.QUIT, sdl.WINDOW_CLOSE, sdl.KEY_ESCAPE, sdl.BUTTON_LEFT, sdl.WINDOW_RESIZABLE",
            )
            .eval()
            .unwrap();
        assert_eq!(quit, 0x100);
        assert_eq!(close, 0x210);
        assert_eq!(esc, keycode::ESCAPE);
        assert_eq!(left, 1);
        assert_eq!(resizable, 0x20);
    }

    #[test]
    fn test_window_lifecycle_from_lua() {
        let (lua, video) = setup();
        let (first, second): (bool, bool) = lua
            .load(
                r#"
                sdl.init()
                local w = sdl.create_window("lua", 320, 200, sdl.WINDOW_HIDDEN)
                assert(w:is_valid())
                assert(type(w.windowID) == "number")
                assert(w.unknown_property == nil)
                return w:destroy(), w:destroy()
                "#,
            )
            .eval()
            .unwrap();
        assert!(first);
        assert!(!second);
        assert_eq!(video.backend().destroyed_windows().len(), 1);
        assert_eq!(video.backend().windows()[0].flags, WindowFlags::HIDDEN);
    }

    #[test]
    fn test_destroyed_property_error() {
        let (lua, _video) = setup();
        let err = lua
            .load(
                r#"
                local w = sdl.create_window("lua", 10, 10)
                w:destroy()
                return w.windowID
                "#,
            )
            .exec()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("Attempt to access property 'windowID' on destroyed window"));
    }

    #[test]
    fn test_native_error_raised() {
        let (lua, video) = setup();
        video
            .backend()
            .fail(Operation::CreateWindow, "No available video device");
        let message: String = lua
            .load(
                r#"
                local ok, err = pcall(sdl.create_window, "x", 1, 1)
                assert(not ok)
                return tostring(err)
                "#,
            )
            .eval()
            .unwrap();
        assert!(message.contains("Failed to create window: No available video device"));
    }

    #[test]
    fn test_draw_color_from_lua() {
        let (lua, video) = setup();
        lua.load(
            r#"
            local w, r = sdl.create_window_and_renderer("c", 10, 10)
            sdl.set_render_draw_color(r, -10, 300, 128, 500)
            sdl.set_render_draw_color(r, 1, 2, 3)
            sdl.render_clear(r)
            sdl.render_present(r)
            assert(r.name == "software")
            "#,
        )
        .exec()
        .unwrap();

        let colors = video.backend().draw_colors();
        assert_eq!(colors.len(), 2);
        assert_eq!(
            (colors[0].r, colors[0].g, colors[0].b, colors[0].a),
            (0, 255, 128, 255)
        );
        assert_eq!(colors[1].a, 255);
        assert_eq!(video.backend().clear_calls(), 1);
        assert_eq!(video.backend().present_calls(), 1);
    }

    #[test]
    fn test_poll_events_table() {
        let (lua, video) = setup();
        let backend = video.backend();
        for code in [keycode::A, keycode::B, keycode::SPACE] {
            backend.push_event(NativeEvent::Keyboard {
                down: true,
                scancode: 4,
                keycode: code,
                repeat: false,
                window_id: 2,
            });
            if code == keycode::A {
                backend.push_event(NativeEvent::Unrecognized(0x700));
            }
        }

        let (count, first, third_name): (usize, u32, String) = lua
            .load(
                r#"
                local events = sdl.poll_events()
                assert(events[1].type == sdl.KEY_DOWN)
                assert(events[1].is_repeat == false)
                assert(events[1].scancode_name == "A")
                return #events, events[1].keycode, events[3].key_name
                "#,
            )
            .eval()
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(first, keycode::A);
        assert_eq!(third_name, "Space");

        let empty: usize = lua.load("return #sdl.poll_events()").eval().unwrap();
        assert_eq!(empty, 0);
    }

    #[test]
    fn test_event_table_fields() {
        let lua = Lua::new();
        let event = Event::MouseMotion(MouseMotionEvent {
            x: 1.5,
            y: 2.5,
            xrel: -1.0,
            yrel: 0.0,
            window_id: 4,
        });
        let table = event_table(&lua, &event).unwrap();
        assert_eq!(table.get::<u32>("type").unwrap(), EventType::MouseMotion.raw());
        assert_eq!(table.get::<f32>("xrel").unwrap(), -1.0);
        assert_eq!(table.get::<u32>("window_id").unwrap(), 4);
        assert!(table.get::<Option<u8>>("button").unwrap().is_none());

        let quit = event_table(&lua, &Event::Quit).unwrap();
        assert_eq!(quit.pairs::<String, mlua::Value>().count(), 1);
    }

    #[test]
    fn test_renderer_failure_does_not_leak_window() {
        let (lua, video) = setup();
        video
            .backend()
            .fail(Operation::CreateRenderer, "Couldn't find matching render driver");
        let ok: bool = lua
            .load("return (pcall(sdl.create_window_and_renderer, 'x', 5, 5))")
            .eval()
            .unwrap();
        assert!(!ok);
        assert_eq!(video.backend().windows().len(), 1);
        assert_eq!(video.backend().destroyed_windows().len(), 1);
    }

    #[test]
    fn test_log_levels() {
        let (lua, _video) = setup();
        lua.load(
            r#"
            sdl.log("error", "x")
            sdl.log("warn", "x")
            sdl.log("trace", "x")
            sdl.log("bogus", "x")
            "#,
        )
        .exec()
        .unwrap();

        let (missing_message, bad_level): (bool, bool) = lua
            .load("return (pcall(sdl.log, 'info')), (pcall(sdl.log, {}, 'x'))")
            .eval()
            .unwrap();
        assert!(!missing_message);
        assert!(!bad_level);
    }
}
