//! SDL3 后端 (sdl3-sys)

use std::ffi::{c_char, CStr, CString};
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicBool, Ordering};

use sdl3_sys::error::SDL_GetError;
use sdl3_sys::events::{SDL_Event, SDL_PollEvent};
use sdl3_sys::init::{SDL_Init, SDL_INIT_VIDEO};
use sdl3_sys::keyboard::{SDL_GetKeyName, SDL_GetScancodeName};
use sdl3_sys::keycode::SDL_Keycode;
use sdl3_sys::render::{
    SDL_CreateRenderer, SDL_DestroyRenderer, SDL_GetNumRenderDrivers, SDL_GetRenderDriver,
    SDL_GetRendererName, SDL_RenderClear, SDL_RenderPresent, SDL_Renderer,
    SDL_SetRenderDrawColor,
};
use sdl3_sys::scancode::SDL_Scancode;
use sdl3_sys::version::{SDL_GetVersion, SDL_VERSION};
use sdl3_sys::video::{
    SDL_CreateWindow, SDL_DestroyWindow, SDL_GetWindowID, SDL_Window, SDL_WindowFlags,
};

use super::{Color, NativeEvent, Version, VideoBackend};
use crate::core::{NativeError, NativeResult};
use crate::video::{EventType, WindowFlags};

/// 进程内是否已成功调用过 `SDL_Init(SDL_INIT_VIDEO)`
static VIDEO_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// 直接调用 SDL3 C API 的后端
///
/// SDL 的视频子系统是进程级全局状态，本类型不持有任何数据。
#[derive(Debug, Default, Clone, Copy)]
pub struct SdlBackend;

impl SdlBackend {
    pub fn new() -> Self {
        Self
    }

    /// 读取 `SDL_GetError()`
    fn last_error() -> NativeError {
        // SAFETY: SDL_GetError 总是返回有效的以 NUL 结尾的字符串（可能为空）
        let message = unsafe { owned_string(SDL_GetError()) };
        NativeError(message.unwrap_or_default())
    }

    fn check(ok: bool) -> NativeResult<()> {
        if ok {
            Ok(())
        } else {
            Err(Self::last_error())
        }
    }
}

/// 把 SDL 返回的 C 字符串复制为 `String`，空指针返回 `None`
///
/// # Safety
/// `raw` 必须为空或指向有效的以 NUL 结尾的字符串。
unsafe fn owned_string(raw: *const c_char) -> Option<String> {
    if raw.is_null() {
        None
    } else {
        Some(CStr::from_ptr(raw).to_string_lossy().into_owned())
    }
}

fn c_string(value: &str, what: &str) -> NativeResult<CString> {
    CString::new(value)
        .map_err(|_| NativeError(format!("{} contains an interior NUL byte", what)))
}

impl VideoBackend for SdlBackend {
    type Window = NonNull<SDL_Window>;
    type Renderer = NonNull<SDL_Renderer>;

    fn init(&self) -> NativeResult<bool> {
        if VIDEO_INITIALIZED.load(Ordering::Acquire) {
            return Ok(false);
        }
        Self::check(unsafe { SDL_Init(SDL_INIT_VIDEO) })?;
        VIDEO_INITIALIZED.store(true, Ordering::Release);
        Ok(true)
    }

    fn compiled_version(&self) -> Version {
        Version::from_number(SDL_VERSION as u32)
    }

    fn linked_version(&self) -> Version {
        Version::from_number(unsafe { SDL_GetVersion() } as u32)
    }

    fn render_drivers(&self) -> Vec<String> {
        let count = unsafe { SDL_GetNumRenderDrivers() };
        (0..count)
            .filter_map(|index| unsafe { owned_string(SDL_GetRenderDriver(index)) })
            .collect()
    }

    fn create_window(
        &self,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> NativeResult<Self::Window> {
        let title = c_string(title, "Window title")?;
        let raw = unsafe {
            SDL_CreateWindow(title.as_ptr(), width, height, flags.bits() as SDL_WindowFlags)
        };
        NonNull::new(raw).ok_or_else(Self::last_error)
    }

    fn window_id(&self, window: Self::Window) -> NativeResult<u32> {
        match unsafe { SDL_GetWindowID(window.as_ptr()) } {
            0 => Err(Self::last_error()),
            id => Ok(id),
        }
    }

    fn destroy_window(&self, window: Self::Window) {
        unsafe { SDL_DestroyWindow(window.as_ptr()) }
    }

    fn create_renderer(
        &self,
        window: Self::Window,
        driver: Option<&str>,
    ) -> NativeResult<Self::Renderer> {
        let driver = driver.map(|name| c_string(name, "Render driver name")).transpose()?;
        let name_ptr = driver.as_ref().map_or(ptr::null(), |name| name.as_ptr());
        let raw = unsafe { SDL_CreateRenderer(window.as_ptr(), name_ptr) };
        NonNull::new(raw).ok_or_else(Self::last_error)
    }

    fn renderer_name(&self, renderer: Self::Renderer) -> NativeResult<String> {
        unsafe { owned_string(SDL_GetRendererName(renderer.as_ptr())) }
            .ok_or_else(Self::last_error)
    }

    fn destroy_renderer(&self, renderer: Self::Renderer) {
        unsafe { SDL_DestroyRenderer(renderer.as_ptr()) }
    }

    fn set_draw_color(&self, renderer: Self::Renderer, color: Color) -> NativeResult<()> {
        Self::check(unsafe {
            SDL_SetRenderDrawColor(renderer.as_ptr(), color.r, color.g, color.b, color.a)
        })
    }

    fn clear(&self, renderer: Self::Renderer) -> NativeResult<()> {
        Self::check(unsafe { SDL_RenderClear(renderer.as_ptr()) })
    }

    fn present(&self, renderer: Self::Renderer) -> NativeResult<()> {
        Self::check(unsafe { SDL_RenderPresent(renderer.as_ptr()) })
    }

    fn poll_event(&self) -> Option<NativeEvent> {
        let mut event = MaybeUninit::<SDL_Event>::uninit();
        if !unsafe { SDL_PollEvent(event.as_mut_ptr()) } {
            return None;
        }
        // SAFETY: SDL_PollEvent 返回 true 时已写入完整事件
        let event = unsafe { event.assume_init() };
        Some(unsafe { translate(&event) })
    }

    fn scancode_name(&self, scancode: i32) -> Option<String> {
        unsafe { owned_string(SDL_GetScancodeName(SDL_Scancode(scancode))) }
    }

    fn key_name(&self, keycode: u32) -> Option<String> {
        unsafe { owned_string(SDL_GetKeyName(keycode as SDL_Keycode)) }
    }
}

/// 按类型码读取联合体中对应的成员
///
/// # Safety
/// `event` 必须是 SDL 填充过的事件。
unsafe fn translate(event: &SDL_Event) -> NativeEvent {
    let raw_type = event.r#type;
    let Some(event_type) = EventType::from_raw(raw_type) else {
        return NativeEvent::Unrecognized(raw_type);
    };

    match event_type {
        EventType::Quit => NativeEvent::Quit,
        EventType::WindowClose => NativeEvent::WindowCloseRequested {
            window_id: event.window.windowID,
        },
        EventType::KeyDown | EventType::KeyUp => {
            let key = &event.key;
            NativeEvent::Keyboard {
                down: event_type == EventType::KeyDown,
                scancode: key.scancode.0,
                keycode: key.key,
                repeat: key.repeat,
                window_id: key.windowID,
            }
        }
        EventType::MouseButtonDown | EventType::MouseButtonUp => {
            let button = &event.button;
            NativeEvent::MouseButton {
                down: event_type == EventType::MouseButtonDown,
                button: button.button,
                clicks: button.clicks,
                x: button.x,
                y: button.y,
                window_id: button.windowID,
            }
        }
        EventType::MouseMotion => {
            let motion = &event.motion;
            NativeEvent::MouseMotion {
                x: motion.x,
                y: motion.y,
                xrel: motion.xrel,
                yrel: motion.yrel,
                window_id: motion.windowID,
            }
        }
    }
}
