//! 事件封送
//!
//! 原生事件先被后端翻译为 [`NativeEvent`]，这里再附加键名查询结果，
//! 得到每种类型只携带自身字段的 [`Event`]。不认识的类型在这里被丢弃。

use sdl3_sys::events::{
    SDL_EVENT_KEY_DOWN, SDL_EVENT_KEY_UP, SDL_EVENT_MOUSE_BUTTON_DOWN, SDL_EVENT_MOUSE_BUTTON_UP,
    SDL_EVENT_MOUSE_MOTION, SDL_EVENT_QUIT, SDL_EVENT_WINDOW_CLOSE_REQUESTED,
};

use crate::platform::{NativeEvent, VideoBackend};

/// 名称查询失败时的占位名
pub const UNKNOWN_NAME: &str = "unknown";

/// 绑定层处理的事件类型，数值即 SDL3 的事件类型码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventType {
    Quit = SDL_EVENT_QUIT.0,
    WindowClose = SDL_EVENT_WINDOW_CLOSE_REQUESTED.0,
    KeyDown = SDL_EVENT_KEY_DOWN.0,
    KeyUp = SDL_EVENT_KEY_UP.0,
    MouseMotion = SDL_EVENT_MOUSE_MOTION.0,
    MouseButtonDown = SDL_EVENT_MOUSE_BUTTON_DOWN.0,
    MouseButtonUp = SDL_EVENT_MOUSE_BUTTON_UP.0,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Quit,
        EventType::WindowClose,
        EventType::KeyDown,
        EventType::KeyUp,
        EventType::MouseButtonDown,
        EventType::MouseButtonUp,
        EventType::MouseMotion,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.raw() == raw)
    }

    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// 脚本侧常量名
    pub const fn name(self) -> &'static str {
        match self {
            EventType::Quit => "QUIT",
            EventType::WindowClose => "WINDOW_CLOSE",
            EventType::KeyDown => "KEY_DOWN",
            EventType::KeyUp => "KEY_UP",
            EventType::MouseButtonDown => "MOUSE_BUTTON_DOWN",
            EventType::MouseButtonUp => "MOUSE_BUTTON_UP",
            EventType::MouseMotion => "MOUSE_MOTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardEvent {
    pub scancode: i32,
    pub scancode_name: String,
    pub keycode: u32,
    pub key_name: String,
    pub is_repeat: bool,
    pub window_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseButtonEvent {
    pub button: u8,
    pub clicks: u8,
    pub x: f32,
    pub y: f32,
    pub window_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseMotionEvent {
    pub x: f32,
    pub y: f32,
    pub xrel: f32,
    pub yrel: f32,
    pub window_id: u32,
}

/// 一次轮询得到的事件
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Quit,
    WindowClose { window_id: u32 },
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    MouseMotion(MouseMotionEvent),
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Quit => EventType::Quit,
            Event::WindowClose { .. } => EventType::WindowClose,
            Event::KeyDown(_) => EventType::KeyDown,
            Event::KeyUp(_) => EventType::KeyUp,
            Event::MouseButtonDown(_) => EventType::MouseButtonDown,
            Event::MouseButtonUp(_) => EventType::MouseButtonUp,
            Event::MouseMotion(_) => EventType::MouseMotion,
        }
    }

    pub fn window_id(&self) -> Option<u32> {
        match self {
            Event::Quit => None,
            Event::WindowClose { window_id } => Some(*window_id),
            Event::KeyDown(key) | Event::KeyUp(key) => Some(key.window_id),
            Event::MouseButtonDown(button) | Event::MouseButtonUp(button) => {
                Some(button.window_id)
            }
            Event::MouseMotion(motion) => Some(motion.window_id),
        }
    }
}

fn name_or_unknown(name: Option<String>) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// 把一条原生事件封送为 [`Event`]，不认识的类型返回 `None`
pub fn marshal<B: VideoBackend>(backend: &B, native: NativeEvent) -> Option<Event> {
    let event = match native {
        NativeEvent::Quit => Event::Quit,
        NativeEvent::WindowCloseRequested { window_id } => Event::WindowClose { window_id },
        NativeEvent::Keyboard {
            down,
            scancode,
            keycode,
            repeat,
            window_id,
        } => {
            let key = KeyboardEvent {
                scancode,
                scancode_name: name_or_unknown(backend.scancode_name(scancode)),
                keycode,
                key_name: name_or_unknown(backend.key_name(keycode)),
                is_repeat: repeat,
                window_id,
            };
            if down {
                Event::KeyDown(key)
            } else {
                Event::KeyUp(key)
            }
        }
        NativeEvent::MouseButton {
            down,
            button,
            clicks,
            x,
            y,
            window_id,
        } => {
            let button = MouseButtonEvent {
                button,
                clicks,
                x,
                y,
                window_id,
            };
            if down {
                Event::MouseButtonDown(button)
            } else {
                Event::MouseButtonUp(button)
            }
        }
        NativeEvent::MouseMotion {
            x,
            y,
            xrel,
            yrel,
            window_id,
        } => Event::MouseMotion(MouseMotionEvent {
            x,
            y,
            xrel,
            yrel,
            window_id,
        }),
        NativeEvent::Unrecognized(raw) => {
            tracing::trace!(target: "sdl", event_type = raw, "Dropping unrecognized event");
            return None;
        }
    };
    Some(event)
}

/// 清空原生事件队列，按到达顺序返回已封送的事件
pub fn drain<B: VideoBackend>(backend: &B) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(native) = backend.poll_event() {
        if let Some(event) = marshal(backend, native) {
            tracing::trace!(
                target: "sdl",
                event_type = event.event_type().name(),
                window_id = ?event.window_id(),
                "Event polled"
            );
            events.push(event);
        }
    }
    events
}
