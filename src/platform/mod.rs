//! 原生视频后端抽象
//!
//! [`VideoBackend`] 是绑定层与原生库之间唯一的接缝：
//! - [`sdl::SdlBackend`] 通过 `sdl3-sys` 调用 SDL3
//! - [`headless::HeadlessBackend`] 无显示设备的记录型实现，用于测试与 CI

pub mod headless;
pub mod sdl;

pub use headless::HeadlessBackend;
pub use sdl::SdlBackend;

use crate::core::NativeResult;
use crate::video::WindowFlags;
use std::fmt;

// ============================================================================
// Version
// ============================================================================

/// 原生库版本号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// 解码 SDL_VERSIONNUM 编码 (major * 1000000 + minor * 1000 + micro)
    pub const fn from_number(number: u32) -> Self {
        Self {
            major: number / 1_000_000,
            minor: (number / 1_000) % 1_000,
            micro: number % 1_000,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

// ============================================================================
// Native events
// ============================================================================

/// 从原生队列中取出的一条事件，尚未附加名称查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Quit,
    WindowCloseRequested {
        window_id: u32,
    },
    Keyboard {
        down: bool,
        scancode: i32,
        keycode: u32,
        repeat: bool,
        window_id: u32,
    },
    MouseButton {
        down: bool,
        button: u8,
        clicks: u8,
        x: f32,
        y: f32,
        window_id: u32,
    },
    MouseMotion {
        x: f32,
        y: f32,
        xrel: f32,
        yrel: f32,
        window_id: u32,
    },
    /// 绑定层不处理的事件类型，原始类型码
    Unrecognized(u32),
}

/// RGBA 绘制颜色，各通道已夹紧到 [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

// ============================================================================
// Backend trait
// ============================================================================

/// 视频后端抽象 - 窗口、渲染器与事件队列
///
/// 所有方法都是同步、阻塞的直接调用，只在单线程中使用。
/// 原生句柄类型由实现方决定，必须可复制且不可能为空。
pub trait VideoBackend {
    type Window: Copy + fmt::Debug;
    type Renderer: Copy + fmt::Debug;

    /// 初始化视频子系统
    ///
    /// 子系统已经由同一后端状态初始化过时返回 `Ok(false)`，不会重复初始化。
    fn init(&self) -> NativeResult<bool>;

    /// 编译时链接的头文件版本
    fn compiled_version(&self) -> Version;

    /// 运行时实际链接的库版本
    fn linked_version(&self) -> Version;

    /// 可用渲染驱动名称
    fn render_drivers(&self) -> Vec<String>;

    fn create_window(
        &self,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> NativeResult<Self::Window>;

    fn window_id(&self, window: Self::Window) -> NativeResult<u32>;

    fn destroy_window(&self, window: Self::Window);

    /// `driver` 为 `None` 时由原生库选择默认驱动
    fn create_renderer(
        &self,
        window: Self::Window,
        driver: Option<&str>,
    ) -> NativeResult<Self::Renderer>;

    fn renderer_name(&self, renderer: Self::Renderer) -> NativeResult<String>;

    fn destroy_renderer(&self, renderer: Self::Renderer);

    fn set_draw_color(&self, renderer: Self::Renderer, color: Color) -> NativeResult<()>;

    fn clear(&self, renderer: Self::Renderer) -> NativeResult<()>;

    fn present(&self, renderer: Self::Renderer) -> NativeResult<()>;

    /// 非阻塞地取出一条事件，队列为空时返回 `None`
    fn poll_event(&self) -> Option<NativeEvent>;

    fn scancode_name(&self, scancode: i32) -> Option<String>;

    fn key_name(&self, keycode: u32) -> Option<String>;
}
