//! 窗口、渲染器与事件轮询
//!
//! [`Video`] 把调用参数翻译为后端调用并把结果与错误带回来；
//! 句柄类型负责原生资源的生命周期。

pub mod events;
pub mod flags;
pub mod renderer;
pub mod window;

pub use events::{
    Event, EventType, KeyboardEvent, MouseButtonEvent, MouseMotionEvent, UNKNOWN_NAME,
};
pub use flags::{keycode, mouse_button, WindowFlags};
pub use renderer::RendererHandle;
pub use window::WindowHandle;

use std::cell::Cell;
use std::rc::Rc;

use crate::core::{BindingError, BindingResult};
use crate::platform::{Color, VideoBackend};

/// 句柄属性值
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    String(String),
}

/// 把一个颜色通道夹紧到 [0, 255]
pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// 绑定层的调用入口
pub struct Video<B: VideoBackend> {
    backend: Rc<B>,
    initialized: Cell<bool>,
}

impl<B: VideoBackend> Video<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
            initialized: Cell::new(false),
        }
    }

    /// 与其他 `Video` 共用同一个后端，初始化状态随后端共享
    pub fn from_shared(backend: Rc<B>) -> Self {
        Self {
            backend,
            initialized: Cell::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// 初始化视频子系统
    ///
    /// 原生初始化由后端保证只执行一次 (SDL 后端按进程计)，
    /// 版本与驱动信息只在真正初始化时打印。
    pub fn init(&self) -> BindingResult<()> {
        if self.initialized.get() {
            tracing::debug!(target: "sdl", "Video subsystem already initialized");
            return Ok(());
        }

        let fresh = self.backend.init().map_err(BindingError::Init)?;
        self.initialized.set(true);
        if !fresh {
            tracing::debug!(target: "sdl", "Video subsystem already initialized");
            return Ok(());
        }

        tracing::info!(
            target: "sdl",
            "We compiled against SDL version {} ...",
            self.backend.compiled_version()
        );
        tracing::info!(
            target: "sdl",
            "But we are linking against SDL version {}.",
            self.backend.linked_version()
        );

        let drivers = self.backend.render_drivers();
        tracing::info!(target: "sdl", "Available render drivers: {}", drivers.len());
        for (index, name) in drivers.iter().enumerate() {
            tracing::info!(target: "sdl", "  {}: {}", index, name);
        }
        Ok(())
    }

    pub fn create_window(
        &self,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> BindingResult<WindowHandle<B>> {
        if flags.unrecognized_bits() != 0 {
            tracing::trace!(
                target: "sdl",
                bits = flags.unrecognized_bits(),
                "Passing through unrecognized window flags"
            );
        }

        let raw = self
            .backend
            .create_window(title, width, height, flags)
            .map_err(BindingError::WindowCreation)?;
        tracing::debug!(
            target: "sdl",
            window = ?raw,
            title,
            width,
            height,
            fullscreen = flags.contains(WindowFlags::FULLSCREEN),
            "Window created"
        );
        Ok(WindowHandle::new(Rc::clone(&self.backend), raw))
    }

    /// `driver` 作为创建参数直接传给原生调用，不修改任何全局提示
    pub fn create_renderer(
        &self,
        window: &WindowHandle<B>,
        driver: Option<&str>,
    ) -> BindingResult<RendererHandle<B>> {
        let window = window.raw()?;
        let raw = self
            .backend
            .create_renderer(window, driver)
            .map_err(BindingError::RendererCreation)?;
        tracing::debug!(target: "sdl", renderer = ?raw, driver, "Renderer created");
        Ok(RendererHandle::new(Rc::clone(&self.backend), raw))
    }

    /// 同时创建窗口与渲染器；渲染器失败时先销毁窗口再报告错误
    pub fn create_window_and_renderer(
        &self,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
        driver: Option<&str>,
    ) -> BindingResult<(WindowHandle<B>, RendererHandle<B>)> {
        let mut window = self.create_window(title, width, height, flags)?;
        match self.create_renderer(&window, driver) {
            Ok(renderer) => Ok((window, renderer)),
            Err(err) => {
                window.destroy();
                tracing::warn!(target: "sdl", "{}", err);
                Err(err)
            }
        }
    }

    /// 清空原生事件队列
    pub fn poll_events(&self) -> Vec<Event> {
        events::drain(self.backend.as_ref())
    }

    /// 各通道独立夹紧后设置绘制颜色，返回实际转发的颜色
    pub fn set_render_draw_color(
        &self,
        renderer: &RendererHandle<B>,
        r: i64,
        g: i64,
        b: i64,
        a: i64,
    ) -> BindingResult<Color> {
        let raw = renderer.raw()?;
        let color = Color::rgba(
            clamp_channel(r),
            clamp_channel(g),
            clamp_channel(b),
            clamp_channel(a),
        );
        self.backend
            .set_draw_color(raw, color)
            .map_err(BindingError::DrawColor)?;
        Ok(color)
    }

    pub fn render_clear(&self, renderer: &RendererHandle<B>) -> BindingResult<()> {
        let raw = renderer.raw()?;
        self.backend.clear(raw).map_err(BindingError::Clear)
    }

    /// 呈现不报告原生失败，只检查句柄是否仍然有效
    pub fn render_present(&self, renderer: &RendererHandle<B>) -> BindingResult<()> {
        let raw = renderer.raw()?;
        if let Err(err) = self.backend.present(raw) {
            tracing::debug!(target: "sdl", "SDL_RenderPresent reported: {}", err);
        }
        Ok(())
    }
}
