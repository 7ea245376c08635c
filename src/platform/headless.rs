//! 无显示设备的记录型后端
//!
//! 每次创建都分配新的 id，记录所有销毁与绘制调用，事件由调用方注入。
//! 可以让指定操作失败，以验证绑定层的错误路径。

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use sdl3_sys::scancode::{
    SDL_SCANCODE_A, SDL_SCANCODE_B, SDL_SCANCODE_ESCAPE, SDL_SCANCODE_RETURN, SDL_SCANCODE_SPACE,
};

use super::{Color, NativeEvent, Version, VideoBackend};
use crate::core::{NativeError, NativeResult};
use crate::video::{keycode, WindowFlags};

/// 可注入失败的原生操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    CreateWindow,
    WindowId,
    CreateRenderer,
    RendererName,
    SetDrawColor,
    Clear,
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessWindow(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessRenderer(pub u32);

/// 一次窗口创建的参数
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    pub id: u32,
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub flags: WindowFlags,
}

/// 一次渲染器创建的参数
#[derive(Debug, Clone, PartialEq)]
pub struct RendererRecord {
    pub id: u32,
    pub window: u32,
    pub driver: Option<String>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u32,
    initialized: bool,
    init_calls: usize,
    windows: Vec<WindowRecord>,
    renderers: Vec<RendererRecord>,
    destroyed_windows: Vec<u32>,
    destroyed_renderers: Vec<u32>,
    draw_colors: Vec<(u32, Color)>,
    clears: usize,
    presents: usize,
    queue: VecDeque<NativeEvent>,
    failures: HashMap<Operation, String>,
}

impl HeadlessState {
    fn mint_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, op: Operation) -> NativeResult<()> {
        match self.failures.get(&op) {
            Some(message) => Err(NativeError(message.clone())),
            None => Ok(()),
        }
    }
}

/// 无显示设备的 [`VideoBackend`]
#[derive(Debug)]
pub struct HeadlessBackend {
    state: RefCell<HeadlessState>,
    drivers: Vec<String>,
    version: Version,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(HeadlessState::default()),
            drivers: vec!["software".to_string()],
            version: Version::new(3, 2, 0),
        }
    }

    pub fn with_drivers<I, S>(mut self, drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drivers = drivers.into_iter().map(Into::into).collect();
        self
    }

    /// 让指定操作以给定信息失败，直到 [`Self::recover`]
    pub fn fail(&self, op: Operation, message: impl Into<String>) {
        self.state.borrow_mut().failures.insert(op, message.into());
    }

    pub fn recover(&self, op: Operation) {
        self.state.borrow_mut().failures.remove(&op);
    }

    /// 向原生事件队列尾部追加一条事件
    pub fn push_event(&self, event: NativeEvent) {
        self.state.borrow_mut().queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// 实际执行的初始化次数
    pub fn init_calls(&self) -> usize {
        self.state.borrow().init_calls
    }

    pub fn windows(&self) -> Vec<WindowRecord> {
        self.state.borrow().windows.clone()
    }

    pub fn renderers(&self) -> Vec<RendererRecord> {
        self.state.borrow().renderers.clone()
    }

    pub fn destroyed_windows(&self) -> Vec<u32> {
        self.state.borrow().destroyed_windows.clone()
    }

    pub fn destroyed_renderers(&self) -> Vec<u32> {
        self.state.borrow().destroyed_renderers.clone()
    }

    /// 尚未销毁的窗口数
    pub fn live_windows(&self) -> usize {
        let state = self.state.borrow();
        state
            .windows
            .iter()
            .filter(|w| !state.destroyed_windows.contains(&w.id))
            .count()
    }

    pub fn draw_colors(&self) -> Vec<Color> {
        self.state
            .borrow()
            .draw_colors
            .iter()
            .map(|(_, color)| *color)
            .collect()
    }

    pub fn clear_calls(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn present_calls(&self) -> usize {
        self.state.borrow().presents
    }
}

impl VideoBackend for HeadlessBackend {
    type Window = HeadlessWindow;
    type Renderer = HeadlessRenderer;

    fn init(&self) -> NativeResult<bool> {
        let mut state = self.state.borrow_mut();
        if state.initialized {
            return Ok(false);
        }
        state.check(Operation::Init)?;
        state.initialized = true;
        state.init_calls += 1;
        Ok(true)
    }

    fn compiled_version(&self) -> Version {
        self.version
    }

    fn linked_version(&self) -> Version {
        self.version
    }

    fn render_drivers(&self) -> Vec<String> {
        self.drivers.clone()
    }

    fn create_window(
        &self,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> NativeResult<Self::Window> {
        let mut state = self.state.borrow_mut();
        state.check(Operation::CreateWindow)?;
        let id = state.mint_id();
        state.windows.push(WindowRecord {
            id,
            title: title.to_string(),
            width,
            height,
            flags,
        });
        Ok(HeadlessWindow(id))
    }

    fn window_id(&self, window: Self::Window) -> NativeResult<u32> {
        self.state.borrow().check(Operation::WindowId)?;
        Ok(window.0)
    }

    fn destroy_window(&self, window: Self::Window) {
        self.state.borrow_mut().destroyed_windows.push(window.0);
    }

    fn create_renderer(
        &self,
        window: Self::Window,
        driver: Option<&str>,
    ) -> NativeResult<Self::Renderer> {
        let mut state = self.state.borrow_mut();
        state.check(Operation::CreateRenderer)?;
        if let Some(name) = driver {
            if !self.drivers.iter().any(|d| d == name) {
                return Err(NativeError::new("Couldn't find matching render driver"));
            }
        }
        let id = state.mint_id();
        state.renderers.push(RendererRecord {
            id,
            window: window.0,
            driver: driver.map(str::to_string),
        });
        Ok(HeadlessRenderer(id))
    }

    fn renderer_name(&self, renderer: Self::Renderer) -> NativeResult<String> {
        let state = self.state.borrow();
        state.check(Operation::RendererName)?;
        let driver = state
            .renderers
            .iter()
            .find(|r| r.id == renderer.0)
            .and_then(|r| r.driver.clone());
        Ok(driver
            .or_else(|| self.drivers.first().cloned())
            .unwrap_or_default())
    }

    fn destroy_renderer(&self, renderer: Self::Renderer) {
        self.state.borrow_mut().destroyed_renderers.push(renderer.0);
    }

    fn set_draw_color(&self, renderer: Self::Renderer, color: Color) -> NativeResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(Operation::SetDrawColor)?;
        state.draw_colors.push((renderer.0, color));
        Ok(())
    }

    fn clear(&self, _renderer: Self::Renderer) -> NativeResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(Operation::Clear)?;
        state.clears += 1;
        Ok(())
    }

    fn present(&self, _renderer: Self::Renderer) -> NativeResult<()> {
        let mut state = self.state.borrow_mut();
        state.presents += 1;
        state.check(Operation::Present)
    }

    fn poll_event(&self) -> Option<NativeEvent> {
        self.state.borrow_mut().queue.pop_front()
    }

    fn scancode_name(&self, scancode: i32) -> Option<String> {
        let name = match scancode {
            c if c == SDL_SCANCODE_A.0 => "A",
            c if c == SDL_SCANCODE_B.0 => "B",
            c if c == SDL_SCANCODE_RETURN.0 => "Return",
            c if c == SDL_SCANCODE_ESCAPE.0 => "Escape",
            c if c == SDL_SCANCODE_SPACE.0 => "Space",
            _ => return None,
        };
        Some(name.to_string())
    }

    fn key_name(&self, code: u32) -> Option<String> {
        let name = match code {
            keycode::A => "A",
            keycode::B => "B",
            keycode::RETURN => "Return",
            keycode::ESCAPE => "Escape",
            keycode::SPACE => "Space",
            _ => return None,
        };
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids() {
        let backend = HeadlessBackend::new();
        let a = backend.create_window("a", 10, 10, WindowFlags::NONE).unwrap();
        let b = backend.create_window("b", 10, 10, WindowFlags::NONE).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live_windows(), 2);

        backend.destroy_window(a);
        assert_eq!(backend.live_windows(), 1);
        assert_eq!(backend.destroyed_windows(), vec![a.0]);
    }

    #[test]
    fn test_failure_injection() {
        let backend = HeadlessBackend::new();
        backend.fail(Operation::CreateWindow, "No video device");
        let err = backend
            .create_window("x", 1, 1, WindowFlags::NONE)
            .unwrap_err();
        assert_eq!(err.message(), "No video device");

        backend.recover(Operation::CreateWindow);
        assert!(backend.create_window("x", 1, 1, WindowFlags::NONE).is_ok());
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let backend = HeadlessBackend::new().with_drivers(["opengl"]);
        let window = backend.create_window("x", 1, 1, WindowFlags::NONE).unwrap();
        assert!(backend.create_renderer(window, Some("vulkan")).is_err());
        let renderer = backend.create_renderer(window, Some("opengl")).unwrap();
        assert_eq!(backend.renderer_name(renderer).unwrap(), "opengl");
    }

    #[test]
    fn test_init_runs_once_per_backend() {
        let backend = HeadlessBackend::new();
        backend.fail(Operation::Init, "No available video device");
        assert!(backend.init().is_err());
        assert_eq!(backend.init_calls(), 0);

        backend.recover(Operation::Init);
        assert!(backend.init().unwrap());
        assert!(!backend.init().unwrap());
        assert_eq!(backend.init_calls(), 1);
    }

    #[test]
    fn test_queue_is_fifo() {
        let backend = HeadlessBackend::new();
        backend.push_event(NativeEvent::Quit);
        backend.push_event(NativeEvent::Unrecognized(0x1234));
        assert_eq!(backend.pending_events(), 2);
        assert_eq!(backend.poll_event(), Some(NativeEvent::Quit));
        assert_eq!(backend.poll_event(), Some(NativeEvent::Unrecognized(0x1234)));
        assert_eq!(backend.poll_event(), None);
    }
}
