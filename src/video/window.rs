use std::fmt;
use std::rc::Rc;

use super::PropertyValue;
use crate::core::{BindingError, BindingResult, Resource};
use crate::platform::VideoBackend;

/// 独占一个原生窗口的句柄
///
/// 销毁是幂等的：第一次 [`destroy`](Self::destroy) 释放原生窗口并清空句柄，
/// 之后的调用什么也不做。句柄被丢弃时自动销毁。
pub struct WindowHandle<B: VideoBackend> {
    backend: Rc<B>,
    raw: Option<B::Window>,
}

impl<B: VideoBackend> WindowHandle<B> {
    pub(crate) fn new(backend: Rc<B>, raw: B::Window) -> Self {
        Self {
            backend,
            raw: Some(raw),
        }
    }

    /// 原生窗口，已销毁时返回错误
    pub fn raw(&self) -> BindingResult<B::Window> {
        self.raw.ok_or(BindingError::Destroyed(Resource::Window))
    }

    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// 原生窗口 id
    pub fn id(&self) -> BindingResult<u32> {
        let raw = self.raw()?;
        self.backend.window_id(raw).map_err(BindingError::WindowId)
    }

    /// 按名称读取属性，未知属性返回 `None`
    pub fn property(&self, name: &str) -> BindingResult<Option<PropertyValue>> {
        let Some(raw) = self.raw else {
            return Err(BindingError::DestroyedProperty {
                resource: Resource::Window,
                property: name.to_string(),
            });
        };

        match name {
            "windowID" => {
                let id = self.backend.window_id(raw).map_err(BindingError::WindowId)?;
                Ok(Some(PropertyValue::Integer(i64::from(id))))
            }
            _ => Ok(None),
        }
    }

    /// 释放原生窗口；返回本次调用是否真正释放了资源
    pub fn destroy(&mut self) -> bool {
        match self.raw.take() {
            Some(raw) => {
                tracing::debug!(target: "sdl", window = ?raw, "Destroying window");
                self.backend.destroy_window(raw);
                true
            }
            None => false,
        }
    }
}

impl<B: VideoBackend> Drop for WindowHandle<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<B: VideoBackend> fmt::Debug for WindowHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "Window({:?})", raw),
            None => write!(f, "Window(destroyed)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessBackend, Operation};
    use crate::video::WindowFlags;

    fn window(backend: &Rc<HeadlessBackend>) -> WindowHandle<HeadlessBackend> {
        let raw = backend
            .create_window("test", 64, 64, WindowFlags::NONE)
            .unwrap();
        WindowHandle::new(Rc::clone(backend), raw)
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let backend = Rc::new(HeadlessBackend::new());
        let mut handle = window(&backend);

        assert!(handle.destroy());
        assert!(!handle.destroy());
        assert!(!handle.is_valid());
        assert_eq!(backend.destroyed_windows().len(), 1);

        drop(handle);
        assert_eq!(backend.destroyed_windows().len(), 1);
    }

    #[test]
    fn test_drop_destroys_once() {
        let backend = Rc::new(HeadlessBackend::new());
        {
            let _handle = window(&backend);
        }
        assert_eq!(backend.destroyed_windows().len(), 1);
        assert_eq!(backend.live_windows(), 0);
    }

    #[test]
    fn test_window_id_property() {
        let backend = Rc::new(HeadlessBackend::new());
        let handle = window(&backend);
        let expected = i64::from(handle.id().unwrap());
        assert_eq!(
            handle.property("windowID").unwrap(),
            Some(PropertyValue::Integer(expected))
        );
        assert_eq!(handle.property("title").unwrap(), None);
    }

    #[test]
    fn test_window_id_native_failure() {
        let backend = Rc::new(HeadlessBackend::new());
        let handle = window(&backend);
        backend.fail(Operation::WindowId, "Invalid window");
        assert_eq!(
            handle.property("windowID").unwrap_err().to_string(),
            "Failed to get windowID: Invalid window"
        );
    }

    #[test]
    fn test_property_on_destroyed_window() {
        let backend = Rc::new(HeadlessBackend::new());
        let mut handle = window(&backend);
        handle.destroy();

        // 即使原生调用会失败，也必须先报告前置条件错误
        backend.fail(Operation::WindowId, "must not be reached");
        let err = handle.property("windowID").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attempt to access property 'windowID' on destroyed window"
        );
        assert!(matches!(
            handle.id(),
            Err(BindingError::Destroyed(Resource::Window))
        ));
    }
}
