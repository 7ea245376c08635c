use std::fmt;
use std::rc::Rc;

use super::PropertyValue;
use crate::core::{BindingError, BindingResult, Resource};
use crate::platform::VideoBackend;

/// 独占一个原生渲染器的句柄
///
/// 与创建它的窗口之间没有所有权关系，各自独立销毁。
pub struct RendererHandle<B: VideoBackend> {
    backend: Rc<B>,
    raw: Option<B::Renderer>,
}

impl<B: VideoBackend> RendererHandle<B> {
    pub(crate) fn new(backend: Rc<B>, raw: B::Renderer) -> Self {
        Self {
            backend,
            raw: Some(raw),
        }
    }

    pub fn raw(&self) -> BindingResult<B::Renderer> {
        self.raw.ok_or(BindingError::Destroyed(Resource::Renderer))
    }

    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// 渲染驱动名称
    pub fn name(&self) -> BindingResult<String> {
        let raw = self.raw()?;
        self.backend
            .renderer_name(raw)
            .map_err(BindingError::RendererName)
    }

    pub fn property(&self, name: &str) -> BindingResult<Option<PropertyValue>> {
        if self.raw.is_none() {
            return Err(BindingError::DestroyedProperty {
                resource: Resource::Renderer,
                property: name.to_string(),
            });
        }

        match name {
            "name" => Ok(Some(PropertyValue::String(self.name()?))),
            _ => Ok(None),
        }
    }

    pub fn destroy(&mut self) -> bool {
        match self.raw.take() {
            Some(raw) => {
                tracing::debug!(target: "sdl", renderer = ?raw, "Destroying renderer");
                self.backend.destroy_renderer(raw);
                true
            }
            None => false,
        }
    }
}

impl<B: VideoBackend> Drop for RendererHandle<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<B: VideoBackend> fmt::Debug for RendererHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "Renderer({:?})", raw),
            None => write!(f, "Renderer(destroyed)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessBackend;
    use crate::video::WindowFlags;

    fn renderer(backend: &Rc<HeadlessBackend>) -> RendererHandle<HeadlessBackend> {
        let window = backend.create_window("r", 32, 32, WindowFlags::NONE).unwrap();
        let raw = backend.create_renderer(window, None).unwrap();
        RendererHandle::new(Rc::clone(backend), raw)
    }

    #[test]
    fn test_name_property() {
        let backend = Rc::new(HeadlessBackend::new());
        let handle = renderer(&backend);
        assert_eq!(
            handle.property("name").unwrap(),
            Some(PropertyValue::String("software".to_string()))
        );
        assert_eq!(handle.property("vsync").unwrap(), None);
    }

    #[test]
    fn test_destroy_then_access() {
        let backend = Rc::new(HeadlessBackend::new());
        let mut handle = renderer(&backend);
        assert!(handle.destroy());
        assert!(!handle.destroy());
        assert_eq!(backend.destroyed_renderers().len(), 1);
        assert_eq!(
            handle.property("name").unwrap_err().to_string(),
            "Attempt to access property 'name' on destroyed renderer"
        );
        assert_eq!(format!("{:?}", handle), "Renderer(destroyed)");
    }

    #[test]
    fn test_independent_of_window() {
        let backend = Rc::new(HeadlessBackend::new());
        let handle = renderer(&backend);
        drop(handle);
        assert_eq!(backend.destroyed_renderers().len(), 1);
        assert!(backend.destroyed_windows().is_empty());
    }
}
