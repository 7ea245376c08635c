//! 统一错误处理模块
//!
//! 绑定层的所有失败都归结为 [`BindingError`]：
//!
//! - **前置条件错误**: 在已销毁的句柄上访问属性或调用操作，在任何原生调用之前报告
//! - **原生调用错误**: SDL 返回失败，附带 `SDL_GetError()` 的诊断字符串
//!
//! 无法识别的事件类型不是错误，轮询时直接丢弃（见 [`crate::video::events`]）。

use std::fmt;
use thiserror::Error;

/// 原生库报告的最后一条错误信息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct NativeError(pub String);

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// 句柄所包装的原生资源种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Window,
    Renderer,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Window => write!(f, "window"),
            Resource::Renderer => write!(f, "renderer"),
        }
    }
}

/// 绑定层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("Failed to init SDL: {0}")]
    Init(NativeError),

    #[error("Failed to create window: {0}")]
    WindowCreation(NativeError),

    #[error("Failed to create renderer: {0}")]
    RendererCreation(NativeError),

    #[error("Failed to get windowID: {0}")]
    WindowId(NativeError),

    #[error("Failed to get renderer name: {0}")]
    RendererName(NativeError),

    #[error("Failed to set render draw color: {0}")]
    DrawColor(NativeError),

    #[error("Failed to clear renderer: {0}")]
    Clear(NativeError),

    #[error("Attempt to access property '{property}' on destroyed {resource}")]
    DestroyedProperty { resource: Resource, property: String },

    #[error("Invalid SDL {0} (already destroyed)")]
    Destroyed(Resource),
}

impl BindingError {
    /// 是否为前置条件错误（未触及原生库）
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BindingError::DestroyedProperty { .. } | BindingError::Destroyed(_)
        )
    }

    /// 原生诊断信息（如果有）
    pub fn native(&self) -> Option<&NativeError> {
        match self {
            BindingError::Init(e)
            | BindingError::WindowCreation(e)
            | BindingError::RendererCreation(e)
            | BindingError::WindowId(e)
            | BindingError::RendererName(e)
            | BindingError::DrawColor(e)
            | BindingError::Clear(e) => Some(e),
            BindingError::DestroyedProperty { .. } | BindingError::Destroyed(_) => None,
        }
    }
}

impl From<BindingError> for mlua::Error {
    fn from(err: BindingError) -> Self {
        match err.native() {
            Some(native) => {
                tracing::debug!(target: "scripting", native = native.message(), "{}", err)
            }
            None if err.is_precondition() => {
                tracing::debug!(target: "scripting", "Precondition failed: {}", err)
            }
            None => {}
        }
        mlua::Error::external(err)
    }
}

/// 绑定层结果类型别名
pub type BindingResult<T> = Result<T, BindingError>;
pub type NativeResult<T> = Result<T, NativeError>;
