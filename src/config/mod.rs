/// 统一配置系统
///
/// 提供TOML/JSON配置文件与环境变量覆盖，供演示程序和宿主程序使用
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::impl_default;
use crate::video::WindowFlags;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingConfig {
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 渲染器配置
    #[serde(default)]
    pub renderer: RendererConfig,
}

impl BindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = lookup("SDL_LUA_WIDTH").and_then(|v| v.parse().ok()) {
            self.window.width = width;
        }
        if let Some(height) = lookup("SDL_LUA_HEIGHT").and_then(|v| v.parse().ok()) {
            self.window.height = height;
        }
        if let Some(driver) = lookup("SDL_LUA_RENDER_DRIVER") {
            self.renderer.driver = Some(driver);
        }
        if let Some(level) = lookup("SDL_LUA_LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.window.validate()?;
        self.renderer.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./sdl_lua.toml
    /// 2. ./sdl_lua.json
    /// 3. ~/.config/sdl_lua/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("sdl_lua.toml") {
            tracing::info!(target: "sdl", "Loaded config from sdl_lua.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("sdl_lua.json") {
            tracing::info!(target: "sdl", "Loaded config from sdl_lua.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("sdl_lua")
                .join("config.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "sdl", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::debug!(target: "sdl", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 大小写不敏感地解析级别名
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub fullscreen: bool,
    pub hidden: bool,
    pub borderless: bool,
}

impl_default!(WindowConfig {
    title: "SDL3 Window".to_string(),
    width: 800,
    height: 600,
    resizable: true,
    fullscreen: false,
    hidden: false,
    borderless: false,
});

impl WindowConfig {
    /// 由布尔开关组合出窗口标志
    pub fn flags(&self) -> WindowFlags {
        let mut flags = WindowFlags::NONE;
        if self.fullscreen {
            flags |= WindowFlags::FULLSCREEN;
        }
        if self.resizable {
            flags |= WindowFlags::RESIZABLE;
        }
        if self.hidden {
            flags |= WindowFlags::HIDDEN;
        }
        if self.borderless {
            flags |= WindowFlags::BORDERLESS;
        }
        flags
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(
                "Invalid window size".to_string(),
            ));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(ConfigError::ValidationError(
                "Window size out of range".to_string(),
            ));
        }
        Ok(())
    }
}

/// 渲染器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// 渲染驱动名 (如 "opengl", "vulkan", "software")，为空时由 SDL 选择
    pub driver: Option<String>,
    /// 演示程序的清屏颜色 RGBA
    pub clear_color: [u8; 4],
}

impl_default!(RendererConfig {
    driver: None,
    clear_color: [30, 30, 46, 255],
});

impl RendererConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if matches!(&self.driver, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "Render driver name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
