use std::error::Error;
use std::rc::Rc;

use mlua::{Lua, Table};
use sdl_lua::config::BindingConfig;
use sdl_lua::core::init_logging;
use sdl_lua::platform::{HeadlessBackend, NativeEvent, SdlBackend, VideoBackend};
use sdl_lua::scripting;
use sdl_lua::Video;

const DEMO_SCRIPT: &str = include_str!("../demos/window.lua");

const USAGE: &str = "usage: sdl-lua [--headless] [--write-config <path>] [script.lua]";

fn main() {
    if let Err(e) = run() {
        eprintln!("sdl-lua failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut headless = false;
    let mut script_path = None;
    let mut write_config = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headless" => headless = true,
            "--write-config" => match args.next() {
                Some(path) => write_config = Some(path),
                None => return Err(USAGE.into()),
            },
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => script_path = Some(arg),
        }
    }

    let mut config = BindingConfig::load_or_default();
    config.apply_env_overrides();
    init_logging(&config.logging);
    config.validate()?;

    if let Some(path) = write_config {
        config.save_toml(&path)?;
        tracing::info!(target: "demo", "Wrote effective configuration to {}", path);
        return Ok(());
    }

    let (name, source) = match script_path {
        Some(path) => {
            let source = std::fs::read_to_string(&path)?;
            (path, source)
        }
        None => ("demos/window.lua".to_string(), DEMO_SCRIPT.to_string()),
    };

    if headless {
        let backend = HeadlessBackend::new();
        // 无显示设备时只跑一帧
        backend.push_event(NativeEvent::Quit);
        run_script(Rc::new(Video::new(backend)), &config, &name, &source)
    } else {
        run_script(Rc::new(Video::new(SdlBackend::new())), &config, &name, &source)
    }
}

fn run_script<B: VideoBackend + 'static>(
    video: Rc<Video<B>>,
    config: &BindingConfig,
    name: &str,
    source: &str,
) -> Result<(), Box<dyn Error>> {
    let lua = Lua::new();
    scripting::preload(&lua, video)?;
    lua.globals().set("config", config_table(&lua, config)?)?;

    tracing::info!(target: "demo", "Running {}", name);
    let frames: Option<u64> = lua.load(source).set_name(name).eval()?;
    if let Some(frames) = frames {
        tracing::info!(target: "demo", "Rendered {} frames", frames);
    }
    Ok(())
}

fn config_table(lua: &Lua, config: &BindingConfig) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    table.set("title", config.window.title.as_str())?;
    table.set("width", config.window.width)?;
    table.set("height", config.window.height)?;
    table.set("flags", config.window.flags().bits())?;
    table.set("driver", config.renderer.driver.as_deref())?;
    table.set("clear_color", config.renderer.clear_color.to_vec())?;
    Ok(table)
}
