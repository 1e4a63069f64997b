/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or the
/// user config directory. Falls back to sensible defaults if the file is
/// missing or incomplete. Physics constants are compiled in and not
/// configurable here.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Narrower than this and the HUD plus marquee no longer fit.
const MIN_SCENE_WIDTH: usize = 16;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Level file name; empty selects the embedded strip.
    pub level_file: String,
    /// Visible window width, in tiles.
    pub scene_width: usize,
    /// Frame scheduler rate.
    pub fps: u32,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub descend: Vec<String>,
    pub restart: Vec<String>,
    pub start: Vec<String>,
}

impl GameConfig {
    /// Sleep budget for one frame at the configured rate.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(1000 / self.fps.max(1) as u64)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_level_file")]
    level_file: String,
    #[serde(default = "default_scene_width")]
    scene_width: usize,
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_descend")]
    descend: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_start")]
    start: Vec<String>,
}

// ── Defaults ──

fn default_level_file() -> String { String::new() }
fn default_scene_width() -> usize { 60 }
fn default_fps() -> u32 { 60 }

fn default_jump() -> Vec<String> { vec!["A".into(), "X".into()] }
fn default_descend() -> Vec<String> { vec!["B".into(), "Y".into()] }
fn default_restart() -> Vec<String> { vec!["Select".into()] }
fn default_start() -> Vec<String> { vec!["Start".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            level_file: default_level_file(),
            scene_width: default_scene_width(),
            fps: default_fps(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump(),
            descend: default_descend(),
            restart: default_restart(),
            start: default_start(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) user config directory. Missing file or missing keys fall back
    /// to defaults; out-of-range numbers are clamped.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            level_file: toml_cfg.general.level_file,
            scene_width: toml_cfg.general.scene_width.max(MIN_SCENE_WIDTH),
            fps: toml_cfg.general.fps.clamp(30, 120),
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                descend: toml_cfg.gamepad.descend,
                restart: toml_cfg.gamepad.restart,
                start: toml_cfg.gamepad.start,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + config home.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a packaged binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG config home (~/.config/pipeline-panic)
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")));
    if let Ok(base) = config_home {
        let dir = base.join("pipeline-panic");
        if dir.is_dir() && !dirs.iter().any(|d| d == &dir) {
            dirs.push(dir);
        }
    }

    // 4. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
