/// Level loader.
///
/// ## File format
/// ```text
/// # Level Name
/// <overworld strip, one glyph per tile>
/// ---
/// <underground strip>
/// ```
///
/// The name line and everything after `---` are optional. Blank lines
/// are skipped. Unknown glyphs read as plain ground, so a damaged file
/// still loads and plays.
///
/// ## Glyph legend
///   '⠤' ground      '⠻' '⠽' worn ground       '_' hole
///   '⠶' pipe        '⠭' '⠯' inverted mouths   '⠥' coin
///   '⚑' flag        '⠿' wall (underground)    'o' enemy spawn
///
/// Level files are looked up in the usual data dirs (exe dir, CWD,
/// XDG data, system); the embedded level covers everything else.

use std::path::PathBuf;

/// Runtime level data (owned strings, loaded from file or embedded).
pub struct Level {
    pub name: String,
    pub overworld: String,
    pub underground: Option<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Find and load `file_name` from the search dirs. A missing file
/// falls through to the embedded level silently; a file that exists
/// but cannot be used reports why first.
pub fn load(file_name: &str) -> Level {
    for dir in search_dirs() {
        let path = dir.join(file_name);
        if !path.is_file() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => match parse_level(&content) {
                Some(level) => return level,
                None => {
                    eprintln!(
                        "level file {} has no strip line, using the built-in level",
                        path.display()
                    );
                    return embedded();
                }
            },
            Err(err) => {
                eprintln!(
                    "could not read {}: {}, using the built-in level",
                    path.display(),
                    err
                );
                return embedded();
            }
        }
    }
    embedded()
}

/// Parse a level from text content. Returns None when no strip line
/// is present at all.
pub fn parse_level(content: &str) -> Option<Level> {
    let mut name = String::new();
    let mut overworld: Option<String> = None;
    let mut underground: Option<String> = None;
    let mut below_separator = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "---" {
            below_separator = true;
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('#') {
            if name.is_empty() {
                name = rest.trim().to_string();
            }
            continue;
        }
        let slot = if below_separator { &mut underground } else { &mut overworld };
        if slot.is_none() {
            *slot = Some(trimmed.to_string());
        }
    }

    let overworld = overworld?;
    if name.is_empty() {
        name = String::from("Unnamed Strip");
    }
    Some(Level { name, overworld, underground })
}

pub fn embedded() -> Level {
    Level {
        name: String::from("Pipeline 1-1"),
        overworld: String::from(EMBEDDED_OVERWORLD),
        underground: Some(String::from(EMBEDDED_UNDERGROUND)),
    }
}

// ══════════════════════════════════════════════════════════════
// Search dirs
// ══════════════════════════════════════════════════════════════

/// Search dirs for level files: exe dir, CWD, XDG data, system data.
fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Exe directory (resolve symlinks)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. CWD
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/pipeline-panic)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/pipeline-panic");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data (/usr/share/pipeline-panic)
    let sys = PathBuf::from("/usr/share/pipeline-panic");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback level
// ══════════════════════════════════════════════════════════════

// Overworld: 200 tiles. Plain pipes at 20/35/58/85/95/120/150/180, so
// the 4th (85) is the descend point and the 5th (95) the return pipe.
// Flag at 192.
const EMBEDDED_OVERWORLD: &str = "⠤⠤⠤⠤⠤⠤⠤⠤⠤⠤⠥⠤⠤⠤⠤⠤⠤⠤⠤⠤⠶⠤⠤⠤⠤_⠤⠤⠤⠤⠥⠤o⠤⠤⠶⠤⠤⠤⠤⠤⠤⠤⠤__⠤⠤⠤⠤⠥⠤⠥⠤⠤⠤⠤⠤⠶⠤⠤⠤⠤⠤o⠤⠤⠤⠤⠤__⠤⠤⠤⠤⠤⠥⠤⠤⠤⠤⠤⠤⠤⠶⠤⠤⠤⠤o⠤⠤⠤⠤⠶⠤⠤⠤⠤⠥⠤⠤⠤⠤_⠤⠤⠤⠤o⠤⠤⠤⠤⠤⠤⠤⠤⠤⠶⠤⠤⠤⠤⠥⠤⠤⠤⠤__⠤⠤⠤o⠤⠤⠤⠤⠥⠤⠤⠤⠤⠤⠤⠤⠤⠤⠶⠤⠤⠤⠤⠥⠤⠤⠤⠤__⠤⠤⠤o⠤⠤⠤⠤⠤⠤⠥⠤⠤⠥⠤⠤⠤⠤⠶⠤⠤⠤⠤⠤⠤⠤⠤⠤⠤⠤⚑⠤⠤⠤⠤⠤⠤⠤";

// Underground: 80 tiles walled at both ends. Pipe-likes at
// 30/44/58/70/74: the 4th (70) anchors the first-visit spawn, the 5th
// (74) is both the movement cap and the exit mouth.
const EMBEDDED_UNDERGROUND: &str = "⠿⠿⠿⠤⠤⠤⠤⠤⠥⠻⠥⠽⠥⠤⠤⠤⠤⠤⠤⠤⠥⠤⠥⠤⠤⠤⠻⠤⠤⠤⠯⠤⠤⠤⠤⠥⠤o⠤⠤⠥⠤⠤⠤⠶⠤⠤⠤⠤⠤o⠤⠤⠽⠤⠤⠤⠤⠯⠤⠤⠻⠤⠤o⠤⠤⠤⠤⠤⠶⠤⠥⠤⠭⠿⠿⠿⠿⠿";

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
