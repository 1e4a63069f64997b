/// Best coin count persistence — a single number in best.dat.
///
/// Loaded once at startup; rewritten whenever the current round pushes
/// past the stored record. Failures are silent on the save side: the
/// in-memory record still stands for the rest of the session.

use std::path::PathBuf;

const BEST_FILE: &str = "best.dat";

fn data_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_pipeline_panic");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/pipeline-panic) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/pipeline-panic");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn best_path() -> PathBuf {
    data_dir().join(BEST_FILE)
}

/// Read the stored record. A missing or garbled file counts as zero.
pub fn load_best() -> u32 {
    let candidates = [best_path(), PathBuf::from(BEST_FILE)];
    for path in &candidates {
        if let Ok(content) = std::fs::read_to_string(path) {
            if let Ok(n) = content.trim().parse() {
                return n;
            }
        }
    }
    0
}

/// Persist a new record, overwriting the old one.
pub fn save_best(best: u32) {
    let _ = std::fs::write(best_path(), format!("{}\n", best));
}
