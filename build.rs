use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Askama reads templates at compile time; without these hints an edit to
    // admin.html would leave a stale binary behind during dev.
    if let Ok(entries) = fs::read_dir("templates") {
        for entry in entries.flatten() {
            println!("cargo:rerun-if-changed={}", entry.path().display());
        }
    }

    // Stamp the binary so the startup log shows which build is running.
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=MEMORIAL_BUILD_ID={stamp}");
}
