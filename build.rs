use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

const BUILD_FILE: &str = "BUILD_NUMBER";
const VERSION_FILE: &str = "VERSION";

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_short_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    // Bump the local build counter; a read-only checkout just keeps counting from 0
    let build_file = Path::new(BUILD_FILE);
    let build = read_trimmed(build_file)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;
    let _ = fs::write(build_file, build.to_string());

    let version = read_trimmed(Path::new(VERSION_FILE))
        .unwrap_or_else(|| env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.1.0".into()));

    let profile = match env::var("PROFILE").as_deref() {
        Ok("release") => "release",
        _ => "development",
    };

    println!("cargo:rustc-env=ENIGMA_VERSION={}", version);
    println!("cargo:rustc-env=ENIGMA_BUILD={}", build);
    println!("cargo:rustc-env=ENIGMA_PROFILE={}", profile);
    println!("cargo:rustc-env=ENIGMA_GIT_HASH={}", git_short_hash());

    println!("cargo:rerun-if-changed={}", BUILD_FILE);
    println!("cargo:rerun-if-changed={}", VERSION_FILE);
    println!("cargo:rerun-if-env-changed=PROFILE");
}
