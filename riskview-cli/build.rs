// Build script to inject version information from git tags
//
// Falls back to CARGO_PKG_VERSION when git is unavailable or the
// checkout has no tags.

use std::process::Command;

fn main() {
    let version = get_git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=RISKVIEW_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn get_git_version() -> Option<String> {
    // Something like "v0.1.0", "v0.1.0-5-gabc123" or "abc123-dirty"
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let base_version = env!("CARGO_PKG_VERSION");

    if let Some(tagged) = described.strip_prefix('v') {
        // Keep only the tag: "0.1.0-5-gabc123" -> "0.1.0"
        Some(tagged.split('-').next().unwrap_or(tagged).to_string())
    } else if let Some(sha) = described.strip_suffix("-dirty") {
        Some(format!("{}-{}-dirty", base_version, sha))
    } else {
        Some(format!("{}-{}", base_version, described))
    }
}
