//! Embeds the commit hash and build time shown in the `--help` trailer.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // CI can pin the hash; local builds ask git, falling back to "unknown"
    // for builds from a source tarball.
    println!("cargo:rerun-if-env-changed=RETINT_BUILD_GIT_HASH");
    let hash = std::env::var("RETINT_BUILD_GIT_HASH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(git_short_hash)
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=RETINT_BUILD_GIT_HASH={hash}");

    let built = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|delta| delta.as_secs())
        .unwrap_or(0);
    println!("cargo:rustc-env=RETINT_BUILD_EPOCH={built}");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let trimmed = hash.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
