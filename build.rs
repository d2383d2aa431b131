use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let version = describe_head().unwrap_or_else(|| {
        std::env::var("CARGO_PKG_VERSION")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    });

    println!("cargo:rustc-env=GIT_VERSION={version}");
}

/// `git describe` against v-prefixed tags, e.g. `0.1.0-3-gabc1234-dirty`.
/// Untagged checkouts report `<pkg-version>+g<hash>`.
fn describe_head() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--long", "--dirty", "--tags", "--match", "v[0-9]*"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let raw = String::from_utf8(output.stdout).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(tagged) = raw.strip_prefix('v') {
        return Some(tagged.to_string());
    }
    Some(format!("{}+g{raw}", env!("CARGO_PKG_VERSION")))
}
