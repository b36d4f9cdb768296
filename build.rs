//! Records the git revision photodeck was built from.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    let revision = git(&["rev-parse", "--short=7", "HEAD"])
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string());
    let dirty = git(&["status", "--porcelain"]).is_some_and(|s| !s.trim().is_empty());

    println!("cargo:rustc-env=PHOTODECK_REVISION={revision}");
    println!("cargo:rustc-env=PHOTODECK_DIRTY={dirty}");
}
