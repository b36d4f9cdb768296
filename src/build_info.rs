//! Build information captured at compile time.

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git revision, or `unknown` outside a checkout.
pub const REVISION: &str = env!("PHOTODECK_REVISION");

const DIRTY: &str = env!("PHOTODECK_DIRTY");

/// Revision with a `*` appended for builds from uncommitted changes.
fn revision_label(revision: &str, dirty: bool) -> String {
    if dirty {
        format!("{revision}*")
    } else {
        revision.to_string()
    }
}

/// `0.1.0 (abc1234)`, shown in the TUI footer.
#[must_use]
pub fn version_string() -> String {
    format!("{VERSION} ({})", revision_label(REVISION, DIRTY == "true"))
}

/// `build abc1234`, sent as the API health header.
#[must_use]
pub fn short_version() -> String {
    format!("build {}", revision_label(REVISION, DIRTY == "true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_builds_are_marked() {
        assert_eq!(revision_label("abc1234", true), "abc1234*");
        assert_eq!(revision_label("abc1234", false), "abc1234");
    }

    #[test]
    fn version_string_leads_with_package_version() {
        assert!(version_string().starts_with(VERSION));
        assert!(short_version().starts_with("build "));
    }
}
