//! Path helpers for user supplied locations.

use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde("  /tmp/assets "), PathBuf::from("/tmp/assets"));
    }

    #[test]
    fn tilde_prefix_joins_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/Pictures"), home.join("Pictures"));
            assert_eq!(expand_tilde("~"), home);
        }
    }
}
