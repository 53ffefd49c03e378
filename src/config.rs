use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONF_FILE: &str = "~/.redfish.conf";

/// Resolves the configuration file path, expanding a leading `~`.
pub fn resolve_conf_path(raw: &str) -> Result<PathBuf> {
    expand_home(raw, dirs_next::home_dir().as_deref())
}

fn expand_home(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };

    let home = home.ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_default() {
        let path = expand_home(DEFAULT_CONF_FILE, Some(Path::new("/home/op"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/op/.redfish.conf"));
    }

    #[test]
    fn test_plain_paths_untouched() {
        let path = expand_home("/etc/redfish.conf", None).unwrap();
        assert_eq!(path, PathBuf::from("/etc/redfish.conf"));

        let path = expand_home("conf/~user.json", None).unwrap();
        assert_eq!(path, PathBuf::from("conf/~user.json"));
    }

    #[test]
    fn test_missing_home() {
        assert!(expand_home("~/.redfish.conf", None).is_err());
    }
}
