use std::path::{Component, Path};

/// Checks whether a candidate file path exists or could be created.
///
/// Preset saves go through this before any write so that a bad preset
/// name is reported as a rejected outcome instead of a failed write.
pub trait PathValidator: Send + Sync {
    /// True when `path` exists, or names a portable file that could be
    /// created in an existing directory.
    fn is_valid_target(&self, path: &Path) -> bool;
}

/// Default validator: portable component names plus an existence check
/// on the parent directory.
///
/// "Portable" is deliberately conservative so preset files written on
/// one platform stay readable on the others.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortablePathValidator;

/// Characters rejected by at least one common filesystem.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\0'];

/// Maximum bytes per path component on common filesystems.
const MAX_COMPONENT_BYTES: usize = 255;

impl PathValidator for PortablePathValidator {
    fn is_valid_target(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() || !is_portable(path) {
            return false;
        }

        if path.exists() {
            return true;
        }

        match path.parent() {
            // Bare file names resolve against the working directory.
            Some(parent) if parent.as_os_str().is_empty() => true,
            Some(parent) => parent.is_dir(),
            None => false,
        }
    }
}

fn is_portable(path: &Path) -> bool {
    path.components().all(|component| match component {
        Component::Normal(name) => name.to_str().is_some_and(is_portable_component),
        _ => true,
    })
}

fn is_portable_component(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_COMPONENT_BYTES
        && !name.contains(FORBIDDEN_CHARS)
        && !name.ends_with(['.', ' '])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_path_is_valid() {
        let temp_dir = TempDir::new().unwrap();
        assert!(PortablePathValidator.is_valid_target(temp_dir.path()));
    }

    #[test]
    fn test_creatable_in_existing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("new_preset.dat");
        assert!(PortablePathValidator.is_valid_target(&target));
    }

    #[test]
    fn test_missing_parent_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("no_such_dir").join("preset.dat");
        assert!(!PortablePathValidator.is_valid_target(&target));
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        let temp_dir = TempDir::new().unwrap();
        for bad in ["a<b.dat", "pipe|name.dat", "what?.dat", "star*.dat"] {
            let target = temp_dir.path().join(bad);
            assert!(
                !PortablePathValidator.is_valid_target(&target),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_trailing_dot_and_space_rejected() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!PortablePathValidator.is_valid_target(&temp_dir.path().join("name.")));
        assert!(!PortablePathValidator.is_valid_target(&temp_dir.path().join("name ")));
    }

    #[test]
    fn test_overlong_component_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let long_name = "x".repeat(MAX_COMPONENT_BYTES + 1);
        assert!(!PortablePathValidator.is_valid_target(&temp_dir.path().join(long_name)));
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(!PortablePathValidator.is_valid_target(Path::new("")));
    }
}
