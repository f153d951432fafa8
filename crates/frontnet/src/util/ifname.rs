//! Interface name utilities.

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

/// Error type for interface name checks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IfError {
    #[error("invalid interface name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, IfError>;

/// Validate an interface name.
///
/// Mirrors the kernel's `dev_valid_name()`: non-empty, shorter than
/// [`IFNAMSIZ`] bytes, no `/`, `:`, NUL or ASCII whitespace, and not `.`
/// or `..`.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(IfError::InvalidName("empty name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(IfError::InvalidName(format!(
            "name too long (max {} chars)",
            IFNAMSIZ - 1
        )));
    }

    if name == "." || name == ".." {
        return Err(IfError::InvalidName(format!("'{}' is reserved", name)));
    }

    if name.contains(['/', ':', '\0']) {
        return Err(IfError::InvalidName(
            "name contains invalid characters".to_string(),
        ));
    }

    if name.bytes().any(|b| b.is_ascii_whitespace() || b == 0x0b) {
        return Err(IfError::InvalidName("name contains whitespace".to_string()));
    }

    Ok(())
}
