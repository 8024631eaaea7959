//! Verdict-to-assertion conversion.
//!
//! The engine and page objects return booleans; the scenario layer turns
//! them into [`VitrinaError::AssertionFailed`] with a descriptive message.

use crate::result::{VitrinaError, VitrinaResult};

/// Fail with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> VitrinaResult<()> {
    if condition {
        Ok(())
    } else {
        Err(VitrinaError::AssertionFailed {
            message: message.into(),
        })
    }
}

/// Like [`ensure`], building the message lazily
pub fn ensure_with<F>(condition: bool, message: F) -> VitrinaResult<()>
where
    F: FnOnce() -> String,
{
    if condition {
        Ok(())
    } else {
        Err(VitrinaError::AssertionFailed { message: message() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_passes() {
        assert!(ensure(true, "unused").is_ok());
    }

    #[test]
    fn test_ensure_fails_with_message() {
        match ensure(false, "fewer than 10 items") {
            Err(VitrinaError::AssertionFailed { message }) => {
                assert_eq!(message, "fewer than 10 items");
            }
            other => panic!("expected AssertionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_with_lazy_message_not_built_on_pass() {
        let result = ensure_with(true, || panic!("must not be evaluated"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_ensure_with_builds_message_on_failure() {
        let result = ensure_with(false, || format!("item '{}' rejected", "IdeaPad"));
        match result {
            Err(VitrinaError::AssertionFailed { message }) => {
                assert_eq!(message, "item 'IdeaPad' rejected");
            }
            other => panic!("expected AssertionFailed, got {other:?}"),
        }
    }
}
