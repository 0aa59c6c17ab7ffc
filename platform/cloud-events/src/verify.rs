//! Argument checks shared by envelope construction and the publisher.

use crate::CloudEventError;

/// Fail with [`CloudEventError::InvalidArgument`] naming `param` when `value`
/// is empty or whitespace-only.
pub fn ensure_not_empty(value: &str, param: &'static str) -> Result<(), CloudEventError> {
    if value.trim().is_empty() {
        return Err(CloudEventError::InvalidArgument(param));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_non_empty() {
        assert!(ensure_not_empty("order.created", "type").is_ok());
        assert!(ensure_not_empty(" x ", "type").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert_eq!(
            ensure_not_empty("", "type"),
            Err(CloudEventError::InvalidArgument("type"))
        );
        assert_eq!(
            ensure_not_empty(" \t\n", "type"),
            Err(CloudEventError::InvalidArgument("type"))
        );
    }
}
