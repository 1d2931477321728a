//! Centralized validation and helper functions.

use std::num::NonZeroUsize;
use tracing::warn;

use crate::core::ConfigError;

/// Number of workers the machine can run in parallel
#[must_use]
pub fn available_workers() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Validate a requested worker count against the available parallelism.
///
/// Requests above the available parallelism are clamped with a warning.
///
/// # Errors
///
/// Returns `ConfigError::ZeroWorkers` if `requested` is 0.
pub fn bounded_workers(requested: usize) -> Result<usize, ConfigError> {
    if requested == 0 {
        return Err(ConfigError::ZeroWorkers);
    }

    let available = available_workers();
    if requested > available {
        warn!(
            requested,
            available, "Requested more workers than available, clamping"
        );
        return Ok(available);
    }

    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_workers() {
        assert_eq!(bounded_workers(0), Err(ConfigError::ZeroWorkers));
        assert_eq!(bounded_workers(1), Ok(1));

        let available = available_workers();
        assert_eq!(bounded_workers(available + 100), Ok(available));
    }
}
