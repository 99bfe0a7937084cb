//! Bounded vision backend start-up
//!
//! Loading a backend may block (native libraries, model files). The loader
//! runs on tokio's blocking pool and is abandoned once the timeout expires.

use log::{info, warn};
use std::time::Duration;

use crate::config::PreprocessingConfig;
use crate::vision::ImageprocBackend;
use crate::{MeasureError, Result};

/// Run `loader` and wait at most `timeout` for it
///
/// Measuring must not start before this returns `Ok`.
pub async fn initialize<B, F>(loader: F, timeout: Duration) -> Result<B>
where
    F: FnOnce() -> Result<B> + Send + 'static,
    B: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(loader);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(backend)) => {
            if backend.is_ok() {
                info!("vision backend ready");
            }
            backend
        }
        Ok(Err(join_error)) => Err(MeasureError::VisionError {
            operation: format!("backend loader failed: {}", join_error),
            source: None,
        }),
        Err(_) => {
            warn!("vision backend not ready after {:?}", timeout);
            Err(MeasureError::InitializationTimedOut {
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// Initialize the default pure-Rust backend
pub async fn initialize_default(
    config: &PreprocessingConfig,
    timeout: Duration,
) -> Result<ImageprocBackend> {
    let config = config.clone();
    initialize(move || ImageprocBackend::try_new(&config), timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_loader_succeeds() {
        let backend =
            initialize_default(&PreprocessingConfig::default(), Duration::from_secs(5)).await;
        assert!(backend.is_ok());
    }

    #[tokio::test]
    async fn test_inverted_thresholds_fail_initialization() {
        let config = PreprocessingConfig {
            canny_low_threshold: 150.0,
            canny_high_threshold: 50.0,
            ..Default::default()
        };
        let result = initialize_default(&config, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(MeasureError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_slow_loader_times_out() {
        let result = initialize(
            || {
                std::thread::sleep(Duration::from_millis(300));
                Ok(())
            },
            Duration::from_millis(20),
        )
        .await;

        match result {
            Err(MeasureError::InitializationTimedOut { timeout_ms }) => assert_eq!(timeout_ms, 20),
            other => panic!("Expected InitializationTimedOut, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loader_error_propagates() {
        let result: Result<()> = initialize(
            || Err(MeasureError::invalid_parameter("backend", "missing")),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(MeasureError::InvalidParameter { .. })));
    }
}
