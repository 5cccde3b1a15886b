#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::DriverConfig;
    use crate::driver::Browser;
    use crate::errors::LifecycleError;
    use crate::options::LaunchOptions;
    use std::time::Instant;

    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    fn controller_on(port: u16) -> LifecycleController {
        let options = LaunchOptions::builder()
            .browser(Browser::Chrome)
            .port(port)
            .build()
            .unwrap();
        LifecycleController::new(std::env::temp_dir(), options, DriverConfig::default())
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let controller = controller_on(free_port());
        assert_eq!(controller.state(), ControllerState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_on_closed_port_succeeds_immediately() {
        let mut controller = controller_on(free_port());

        let started = Instant::now();
        let stopped = controller.stop(10).await.unwrap();

        assert!(stopped);
        assert_eq!(controller.state(), ControllerState::Stopped);
        // No polling: well under one interval
        assert!(started.elapsed().as_secs() < 2);
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_returns_immediately_when_port_closed() {
        let controller = controller_on(free_port());

        let started = Instant::now();
        controller.wait_for_shutdown(10).await.unwrap();
        assert!(started.elapsed().as_secs() < 2);
    }

    #[tokio::test]
    async fn test_wait_for_ready_times_out_against_dead_port() {
        let controller = controller_on(free_port());

        let err = controller.wait_for_ready(0).await.unwrap_err();
        assert!(matches!(err, LifecycleError::StartTimeout { secs: 0 }));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_wait_for_ready_expires_after_about_timeout() {
        let controller = controller_on(free_port());

        let started = Instant::now();
        let err = controller.wait_for_ready(2).await.unwrap_err();
        assert!(matches!(err, LifecycleError::StartTimeout { secs: 2 }));

        // Two 1s sleeps plus probe overhead; never more than one extra interval
        let elapsed = started.elapsed();
        assert!(elapsed.as_secs() >= 2);
        assert!(elapsed.as_secs() < 4);
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_times_out_while_port_listening() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let controller = controller_on(port);

        let err = controller.wait_for_shutdown(1).await.unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::ShutdownTimeout { secs: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_start_fails_fast_without_driver_entry() {
        // Empty config: resolution fails before any process is spawned
        let mut controller = controller_on(free_port());

        let err = controller.start().await.unwrap_err();
        assert!(matches!(err, LifecycleError::NoDriverForBrowser { .. }));
        assert_eq!(controller.state(), ControllerState::Stopped);
    }

    #[tokio::test]
    async fn test_ensure_running_propagates_resolution_failure() {
        // A launch that cannot even resolve a driver is fatal, not a
        // swallowed launch failure
        let mut controller = controller_on(free_port());

        let err = controller.ensure_running().await.unwrap_err();
        assert!(matches!(err, LifecycleError::NoDriverForBrowser { .. }));
    }

    #[tokio::test]
    async fn test_launch_guard_blocks_second_launcher() {
        let port = free_port();
        let lock_path = std::env::temp_dir().join(format!("gridctl-{port}.lock"));
        std::fs::write(&lock_path, b"").unwrap();

        let mut controller = controller_on(port);
        let err = controller.start().await.unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyLaunching { .. }));

        std::fs::remove_file(&lock_path).unwrap();
    }

    #[tokio::test]
    async fn test_launch_guard_released_after_failed_start() {
        let port = free_port();
        let mut controller = controller_on(port);

        // First start fails on driver resolution, second must not see the lock
        let first = controller.start().await.unwrap_err();
        assert!(matches!(first, LifecycleError::NoDriverForBrowser { .. }));
        let second = controller.start().await.unwrap_err();
        assert!(matches!(second, LifecycleError::NoDriverForBrowser { .. }));
    }
}
