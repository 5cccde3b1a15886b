#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::driver::Browser;
    use crate::errors::LifecycleError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_browser_fails_build() {
        let err = LaunchOptions::builder().build().unwrap_err();
        assert!(matches!(err, LifecycleError::MissingBrowser));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_param_rendering_order_and_forms() {
        let options = LaunchOptions::builder()
            .browser(Browser::Chrome)
            .register_shutdown(false)
            .param(Param::Switch("debug".into()))
            .param(Param::Pair("log".into(), "grid.log".into()))
            .build()
            .unwrap();

        assert_eq!(options.args(), vec!["-debug", "-log", "grid.log"]);
    }

    #[test]
    fn test_register_shutdown_defaults() {
        let options = LaunchOptions::builder()
            .browser(Browser::Firefox)
            .build()
            .unwrap();

        let args = options.args();
        assert_eq!(
            args,
            vec![
                "-role",
                "node",
                "-servlet",
                "org.openqa.grid.web.servlet.LifecycleServlet",
                "-registerCycle",
                "0",
                "-port",
                "4444",
            ]
        );
        assert_eq!(options.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_explicit_port_param_wins() {
        let options = LaunchOptions::builder()
            .browser(Browser::Chrome)
            .port(5555)
            .param(Param::Pair("port".into(), "6666".into()))
            .build()
            .unwrap();

        assert_eq!(options.port(), 6666);
        // The user's -port pair is kept; no duplicate is appended
        let ports = options.args().iter().filter(|a| *a == "-port").count();
        assert_eq!(ports, 1);
    }

    #[test]
    fn test_builder_port_used_when_registering() {
        let options = LaunchOptions::builder()
            .browser(Browser::Chrome)
            .port(5555)
            .build()
            .unwrap();

        assert_eq!(options.port(), 5555);
        let args = options.args();
        let idx = args.iter().position(|a| a == "-port").unwrap();
        assert_eq!(args[idx + 1], "5555");
    }

    #[test]
    fn test_no_register_skips_grid_params() {
        let options = LaunchOptions::builder()
            .browser(Browser::Chrome)
            .register_shutdown(false)
            .build()
            .unwrap();

        assert!(options.args().is_empty());
        assert_eq!(options.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_param_parse() {
        assert_eq!(
            Param::parse("log=grid.log"),
            Param::Pair("log".into(), "grid.log".into())
        );
        assert_eq!(Param::parse("debug"), Param::Switch("debug".into()));
    }
}
