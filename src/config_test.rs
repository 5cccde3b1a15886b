#[cfg(test)]
mod tests {
    use super::super::*;

    const BASE: &str = r#"
[chrome]
linux = "drivers/chromedriver"
mac = "drivers/chromedriver"
windows = "drivers/chromedriver.exe"

[firefox]
linux = "drivers/geckodriver"

[MicrosoftEdge]
windows = "drivers/msedgedriver.exe"
windowsInsider = "drivers/msedgedriver-insider.exe"

["internet explorer"]
windows = "drivers/IEDriverServer.exe"
"#;

    #[test]
    fn test_parse_and_lookup() {
        let config = DriverConfig::parse(BASE).unwrap();

        assert_eq!(config.entry("chrome", "linux"), Some("drivers/chromedriver"));
        assert_eq!(
            config.entry("MicrosoftEdge", "windowsInsider"),
            Some("drivers/msedgedriver-insider.exe")
        );
        assert_eq!(
            config.entry("internet explorer", "windows"),
            Some("drivers/IEDriverServer.exe")
        );
    }

    #[test]
    fn test_missing_entries_are_none() {
        let config = DriverConfig::parse(BASE).unwrap();

        assert_eq!(config.entry("firefox", "windows"), None);
        assert_eq!(config.entry("safari", "mac"), None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(DriverConfig::parse("[chrome\nlinux = ").is_err());
    }

    #[test]
    fn test_load_reads_base_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BASE_FILE), BASE).unwrap();

        let config = DriverConfig::load(dir.path()).unwrap();
        assert_eq!(config.entry("chrome", "mac"), Some("drivers/chromedriver"));
    }

    #[test]
    fn test_override_replaces_base_entirely() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BASE_FILE), BASE).unwrap();
        std::fs::write(
            dir.path().join(OVERRIDE_FILE),
            "[chrome]\nlinux = \"local/chromedriver\"\n",
        )
        .unwrap();

        let config = DriverConfig::load(dir.path()).unwrap();
        assert_eq!(config.entry("chrome", "linux"), Some("local/chromedriver"));
        // Replace, not merge: base-only sections disappear with an override
        assert_eq!(config.entry("firefox", "linux"), None);
    }

    #[test]
    fn test_load_missing_base_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DriverConfig::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::LifecycleError::ConfigIo { .. }
        ));
    }
}
