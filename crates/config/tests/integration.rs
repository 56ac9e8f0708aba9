//! Integration tests for config

#[cfg(test)]
mod tests {
    use banker_config::*;
    use banker_errors::{ConfigError, Error};
    use banker_types::{ColorChoice, OutputFormat};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 4] = [
        "BANKER_OUTPUT",
        "BANKER_COLOR",
        "BANKER_MAX_PREEMPTIONS",
        "BANKER_RECHECK",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[recovery]
max_preemptions = 3
recheck = false
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.recovery.max_preemptions, 3);
        assert!(!config.recovery.recheck);
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[general]\ncolor = \"always\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.general.default_output, OutputFormat::Tty);
        assert_eq!(config.recovery.max_preemptions, 8);
        assert!(config.recovery.recheck);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let result = Config::load_or_default(Some(path.as_path())).await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[recovery\nmax_preemptions = ").unwrap();

        let result = Config::load_from_file(temp_file.path()).await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("BANKER_OUTPUT", "json");
        std::env::set_var("BANKER_COLOR", "always");
        std::env::set_var("BANKER_MAX_PREEMPTIONS", "2");
        std::env::set_var("BANKER_RECHECK", "no");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.recovery.max_preemptions, 2);
        assert!(!config.recovery.recheck);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("BANKER_MAX_PREEMPTIONS", "many");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));

        clear_env();
    }
}
