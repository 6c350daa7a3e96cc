//! Integration tests for secure-api

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache
    fn secure_api(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("secure-api");
        cmd.env("SECURE_API_CONFIG", temp.path().join("config.toml"))
            .env("SECURE_API_CACHE_ROOT", temp.path().join("cache"))
            .env_remove("SECURE_API_TEST");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("access plans for secure REST APIs"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("secure-api"));
    }

    #[test]
    fn resolve_in_test_mode_prints_placeholder() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["--test", "resolve", "my-stack"])
            .assert()
            .success()
            .stdout("dummy-value-for-test\n");

        assert!(!temp.path().join("cache").exists());
    }

    #[test]
    fn resolve_uses_cached_value() {
        let temp = TempDir::new().unwrap();
        let cache_root = temp.path().join("cache");
        std::fs::create_dir_all(&cache_root).unwrap();
        std::fs::write(
            cache_root.join("api_keys.json"),
            r#"{"stack1-api-key": "ABC123"}"#,
        )
        .unwrap();

        secure_api(&temp)
            .args(["resolve", "stack1"])
            .assert()
            .success()
            .stdout("ABC123\n");
    }

    #[test]
    fn plan_api_key_in_test_mode() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["plan", "my-stack", "--test", "--method", "get,post"])
            .assert()
            .success()
            .stdout(predicate::str::contains("x-api-key:my-stack"))
            .stdout(predicate::str::contains("my-stack-usage-plan"))
            .stdout(predicate::str::contains("\"POST\""));
    }

    #[test]
    fn plan_iam_in_test_mode() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["--test", "plan", "my-stack", "--mode", "iam"])
            .assert()
            .success()
            .stdout(predicate::str::contains("execute-api:Invoke"))
            .stdout(predicate::str::contains("my-stack/api-credentials"));
    }

    #[test]
    fn plan_as_toml() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["--test", "plan", "my-stack", "--format", "toml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stack_name = \"my-stack\""));
    }

    #[test]
    fn cache_list_empty() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached credentials"));
    }

    #[test]
    fn cache_list_masks_values() {
        let temp = TempDir::new().unwrap();
        let cache_root = temp.path().join("cache");
        std::fs::create_dir_all(&cache_root).unwrap();
        std::fs::write(
            cache_root.join("api_keys.json"),
            r#"{"stack1-api-key": "abcdefghijklmnop"}"#,
        )
        .unwrap();

        secure_api(&temp)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stack1-api-key"))
            .stdout(predicate::str::contains("mnop"))
            .stdout(predicate::str::contains("abcdefghijklmnop").not());
    }

    #[test]
    fn cache_path() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("api_keys.json"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[secret]"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        secure_api(&temp)
            .args(["config", "init"])
            .assert()
            .success();

        assert!(temp.path().join("config.toml").exists());
    }

    #[test]
    fn invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "[api]\nmode = \"oauth\"").unwrap();

        secure_api(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
