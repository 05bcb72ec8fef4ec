use std::path::Path;

use figment::Jail;

use codelookup_core::config::{resolve_with_base, Config, DEFAULT_THRESHOLD, MAX_RESULT_LIMIT};
use codelookup_core::error::Error;

#[test]
fn defaults_apply_without_any_config_file() {
    Jail::expect_with(|jail| {
        let config = Config::load_for_env(jail.directory(), "test").map_err(|e| e.to_string())?;
        let settings = config.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.search.threshold, DEFAULT_THRESHOLD);
        assert_eq!(settings.search.limit, MAX_RESULT_LIMIT);
        assert!(settings.corpus.use_fallback);
        assert_eq!(settings.corpus.diagnosis_source, "");
        Ok(())
    });
}

#[test]
fn env_file_overrides_base_file_and_env_vars_override_both() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [corpus]
            diagnosis_source = "base.json"
            use_fallback = false

            [search]
            limit = 40
            "#,
        )?;
        jail.create_file("config.test.toml", "[search]\nlimit = 30\n")?;
        jail.set_env("APP_CORPUS__DIAGNOSIS_SOURCE", "https://example.org/tabular.json");

        let config = Config::load_for_env(jail.directory(), "test").map_err(|e| e.to_string())?;
        let settings = config.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.search.limit, 30);
        assert!(!settings.corpus.use_fallback);
        assert_eq!(settings.corpus.diagnosis_source, "https://example.org/tabular.json");

        let limit: usize = config.get("search.limit").map_err(|e| e.to_string())?;
        assert_eq!(limit, 30);
        Ok(())
    });
}

#[test]
fn limit_above_bound_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[search]\nlimit = 51\n")?;
        match Config::load_for_env(jail.directory(), "prod") {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("search.limit")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("limit 51 must be rejected"),
        }
        Ok(())
    });
}

#[test]
fn threshold_outside_unit_interval_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[search]\nthreshold = 1.5\n")?;
        assert!(Config::load_for_env(jail.directory(), "dev").is_err());
        Ok(())
    });
}

#[test]
fn missing_key_is_an_invalid_config_error() {
    Jail::expect_with(|jail| {
        let config = Config::load_for_env(jail.directory(), "dev").map_err(|e| e.to_string())?;
        let missing = config.get::<String>("server.host");
        assert!(matches!(missing, Err(Error::InvalidConfig(_))));
        Ok(())
    });
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = Path::new("/srv/codelookup");
    assert_eq!(resolve_with_base(base, "data/tabular.json"), base.join("data/tabular.json"));
    assert_eq!(resolve_with_base(base, "/abs/tabular.json"), Path::new("/abs/tabular.json"));
}
