use crate::{
    error::GuardResult,
    route_match::{MatchOptions, RouteSpec},
};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application wide defaults for guarded routes.
///
/// A server reads it once at startup with [GuardConfig::read], a client build can embed the
/// same file with `GuardConfig::from_toml(include_str!(..))`. The flags are then handed to
/// each guarded route, e.g. `<SecureRoute exact=config.match_options.exact .. />`, or to
/// guards built by hand through [GuardConfig::route].
///
/// ```toml
/// [match_options]
/// exact = true
/// ```
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Match flags applied to every guarded route
    pub match_options: MatchOptions,
}

impl GuardConfig {
    /// Reads the config file `file` (extension optional). Values can be overridden with
    /// environment variables such as `SECURE_ROUTE__MATCH_OPTIONS__EXACT=true`.
    pub fn read(file: &str) -> GuardResult<Self> {
        let config = Config::builder()
            .add_source(File::with_name(file))
            .add_source(Environment::with_prefix("SECURE_ROUTE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn from_toml(toml: &str) -> GuardResult<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Builds a spec for `segments` using the configured match flags.
    pub fn route<Segments>(&self, segments: Segments) -> RouteSpec<Segments> {
        RouteSpec::new(segments).with_options(self.match_options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use leptos_router::StaticSegment;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_read_config() -> GuardResult<()> {
        let config = GuardConfig::from_toml(
            r#"
            [match_options]
            exact = true
            "#,
        )?;
        assert_eq!(MatchOptions { exact: true }, config.match_options);

        let spec = config.route(StaticSegment("article"));
        assert_eq!(config.match_options, spec.options());
        Ok(())
    }

    #[test]
    fn test_read_config_file() -> GuardResult<()> {
        let file = std::env::temp_dir().join("secure_route_test_config.toml");
        assert!(fs::write(&file, "[match_options]\nexact = true\n").is_ok());
        let config = GuardConfig::read(&file.to_string_lossy());
        let _ = fs::remove_file(&file);
        assert_eq!(MatchOptions { exact: true }, config?.match_options);

        assert!(GuardConfig::read("/nonexistent/secure_route").is_err());
        Ok(())
    }

    #[test]
    fn test_default_config() -> GuardResult<()> {
        assert_eq!(GuardConfig::default(), GuardConfig::from_toml("")?);
        let err = GuardConfig::from_toml("[match_options]\nexactly = true");
        assert!(err.is_err_and(|e| e.to_string().contains("exactly")));
        Ok(())
    }
}
