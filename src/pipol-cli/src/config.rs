use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use pipol_sdk::SessionStore;
use serde::{Deserialize, Serialize};

/// Backend connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the PIPOL backend
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:3000"),
        }
    }
}

/// Session persistence settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File the session token is stored in
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: SessionStore::default_path(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipolConfig {
    /// Backend connection settings
    pub server: ServerConfig,
    /// Session persistence settings
    pub session: SessionConfig,
}

impl PipolConfig {
    /// Load from `pipol.toml` in the working directory, then `PIPOL__*`
    /// environment variables, on top of the defaults
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config = Figment::from(Serialized::defaults(PipolConfig::default()))
            .merge(Toml::file("pipol.toml"))
            .merge(Env::prefixed("PIPOL__").split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }

    /// Load with an explicit configuration file instead of `pipol.toml`
    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        let config = Figment::from(Serialized::defaults(PipolConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PIPOL__").split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        figment::Jail::expect_with(|_jail| {
            let config = PipolConfig::load().map_err(|e| *e)?;
            assert_eq!(config.server.url, "http://localhost:3000");
            assert!(config.session.path.ends_with("token"));
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "pipol.toml",
                r#"
                    [server]
                    url = "https://pipol.example.org"

                    [session]
                    path = "/tmp/pipol-test-token"
                "#,
            )?;
            let config = PipolConfig::load().map_err(|e| *e)?;
            assert_eq!(config.server.url, "https://pipol.example.org");
            assert_eq!(config.session.path, PathBuf::from("/tmp/pipol-test-token"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("pipol.toml", "[server]\nurl = \"https://from-file\"\n")?;
            jail.set_env("PIPOL__SERVER__URL", "https://from-env");
            let config = PipolConfig::load().map_err(|e| *e)?;
            assert_eq!(config.server.url, "https://from-env");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_ignores_default_file_name() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("pipol.toml", "[server]\nurl = \"https://ignored\"\n")?;
            jail.create_file("other.toml", "[server]\nurl = \"https://chosen\"\n")?;
            let config = PipolConfig::load_from_path(Path::new("other.toml")).map_err(|e| *e)?;
            assert_eq!(config.server.url, "https://chosen");
            Ok(())
        });
    }
}
