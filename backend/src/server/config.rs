//! HTTP server configuration object and helpers.

use std::net::{AddrParseError, SocketAddr};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ProjectId;
use crate::outbound::memory::DEMO_PROJECT_ID;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Application settings loaded via OrthoConfig (`CREWDECK_*` environment
/// variables, CLI flags, or a config file).
///
/// Session security toggles are deliberately not here; they live with the
/// session configuration module and its stricter release-build validation.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CREWDECK")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Project a fresh session starts in.
    pub default_project: Option<u64>,
    /// Provision the built-in demo workspace at startup.
    #[ortho_config(default = true)]
    pub demo_data: bool,
}

impl AppSettings {
    /// The configured bind address, falling back to `127.0.0.1:8080`.
    ///
    /// # Errors
    /// Fails when the configured value is not a valid socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// The configured starting project, falling back to the demo project.
    #[must_use]
    pub fn default_project(&self) -> ProjectId {
        ProjectId::new(self.default_project.unwrap_or(DEMO_PROJECT_ID))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) default_project: ProjectId,
    pub(crate) demo_data: bool,
}

impl ServerConfig {
    /// Construct a server configuration using validated session settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            default_project: ProjectId::new(DEMO_PROJECT_ID),
            demo_data: true,
        }
    }

    /// Override the project fresh sessions start in.
    #[must_use]
    pub fn with_default_project(mut self, project: ProjectId) -> Self {
        self.default_project = project;
        self
    }

    /// Enable or disable demo workspace provisioning.
    #[must_use]
    pub fn with_demo_data(mut self, demo_data: bool) -> Self {
        self.demo_data = demo_data;
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for application settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("CREWDECK_BIND_ADDR", None::<String>),
            ("CREWDECK_DEFAULT_PROJECT", None::<String>),
            ("CREWDECK_DEMO_DATA", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid default"),
            DEFAULT_BIND_ADDR.parse().expect("constant parses")
        );
        assert_eq!(settings.default_project(), ProjectId::new(DEMO_PROJECT_ID));
        assert!(settings.demo_data);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CREWDECK_BIND_ADDR", Some("0.0.0.0:9090".to_owned())),
            ("CREWDECK_DEFAULT_PROJECT", Some("7".to_owned())),
            ("CREWDECK_DEMO_DATA", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid override"),
            "0.0.0.0:9090".parse().expect("literal parses")
        );
        assert_eq!(settings.default_project(), ProjectId::new(7));
        assert!(!settings.demo_data);
    }

    #[rstest]
    fn invalid_bind_addresses_are_rejected() {
        let _guard = lock_env([("CREWDECK_BIND_ADDR", Some("not-an-addr".to_owned()))]);
        let settings = load_from_empty_args();
        assert!(settings.bind_addr().is_err());
    }
}
