use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use dealdocs_core::config::{DEFAULT_OUTPUTS_DIR, DEFAULT_TEMPLATES_DIR};
use dealdocs_core::MailConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub templates_dir: PathBuf,
    /// Root below which every request gets its own output directory.
    pub outputs_dir: PathBuf,
    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|e| format!("invalid BIND_ADDR '{bind_addr}': {e}"))?;

        let templates_dir = env::var("TEMPLATES_DIR")
            .unwrap_or_else(|_| DEFAULT_TEMPLATES_DIR.to_string())
            .into();
        let outputs_dir = env::var("OUTPUTS_DIR")
            .unwrap_or_else(|_| DEFAULT_OUTPUTS_DIR.to_string())
            .into();

        let mail = match MailConfig::from_env() {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!("{e}. Mail delivery is disabled.");
                None
            }
        };

        if mail.is_some() {
            tracing::info!("mail delivery is enabled");
        } else {
            tracing::info!("mail delivery is disabled (dev mode)");
        }

        Ok(Self {
            bind_addr,
            templates_dir,
            outputs_dir,
            mail,
        })
    }

    pub fn new(templates_dir: impl Into<PathBuf>, outputs_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            templates_dir: templates_dir.into(),
            outputs_dir: outputs_dir.into(),
            mail: None,
        }
    }

    pub fn is_mail_enabled(&self) -> bool {
        self.mail.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_bind_addr() {
        let config = AppConfig::new("templates", "outputs");
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(!config.is_mail_enabled());
    }
}
