//! Configuration constants and mail settings.

use std::env;

use crate::error::{DocumentError, Result};

/// Default directory holding the `.docx` templates.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default directory receiving rendered documents.
pub const DEFAULT_OUTPUTS_DIR: &str = "outputs";

/// File name of the declaration template used for overflow parties.
pub const DECLARATION_TEMPLATE: &str = "הצהרת נכונות פרטים.docx";

/// Prefix of overflow declaration output files.
pub const DECLARATION_OUTPUT_PREFIX: &str = "הצהרת נכונות פרטים";

/// Extension of template and output documents.
pub const DOCX_EXTENSION: &str = "docx";

/// MIME type of Word documents, used for mail attachments.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Name of the archive offered for download.
pub const ARCHIVE_FILE_NAME: &str = "documents.zip";

/// Default STARTTLS submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default mail subject.
pub const DEFAULT_MAIL_SUBJECT: &str = "מסמכים אוטומטיים לעסקאות נדל״ן";

/// Default mail body.
pub const DEFAULT_MAIL_BODY: &str = "להודעה זו מצורפים המסמכים שהוכנו עבורך במערכת לייצור מסמכים אוטומטיים מבית א. דוידוב ושות׳, עורכי דין";

/// Outbound mail identity.
///
/// NOTE: Do NOT derive `Debug` on this struct, `password` would be exposed.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

impl MailConfig {
    /// Read the mail identity from the environment.
    ///
    /// Returns `Ok(None)` when `SMTP_HOST` is not set, so the service can run
    /// without mail delivery. A host without credentials is a configuration
    /// error.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(smtp_host) = env::var("SMTP_HOST") else {
            return Ok(None);
        };

        let username = env::var("SMTP_USERNAME").unwrap_or_default();
        let password = env::var("SMTP_PASSWORD").unwrap_or_default();

        let mut missing = Vec::new();
        if username.is_empty() {
            missing.push("SMTP_USERNAME");
        }
        if password.is_empty() {
            missing.push("SMTP_PASSWORD");
        }
        if !missing.is_empty() {
            return Err(DocumentError::Config(format!(
                "SMTP_HOST is set but required vars are missing: {}",
                missing.join(", ")
            )));
        }

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| DocumentError::Config(format!("invalid SMTP_PORT: '{port}'")))?,
            Err(_) => DEFAULT_SMTP_PORT,
        };

        let from = env::var("MAIL_FROM").unwrap_or_else(|_| username.clone());
        let subject = env::var("MAIL_SUBJECT").unwrap_or_else(|_| DEFAULT_MAIL_SUBJECT.into());
        let body = env::var("MAIL_BODY").unwrap_or_else(|_| DEFAULT_MAIL_BODY.into());

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            username,
            password,
            from,
            subject,
            body,
        }))
    }

    /// Build a config with default subject and body.
    pub fn new(
        smtp_host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            smtp_host: smtp_host.into(),
            smtp_port: DEFAULT_SMTP_PORT,
            from: username.clone(),
            username,
            password: password.into(),
            subject: DEFAULT_MAIL_SUBJECT.into(),
            body: DEFAULT_MAIL_BODY.into(),
        }
    }

    pub fn with_port(mut self, smtp_port: u16) -> Self {
        self.smtp_port = smtp_port;
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }
}
