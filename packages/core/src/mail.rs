//! Email delivery of the rendered documents.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

use crate::archive::list_output_files;
use crate::config::{MailConfig, DOCX_CONTENT_TYPE, DOCX_EXTENSION};
use crate::error::{DocumentError, Result};

/// A file attached to the outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Read every `.docx` in `dir` as an attachment, sorted by name.
pub fn collect_attachments(dir: &Path) -> Result<Vec<MailAttachment>> {
    let mut attachments = Vec::new();
    for path in list_output_files(dir)? {
        let is_docx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION));
        if !is_docx {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        attachments.push(MailAttachment {
            file_name,
            content: fs::read(&path)?,
        });
    }
    Ok(attachments)
}

/// Trait for mail transports, enabling mocking in tests.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send one message carrying `attachments` to `recipient`.
    async fn send(&self, recipient: &str, attachments: Vec<MailAttachment>) -> Result<()>;
}

/// Parse a single address, e.g. `deals@example.com` or `Name <a@b.co>`.
pub fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| DocumentError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

/// SMTP transport authenticated as the configured sender identity.
///
/// NOTE: Do NOT derive `Debug` on this struct: the transport holds the
/// SMTP credentials.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    subject: String,
    body: String,
}

impl SmtpMailSender {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from = parse_mailbox(&config.from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| DocumentError::Config(format!("invalid SMTP relay: {e}")))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            subject: config.subject.clone(),
            body: config.body.clone(),
        })
    }
}

/// Build a plain-text message with the documents attached.
pub fn build_message(
    from: &Mailbox,
    recipient: &str,
    subject: &str,
    body: &str,
    attachments: Vec<MailAttachment>,
) -> Result<Message> {
    let content_type = ContentType::parse(DOCX_CONTENT_TYPE)
        .map_err(|e| DocumentError::MailBuild(e.to_string()))?;

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
    for attachment in attachments {
        multipart = multipart.singlepart(
            Attachment::new(attachment.file_name).body(attachment.content, content_type.clone()),
        );
    }

    Message::builder()
        .from(from.clone())
        .to(parse_mailbox(recipient)?)
        .subject(subject)
        .multipart(multipart)
        .map_err(|e| DocumentError::MailBuild(e.to_string()))
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, recipient: &str, attachments: Vec<MailAttachment>) -> Result<()> {
        let count = attachments.len();
        let message = build_message(&self.from, recipient, &self.subject, &self.body, attachments)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DocumentError::Transport(e.to_string()))?;
        tracing::info!(recipient, attachments = count, "sent documents by email");
        Ok(())
    }
}

/// Result of a mail delivery attempt, reported to the caller as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailOutcome {
    pub result: String,
    pub result_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MailOutcome {
    pub const SUCCESS_CODE: u16 = 200;
    pub const FAILURE_CODE: u16 = 300;

    pub fn success(email: impl Into<String>) -> Self {
        Self {
            result: "success".into(),
            result_code: Self::SUCCESS_CODE,
            email: Some(email.into()),
        }
    }

    pub fn failure(error: &DocumentError) -> Self {
        let result = match error {
            DocumentError::Transport(_) => error.to_string(),
            other => format!("Failed to send email: {other}"),
        };
        Self {
            result,
            result_code: Self::FAILURE_CODE,
            email: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result_code == Self::SUCCESS_CODE
    }
}

/// Send the attachments once; errors become a failure outcome.
pub async fn send_documents(
    sender: &dyn MailSender,
    recipient: &str,
    attachments: Vec<MailAttachment>,
) -> MailOutcome {
    match sender.send(recipient, attachments).await {
        Ok(()) => MailOutcome::success(recipient),
        Err(e) => {
            tracing::warn!(recipient, error = %e, "mail delivery failed");
            MailOutcome::failure(&e)
        }
    }
}

/// Test utilities for mail delivery.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// A message captured by [`MockMailSender`].
    #[derive(Debug, Clone)]
    pub struct SentMail {
        pub recipient: String,
        pub attachments: Vec<MailAttachment>,
    }

    /// Mock mail transport that records messages or fails with a fixed
    /// transport error.
    #[derive(Default)]
    pub struct MockMailSender {
        sent: Mutex<Vec<SentMail>>,
        failure: Option<String>,
    }

    impl MockMailSender {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(message: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failure: Some(message.to_string()),
            }
        }

        pub fn sent(&self) -> Vec<SentMail> {
            self.sent.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl MailSender for MockMailSender {
        async fn send(&self, recipient: &str, attachments: Vec<MailAttachment>) -> Result<()> {
            if let Some(message) = &self.failure {
                return Err(DocumentError::Transport(message.clone()));
            }
            parse_mailbox(recipient)?;
            let mut sent = self
                .sent
                .lock()
                .map_err(|e| DocumentError::Transport(format!("mock lock poisoned: {e}")))?;
            sent.push(SentMail {
                recipient: recipient.to_string(),
                attachments,
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::MockMailSender;
    use super::*;

    fn attachment(name: &str) -> MailAttachment {
        MailAttachment {
            file_name: name.into(),
            content: b"PK".to_vec(),
        }
    }

    #[test]
    fn test_collect_attachments_only_docx() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.docx"), b"b").unwrap();
        fs::write(dir.path().join("a.docx"), b"a").unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();

        let attachments = collect_attachments(dir.path()).unwrap();
        let names: Vec<&str> = attachments.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.docx", "b.docx"]);
        assert_eq!(attachments[0].content, b"a");
    }

    #[tokio::test]
    async fn test_send_documents_success() {
        let sender = MockMailSender::new();
        let outcome =
            send_documents(&sender, "buyer@example.com", vec![attachment("a.docx")]).await;

        assert!(outcome.is_success());
        assert_eq!(outcome, MailOutcome::success("buyer@example.com"));
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "buyer@example.com");
        assert_eq!(sent[0].attachments.len(), 1);
    }

    #[tokio::test]
    async fn test_send_documents_transport_failure() {
        let sender = MockMailSender::failing("connection refused");
        let outcome = send_documents(&sender, "buyer@example.com", vec![]).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.result_code, MailOutcome::FAILURE_CODE);
        assert_eq!(outcome.result, "Failed to send email: connection refused");
        assert!(outcome.email.is_none());
    }

    #[tokio::test]
    async fn test_send_documents_invalid_address() {
        let sender = MockMailSender::new();
        let outcome = send_documents(&sender, "not an address", vec![]).await;

        assert!(!outcome.is_success());
        assert!(outcome.result.starts_with("Failed to send email: Invalid email address"));
        assert!(sender.sent().is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(MailOutcome::success("a@b.co")).unwrap();
        assert_eq!(json["result"], "success");
        assert_eq!(json["result_code"], 200);
        assert_eq!(json["email"], "a@b.co");

        let failure = MailOutcome::failure(&DocumentError::Transport("timeout".into()));
        let json = serde_json::to_value(failure).unwrap();
        assert_eq!(json["result_code"], 300);
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_build_message_with_attachments() {
        let from = parse_mailbox("deals@example.com").unwrap();
        let message = build_message(
            &from,
            "buyer@example.com",
            "Documents",
            "See attached",
            vec![attachment("חוזה 123 Main St.docx")],
        )
        .unwrap();

        let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(formatted.contains("To: buyer@example.com"));
        assert!(formatted.contains("From: deals@example.com"));
        assert!(formatted.contains(DOCX_CONTENT_TYPE));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let from = parse_mailbox("deals@example.com").unwrap();
        let result = build_message(&from, "nope", "s", "b", vec![]);
        assert!(matches!(result, Err(DocumentError::InvalidAddress { .. })));
    }

    #[test]
    fn test_parse_mailbox() {
        assert_eq!(
            parse_mailbox("buyer@example.com").unwrap().email.to_string(),
            "buyer@example.com"
        );
        assert!(matches!(
            parse_mailbox("not an address"),
            Err(DocumentError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_smtp_sender_rejects_bad_from() {
        let config = MailConfig::new("smtp.example.com", "user", "secret").with_from("nope");
        assert!(matches!(
            SmtpMailSender::new(&config),
            Err(DocumentError::InvalidAddress { .. })
        ));
    }
}
