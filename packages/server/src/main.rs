use std::sync::Arc;

use dealdocs_core::{MailSender, SmtpMailSender};
use dealdocs_server::{app, AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    if !app_config.templates_dir.is_dir() {
        tracing::warn!(
            path = %app_config.templates_dir.display(),
            "template directory does not exist"
        );
    }

    let mailer: Option<Arc<dyn MailSender>> = match app_config.mail.as_ref() {
        Some(mail_config) => match SmtpMailSender::new(mail_config) {
            Ok(sender) => Some(Arc::new(sender)),
            Err(e) => {
                tracing::error!(error = %e, "failed to set up mail transport");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let addr = app_config.bind_addr;
    let app = app(AppState::new(app_config, mailer));

    tracing::info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to bind on {addr}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
