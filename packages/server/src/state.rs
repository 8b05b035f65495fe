use std::sync::Arc;

use dealdocs_core::{DocumentAssembler, MailSender};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<DocumentAssembler>,
    pub mailer: Option<Arc<dyn MailSender>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, mailer: Option<Arc<dyn MailSender>>) -> Self {
        Self {
            assembler: Arc::new(DocumentAssembler::new(config.templates_dir.clone())),
            mailer,
            config: Arc::new(config),
        }
    }
}
