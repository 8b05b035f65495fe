#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use dealdocs_core::config::DECLARATION_TEMPLATE;
use dealdocs_core::mail::test_support::MockMailSender;
use dealdocs_core::MailSender;
use dealdocs_server::{app, AppConfig, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub fn docx_bytes(text: &str) -> Vec<u8> {
    let document = format!(
        "<w:document><w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:body></w:document>"
    );
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).expect("start");
    writer.write_all(b"<Types/>").expect("write");
    writer.start_file("word/document.xml", options).expect("start");
    writer.write_all(document.as_bytes()).expect("write");
    writer.finish().expect("finish").into_inner()
}

/// Temporary template and output directories for one test.
pub struct TestEnv {
    pub templates: TempDir,
    pub outputs: TempDir,
}

impl TestEnv {
    /// A contract template plus the declaration template.
    pub fn new() -> Self {
        let env = Self::empty();
        env.add_template("contract.docx", "{{ ADDRESS }} {{ CONTRACT_DATE }} {{ SELLERS_LIST }}");
        env.add_template(DECLARATION_TEMPLATE, "{{ SELLERS_LIST }}");
        env
    }

    pub fn empty() -> Self {
        Self {
            templates: tempfile::tempdir().expect("templates dir"),
            outputs: tempfile::tempdir().expect("outputs dir"),
        }
    }

    pub fn add_template(&self, name: &str, text: &str) {
        fs::write(self.templates.path().join(name), docx_bytes(text)).expect("write template");
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::new(self.templates.path(), self.outputs.path())
    }

    pub fn app(&self, mailer: Option<Arc<MockMailSender>>) -> Router {
        let mailer = mailer.map(|m| m as Arc<dyn MailSender>);
        app(AppState::new(self.config(), mailer))
    }

    /// Entries left in the outputs root after requests finished.
    pub fn leftover_outputs(&self) -> usize {
        fs::read_dir(self.outputs.path()).expect("read outputs").count()
    }
}

fn party(last: &str) -> Value {
    json!({"LAST_NAME": last, "FIRST_NAME": "Dana", "ID_KIND": "ID", "ID": "1"})
}

/// Deal values with three sellers and one buyer.
pub fn deal_values() -> Value {
    json!({
        "CONTRACT_DATE": "2024-03-05",
        "ADDRESS": "123 Main St",
        "SELLERS_DICT": [party("Cohen"), party("Levi"), party("Mizrahi")],
        "BUYERS_DICT": [party("Peretz")]
    })
}

pub fn create_request(method: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/create")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("response")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub fn zip_names(bytes: Vec<u8>) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}
