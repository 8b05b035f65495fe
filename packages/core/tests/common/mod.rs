//! Shared fixtures: minimal Word documents written to temporary directories.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use dealdocs_core::{DealValues, PartyRecord};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

/// Build the bytes of a `.docx` whose body holds one paragraph per line.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Write a template into `dir`.
pub fn write_template(dir: &Path, name: &str, paragraphs: &[&str]) {
    fs::write(dir.join(name), docx_bytes(paragraphs)).unwrap();
}

/// Read `word/document.xml` of a rendered document.
pub fn document_xml(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

pub fn party(last: &str, first: &str, id: &str) -> PartyRecord {
    PartyRecord::new(last, first, "ת.ז.", id)
}

/// Deal with `sellers` and `buyers` parties at 123 Main St.
pub fn deal(sellers: usize, buyers: usize) -> DealValues {
    DealValues {
        contract_date: "2024-03-05".into(),
        address: "123 Main St".into(),
        sellers: (1..=sellers)
            .map(|i| party(&format!("Seller{i}"), "S", &i.to_string()))
            .collect(),
        buyers: (1..=buyers)
            .map(|i| party(&format!("Buyer{i}"), "B", &(100 + i).to_string()))
            .collect(),
        extra: serde_json::Map::new(),
    }
}
