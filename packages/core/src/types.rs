//! Core data types for deal documents.
//!
//! Field names follow the keys used inside the Word templates, which is why
//! they serialize in upper case.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity record of a buyer or seller.
///
/// Keys other than the four identity fields (a phone number, an ownership
/// share) are kept in `extra` and reach the templates unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PartyRecord {
    pub last_name: String,
    pub first_name: String,
    pub id_kind: String,
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PartyRecord {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        id_kind: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            id_kind: id_kind.into(),
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// Side of the deal a party list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Sellers,
    Buyers,
}

impl PartyRole {
    /// Template key holding the party records.
    #[must_use]
    pub fn records_key(&self) -> &'static str {
        match self {
            Self::Sellers => "SELLERS_DICT",
            Self::Buyers => "BUYERS_DICT",
        }
    }

    /// Template key holding the joined party text.
    #[must_use]
    pub fn list_key(&self) -> &'static str {
        match self {
            Self::Sellers => "SELLERS_LIST",
            Self::Buyers => "BUYERS_LIST",
        }
    }

    /// Label used in overflow declaration file names.
    #[must_use]
    pub fn overflow_label(&self) -> &'static str {
        match self {
            Self::Sellers => "מוכרים נוספים",
            Self::Buyers => "רוכשים נוספים",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sellers => "sellers",
            Self::Buyers => "buyers",
        }
    }
}

/// Field values driving one document-generation run.
///
/// Fields not known to the assembler are kept in `extra` and passed to the
/// templates untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealValues {
    #[serde(rename = "CONTRACT_DATE")]
    pub contract_date: String,

    #[serde(rename = "ADDRESS")]
    pub address: String,

    #[serde(rename = "SELLERS_DICT", default)]
    pub sellers: Vec<PartyRecord>,

    #[serde(rename = "BUYERS_DICT", default)]
    pub buyers: Vec<PartyRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DealValues {
    /// Parties of the given role.
    #[must_use]
    pub fn parties(&self, role: PartyRole) -> &[PartyRecord] {
        match role {
            PartyRole::Sellers => &self.sellers,
            PartyRole::Buyers => &self.buyers,
        }
    }
}

/// Kind of a document written by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentKind {
    /// One per template in the template directory.
    Primary { template: String },
    /// Declaration for a chunk of parties beyond the first document.
    Overflow { role: PartyRole, index: usize },
}

/// A document written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub path: PathBuf,
    #[serde(flatten)]
    pub kind: DocumentKind,
}

/// Documents produced by one assembly run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssemblyReport {
    pub documents: Vec<RenderedDocument>,
}

impl AssemblyReport {
    pub fn primary(&self) -> impl Iterator<Item = &RenderedDocument> {
        self.documents
            .iter()
            .filter(|d| matches!(d.kind, DocumentKind::Primary { .. }))
    }

    pub fn overflow(&self, role: PartyRole) -> impl Iterator<Item = &RenderedDocument> {
        self.documents
            .iter()
            .filter(move |d| matches!(d.kind, DocumentKind::Overflow { role: r, .. } if r == role))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
