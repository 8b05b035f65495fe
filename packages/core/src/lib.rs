//! Deal documents - fill Word templates with real-estate deal data.
//!
//! This crate turns one deal (parties, contract date, address and any other
//! template fields) into a set of Word documents and delivers them as a zip
//! archive or by email.
//!
//! # Example
//!
//! ```
//! use dealdocs_core::dates::normalize_contract_date;
//!
//! assert_eq!(normalize_contract_date("2024-03-05").unwrap(), "05/03/2024");
//! ```
//!
//! # Architecture
//!
//! - [`types`]: Deal values, party records and assembly reports
//! - [`parties`]: Human-readable party lists
//! - [`chunking`]: Overflow chunks of long party lists
//! - [`dates`]: Contract date normalization
//! - [`template`]: `.docx` placeholder rendering
//! - [`assembler`]: Renders all templates for one deal
//! - [`workspace`]: Per-run output directories
//! - [`archive`]: Zip delivery
//! - [`mail`]: Email delivery
//! - [`config`]: Constants and mail settings
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod archive;
pub mod assembler;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod mail;
pub mod parties;
pub mod template;
pub mod types;
pub mod workspace;

pub use assembler::DocumentAssembler;
pub use config::MailConfig;
pub use error::{DocumentError, Result};
pub use mail::{MailOutcome, MailSender, SmtpMailSender};
pub use types::{AssemblyReport, DealValues, DocumentKind, PartyRecord, PartyRole, RenderedDocument};
pub use workspace::{clear_output_dir, ClearOutcome, RunWorkspace};
