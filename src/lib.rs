//! # dbdoc
//!
//! Generates schema documentation from a live relational database.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Connection parameters + table filter              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [metadata]
//! ┌─────────────────────────────────────────────────────────┐
//! │     MetadataSource (PostgreSQL, MySQL, SQLite)           │
//! │     tables, primary keys, columns, comments              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model + filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 SchemaSnapshot                           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!              ┌───────────┴───────────┐
//!              ▼ [workbook]            ▼ [engine]
//! ┌────────────────────────┐ ┌──────────────────────────────┐
//! │ cover, revision, index │ │ external HTML / Word /       │
//! │ and one sheet per table│ │ Markdown renderer            │
//! └────────────────────────┘ └──────────────────────────────┘
//!              │
//!              ▼ [output]
//!       <dir>/<title>.xlsx
//! ```
//!
//! [`generate::generate`] runs the whole pipeline.

pub mod config;
pub mod engine;
pub mod filter;
pub mod generate;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod output;
pub mod workbook;

pub use generate::{generate, generate_with_source, preview_tables, GenerateError, GenerateRequest};
