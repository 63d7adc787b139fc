//! Reflect Schema
//!
//! Generates JSON-Schema-shaped documents from runtime type descriptions of
//! configuration models, enriched with human-readable descriptions from an
//! XML documentation export.
//!
//! ## Features
//!
//! - **Type Registry**: models opt in through [`Describe`], usually via
//!   [`describe_struct!`] and [`describe_enum!`]
//! - **Classification**: every type maps to a JSON type plus constraints
//!   (integer ranges, `date-time` format, enum names)
//! - **Documentation**: `<member name="P:Ns.Type.Member"><summary>` entries
//!   become `description` keywords
//! - **Defaults**: leaf values of a live (or default-constructed) instance
//!   become `default` keywords
//! - **Export**: checksum-aware writing of the generated document
//!
//! ## Architecture
//!
//! ```text
//! reflect      TypeDescriptor / MemberDescriptor registry
//!    │
//! classify     JSON type, constraints, element type
//!    │
//! docs ──────▶ generator ──▶ export
//!               │
//!            SchemaNode (serde_json::Value)
//! ```
//!
//! ## Example
//!
//! ```
//! use reflect_schema::{describe_struct, SchemaGenerator};
//!
//! #[derive(Default)]
//! struct Config {
//!     port: u16,
//!     motd: Option<String>,
//! }
//!
//! describe_struct!(Config as "Server.Config" with Config::default {
//!     property port as "Port": u16,
//!     property motd as "Motd": Option<String>,
//! });
//!
//! let schema = SchemaGenerator::without_docs().generate_value::<Config>(None);
//! assert_eq!(schema["title"], "Config");
//! assert_eq!(schema["required"], serde_json::json!(["Port"]));
//! ```

pub mod checksum;
pub mod classify;
pub mod config;
pub mod docs;
pub mod error;
pub mod export;
pub mod generator;
pub mod reflect;

pub use checksum::Checksum;
pub use classify::{Constraints, TypeCategory, TypeClassifier};
pub use config::{DocsConfig, GeneratorConfig, OutputConfig, OutputFormat};
pub use docs::{DocKind, DocMatch, DocumentationIndex};
pub use error::{Result, SchemaError};
pub use export::{export_schema, write_schema, ExportOutcome};
pub use generator::{SchemaGenerator, SchemaNode, VisitedTypes, RESERVED_MARKER_KEY};
pub use reflect::{
    construct_default, Describe, EnumInfo, IntegerWidth, MemberDescriptor, MemberKind,
    MemberValue, TypeDescriptor, TypeKind,
};
