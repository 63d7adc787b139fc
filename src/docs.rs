//! Documentation Index
//!
//! Loads a member documentation export (the XML file a .NET compiler emits next
//! to an assembly) and answers description lookups by stable identifier:
//!
//! ```text
//! T:Ns.Config          type
//! P:Ns.Config.Port     property
//! F:Ns.Config.Note     field
//! ```
//!
//! An index that failed to load is inert: every lookup returns `None`.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::reflect::MemberKind;

/// Identifier kind in a documentation export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Type,
    Property,
    Field,
}

impl DocKind {
    /// Identifier prefix (`T`, `P` or `F`)
    pub fn prefix(&self) -> char {
        match self {
            DocKind::Type => 'T',
            DocKind::Property => 'P',
            DocKind::Field => 'F',
        }
    }

    /// Build the identifier for a type or one of its members.
    ///
    /// Member kinds need a member name; `None` is returned without one.
    pub fn identifier(&self, type_full_name: &str, member: Option<&str>) -> Option<String> {
        match (self, member) {
            (DocKind::Type, _) => Some(format!("T:{}", type_full_name)),
            (_, Some(member)) => Some(format!("{}:{}.{}", self.prefix(), type_full_name, member)),
            (_, None) => None,
        }
    }
}

impl From<MemberKind> for DocKind {
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Property => DocKind::Property,
            MemberKind::Field => DocKind::Field,
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKind::Type => write!(f, "type"),
            DocKind::Property => write!(f, "property"),
            DocKind::Field => write!(f, "field"),
        }
    }
}

/// A fuzzy search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMatch<'a> {
    pub id: &'a str,
    pub summary: Option<&'a str>,
    pub score: i64,
}

/// Read-only index over a documentation export
#[derive(Debug, Clone, Default)]
pub struct DocumentationIndex {
    /// Identifier -> cleaned summary; `None` for members without a summary
    entries: HashMap<String, Option<String>>,
    source: Option<PathBuf>,
}

impl DocumentationIndex {
    /// An inert index
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load an export, falling back to an inert index on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(index) => {
                tracing::debug!(path = %path.display(), entries = index.len(), "Loaded documentation export");
                index
            }
            Err(err) => {
                tracing::warn!(error = %err, "Descriptions disabled");
                Self::empty()
            }
        }
    }

    /// Load an export, reporting why it is unavailable
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let missing = |reason: String| SchemaError::MissingDocumentation {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(missing("file not found".to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| missing(e.to_string()))?;
        let mut index = Self::from_xml(&content).map_err(|e| missing(e.to_string()))?;
        index.source = Some(path.to_path_buf());
        Ok(index)
    }

    /// Parse an export from XML text
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml.trim_start_matches('\u{feff}'));
        let mut entries = HashMap::new();
        let mut member: Option<MemberState> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                invalid_export(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(start) => match member.as_mut() {
                    Some(state) => state.open(&start),
                    None if start.name().as_ref() == b"member" => {
                        member = Some(MemberState::new(member_name(&start)?));
                    }
                    None => {}
                },
                Event::Empty(start) => match member.as_mut() {
                    Some(state) => state.empty(&start),
                    None if start.name().as_ref() == b"member" => {
                        if let Some(id) = member_name(&start)? {
                            entries.entry(id).or_insert(None);
                        }
                    }
                    None => {}
                },
                Event::End(_) => {
                    if let Some(state) = member.as_mut() {
                        if state.close() {
                            let finished = member.take();
                            if let Some(MemberState { id: Some(id), summary, .. }) = finished {
                                entries
                                    .entry(id)
                                    .or_insert_with(|| summary.map(|raw| clean_summary(&raw)));
                            }
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some(state) = member.as_mut().filter(|s| s.in_summary) {
                        let text = text.unescape().map_err(invalid_export)?;
                        state.push(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(state) = member.as_mut().filter(|s| s.in_summary) {
                        let data = data.into_inner();
                        state.push(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            entries,
            source: None,
        })
    }

    /// Description for a type or member, if the export has a non-empty summary
    pub fn lookup(&self, kind: DocKind, type_full_name: &str, member: Option<&str>) -> Option<&str> {
        let id = kind.identifier(type_full_name, member)?;
        self.lookup_id(&id)
    }

    /// Description by raw identifier (e.g. `P:Ns.Config.Port`)
    pub fn lookup_id(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)?
            .as_deref()
            .filter(|summary| !summary.is_empty())
    }

    /// Whether lookups can never succeed
    pub fn is_inert(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path the index was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of identifiers of a given kind
    pub fn count(&self, kind: DocKind) -> usize {
        let prefix = format!("{}:", kind.prefix());
        self.entries.keys().filter(|id| id.starts_with(&prefix)).count()
    }

    /// All identifiers with their summaries, sorted by identifier
    pub fn entries(&self) -> Vec<(&str, Option<&str>)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(id, summary)| (id.as_str(), summary.as_deref()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Search identifiers (fuzzy)
    pub fn search(&self, query: &str, limit: usize) -> Vec<DocMatch<'_>> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<DocMatch<'_>> = self
            .entries
            .iter()
            .filter_map(|(id, summary)| {
                matcher.fuzzy_match(id, query).map(|score| DocMatch {
                    id: id.as_str(),
                    summary: summary.as_deref(),
                    score,
                })
            })
            .collect();

        // Score descending, identifier for ties
        results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(b.id)));
        results.truncate(limit);
        results
    }
}

/// Collapse a raw summary to a single line: split on line breaks, trim each
/// line, drop blank lines and join with single spaces.
pub fn clean_summary(raw: &str) -> String {
    raw.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn invalid_export(err: impl fmt::Display) -> SchemaError {
    SchemaError::InvalidDocumentation(err.to_string())
}

fn member_name(start: &BytesStart<'_>) -> Result<Option<String>> {
    match start.try_get_attribute("name").map_err(invalid_export)? {
        Some(attribute) => {
            let value = attribute.unescape_value().map_err(invalid_export)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Parser state inside one `<member>` element
struct MemberState {
    id: Option<String>,
    /// Element depth below `<member>`
    depth: usize,
    summary: Option<String>,
    in_summary: bool,
}

impl MemberState {
    fn new(id: Option<String>) -> Self {
        Self {
            id,
            depth: 0,
            summary: None,
            in_summary: false,
        }
    }

    fn is_first_summary(&self, start: &BytesStart<'_>) -> bool {
        self.depth == 0 && self.summary.is_none() && start.name().as_ref() == b"summary"
    }

    fn open(&mut self, start: &BytesStart<'_>) {
        if self.is_first_summary(start) {
            self.summary = Some(String::new());
            self.in_summary = true;
        }
        self.depth += 1;
    }

    fn empty(&mut self, start: &BytesStart<'_>) {
        if self.is_first_summary(start) {
            self.summary = Some(String::new());
        }
    }

    /// Returns true when the `<member>` element itself closed
    fn close(&mut self) -> bool {
        if self.depth == 0 {
            return true;
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.in_summary = false;
        }
        false
    }

    fn push(&mut self, text: &str) {
        if let Some(summary) = self.summary.as_mut() {
            summary.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>Game</name>
    </assembly>
    <members>
        <member name="T:Ns.Config">
            <summary>
            Server configuration.
            </summary>
        </member>
        <member name="P:Ns.Config.Port">
            <summary>
            Port the server
              listens on for

            player connections.
            </summary>
            <remarks>Ignored.</remarks>
        </member>
        <member name="F:Ns.Config.Motd">
            <summary>Message of the <see cref="T:Ns.Day"/> day &amp; night.</summary>
        </member>
        <member name="P:Ns.Config.Port">
            <summary>Shadowed duplicate.</summary>
        </member>
        <member name="P:Ns.Config.Blank">
            <summary>
            </summary>
        </member>
        <member name="M:Ns.Config.Save"/>
    </members>
</doc>"#;

    #[test]
    fn test_identifiers() {
        assert_eq!(DocKind::Type.identifier("Ns.Config", None).unwrap(), "T:Ns.Config");
        assert_eq!(
            DocKind::Property.identifier("Ns.Config", Some("Port")).unwrap(),
            "P:Ns.Config.Port"
        );
        assert_eq!(
            DocKind::Field.identifier("Ns.Config", Some("Motd")).unwrap(),
            "F:Ns.Config.Motd"
        );
        assert!(DocKind::Field.identifier("Ns.Config", None).is_none());
    }

    #[test]
    fn test_multiline_summary_is_joined() {
        let index = DocumentationIndex::from_xml(EXPORT).unwrap();
        assert_eq!(
            index.lookup(DocKind::Property, "Ns.Config", Some("Port")),
            Some("Port the server listens on for player connections.")
        );
        assert_eq!(index.lookup(DocKind::Type, "Ns.Config", None), Some("Server configuration."));
    }

    #[test]
    fn test_inline_tags_and_entities() {
        let index = DocumentationIndex::from_xml(EXPORT).unwrap();
        assert_eq!(
            index.lookup(DocKind::Field, "Ns.Config", Some("Motd")),
            Some("Message of the  day & night.")
        );
    }

    #[test]
    fn test_blank_and_missing_summaries() {
        let index = DocumentationIndex::from_xml(EXPORT).unwrap();
        assert_eq!(index.lookup(DocKind::Property, "Ns.Config", Some("Blank")), None);
        assert_eq!(index.lookup_id("M:Ns.Config.Save"), None);
        assert_eq!(index.lookup(DocKind::Property, "Ns.Other", Some("Port")), None);
        // kind must match the prefix
        assert_eq!(index.lookup(DocKind::Field, "Ns.Config", Some("Port")), None);
    }

    #[test]
    fn test_missing_file_is_inert() {
        let index = DocumentationIndex::load("/nonexistent/Assembly-CSharp.xml");
        assert!(index.is_inert());
        assert_eq!(index.lookup(DocKind::Type, "Ns.Config", None), None);

        let err = DocumentationIndex::try_load("/nonexistent/Assembly-CSharp.xml").unwrap_err();
        assert!(matches!(err, SchemaError::MissingDocumentation { .. }));
    }

    #[test]
    fn test_malformed_export_is_rejected() {
        let result = DocumentationIndex::from_xml("<doc><members><member name=\"T:X\"></doc>");
        assert!(result.is_err());
    }

    #[test]
    fn test_counts_and_search() {
        let index = DocumentationIndex::from_xml(EXPORT).unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(index.count(DocKind::Type), 1);
        assert_eq!(index.count(DocKind::Property), 2);
        assert_eq!(index.count(DocKind::Field), 1);

        let hits = index.search("ConfigPort", 3);
        assert_eq!(hits.first().map(|hit| hit.id), Some("P:Ns.Config.Port"));
    }

    #[test]
    fn test_clean_summary() {
        assert_eq!(clean_summary("\r\n  one\r\n\r\n   two  \n"), "one two");
        assert_eq!(clean_summary("   "), "");
    }
}
