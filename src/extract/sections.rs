//! Heading-based section extraction
//!
//! Slices a linearized fragment sequence into named fields:
//! - Locates known section headings from a fixed catalogue
//! - A section spans from its heading to the next recognized heading
//! - Decomposes the long-term-solutions narrative into action items
//!
//! This code never errors: absent headings and degenerate documents
//! degrade to empty strings and empty lists.

use serde::{Deserialize, Serialize};

/// Forward-scan limit when looking for a single-value field's content.
/// Guards against runaway scans over malformed documents where a value
/// heading is followed by a large unrelated narrative block.
const VALUE_LOOKAHEAD: usize = 12;

/// How many leading fragments the title heuristic inspects.
const TITLE_SCAN_LIMIT: usize = 25;

/// A title candidate must be longer than this...
const TITLE_MIN_LEN: usize = 8;

/// ...and shorter than this.
const TITLE_MAX_LEN: usize = 140;

/// Action lines at or below this trimmed length are discarded as noise.
const ACTION_MIN_LEN: usize = 8;

/// Leading characters stripped from action lines before filtering.
const BULLET_MARKERS: &[char] = &[' ', '\t', '\u{2022}', '-'];

/// The fixed set of section labels recognized in a report.
///
/// A fragment is a heading iff its trimmed, lowercased text equals or
/// starts with one of these labels (lowercased). Entries are scanned in
/// catalogue order and the first match wins, so a fragment matching
/// several labels by prefix resolves deterministically.
#[derive(Debug, Clone)]
pub struct HeadingCatalogue {
    entries: Vec<String>,
}

impl HeadingCatalogue {
    /// Build a catalogue from explicit labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: labels.into_iter().map(|l| l.into()).collect(),
        }
    }

    /// The standard incident-report catalogue.
    pub fn standard() -> Self {
        Self::new([
            "Incident Date",
            "Incident / Problem",
            "Services Affected",
            "Customer Impact",
            "Description",
            "Root Cause",
            "Workaround",
            "Workaround (Actions to restore service)",
            "Long Term Solutions",
            "Long Term Solutions (Actions to prevent recurrence)",
            "Contributing Process Factors",
            "Stage",
        ])
    }

    /// The catalogue labels, in order.
    pub fn labels(&self) -> &[String] {
        &self.entries
    }

    /// Whether a fragment is recognized as any catalogue heading.
    pub fn is_heading(&self, fragment: &str) -> bool {
        self.matched_label(fragment).is_some()
    }

    /// The first catalogue label the fragment matches, if any.
    pub fn matched_label(&self, fragment: &str) -> Option<&str> {
        let text = fragment.trim().to_lowercase();
        self.entries
            .iter()
            .find(|label| text.starts_with(&label.to_lowercase()))
            .map(|label| label.as_str())
    }
}

/// The structured record derived from one report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReport {
    pub title: String,
    pub incident_date: String,
    pub services_affected: String,
    pub root_cause: String,
    pub workaround: String,
    pub long_term_solutions: String,
    pub action_items: Vec<String>,
    /// Newline-joined complete fragment sequence, kept for audit/search.
    pub full_text: String,
}

/// Slices a fragment sequence into named sections.
pub struct SectionExtractor<'a> {
    fragments: &'a [String],
    catalogue: &'a HeadingCatalogue,
}

impl<'a> SectionExtractor<'a> {
    pub fn new(fragments: &'a [String], catalogue: &'a HeadingCatalogue) -> Self {
        Self {
            fragments,
            catalogue,
        }
    }

    /// Index of the first fragment matching `key` (equality or prefix,
    /// case-insensitive), or None.
    pub fn find_heading(&self, key: &str) -> Option<usize> {
        let key = key.trim().to_lowercase();
        self.fragments
            .iter()
            .position(|f| f.trim().to_lowercase().starts_with(&key))
    }

    /// The first non-heading fragment within a bounded window after the
    /// heading for `key`. Empty string when the heading is absent or no
    /// value follows within the window.
    pub fn value_after(&self, key: &str) -> String {
        let Some(at) = self.find_heading(key) else {
            return String::new();
        };

        self.fragments
            .iter()
            .skip(at + 1)
            .take(VALUE_LOOKAHEAD)
            .find(|f| !f.trim().is_empty() && !self.catalogue.is_heading(f))
            .map(|f| f.trim().to_string())
            .unwrap_or_default()
    }

    /// The newline-joined fragments strictly between the heading for `key`
    /// and the next recognized heading (or the end of the sequence).
    /// Empty string when the heading is absent.
    pub fn section(&self, key: &str) -> String {
        let Some(at) = self.find_heading(key) else {
            return String::new();
        };

        let body = &self.fragments[at + 1..];
        let end = body
            .iter()
            .position(|f| self.catalogue.is_heading(f))
            .unwrap_or(body.len());

        body[..end].join("\n").trim().to_string()
    }

    /// Title guess: the first leading fragment of plausible title length.
    /// Falls back to the externally supplied document name.
    pub fn title(&self, fallback: &str) -> String {
        self.fragments
            .iter()
            .take(TITLE_SCAN_LIMIT)
            .find(|f| {
                let len = f.trim().len();
                len > TITLE_MIN_LEN && len < TITLE_MAX_LEN
            })
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Derive the full structured record. `doc_name` is the externally
    /// supplied identifier used when no title candidate qualifies.
    pub fn extract(&self, doc_name: &str) -> ExtractedReport {
        let long_term_solutions = self.section("Long Term Solutions");

        ExtractedReport {
            title: self.title(doc_name),
            incident_date: self.value_after("Incident Date"),
            services_affected: self.value_after("Services Affected"),
            root_cause: self.section("Root Cause"),
            workaround: self.section("Workaround"),
            action_items: split_action_items(&long_term_solutions),
            long_term_solutions,
            full_text: self.fragments.join("\n"),
        }
    }
}

/// Decompose a long-term-solutions narrative into discrete action items.
///
/// Splits on line breaks, strips leading bullet markers and surrounding
/// whitespace, and keeps only lines longer than the noise threshold.
pub fn split_action_items(narrative: &str) -> Vec<String> {
    narrative
        .lines()
        .map(|line| line.trim_start_matches(BULLET_MARKERS).trim())
        .filter(|line| line.len() > ACTION_MIN_LEN)
        .map(|line| line.to_string())
        .collect()
}
