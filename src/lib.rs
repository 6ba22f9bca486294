//! rcaloop - Closed-loop RCA governance tool
//!
//! This library provides the core functionality for ingesting incident
//! reports, extracting structured records by heading-based segmentation,
//! tracking remedial actions to closure, and detecting recurring
//! incidents via text similarity.

pub mod cli;
pub mod extract;
pub mod search;
pub mod storage;
pub mod tui;
pub mod workspace;

/// Re-export commonly used types
pub use extract::{ExtractedReport, HeadingCatalogue, SectionExtractor};
pub use search::{find_similar, SimilarMatch};
pub use storage::Database;
pub use workspace::Workspace;

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "rcaloop";
