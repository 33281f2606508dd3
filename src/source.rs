//! Source units
//!
//! A [`SourceUnit`] owns the original lines of one file plus a sparse overlay of edits.
//! Everything else in this module is a pure helper the unit leans on:
//!
//! - [`classification`] decides what a line is under a [`FormatMode`] and trims it.
//! - [`tabs`] expands tab characters for column-accurate measurement.
//! - [`workspace`] computes the short, workspace-relative filename.
//! - [`comments`] carries recognized comments out to an external indexer.
//! - [`reader`] splits the file into lines in bounded chunks.
//!
//! Column positions throughout this module are counted in characters, not bytes.

pub mod classification;
pub mod comments;
pub mod error;
pub mod reader;
pub mod tabs;
pub mod unit;
pub mod workspace;

pub use classification::{classify_line, ClassifiedLine, ClassifyOptions, FormatMode, LineKind};
pub use comments::{ChannelSink, CommentEvent, CommentSink};
pub use error::SourceError;
pub use reader::LoadCancel;
pub use tabs::{expand_tabs, TAB_SIZE};
pub use unit::{load_many, ContentVersion, SourceId, SourceOptions, SourceUnit};
pub use workspace::short_workspace_filename;
