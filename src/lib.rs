//! # datetext
//!
//! Rewrites the text of date-bearing elements in rendered HTML into human-readable dates.
//!
//! A static page is often rendered with machine dates like `2024-03-05` inside marked elements,
//! and a small script turns them into something friendlier once the page loads. This crate does
//! that rewrite ahead of time, on the document itself.
//!
//! ## Examples
//!
//! Rewrite a page:
//!
//! ```
//! use datetext::prelude::*;
//!
//! let html = r#"<li>Posted <span class="date">2024-03-05</span>, edited <span class="short-date">2024-12-01</span></li>"#;
//! let (output, report) = DateTextRewriter::default().rewrite_html(html).unwrap();
//! assert_eq!(
//!     r#"<li>Posted <span class="date">March 5, 2024</span>, edited <span class="short-date">Dec 1</span></li>"#,
//!     output
//! );
//! assert!(report.is_clean());
//! ```
//!
//! Or, break down the steps:
//!
//! ```
//! use datetext::prelude::*;
//!
//! let mut document: Document = r#"<p class="date">2024-01-01</p><p class="date">soon</p>"#
//!     .parse()
//!     .unwrap();
//! let report = DateTextRewriter::default().rewrite(&mut document);
//! assert_eq!(1, report.rewritten.len());
//! assert_eq!("soon", report.skipped[0].text);
//! assert_eq!(
//!     r#"<p class="date">January 1, 2024</p><p class="date">soon</p>"#,
//!     document.to_string()
//! );
//! ```
//!
//! ## Markers
//!
//! | Marker | Default class | Input | Output | Format |
//! |---|---|---|---|---|
//! | [`DateMarker::Long`] | `date` | `2024-03-05` | `March 5, 2024` | [`FormatConfig::LONG_FORM`] |
//! | [`DateMarker::Short`] | `short-date` | `2024-03-05` | `Mar 5` | [`FormatConfig::SHORT_FORM`] |
//!
//! Class names can be changed with [`ClassNames`]. Output is always in the `en-US` locale.
//!
//! ## Dates That Don't Parse
//!
//! An element's trimmed text must be exactly `YYYY-MM-DD`. If it is not, or it names a day that
//! doesn't exist, the element is left as it is, a warning is logged through [`log`], and the
//! element is listed in [`RewriteReport::skipped`]. Other elements are still rewritten.
//!
//! Dates carry no time of day or timezone, so `2024-01-01` is always `January 1, 2024`.
#![warn(missing_docs)]

mod date;
mod document;
mod error;
mod format;
pub mod html;
mod marker;
mod rewrite;

pub use crate::date::CalendarDate;
pub use crate::document::{Document, Element, Node, Visit};
pub use crate::error::{DateError, HtmlError};
pub use crate::format::{FormatConfig, MonthStyle};
pub use crate::marker::{ClassNames, DateMarker};
pub use crate::rewrite::{DateTextRewriter, RewriteReport, Rewritten, Skipped};

/// A convenience module appropriate for glob imports (`use datetext::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::CalendarDate;
    #[doc(no_inline)]
    pub use crate::ClassNames;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::DateMarker;
    #[doc(no_inline)]
    pub use crate::DateTextRewriter;
    #[doc(no_inline)]
    pub use crate::Document;
    #[doc(no_inline)]
    pub use crate::FormatConfig;
    #[doc(no_inline)]
    pub use crate::HtmlError;
    #[doc(no_inline)]
    pub use crate::RewriteReport;
}
