/// Errors from reading a [`CalendarDate`](crate::CalendarDate) out of element text.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DateError {
    /// The text does not have the `YYYY-MM-DD` shape.
    #[error("Date text `{text}` should be in the form `YYYY-MM-DD`")]
    Malformed {
        /// The trimmed text that was rejected.
        text: String,
    },

    /// The text has the right shape but names a day that does not exist, like `2023-02-29`.
    #[error("Year ({year}), month ({month}), and day ({day}) cannot be made into a valid date")]
    OutOfRange {
        /// Parsed year.
        year: i32,
        /// Parsed month, `1`-based.
        month: u32,
        /// Parsed day of the month.
        day: u32,
    },
}

/// Errors from reading an HTML document.
#[derive(thiserror::Error, Debug)]
pub enum HtmlError {
    /// The tokenizer could not make sense of the markup.
    #[error("Document is not well-formed enough to rewrite (at byte {position}): {source}")]
    Syntax {
        /// Byte offset the tokenizer had reached.
        position: u64,
        /// The underlying tokenizer error.
        #[source]
        source: quick_xml::Error,
    },

    /// Markup or text was not valid UTF-8.
    #[error("Document should be valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
