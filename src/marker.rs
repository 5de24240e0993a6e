use crate::format::FormatConfig;
use core::fmt::{self, Display};

/// A classification tag on an element that selects which [FormatConfig] applies to its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateMarker {
    /// Rendered like `March 5, 2024`.
    Long,
    /// Rendered like `Mar 5`.
    Short,
}

impl DateMarker {
    /// Markers in the order their passes run.
    pub const ALL: [DateMarker; 2] = [DateMarker::Long, DateMarker::Short];

    /// The configuration used to render dates under this marker.
    pub fn config(&self) -> &'static FormatConfig {
        match self {
            DateMarker::Long => &FormatConfig::LONG_FORM,
            DateMarker::Short => &FormatConfig::SHORT_FORM,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            DateMarker::Long => "long",
            DateMarker::Short => "short",
        }
    }
}

impl Display for DateMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The `class` token that binds each [DateMarker] to elements of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    /// Class of long-form elements. Defaults to `date`.
    pub long: String,
    /// Class of short-form elements. Defaults to `short-date`.
    pub short: String,
}

impl ClassNames {
    /// The class name bound to `marker`.
    pub fn for_marker(&self, marker: DateMarker) -> &str {
        match marker {
            DateMarker::Long => &self.long,
            DateMarker::Short => &self.short,
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            long: "date".to_string(),
            short: "short-date".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_class_names() {
        let names = ClassNames::default();
        assert_eq!("date", names.for_marker(DateMarker::Long));
        assert_eq!("short-date", names.for_marker(DateMarker::Short));
    }

    #[test]
    fn test_marker_configs() {
        assert_eq!(&FormatConfig::LONG_FORM, DateMarker::Long.config());
        assert_eq!(&FormatConfig::SHORT_FORM, DateMarker::Short.config());
    }

    #[test]
    fn test_long_pass_runs_first() {
        assert_eq!([DateMarker::Long, DateMarker::Short], DateMarker::ALL);
    }
}
