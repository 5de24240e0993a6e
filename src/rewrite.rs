use crate::{
    date::CalendarDate,
    document::{Document, Visit},
    error::{DateError, HtmlError},
    html,
    marker::{ClassNames, DateMarker},
};
use log::{debug, info, warn};

/// A marked element whose text could not be read as a date. Its text was left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The marker of the pass that skipped the element.
    pub marker: DateMarker,
    /// The element's (untrimmed) text content.
    pub text: String,
    /// Why the text is not a date.
    pub reason: DateError,
}

/// A marked element whose text was replaced with a rendered date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The marker of the pass that rewrote the element.
    pub marker: DateMarker,
    /// The element's (untrimmed) text content before the rewrite.
    pub text: String,
    /// The text it was replaced with.
    pub rendered: String,
}

/// What a rewrite did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Elements whose text was replaced, in the order they were met.
    pub rewritten: Vec<Rewritten>,
    /// Marked elements that were left alone, in the order they were met.
    pub skipped: Vec<Skipped>,
}

impl RewriteReport {
    /// Whether every marked element was rewritten.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Rewrites the text of date-bearing elements into `en-US` dates.
///
/// A pass is made for each [DateMarker], long-form first. Each pass visits the elements carrying
/// the marker's class in document order, reads the element's trimmed text as a `YYYY-MM-DD`
/// [CalendarDate], and replaces the element's children with the rendered date. An element whose
/// text is not a date is left untouched and recorded in the [RewriteReport]; the pass carries on
/// with the next element.
///
/// ```
/// use datetext::DateTextRewriter;
///
/// let html = r#"<p><span class="date">2024-03-05</span> <b class="short-date">2024-12-01</b></p>"#;
/// let (output, report) = DateTextRewriter::default().rewrite_html(html).unwrap();
/// assert_eq!(
///     r#"<p><span class="date">March 5, 2024</span> <b class="short-date">Dec 1</b></p>"#,
///     output
/// );
/// assert_eq!(2, report.rewritten.len());
/// ```
///
/// Rewritten text is no longer a `YYYY-MM-DD` date, so running the rewriter over its own output
/// skips every element it already rewrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTextRewriter {
    classes: ClassNames,
}

impl DateTextRewriter {
    /// A rewriter matching elements by `classes`.
    pub fn new(classes: ClassNames) -> Self {
        Self { classes }
    }

    /// The class names this rewriter matches on.
    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    /// Rewrites every marked element of `document` in place.
    pub fn rewrite(&self, document: &mut Document) -> RewriteReport {
        let mut report = RewriteReport::default();
        for marker in DateMarker::ALL {
            self.rewrite_pass(document, marker, &mut report);
        }
        info!(
            "rewrote {} date element(s), skipped {}",
            report.rewritten.len(),
            report.skipped.len()
        );
        report
    }

    fn rewrite_pass(
        &self,
        document: &mut Document,
        marker: DateMarker,
        report: &mut RewriteReport,
    ) {
        let class = self.classes.for_marker(marker);
        let config = marker.config();
        debug!("{} pass over class `{}`", marker, class);

        document.visit_elements_mut(|element| {
            if !element.has_class(class) {
                return Visit::Descend;
            }
            let text = element.text_content();
            match text.parse::<CalendarDate>() {
                Ok(date) => {
                    let rendered = config.render(&date);
                    debug!("<{}> {:?} -> {:?}", element.name(), text.trim(), rendered);
                    element.set_text_content(&rendered);
                    report.rewritten.push(Rewritten {
                        marker,
                        text,
                        rendered,
                    });
                    // the children we would descend into are gone
                    Visit::Skip
                }
                Err(reason) => {
                    warn!(
                        "leaving {} date <{} class=\"{}\"> as is: {}",
                        marker,
                        element.name(),
                        class,
                        reason
                    );
                    report.skipped.push(Skipped {
                        marker,
                        text,
                        reason,
                    });
                    Visit::Descend
                }
            }
        });
    }

    /// Parses `html`, rewrites it, and writes it back out.
    ///
    /// # Errors
    ///
    /// - If `html` can't be parsed, returns the [HtmlError] from [html::parse].
    pub fn rewrite_html(&self, html: &str) -> Result<(String, RewriteReport), HtmlError> {
        let mut document = html::parse(html)?;
        let report = self.rewrite(&mut document);
        Ok((document.to_string(), report))
    }
}
