//! Reading HTML into a [Document].
//!
//! The tokenizer is `quick-xml` in its most forgiving configuration, plus the few HTML rules that
//! matter for keeping a rendered page intact: void elements, raw-text elements, and end tags that
//! are left out or don't match anything.

use crate::{
    document::{split_classes, Document, Element, Node},
    error::HtmlError,
};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::str::{self, FromStr};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose contents are not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that implicitly close an open sibling of the same name, as in `<li>one<li>two`.
const SELF_NESTING_ELEMENTS: &[&str] = &["li", "p", "dt", "dd", "option", "tr", "td", "th"];

/// Start tags that close an open `<p>`, as in `<p>text<div>block</div>`.
const PARAGRAPH_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Open elements past which a later start tag can't reach an open `<p>`.
const PARAGRAPH_SCOPE_BOUNDARIES: &[&str] = &[
    "button", "table", "td", "th", "caption", "object", "applet", "marquee", "template", "html",
];

fn is_one_of(name: &str, names: &[&str]) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(name))
}

fn class_tokens(start: &BytesStart) -> Vec<String> {
    start
        .html_attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(b"class"))
        .map(|attr| split_classes(&String::from_utf8_lossy(&attr.value)))
        .unwrap_or_default()
}

fn element_from_start(start: &BytesStart, self_closing: bool) -> Result<Element, HtmlError> {
    let name = str::from_utf8(start.name().as_ref())?.to_string();
    let inner = str::from_utf8(start)?;
    let start_tag = if self_closing {
        format!("<{}/>", inner)
    } else {
        format!("<{}>", inner)
    };
    Ok(Element {
        name,
        start_tag,
        classes: class_tokens(start),
        children: Vec::new(),
        end_tag: None,
        self_closing,
    })
}

/// Assembles the tree from a stream of tokens, keeping open elements on a stack.
#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Closes the innermost open element named `name`, along with anything still open inside it.
    /// Returns false when no such element is open.
    fn close(&mut self, name: &str, end_tag: String) -> bool {
        let Some(index) = self
            .open
            .iter()
            .rposition(|element| element.name.eq_ignore_ascii_case(name))
        else {
            return false;
        };
        while self.open.len() > index + 1 {
            if let Some(unclosed) = self.open.pop() {
                self.push(Node::Element(unclosed));
            }
        }
        if let Some(mut element) = self.open.pop() {
            element.end_tag = Some(end_tag);
            self.push(Node::Element(element));
        }
        true
    }

    /// Opening one of [SELF_NESTING_ELEMENTS] closes an open element of the same name that is
    /// still the innermost one, without an end tag.
    fn close_open_sibling(&mut self, name: &str) {
        if !is_one_of(name, SELF_NESTING_ELEMENTS) {
            return;
        }
        if matches!(self.open.last(), Some(last) if last.name.eq_ignore_ascii_case(name)) {
            if let Some(sibling) = self.open.pop() {
                self.push(Node::Element(sibling));
            }
        }
    }

    /// Opening one of [PARAGRAPH_CLOSERS] closes an open `<p>` in scope, and anything still open
    /// inside it, without end tags.
    fn close_open_paragraph(&mut self, name: &str) {
        if !is_one_of(name, PARAGRAPH_CLOSERS) {
            return;
        }
        let Some(index) = self.open.iter().rposition(|element| {
            element.name.eq_ignore_ascii_case("p")
                || is_one_of(&element.name, PARAGRAPH_SCOPE_BOUNDARIES)
        }) else {
            return;
        };
        if !self.open[index].name.eq_ignore_ascii_case("p") {
            return;
        }
        while self.open.len() > index {
            if let Some(unclosed) = self.open.pop() {
                self.push(Node::Element(unclosed));
            }
        }
    }

    fn finish(mut self) -> Document {
        while let Some(unclosed) = self.open.pop() {
            self.push(Node::Element(unclosed));
        }
        Document::new(self.roots)
    }
}

/// Parses `html` into a [Document]. Writing the document back out (with
/// [`to_string`](ToString::to_string)) gives back `html`, except that a doctype is always spelled
/// `<!DOCTYPE ...>`.
///
/// # Errors
///
/// - If the tokenizer gives up on the markup, returns [HtmlError::Syntax].
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    let mut builder = TreeBuilder::default();
    let mut offset = 0;
    while let Some(resume) = parse_markup(html, offset, &mut builder)? {
        offset = resume;
    }
    Ok(builder.finish())
}

/// Tokenizes `html[offset..]` into `builder`. The tokenizer can't be trusted inside a raw-text
/// element, so this stops after one and returns the offset just past its end tag. Returns `None`
/// at the end of input.
fn parse_markup(
    html: &str,
    offset: usize,
    builder: &mut TreeBuilder,
) -> Result<Option<usize>, HtmlError> {
    let mut reader = Reader::from_str(&html[offset..]);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    loop {
        let event = reader.read_event().map_err(|source| HtmlError::Syntax {
            position: offset as u64 + reader.buffer_position(),
            source,
        })?;
        match event {
            Event::Start(start) => {
                let mut element = element_from_start(&start, false)?;
                builder.close_open_paragraph(&element.name);
                if is_one_of(&element.name, VOID_ELEMENTS) {
                    builder.push(Node::Element(element));
                } else if is_one_of(&element.name, RAW_TEXT_ELEMENTS) {
                    let body_start = offset + reader.buffer_position() as usize;
                    let (body_end, resume) = raw_text_end(html, body_start, &element.name);
                    if body_end > body_start {
                        let body = &html[body_start..body_end];
                        element.children.push(Node::Markup(body.to_string()));
                    }
                    if resume > body_end {
                        element.end_tag = Some(html[body_end..resume].to_string());
                    }
                    builder.push(Node::Element(element));
                    return Ok(Some(resume));
                } else {
                    builder.close_open_sibling(&element.name);
                    builder.open.push(element);
                }
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, true)?;
                builder.close_open_paragraph(&element.name);
                builder.push(Node::Element(element));
            }
            Event::End(end) => {
                let qname = end.name();
                let name = str::from_utf8(qname.as_ref())?;
                let end_tag = format!("</{}>", str::from_utf8(&end)?);
                if !builder.close(name, end_tag.clone()) {
                    builder.push(Node::Markup(end_tag));
                }
            }
            Event::Text(text) => builder.push(Node::Text(str::from_utf8(&text)?.to_string())),
            Event::CData(cdata) => builder.push(Node::Markup(format!(
                "<![CDATA[{}]]>",
                str::from_utf8(&cdata)?
            ))),
            Event::Comment(comment) => builder.push(Node::Markup(format!(
                "<!--{}-->",
                str::from_utf8(&comment)?
            ))),
            Event::DocType(doctype) => builder.push(Node::Markup(format!(
                "<!DOCTYPE {}>",
                str::from_utf8(&doctype)?
            ))),
            Event::Decl(decl) => {
                builder.push(Node::Markup(format!("<?{}?>", str::from_utf8(&decl)?)))
            }
            Event::PI(pi) => builder.push(Node::Markup(format!("<?{}?>", str::from_utf8(&pi)?))),
            Event::Eof => return Ok(None),
        }
    }
}

/// Finds where the body of raw-text element `name` starting at `body_start` ends. Returns the
/// offset of its end tag and the offset just past it. Both are `html.len()` if there is no end tag.
fn raw_text_end(html: &str, body_start: usize, name: &str) -> (usize, usize) {
    let bytes = html.as_bytes();
    let name_len = name.len();
    for (index, _) in html[body_start..].match_indices("</") {
        let tag_start = body_start + index;
        let name_start = tag_start + 2;
        let Some(candidate) = bytes.get(name_start..name_start + name_len) else {
            break;
        };
        let terminated = matches!(
            bytes.get(name_start + name_len),
            None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
        );
        if candidate.eq_ignore_ascii_case(name.as_bytes()) && terminated {
            let resume = html[name_start..]
                .find('>')
                .map_or(html.len(), |gt| name_start + gt + 1);
            return (tag_start, resume);
        }
    }
    (html.len(), html.len())
}

impl FromStr for Document {
    type Err = HtmlError;

    /// See [parse].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn page() -> &'static str {
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "  <meta charset=\"utf-8\">\n",
            "  <title>Posts &amp; notes</title>\n",
            "  <script>if (a < b && c > d) { go(); }</script>\n",
            "  <style>p > span { color: red; }</style>\n",
            "</head>\n",
            "<body>\n",
            "  <!-- generated -->\n",
            "  <ul>\n",
            "    <li><a href=\"/a\">First</a> <span class=\"date\">2024-03-05</span>\n",
            "    <li><a href=\"/b\">Second</a><br><span class='short-date'>2024-12-01</span>\n",
            "  </ul>\n",
            "  <img src=\"x.png\" alt=\"\"/>\n",
            "  <input disabled>\n",
            "</body>\n",
            "</html>\n",
        )
    }

    #[rstest]
    fn test_unmodified_page_is_reproduced(page: &str) {
        let document = parse(page).unwrap();
        assert_eq!(page, document.to_string());
    }

    #[rstest]
    fn test_finds_marked_elements(page: &str) {
        let document: Document = page.parse().unwrap();
        let long = document.elements_with_class("date");
        let short = document.elements_with_class("short-date");
        assert_eq!(1, long.len());
        assert_eq!("2024-03-05", long[0].text_content());
        assert_eq!(1, short.len());
        assert_eq!("2024-12-01", short[0].text_content());
    }

    #[test]
    fn test_void_elements_have_no_children() {
        let document = parse("<p><br><span>x</span></p>").unwrap();
        let Node::Element(p) = &document.nodes()[0] else {
            panic!("expected an element");
        };
        assert_eq!(2, p.children().len());
        assert!(matches!(&p.children()[0], Node::Element(br) if br.children().is_empty()));
    }

    #[rstest]
    #[case("<div class=\"date\"><script>x < y</script>2024-01-01</div>")]
    #[case("<div class=\"date\"><SCRIPT>if (a<b) {}</script >2024-01-01</div>")]
    #[case("<div class=\"date\"><style>a</styles {}</style>2024-01-01</div>")]
    fn test_raw_text_body_is_not_text(#[case] html: &str) {
        let document = parse(html).unwrap();
        let found = document.elements_with_class("date");
        assert_eq!("2024-01-01", found[0].text_content());
        assert_eq!(html, document.to_string());
    }

    #[test]
    fn test_unterminated_script_runs_to_end() {
        let html = "<p>a</p><script>let x = 1 < 2;";
        assert_eq!(html, parse(html).unwrap().to_string());
    }

    #[rstest]
    #[case("<div><p>one<p>two</div>")]
    #[case("<div>stray</span></div>")]
    #[case("<section><span class=\"date\"/></section>")]
    #[case("<DIV Class=\"date\">2024-01-01</DIV>")]
    #[case("<![CDATA[raw]]><?xml-stylesheet href=\"a.css\"?>text")]
    #[case("<p>unclosed")]
    fn test_odd_markup_is_reproduced(#[case] html: &str) {
        assert_eq!(html, parse(html).unwrap().to_string());
    }

    #[rstest]
    #[case("<p class=\"date\">2024-03-05<div>x</div>")]
    #[case("<p class=\"date\">2024-03-05<hr>more")]
    #[case("<p class=\"date\"><b>2024-03-05</b><ul><li>x</ul></p>")]
    #[case("<p class=\"date\">2024-03-05<p>next")]
    fn test_block_start_closes_paragraph(#[case] html: &str) {
        let document = parse(html).unwrap();
        let found = document.elements_with_class("date");
        assert_eq!("2024-03-05", found[0].text_content());
        assert_eq!(html, document.to_string());
    }

    #[test]
    fn test_paragraph_inside_button_stays_open() {
        let document = parse("<p class=\"date\"><button>2024-<div>03-05</div></button></p>")
            .unwrap();
        let found = document.elements_with_class("date");
        assert_eq!("2024-03-05", found[0].text_content());
    }

    #[rstest]
    #[case("<p>a</p><!-- x", 8)]
    #[case("<p>a</p><![CDATA[x", 8)]
    #[case("<p>a</p><div", 8)]
    #[case("<script>x < y</script><!-- x", 22)]
    fn test_syntax_error(#[case] html: &str, #[case] bad_markup_at: u64) {
        match parse(html) {
            Err(HtmlError::Syntax { position, .. }) => {
                assert!(position >= bad_markup_at, "{position} < {bad_markup_at}");
                assert!(position <= html.len() as u64, "{position} past end");
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_class_attribute_name_is_case_insensitive() {
        let document = parse("<DIV Class=\"a date\">2024-01-01</DIV>").unwrap();
        assert_eq!(1, document.elements_with_class("date").len());
    }

    #[test]
    fn test_repeated_list_items_are_siblings() {
        let document = parse("<ul><li class=\"date\">2024-01-01<li class=\"date\">2024-01-02</ul>")
            .unwrap();
        let texts: Vec<String> = document
            .elements_with_class("date")
            .iter()
            .map(|e| e.text_content())
            .collect();
        assert_eq!(vec!["2024-01-01", "2024-01-02"], texts);
    }
}
