//! A small owned element tree: just enough of a DOM to find marked elements in document order and
//! replace their text, while writing everything else back out exactly as it was read.

use core::fmt::{self, Display};
use quick_xml::escape::{escape, resolve_html5_entity, unescape_with};
use std::borrow::Cow;

/// One node of a [Document].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element and its children.
    Element(Element),

    /// Character data, held as it appears in the source (entities still escaped).
    Text(String),

    /// Anything that is copied through untouched and has no text content: comments, doctypes,
    /// CDATA sections, processing instructions, stray end tags, and the bodies of `<script>` and
    /// `<style>`.
    Markup(String),
}

impl Node {
    /// Text node holding `text`, escaping it as needed.
    pub fn text(text: &str) -> Self {
        Node::Text(escape(text).into_owned())
    }

    fn push_text_content(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.push_text_content(out);
                }
            }
            Node::Text(raw) => {
                let decoded = unescape_with(raw, resolve_html5_entity)
                    .unwrap_or(Cow::Borrowed(raw.as_str()));
                out.push_str(&decoded);
            }
            Node::Markup(_) => {}
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => Display::fmt(element, f),
            Node::Text(raw) | Node::Markup(raw) => f.write_str(raw),
        }
    }
}

/// An element: its start tag, the class tokens read from it, its children, and its end tag if it
/// had one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) start_tag: String,
    pub(crate) classes: Vec<String>,
    pub(crate) children: Vec<Node>,
    pub(crate) end_tag: Option<String>,
    pub(crate) self_closing: bool,
}

impl Element {
    /// A new, empty element named `name` with an optional `class` attribute.
    ///
    /// ```
    /// use datetext::Element;
    ///
    /// let element = Element::new("time", Some("date pinned"));
    /// assert!(element.has_class("pinned"));
    /// assert_eq!(r#"<time class="date pinned"></time>"#, element.to_string());
    /// ```
    pub fn new(name: &str, class: Option<&str>) -> Self {
        let start_tag = match class {
            Some(class) => format!("<{} class=\"{}\">", name, escape(class)),
            None => format!("<{}>", name),
        };
        Self {
            name: name.to_string(),
            start_tag,
            classes: class.map(split_classes).unwrap_or_default(),
            children: Vec::new(),
            end_tag: Some(format!("</{}>", name)),
            self_closing: false,
        }
    }

    /// Appends `child`, returning `self` so trees can be built inline.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// The tag name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element's children, in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether `class` is one of the whitespace-separated tokens of this element's `class`
    /// attribute. Matching is exact and case-sensitive.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The decoded text of every descendant text node, concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text_content(&mut out);
        }
        out
    }

    /// Replaces every child of this element with a single text node holding `text`.
    pub fn set_text_content(&mut self, text: &str) {
        self.children = vec![Node::text(text)];
        if self.self_closing {
            // `<span/>` can't hold children, so open it up into `<span></span>`
            let open = self.start_tag.trim_end_matches('>').trim_end_matches('/');
            self.start_tag = format!("{}>", open.trim_end());
            self.end_tag = Some(format!("</{}>", self.name));
            self.self_closing = false;
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.start_tag)?;
        for child in &self.children {
            Display::fmt(child, f)?;
        }
        if let Some(end_tag) = &self.end_tag {
            f.write_str(end_tag)?;
        }
        Ok(())
    }
}

pub(crate) fn split_classes(class: &str) -> Vec<String> {
    class.split_ascii_whitespace().map(str::to_string).collect()
}

/// What to do after visiting an element in [Document::visit_elements_mut].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Go on to the element's children.
    Descend,
    /// Skip the element's children.
    Skip,
}

/// A whole document: a sequence of top-level nodes.
///
/// Displaying a document writes it back out as markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
}

impl Document {
    /// A document made of `nodes`.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// The top-level nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Calls `visit` on every element in document order (pre-order). Children are visited after
    /// `visit` returns, so they see any change it made, unless it returns [Visit::Skip].
    pub fn visit_elements_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Element) -> Visit,
    {
        visit_nodes_mut(&mut self.nodes, &mut visit);
    }

    /// Every element carrying `class`, in document order.
    pub fn elements_with_class<'d>(&'d self, class: &str) -> Vec<&'d Element> {
        let mut found = Vec::new();
        collect_with_class(&self.nodes, class, &mut found);
        found
    }
}

fn visit_nodes_mut<F>(nodes: &mut [Node], visit: &mut F)
where
    F: FnMut(&mut Element) -> Visit,
{
    for node in nodes {
        if let Node::Element(element) = node {
            if visit(element) == Visit::Descend {
                visit_nodes_mut(&mut element.children, visit);
            }
        }
    }
}

fn collect_with_class<'d>(nodes: &'d [Node], class: &str, found: &mut Vec<&'d Element>) {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.has_class(class) {
                found.push(element);
            }
            collect_with_class(&element.children, class, found);
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            Display::fmt(node, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn document() -> Document {
        Document::new(vec![Node::Element(
            Element::new("ul", None)
                .with_child(Node::Element(
                    Element::new("li", Some("date")).with_child(Node::text("2024-03-05")),
                ))
                .with_child(Node::Element(
                    Element::new("li", Some("other date"))
                        .with_child(Node::text("2024-"))
                        .with_child(Node::Element(
                            Element::new("b", None).with_child(Node::text("04-06")),
                        )),
                ))
                .with_child(Node::Element(
                    Element::new("li", Some("dates")).with_child(Node::text("nope")),
                )),
        )])
    }

    #[rstest]
    fn test_elements_with_class_in_order(document: Document) {
        let texts: Vec<String> = document
            .elements_with_class("date")
            .iter()
            .map(|e| e.text_content())
            .collect();
        assert_eq!(vec!["2024-03-05", "2024-04-06"], texts);
    }

    #[rstest]
    fn test_class_match_is_exact(document: Document) {
        assert_eq!(1, document.elements_with_class("dates").len());
        assert!(document.elements_with_class("Date").is_empty());
        assert!(document.elements_with_class("dat").is_empty());
    }

    #[test]
    fn test_text_content_decodes_entities() {
        let element = Element::new("p", None)
            .with_child(Node::Text("Fish &amp; chips&nbsp;&#33;".to_string()))
            .with_child(Node::Text(" &bogus;".to_string()));
        // undecodable text is taken as written
        assert_eq!("Fish & chips\u{a0}! &bogus;", element.text_content());
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut element = Element::new("span", Some("date"))
            .with_child(Node::text("2024"))
            .with_child(Node::Element(Element::new("i", None)));
        element.set_text_content("a < b");
        assert_eq!("a < b", element.text_content());
        assert_eq!(r#"<span class="date">a &lt; b</span>"#, element.to_string());
    }

    #[test]
    fn test_set_text_content_opens_self_closing() {
        let mut element = Element {
            name: "span".to_string(),
            start_tag: r#"<span class="date" />"#.to_string(),
            classes: vec!["date".to_string()],
            children: Vec::new(),
            end_tag: None,
            self_closing: true,
        };
        element.set_text_content("Mar 5");
        assert_eq!(r#"<span class="date">Mar 5</span>"#, element.to_string());
    }

    #[rstest]
    fn test_visit_skip(mut document: Document) {
        let mut seen = Vec::new();
        document.visit_elements_mut(|element| {
            seen.push(element.name().to_string());
            if element.has_class("other") {
                Visit::Skip
            } else {
                Visit::Descend
            }
        });
        assert_eq!(vec!["ul", "li", "li", "li"], seen);
    }
}
