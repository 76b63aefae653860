//! Tolerant HTML reader and serializer for [`Document`].
//!
//! The reader does not implement the full HTML tree-construction algorithm.
//! It handles the constructs price pages are made of: doctype, comments,
//! void and self-closing elements, quoted, unquoted and bare attributes,
//! raw-text `script`/`style` bodies, character references and the implied
//! end tags of paragraphs, list items, definition terms, options and table
//! parts. Unmatched end tags are ignored; an end tag closes every element
//! opened after its match.

use super::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const TABLE_SCOPE: &[&str] = &["table", "caption", "td", "th", "template", "html"];
const BUTTON_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];
/// Start tags that close an open `p` in button scope.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "details", "dialog", "dir",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre",
    "section", "summary", "table", "ul",
];

/// An element whose end tag is implied by a later start tag.
struct ImpliedEnd {
    /// Start tags that trigger the rule.
    starts: &'static [&'static str],
    /// Open elements the start tag closes.
    closes: &'static [&'static str],
    /// Open elements the search for `closes` does not cross.
    barriers: &'static [&'static str],
}

const IMPLIED_ENDS: &[ImpliedEnd] = &[
    ImpliedEnd {
        starts: &["li"],
        closes: &["li"],
        barriers: &["ul", "ol", "menu", "table", "caption", "td", "th", "template", "html"],
    },
    ImpliedEnd {
        starts: &["dt", "dd"],
        closes: &["dt", "dd"],
        barriers: &["dl", "table", "caption", "td", "th", "template", "html"],
    },
    ImpliedEnd {
        starts: &["option", "optgroup"],
        closes: &["option"],
        barriers: &["select", "datalist", "optgroup"],
    },
    ImpliedEnd {
        starts: &["optgroup"],
        closes: &["optgroup"],
        barriers: &["select", "datalist"],
    },
    ImpliedEnd {
        starts: &["td", "th"],
        closes: &["td", "th"],
        barriers: &["tr", "table", "template", "html"],
    },
    ImpliedEnd {
        starts: &["tr"],
        closes: &["tr"],
        barriers: &["tbody", "thead", "tfoot", "table", "template", "html"],
    },
    ImpliedEnd {
        starts: &["tbody", "thead", "tfoot"],
        closes: &["tbody", "thead", "tfoot"],
        barriers: TABLE_SCOPE,
    },
    ImpliedEnd {
        starts: CLOSES_PARAGRAPH,
        closes: &["p"],
        barriers: BUTTON_SCOPE,
    },
];

/// Parses `input` into a new [`Document`].
pub fn parse_html(input: &str) -> Document {
    let mut doc = Document::new();
    let mut open: Vec<NodeId> = vec![doc.root()];
    let bytes = input.as_bytes();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        let rest = &input[pos..];
        let is_comment = rest.starts_with("<!--");
        let is_declaration = !is_comment && (rest.starts_with("<!") || rest.starts_with("<?"));
        let is_end_tag = rest.starts_with("</") && starts_with_alpha(&rest[2..]);
        let is_start_tag = starts_with_alpha(&rest[1..]);
        if !(is_comment || is_declaration || is_end_tag || is_start_tag) {
            pos += 1;
            continue;
        }

        flush_text(&mut doc, &open, &input[text_start..pos]);
        let parent = current(&open);
        pos += if is_comment {
            read_comment(&mut doc, parent, rest)
        } else if is_declaration {
            read_declaration(&mut doc, parent, rest)
        } else if is_end_tag {
            read_end_tag(&doc, &mut open, rest)
        } else {
            read_start_tag(&mut doc, &mut open, rest)
        };
        text_start = pos;
    }
    flush_text(&mut doc, &open, &input[text_start..]);
    doc
}

fn current(open: &[NodeId]) -> NodeId {
    open.last().copied().unwrap_or(NodeId(0))
}

fn starts_with_alpha(text: &str) -> bool {
    text.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
}

fn flush_text(doc: &mut Document, open: &[NodeId], raw: &str) {
    if raw.is_empty() {
        return;
    }
    doc.append_text(current(open), &decode_entities(raw));
}

fn read_comment(doc: &mut Document, parent: NodeId, rest: &str) -> usize {
    let body = &rest[4..];
    let (content, consumed) = match body.find("-->") {
        Some(end) => (&body[..end], 4 + end + 3),
        None => (body, rest.len()),
    };
    let node = doc.create_comment(content);
    doc.append_child(parent, node);
    consumed
}

fn read_declaration(doc: &mut Document, parent: NodeId, rest: &str) -> usize {
    let (inner, consumed) = match rest.find('>') {
        Some(end) => (&rest[2..end], end + 1),
        None => (&rest[2..], rest.len()),
    };
    let node = match inner.get(..7) {
        Some(keyword) if keyword.eq_ignore_ascii_case("doctype") => {
            doc.create_doctype(inner[7..].trim())
        }
        _ => doc.create_comment(inner),
    };
    doc.append_child(parent, node);
    consumed
}

fn read_end_tag(doc: &Document, open: &mut Vec<NodeId>, rest: &str) -> usize {
    let name_len = tag_name_len(&rest[2..]);
    let name = rest[2..2 + name_len].to_ascii_lowercase();
    let consumed = rest.find('>').map(|end| end + 1).unwrap_or(rest.len());

    if let Some(depth) = open
        .iter()
        .rposition(|id| doc.element(*id).is_some_and(|data| data.tag == name))
    {
        open.truncate(depth);
    }
    consumed
}

fn read_start_tag(doc: &mut Document, open: &mut Vec<NodeId>, rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let name_len = tag_name_len(&rest[1..]);
    let name = rest[1..1 + name_len].to_ascii_lowercase();
    close_implied(doc, open, &name);
    let element = doc.create_element(&name);
    doc.append_child(current(open), element);

    let mut pos = 1 + name_len;
    let mut self_closing = false;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos) {
            None => break,
            Some(b'>') => {
                pos += 1;
                break;
            }
            Some(b'/') => {
                pos += 1;
                if bytes.get(pos) == Some(&b'>') {
                    self_closing = true;
                    pos += 1;
                    break;
                }
                continue;
            }
            Some(_) => {}
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let attr_name = rest[name_start..pos].to_ascii_lowercase();

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let start = pos + 1;
                    let end = rest[start..]
                        .find(char::from(quote))
                        .map(|offset| start + offset)
                        .unwrap_or(bytes.len());
                    value = decode_attribute(&rest[start..end]);
                    pos = (end + 1).min(bytes.len());
                }
                _ => {
                    let start = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    value = decode_attribute(&rest[start..pos]);
                }
            }
        }

        if !attr_name.is_empty() && doc.attribute(element, &attr_name).is_none() {
            doc.set_attribute(element, &attr_name, value);
        }
    }

    if VOID_ELEMENTS.contains(&name.as_str()) || self_closing {
        return pos;
    }
    if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
        return pos + read_raw_text(doc, element, &name, &rest[pos..]);
    }
    open.push(element);
    pos
}

/// Pops the elements a `name` start tag implicitly ends.
fn close_implied(doc: &Document, open: &mut Vec<NodeId>, name: &str) {
    for rule in IMPLIED_ENDS.iter().filter(|rule| rule.starts.contains(&name)) {
        close_in_scope(doc, open, rule.closes, rule.barriers);
    }
}

fn close_in_scope(doc: &Document, open: &mut Vec<NodeId>, closes: &[&str], barriers: &[&str]) {
    for depth in (1..open.len()).rev() {
        let Some(tag) = doc.element(open[depth]).map(|data| data.tag.as_str()) else {
            continue;
        };
        if closes.contains(&tag) {
            open.truncate(depth);
            return;
        }
        if barriers.contains(&tag) {
            return;
        }
    }
}

/// Copies a raw-text body verbatim and consumes its end tag.
fn read_raw_text(doc: &mut Document, element: NodeId, name: &str, rest: &str) -> usize {
    let closing = format!("</{name}");
    let lowered = rest.to_ascii_lowercase();
    match lowered.find(&closing) {
        Some(end) => {
            doc.append_text(element, &rest[..end]);
            let after = &rest[end..];
            end + after.find('>').map(|idx| idx + 1).unwrap_or(after.len())
        }
        None => {
            doc.append_text(element, rest);
            rest.len()
        }
    }
}

fn tag_name_len(text: &str) -> usize {
    text.bytes()
        .take_while(|b| !b.is_ascii_whitespace() && !matches!(b, b'/' | b'>'))
        .count()
}

/// Decodes character references in text content using the full HTML named
/// reference table. Unknown references are kept as written.
pub fn decode_entities(raw: &str) -> String {
    htmlize::unescape(raw).into_owned()
}

/// Like [`decode_entities`], with the attribute-value rule for legacy
/// references written without a trailing semicolon.
pub fn decode_attribute(raw: &str) -> String {
    htmlize::unescape_attribute(raw).into_owned()
}

/// Serializes the whole document back to markup.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    for child in doc.children(doc.root()) {
        write_node(doc, *child, &mut out);
    }
    out
}

/// Serializes one node including its own tags.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Document => {
            for child in node.children() {
                write_node(doc, *child, out);
            }
        }
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Text(text) => {
            let raw_parent = node
                .parent()
                .and_then(|parent| doc.element(parent))
                .is_some_and(|data| RAW_TEXT_ELEMENTS.contains(&data.tag.as_str()));
            if raw_parent {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            for attr in &data.attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&data.tag.as_str()) {
                return;
            }
            for child in node.children() {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
