//! Tolerant HTML reader and writer for the in-memory tree.
//!
//! Handles what rendered pages actually contain: doctype, comments, void and
//! self-closing tags, raw text in `<script>`/`<style>`, character references
//! with or without the trailing `;`, and stray or implicitly closed end tags.

use super::tree::{HtmlDocument, NodeId, NodeKind};
use crate::error::{Error, Result};

pub(super) fn parse(source: &str) -> Result<HtmlDocument> {
    let mut doc = HtmlDocument::empty();
    let mut stack: Vec<NodeId> = vec![doc.root()];
    let bytes = source.as_bytes();
    let mut i = 0usize;
    let mut text_start = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'<' || !starts_markup(bytes, i) {
            i += 1;
            continue;
        }
        flush_text(&mut doc, &stack, source, text_start, i);

        if starts_with_at(bytes, i, b"<!--") {
            let body = i + 4;
            // `<!-->` and `<!--->` are complete, empty comments.
            let (end, next) = if starts_with_at(bytes, body, b">") {
                (body, body + 1)
            } else if starts_with_at(bytes, body, b"->") {
                (body, body + 2)
            } else {
                let end = find_subslice(bytes, body, b"-->").ok_or_else(|| Error::HtmlParse {
                    offset: i,
                    reason: "unclosed comment".into(),
                })?;
                (end, end + 3)
            };
            doc.append(top(&stack), NodeKind::Comment(source[body..end].to_string()));
            i = next;
        } else if bytes[i + 1] == b'!' || bytes[i + 1] == b'?' {
            let end = find_byte(bytes, i, b'>').ok_or_else(|| Error::HtmlParse {
                offset: i,
                reason: "unclosed declaration".into(),
            })?;
            let body = &source[i + 2..end];
            if body.get(..7).is_some_and(|kw| kw.eq_ignore_ascii_case("doctype")) {
                doc.append(top(&stack), NodeKind::Doctype(body[7..].trim().to_string()));
            }
            i = end + 1;
        } else if bytes[i + 1] == b'/' {
            let (tag, next) = parse_end_tag(source, i)?;
            close_element(&doc, &mut stack, &tag);
            i = next;
        } else {
            let (tag, attrs, self_closing, next) = parse_start_tag(source, i)?;
            i = next;
            if let Some(&open) = stack.last()
                && doc.tag_name(open).is_some_and(|open| closes_implicitly(open, &tag))
            {
                stack.pop();
            }
            let node = doc.append(top(&stack), NodeKind::element(tag.clone(), attrs));
            if is_raw_text_tag(&tag) {
                let close = find_end_tag_ci(bytes, i, tag.as_bytes()).unwrap_or(bytes.len());
                if close > i {
                    doc.append(node, NodeKind::Text(source[i..close].to_string()));
                }
                i = if close < bytes.len() {
                    parse_end_tag(source, close)?.1
                } else {
                    close
                };
            } else if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
        }
        text_start = i;
    }
    flush_text(&mut doc, &stack, source, text_start, bytes.len());
    Ok(doc)
}

fn top(stack: &[NodeId]) -> NodeId {
    stack[stack.len() - 1]
}

fn flush_text(doc: &mut HtmlDocument, stack: &[NodeId], source: &str, start: usize, end: usize) {
    if end > start {
        let text = decode_character_references(&source[start..end]);
        doc.append(top(stack), NodeKind::Text(text));
    }
}

/// Pop up to and including the nearest open `tag`; stray end tags are ignored.
fn close_element(doc: &HtmlDocument, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(pos) = stack
        .iter()
        .rposition(|&node| doc.tag_name(node) == Some(tag))
    else {
        return;
    };
    if pos > 0 {
        stack.truncate(pos);
    }
}

fn starts_markup(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i + 1) {
        Some(b'!') | Some(b'?') => true,
        Some(b'/') => bytes.get(i + 2).is_some_and(u8::is_ascii_alphabetic),
        Some(b) => b.is_ascii_alphabetic(),
        None => false,
    }
}

fn parse_start_tag(source: &str, at: usize) -> Result<(String, Vec<(String, String)>, bool, usize)> {
    let bytes = source.as_bytes();
    let mut i = at + 1;
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = source[tag_start..i].to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;
    loop {
        skip_ws(bytes, &mut i);
        let Some(&b) = bytes.get(i) else {
            return Err(Error::HtmlParse {
                offset: at,
                reason: format!("unclosed <{tag}> tag"),
            });
        };
        if b == b'>' {
            i += 1;
            break;
        }
        if b == b'/' {
            i += 1;
            if bytes.get(i) == Some(&b'>') {
                self_closing = true;
                i += 1;
                break;
            }
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        if i == name_start {
            // Junk such as a lone quote; skip it rather than stall.
            i += 1;
            continue;
        }
        let name = source[name_start..i].to_ascii_lowercase();

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(source, &mut i)?
        } else {
            String::new()
        };
        if !attrs.iter().any(|(existing, _)| *existing == name) {
            attrs.push((name, value));
        }
    }
    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(source: &str, at: usize) -> Result<(String, usize)> {
    let bytes = source.as_bytes();
    let mut i = at + 2;
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = source[tag_start..i].to_ascii_lowercase();
    let end = find_byte(bytes, i, b'>').ok_or_else(|| Error::HtmlParse {
        offset: at,
        reason: format!("unclosed </{tag}> tag"),
    })?;
    Ok((tag, end + 1))
}

fn parse_attr_value(source: &str, i: &mut usize) -> Result<String> {
    let bytes = source.as_bytes();
    let start_offset = *i;
    match bytes.get(*i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            *i += 1;
            let start = *i;
            let end = find_byte(bytes, start, quote).ok_or_else(|| Error::HtmlParse {
                offset: start_offset,
                reason: "unclosed quoted attribute value".into(),
            })?;
            *i = end + 1;
            Ok(decode_character_references(&source[start..end]))
        }
        _ => {
            let start = *i;
            while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
                *i += 1;
            }
            Ok(decode_character_references(&source[start..*i]))
        }
    }
}

/// Decode `&name;`, `&#NNN` and `&#xHH`, with the `;` optional. Unknown
/// references are kept verbatim.
pub(super) fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one_reference(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one_reference(src: &str) -> Option<(char, usize)> {
    let body = &src[1..];
    if let Some(numeric) = body.strip_prefix('#') {
        let (digits, radix, prefix) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let len = digits
            .bytes()
            .take_while(|b| char::from(*b).is_digit(radix))
            .count();
        if len == 0 {
            return None;
        }
        let value = u32::from_str_radix(&digits[..len], radix).ok()?;
        let ch = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((ch, 1 + prefix + len + semicolon));
    }

    let len = body.bytes().take_while(u8::is_ascii_alphanumeric).count();
    let ch = match &body[..len] {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{A0}',
        _ => return None,
    };
    let semicolon = usize::from(body[len..].starts_with(';'));
    Some((ch, 1 + len + semicolon))
}

enum Visit {
    Enter(NodeId),
    Leave(NodeId),
}

pub(super) fn serialize(doc: &HtmlDocument, node: NodeId, out: &mut String) {
    let mut pending = vec![Visit::Enter(node)];
    while let Some(visit) = pending.pop() {
        let node = match visit {
            Visit::Enter(node) => node,
            Visit::Leave(node) => {
                if let Some(tag) = doc.tag_name(node) {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
                continue;
            }
        };
        match doc.kind(node) {
            NodeKind::Document => {
                pending.extend(doc.children(node).iter().rev().map(|&c| Visit::Enter(c)));
            }
            NodeKind::Doctype(body) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(body);
                out.push('>');
            }
            NodeKind::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            NodeKind::Text(text) => {
                let raw = doc
                    .parent(node)
                    .and_then(|parent| doc.tag_name(parent))
                    .is_some_and(is_raw_text_tag);
                if raw {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        escape_into(value, true, out);
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_tag(&element.tag) {
                    continue;
                }
                pending.push(Visit::Leave(node));
                pending.extend(doc.children(node).iter().rev().map(|&c| Visit::Enter(c)));
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn closes_implicitly(open: &str, incoming: &str) -> bool {
    match open {
        "li" | "option" | "dt" | "dd" | "tr" | "td" | "th" => open == incoming,
        "p" => matches!(
            incoming,
            "p" | "div" | "ul" | "ol" | "figure" | "table" | "section" | "h1" | "h2" | "h3"
        ),
        _ => false,
    }
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

pub(super) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'>' | b'/' | b'=' | b'"' | b'\'')
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.get(at..at + needle.len()) == Some(needle)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| from + p)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn find_end_tag_ci(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while let Some(lt) = find_subslice(bytes, i, b"</") {
        let name = lt + 2;
        let after = name + tag.len();
        if bytes
            .get(name..after)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(tag))
            && bytes
                .get(after)
                .is_some_and(|&b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
        {
            return Some(lt);
        }
        i = name;
    }
    None
}
