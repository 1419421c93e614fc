//! Minimal HTML scanning for Wikipedia article pages
//!
//! Pages are scanned tag by tag; there is no DOM. This is enough for the
//! handful of selectors the scraper needs: anchors inside list items, the
//! first `<h1>`, every `<p>` and every `<h2>`.

/// A tag found while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag<'a> {
    /// Name as written in the page; compared case-insensitively
    name: &'a str,
    closing: bool,
    /// Text between the name and `>`
    attrs: &'a str,
    /// Byte offset of `<`
    start: usize,
    /// Byte offset just after `>`
    end: usize,
}

impl Tag<'_> {
    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Iterates over tags in document order, skipping comments and doctypes
fn tags(html: &str) -> impl Iterator<Item = Tag<'_>> {
    let mut pos = 0;
    std::iter::from_fn(move || loop {
        let start = pos + html.get(pos..)?.find('<')?;

        if html[start..].starts_with("<!--") {
            pos = match html[start + 4..].find("-->") {
                Some(rel) => start + 4 + rel + 3,
                None => html.len(),
            };
            continue;
        }

        let close = start + html[start..].find('>')?;

        let inner = &html[start + 1..close];
        let (closing, inner) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, inner),
        };
        let name_len = inner
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = &inner[..name_len];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            // A bare '<' in text, not a tag
            pos = start + 1;
            continue;
        }
        pos = close + 1;

        return Some(Tag {
            name,
            closing,
            attrs: &inner[name_len..],
            start,
            end: close + 1,
        });
    })
}

/// Extracts an attribute value from the text inside a tag
fn attr_value(attrs: &str, key: &str) -> Option<String> {
    let mut rest = attrs;
    loop {
        let idx = rest.find(key)?;
        let before_ok = idx == 0 || rest[..idx].ends_with(|c: char| c.is_whitespace());
        let after = rest[idx + key.len()..].trim_start();
        rest = &rest[idx + key.len()..];

        if !before_ok {
            continue;
        }
        let Some(value) = after.strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();

        let raw = match value.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &value[1..];
                &body[..body.find(q)?]
            }
            Some(_) => {
                let end = value
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value.len());
                &value[..end]
            }
            None => return None,
        };
        return Some(decode_entities(raw));
    }
}

/// `href` values of anchors nested inside `<li>` elements, in document order
pub fn list_item_hrefs(html: &str) -> Vec<String> {
    let mut depth: usize = 0;
    let mut hrefs = Vec::new();

    for tag in tags(html) {
        if tag.is("li") {
            if tag.closing {
                depth = depth.saturating_sub(1);
            } else {
                depth += 1;
            }
        } else if tag.is("a") && !tag.closing && depth > 0 {
            if let Some(href) = attr_value(tag.attrs, "href") {
                hrefs.push(href);
            }
        }
    }

    hrefs
}

/// Inner HTML of every element with the given tag name
///
/// Elements of the same name are assumed not to nest.
pub fn elements<'a>(html: &'a str, name: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut open: Option<usize> = None;

    for tag in tags(html) {
        if !tag.is(name) {
            continue;
        }
        match (tag.closing, open) {
            (false, _) => open = Some(tag.end),
            (true, Some(content_start)) => {
                out.push(&html[content_start..tag.start]);
                open = None;
            }
            (true, None) => {}
        }
    }

    out
}

/// Number of opening tags with the given name
pub fn count_tags(html: &str, name: &str) -> usize {
    tags(html).filter(|t| t.is(name) && !t.closing).count()
}

/// Text content of an HTML fragment, with tags removed and entities decoded
///
/// Whitespace is kept as-is so lengths match the page text.
pub fn text_content(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut pos = 0;

    for tag in tags(fragment) {
        out.push_str(&fragment[pos..tag.start]);
        pos = tag.end;
    }
    out.push_str(&fragment[pos..]);

    decode_entities(&out)
}

/// Decodes the named entities common in Wikipedia markup and numeric ones
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| entity_char(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Character for an entity name without `&` and `;`
///
/// Covers numeric references and the named entities MediaWiki emits in
/// article bodies. Other named entities are not decoded and stay in the text
/// as written.
fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{A0}'),
        "ensp" => Some('\u{2002}'),
        "emsp" => Some('\u{2003}'),
        "thinsp" => Some('\u{2009}'),
        "zwnj" => Some('\u{200C}'),
        "zwj" => Some('\u{200D}'),
        "lrm" => Some('\u{200E}'),
        "rlm" => Some('\u{200F}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "bull" => Some('\u{2022}'),
        "hellip" => Some('\u{2026}'),
        "prime" => Some('\u{2032}'),
        "Prime" => Some('\u{2033}'),
        "minus" => Some('\u{2212}'),
        "middot" => Some('\u{B7}'),
        "times" => Some('\u{D7}'),
        "divide" => Some('\u{F7}'),
        "deg" => Some('\u{B0}'),
        "plusmn" => Some('\u{B1}'),
        "laquo" => Some('\u{AB}'),
        "raquo" => Some('\u{BB}'),
        "copy" => Some('\u{A9}'),
        "reg" => Some('\u{AE}'),
        "sect" => Some('\u{A7}'),
        "shy" => Some('\u{AD}'),
        "larr" => Some('\u{2190}'),
        "rarr" => Some('\u{2192}'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
