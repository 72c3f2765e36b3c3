//! `og:image` extraction from an HTML document.
//!
//! Only `<meta>` start tags are inspected, so a full HTML parser is not
//! needed. Attribute order and quote style vary between page variants.

use regex::Regex;
use std::sync::LazyLock;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta tag regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});

/// Content of the first `<meta property="og:image">` descriptor, if any.
pub fn extract_og_image(html: &str) -> Option<String> {
    META_TAG.find_iter(html).find_map(|tag| {
        let mut property = None;
        let mut content = None;

        for caps in ATTRIBUTE.captures_iter(tag.as_str()) {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            if name.eq_ignore_ascii_case("property") {
                property = Some(value);
            } else if name.eq_ignore_ascii_case("content") {
                content = Some(value);
            }
        }

        match (property, content) {
            (Some(p), Some(c)) if p.eq_ignore_ascii_case("og:image") && !c.is_empty() => {
                Some(unescape(c))
            }
            _ => None,
        }
    })
}

fn unescape(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
