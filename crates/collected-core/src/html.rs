//! Small HTML building helpers shared by the command families.

use std::fmt::Write as _;

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes a `<dl>` whose keys and values are always escaped.
pub struct DescriptionList<'a> {
    out: &'a mut String,
}

impl DescriptionList<'_> {
    /// Write a `<dl>` into `out`, letting `f` add its entries.
    pub fn write(out: &mut String, f: impl FnOnce(&mut DescriptionList<'_>)) {
        out.push_str(r#"<dl class="grid-1/3-2/3 grid-column-gap-1 grid-row-gap-1">"#);
        let mut dl = DescriptionList { out };
        f(&mut dl);
        dl.out.push_str("</dl>");
    }

    pub fn key(&mut self, key: &str) -> &mut Self {
        let _ = write!(self.out, r#"<dt class="font-bold">{}</dt>"#, escape_html(key));
        self
    }

    pub fn value(&mut self, value: &str) -> &mut Self {
        let _ = write!(self.out, r#"<dd class="mb-2">{}</dd>"#, escape_html(value));
        self
    }

    pub fn entry(&mut self, key: &str, value: &str) -> &mut Self {
        self.key(key).value(value)
    }
}
