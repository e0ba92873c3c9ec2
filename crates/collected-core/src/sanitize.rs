//! Sanitization gateway between command output and the rendered page.
//!
//! [`safe_html_for_command_result`] is the only place command HTML becomes
//! browser HTML. Trusted results pass through untouched; everything else is
//! run through an allow-list sanitizer.

use std::sync::LazyLock;

use crate::result::CommandResult;

/// An allow-list HTML sanitizer.
///
/// Sanitizing never fails; the worst case is an empty string.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// User-generated-content policy backed by `ammonia`.
///
/// Strips scripts, styles, event handler attributes and unknown elements,
/// keeps common formatting and structural tags, and adds
/// `rel="noopener noreferrer"` to links. Build it once and share it.
pub struct UgcSanitizer {
    policy: ammonia::Builder<'static>,
}

static SHARED: LazyLock<UgcSanitizer> = LazyLock::new(UgcSanitizer::new);

impl UgcSanitizer {
    pub fn new() -> Self {
        let mut policy = ammonia::Builder::default();
        policy.add_generic_attributes(["class"]);
        Self { policy }
    }

    /// The process-wide policy instance.
    pub fn shared() -> &'static Self {
        &SHARED
    }
}

impl Default for UgcSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSanitizer for UgcSanitizer {
    fn sanitize(&self, html: &str) -> String {
        self.policy.clean(html).to_string()
    }
}

/// Browser-safe HTML for a command result.
///
/// Returns the HTML verbatim when the command marked it trusted, otherwise
/// the sanitizer's output. Does not modify `result`.
pub fn safe_html_for_command_result(result: &CommandResult, sanitizer: &dyn HtmlSanitizer) -> String {
    let raw = result.unsafe_html();
    if result.dangerous_html_is_safe() {
        raw.to_string()
    } else {
        sanitizer.sanitize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE: &str = r#"<div onclick="steal()"><script>alert(1)</script><pre>code</pre><dl><dt>k</dt><dd>v</dd></dl><img src="x" onerror="boom()"></div>"#;

    #[test]
    fn test_trusted_result_is_returned_verbatim() {
        let html = r#"<div style="width: 12em; background-color:#ff8800"></div>"#;
        let result = CommandResult::dangerous_from_trusted_html(html);
        assert_eq!(safe_html_for_command_result(&result, UgcSanitizer::shared()), html);
    }

    #[test]
    fn test_untrusted_result_loses_scripts_and_handlers() {
        let result = CommandResult::from_untrusted_html(HOSTILE);
        let safe = safe_html_for_command_result(&result, UgcSanitizer::shared());

        assert!(!safe.contains("<script"));
        assert!(!safe.contains("alert(1)"));
        assert!(!safe.contains("onclick"));
        assert!(!safe.contains("onerror"));
        assert!(safe.contains("<div>"));
        assert!(safe.contains("<pre>code</pre>"));
        assert!(safe.contains("<dl><dt>k</dt><dd>v</dd></dl>"));
    }

    #[test]
    fn test_untrusted_style_attribute_is_removed() {
        let result = CommandResult::from_untrusted_html(r#"<div style="position:fixed">x</div>"#);
        let safe = safe_html_for_command_result(&result, UgcSanitizer::shared());
        assert_eq!(safe, "<div>x</div>");
    }

    #[test]
    fn test_class_attribute_is_kept() {
        let result = CommandResult::from_untrusted_html(r#"<p class="mb-2">x</p>"#);
        let safe = safe_html_for_command_result(&result, UgcSanitizer::shared());
        assert_eq!(safe, r#"<p class="mb-2">x</p>"#);
    }

    #[test]
    fn test_links_get_rel_noopener() {
        let result = CommandResult::from_untrusted_html(r#"<a href="https://example.com/">x</a>"#);
        let safe = safe_html_for_command_result(&result, UgcSanitizer::shared());
        assert!(safe.contains(r#"href="https://example.com/""#));
        assert!(safe.contains("noopener"));
    }

    #[test]
    fn test_sanitizing_twice_gives_same_output() {
        let result = CommandResult::from_untrusted_html(HOSTILE);
        let first = safe_html_for_command_result(&result, UgcSanitizer::shared());
        let second = safe_html_for_command_result(&result, UgcSanitizer::shared());
        assert_eq!(first, second);
        assert_eq!(result.unsafe_html(), HOSTILE);
    }

    #[test]
    fn test_sanitizer_is_pluggable() {
        struct Redact;
        impl HtmlSanitizer for Redact {
            fn sanitize(&self, _html: &str) -> String {
                String::new()
            }
        }

        let untrusted = CommandResult::from_untrusted_html("<b>x</b>");
        let trusted = CommandResult::dangerous_from_trusted_html("<b>x</b>");
        assert_eq!(safe_html_for_command_result(&untrusted, &Redact), "");
        assert_eq!(safe_html_for_command_result(&trusted, &Redact), "<b>x</b>");
    }
}
