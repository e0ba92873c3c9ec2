//! The output of running a command and its trust classification.
//!
//! Every result carries HTML plus a flag saying whether that HTML was built
//! entirely by the command from escaped, internally generated fragments
//! ("dangerous but safe") or embeds third-party markup and must go through
//! the sanitizer. See [`crate::sanitize::safe_html_for_command_result`].

use serde::Serialize;

/// Whether a result's HTML may bypass the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HtmlTrust {
    /// Built by the command author; returned verbatim.
    Trusted,
    /// Contains third-party markup; must be sanitized.
    Untrusted,
}

/// The result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    html: String,
    trust: HtmlTrust,
    plain_text: String,
    wants_full_width: bool,
}

impl CommandResult {
    /// A result whose HTML must be sanitized before display.
    pub fn from_untrusted_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            trust: HtmlTrust::Untrusted,
            plain_text: String::new(),
            wants_full_width: false,
        }
    }

    /// A result whose HTML is returned verbatim to the browser.
    ///
    /// Only use this when every piece of the HTML was generated by the
    /// command itself and any external text was escaped first.
    pub fn dangerous_from_trusted_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            trust: HtmlTrust::Trusted,
            plain_text: String::new(),
            wants_full_width: false,
        }
    }

    #[must_use]
    pub fn with_plain_text(mut self, text: impl Into<String>) -> Self {
        self.plain_text = text.into();
        self
    }

    /// Ask the embedding page for a full-width layout.
    #[must_use]
    pub const fn with_full_width(mut self, flag: bool) -> Self {
        self.wants_full_width = flag;
        self
    }

    /// Unformatted text form; empty when the command has none.
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// The raw HTML, which may not be safe to display.
    pub fn unsafe_html(&self) -> &str {
        &self.html
    }

    pub const fn trust(&self) -> HtmlTrust {
        self.trust
    }

    pub const fn dangerous_html_is_safe(&self) -> bool {
        matches!(self.trust, HtmlTrust::Trusted)
    }

    pub const fn wants_full_width(&self) -> bool {
        self.wants_full_width
    }
}
