//! `/web` family: fetch a page and embed part of it, or list its metadata.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::context::ExecutionContext;
use crate::error::{ParseError, ParseResult, RunError, RunResult};
use crate::html::{DescriptionList, escape_html};
use crate::ports::HttpRequest;
use crate::result::CommandResult;

use super::{Command, params};

/// Parse `/web snippet` or `/web meta`.
pub fn parse(subcommands: &[&str], params: &str) -> ParseResult<Command> {
    match subcommands {
        ["snippet"] => WebSnippetCommand::parse(params).map(Command::WebSnippet),
        ["meta"] => WebMetaCommand::parse(params).map(Command::WebMeta),
        _ => Err(ParseError::UnknownSubcommand {
            family: "web",
            subcommands: subcommands.iter().map(ToString::to_string).collect(),
        }),
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn compile_selector(selector: &str) -> ParseResult<Selector> {
    Selector::parse(selector).map_err(|err| ParseError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

fn page_url(url: &str) -> RunResult<Url> {
    params::require_url("url", url).map_err(|err| RunError::InvalidCommand {
        message: err.to_string(),
    })
}

async fn fetch_document(ctx: &ExecutionContext, url: Url) -> RunResult<Html> {
    let request = HttpRequest::get(url).with_header("Accept", "text/html,application/xhtml+xml");
    let response = ctx.send_expecting_success(request).await?;
    Ok(Html::parse_document(&response.text()))
}

/// Resolve `href` against the page URL; unparseable values are kept as-is.
fn absolute_href(base: &Url, href: &str) -> String {
    base.join(href)
        .map_or_else(|_| href.to_string(), |resolved| resolved.to_string())
}

/// Serialize an element, making every `<a href>` absolute.
fn write_element(element: ElementRef<'_>, base: &Url, out: &mut String) {
    let value = element.value();
    let name = value.name();

    out.push('<');
    out.push_str(name);
    for (attr, attr_value) in value.attrs() {
        let attr_value = if name == "a" && attr == "href" {
            absolute_href(base, attr_value)
        } else {
            attr_value.to_string()
        };
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&escape_html(&attr_value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, base, out);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// `/web snippet`: embed the page, or the parts matching `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSnippetCommand {
    pub url: String,
    #[serde(default)]
    pub selector: Option<String>,
}

impl WebSnippetCommand {
    pub fn parse(params: &str) -> ParseResult<Self> {
        let cmd: Self = params::decode("web snippet", params)?;
        params::require_url("url", &cmd.url)?;
        if let Some(selector) = &cmd.selector {
            compile_selector(selector)?;
        }
        Ok(cmd)
    }

    /// Fetch the page and serialize the selected nodes.
    ///
    /// The page is third-party markup, so the result is untrusted.
    pub async fn run(&self, ctx: &ExecutionContext) -> RunResult<CommandResult> {
        let base = page_url(&self.url)?;
        let document = fetch_document(ctx, base.clone()).await?;

        let mut html = String::new();
        match &self.selector {
            Some(selector) => {
                let selector = compile_selector(selector).map_err(|err| {
                    RunError::InvalidCommand {
                        message: err.to_string(),
                    }
                })?;
                let mut matched = 0usize;
                for element in document.select(&selector) {
                    write_element(element, &base, &mut html);
                    html.push_str("<br>");
                    matched += 1;
                }
                debug!(url = %base, matched, "Selected snippet nodes");
            }
            None => {
                write_element(document.root_element(), &base, &mut html);
                html.push_str("<br>");
            }
        }

        Ok(CommandResult::from_untrusted_html(html))
    }
}

/// `/web meta`: the page title and every `<head><meta>` tag's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebMetaCommand {
    pub url: String,
}

impl WebMetaCommand {
    pub fn parse(params: &str) -> ParseResult<Self> {
        let cmd: Self = params::decode("web meta", params)?;
        params::require_url("url", &cmd.url)?;
        Ok(cmd)
    }

    /// Every string taken from the page is escaped before it is written, so
    /// the listing is returned as trusted HTML.
    pub async fn run(&self, ctx: &ExecutionContext) -> RunResult<CommandResult> {
        let base = page_url(&self.url)?;
        let document = fetch_document(ctx, base).await?;

        let title_selector = compile_selector("title").map_err(|err| RunError::InvalidCommand {
            message: err.to_string(),
        })?;
        let meta_selector =
            compile_selector("head meta").map_err(|err| RunError::InvalidCommand {
                message: err.to_string(),
            })?;

        let mut html = String::from("<ol>");
        let mut title_text = String::new();

        for title in document.select(&title_selector) {
            if title.children().next().is_none() {
                break;
            }
            // Only direct text children, like the browser's document.title.
            let text: String = title
                .children()
                .filter_map(|child| match child.value() {
                    Node::Text(text) => Some(text.to_string()),
                    _ => None,
                })
                .collect();

            html.push_str(r#"<li class="mb-2">"#);
            DescriptionList::write(&mut html, |dl| {
                dl.entry("title", &text);
            });
            html.push_str("</li>");

            if title_text.is_empty() {
                title_text = text;
            }
        }

        for meta in document.select(&meta_selector) {
            html.push_str(r#"<li class="mb-2">"#);
            DescriptionList::write(&mut html, |dl| {
                for (key, value) in meta.value().attrs() {
                    dl.entry(key, value);
                }
            });
            html.push_str("</li>");
        }
        html.push_str("</ol>");

        Ok(CommandResult::dangerous_from_trusted_html(html).with_plain_text(title_text))
    }
}
