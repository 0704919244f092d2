// src/fetch/links.rs
// =============================================================================
// This module pulls outbound links out of a fetched page body.
//
// Two modes:
// - Text: find anything that looks like a URL in the raw body with a regex.
//   Works on HTML, plain text, JSON, whatever the server sent.
// - Html: parse the body as HTML and collect <a href> targets, resolving
//   relative links against the page URL (like a browser does).
//
// In both modes links come back in the order they appear in the body and
// duplicates are kept. Deduplication is the crawler's job, not ours.
//
// Rust concepts:
// - once_cell::sync::Lazy: build the regex and selector once, on first use
// - Iterators: filter_map/map chains to transform matches
// =============================================================================

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// How links are recognised in a page body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractMode {
    /// Match URLs anywhere in the raw text
    #[default]
    Text,
    /// Only follow <a href> links in HTML
    Html,
}

// Matches "scheme://..." and bare "www." hosts. A URL runs until whitespace,
// a quote, or a square/curly bracket. Parentheses are allowed here and
// balanced afterwards by trim_url_tail.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'`\[\]{}]+"#).expect("URL pattern is valid")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] is a valid selector"));

/// Extracts links from `body` using the given mode.
///
/// `page_url` is only needed to resolve relative links in `Html` mode.
pub fn extract_links(body: &str, page_url: &str, mode: ExtractMode) -> Vec<String> {
    match mode {
        ExtractMode::Text => extract_text_links(body),
        ExtractMode::Html => extract_html_links(body, page_url),
    }
}

// Finds URL-looking tokens in free text
//
// Sentence punctuation stuck to the end of a URL ("see https://x.org.") is
// trimmed, and "www." hosts get an http:// scheme so they can be fetched.
fn extract_text_links(body: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(body)
        .map(|m| trim_url_tail(m.as_str()))
        .filter(|link| !link.is_empty())
        .map(|link| {
            if link.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
                format!("http://{}", link)
            } else {
                link.to_string()
            }
        })
        .collect()
}

// Strips trailing punctuation and any closing parenthesis that has no
// matching "(" inside the URL
//
// Examples:
//   "https://x.org/docs."          -> "https://x.org/docs"
//   "https://x.org/a_(b)"          -> "https://x.org/a_(b)"
//   "https://x.org/a_(b))."        -> "https://x.org/a_(b)"   (from "(see ...)." prose)
fn trim_url_tail(mut link: &str) -> &str {
    loop {
        link = link.trim_end_matches(['.', ',', ';', ':', '!', '?']);

        let unbalanced = link.ends_with(')') && link.matches(')').count() > link.matches('(').count();
        if !unbalanced {
            return link;
        }
        link = &link[..link.len() - 1];
    }
}

// Collects <a href> targets as absolute http(s) URLs
fn extract_html_links(html: &str, page_url: &str) -> Vec<String> {
    // If the page URL is invalid we can't resolve relative links
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = %page_url, error = %e, "invalid base URL, skipping link extraction");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(&base, href))
        .collect()
}

// Resolves a possibly-relative href to an absolute http(s) URL
//
// Examples (base = "https://example.com/page"):
//   "/docs"              -> Some("https://example.com/docs")
//   "https://other.com"  -> Some("https://other.com/")
//   "#section"           -> None
//   "mailto:a@b.c"       -> None
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let mut url = base.join(href).ok()?;

    // "/page#intro" and "/page" are the same document
    url.set_fragment(None);

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two modes?
//    - Text mode finds links even in pages that aren't HTML, but also picks
//      up URLs that only appear in prose or scripts
//    - Html mode only follows real hyperlinks, and understands relative ones
//
// 2. What is Lazy?
//    - A value computed the first time it's accessed, then reused
//    - Compiling a regex is slow compared to running it, so we do it once
//
// 3. Why trim_end_matches with an array?
//    - ['.', ','] is a pattern that matches any one of those characters
//    - It strips all of them from the end, however many there are
// -----------------------------------------------------------------------------
