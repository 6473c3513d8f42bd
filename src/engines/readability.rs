//! Readability-style main content extraction
//!
//! Scores paragraph-like nodes, credits their parent and grandparent,
//! weights candidates by class/id hints and link density, and returns the
//! text of the winning block together with its qualifying siblings.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;

/// Title and plain text of a page's main content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub text_content: String,
}

/// Paragraphs shorter than this are not scored
const MIN_PARAGRAPH_LEN: usize = 25;

/// Subtrees never considered content
const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe", "svg",
    "button", "select", "textarea",
];

/// Tags that start a new line in the extracted text
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "article",
    "section", "main", "blockquote", "pre", "figcaption", "dt", "dd", "table", "ul", "ol",
];

const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " – ", " — ", " :: ", " » ", " / "];

static UNLIKELY_CANDIDATES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .unwrap()
});

static MAYBE_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)and|article|body|column|content|main|shadow").unwrap());

static POSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story")
        .unwrap()
});

static NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget",
    )
    .unwrap()
});

static SCORE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p, pre, td").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static OG_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Extract the main content of an HTML document
///
/// Returns `None` when no block of readable content can be identified.
pub fn parse(html: &str) -> Option<Article> {
    let document = Html::parse_document(html);

    let candidates = score_candidates(&document);
    let (top, top_score) = candidates
        .iter()
        .fold(None::<(ElementRef, f64)>, |best, &(el, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((el, score)),
        })?;

    let mut text = String::new();
    for node in article_nodes(top, top_score, &candidates) {
        collect_text(node, &mut text);
        text.push('\n');
    }

    if text.trim().is_empty() {
        return None;
    }

    Some(Article {
        title: extract_title(&document),
        text_content: text,
    })
}

/// Score every ancestor of a scoreable paragraph, in first-seen order
fn score_candidates(document: &Html) -> Vec<(ElementRef<'_>, f64)> {
    let mut candidates: Vec<(ElementRef<'_>, f64)> = Vec::new();
    let mut index: HashMap<_, usize> = HashMap::new();

    for paragraph in document.select(&SCORE_SELECTOR) {
        if is_unlikely(paragraph) {
            continue;
        }

        let text = paragraph.text().collect::<String>();
        let text = text.trim();
        let len = text.chars().count();
        if len < MIN_PARAGRAPH_LEN {
            continue;
        }

        let score = 1.0 + text.matches(',').count() as f64 + (len / 100).min(3) as f64;

        let ancestors = paragraph
            .ancestors()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() != "html")
            .take(2);

        for (level, ancestor) in ancestors.enumerate() {
            let share = score / (level + 1) as f64;
            match index.get(&ancestor.id()) {
                Some(&i) => candidates[i].1 += share,
                None => {
                    index.insert(ancestor.id(), candidates.len());
                    candidates.push((ancestor, initial_score(ancestor) + share));
                }
            }
        }
    }

    for (el, score) in candidates.iter_mut() {
        *score *= 1.0 - link_density(*el);
    }

    candidates
}

/// The top candidate plus siblings that look like part of the same article
fn article_nodes<'a>(
    top: ElementRef<'a>,
    top_score: f64,
    candidates: &[(ElementRef<'a>, f64)],
) -> Vec<ElementRef<'a>> {
    let Some(parent) = top.parent().and_then(ElementRef::wrap) else {
        return vec![top];
    };

    let threshold = (top_score * 0.2).max(10.0);
    let scores: HashMap<_, f64> = candidates.iter().map(|(el, score)| (el.id(), *score)).collect();

    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| {
            if sibling.id() == top.id() {
                return true;
            }
            if NOISE_TAGS.contains(&sibling.value().name()) {
                return false;
            }

            let scored = scores.get(&sibling.id()).copied().unwrap_or(0.0);
            if scored >= threshold {
                return true;
            }

            if sibling.value().name() == "p" {
                let len = sibling.text().collect::<String>().trim().chars().count();
                return len > 80 && link_density(*sibling) < 0.25;
            }

            false
        })
        .collect()
}

fn is_unlikely(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(|node| {
            let name = node.value().name();
            if NOISE_TAGS.contains(&name) {
                return true;
            }
            if matches!(name, "body" | "article" | "main" | "html") {
                return false;
            }
            let hint = match_string(node);
            UNLIKELY_CANDIDATES.is_match(&hint) && !MAYBE_CANDIDATE.is_match(&hint)
        })
}

fn initial_score(el: ElementRef<'_>) -> f64 {
    let base = match el.value().name() {
        "div" | "article" | "main" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    base + class_weight(el)
}

fn class_weight(el: ElementRef<'_>) -> f64 {
    let mut weight = 0.0;
    for value in [el.value().attr("class"), el.value().attr("id")]
        .into_iter()
        .flatten()
    {
        if NEGATIVE.is_match(value) {
            weight -= 25.0;
        }
        if POSITIVE.is_match(value) {
            weight += 25.0;
        }
    }
    weight
}

fn match_string(el: ElementRef<'_>) -> String {
    format!(
        "{} {}",
        el.value().attr("class").unwrap_or_default(),
        el.value().attr("id").unwrap_or_default()
    )
}

/// Share of an element's text that sits inside links
fn link_density(el: ElementRef<'_>) -> f64 {
    let total = el.text().map(|t| t.chars().count()).sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let linked = el
        .select(&LINK_SELECTOR)
        .flat_map(|a| a.text())
        .map(|t| t.chars().count())
        .sum::<usize>();
    linked as f64 / total as f64
}

fn collect_text(el: ElementRef<'_>, buf: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(element) => {
                let tag = element.name();
                if NOISE_TAGS.contains(&tag) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, buf);
                }
                if block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn extract_title(document: &Html) -> String {
    let raw = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>())
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            document
                .select(&OG_TITLE_SELECTOR)
                .next()
                .and_then(|m| m.value().attr("content"))
                .map(str::to_string)
        })
        .or_else(|| {
            document
                .select(&H1_SELECTOR)
                .next()
                .map(|h| h.text().collect::<String>())
        })
        .unwrap_or_default();

    clean_title(raw.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Drop a trailing " | Site Name" style suffix when enough title remains
fn clean_title(title: String) -> String {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.rfind(sep))
        .max();

    match cut {
        Some(idx) if title[..idx].split_whitespace().count() >= 3 => title[..idx].to_string(),
        _ => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html>
        <head><title>Ownership in Rust explained simply | Example Blog</title></head>
        <body>
            <nav><a href="/">Home</a> <a href="/about">About</a></nav>
            <div class="sidebar"><p>Subscribe to the newsletter for weekly updates, tips, and more.</p></div>
            <div class="post-content">
                <p>Ownership is a set of rules that govern how a Rust program manages memory, checked at compile time.</p>
                <p>Each value has an owner, there can only be one owner at a time, and the value is dropped when the owner goes out of scope.</p>
                <script>trackPageView();</script>
            </div>
            <footer><p>Copyright 2024, Example Blog, all rights reserved worldwide.</p></footer>
        </body>
        </html>
    "#;

    #[test]
    fn test_extracts_main_content() {
        let article = parse(ARTICLE).unwrap();

        assert!(article.text_content.contains("Ownership is a set of rules"));
        assert!(article.text_content.contains("dropped when the owner"));
        assert!(!article.text_content.contains("newsletter"));
        assert!(!article.text_content.contains("Copyright"));
        assert!(!article.text_content.contains("trackPageView"));
        assert!(!article.text_content.contains("About"));
    }

    #[test]
    fn test_title_suffix_removed() {
        let article = parse(ARTICLE).unwrap();
        assert_eq!(article.title, "Ownership in Rust explained simply");
    }

    #[test]
    fn test_short_title_kept_whole() {
        assert_eq!(clean_title("Rust | Blog".to_string()), "Rust | Blog");
    }

    #[test]
    fn test_title_falls_back_to_heading() {
        let html = r#"<html><body><article>
            <h1>Fallback heading</h1>
            <p>This paragraph is certainly long enough to be scored as content.</p>
        </article></body></html>"#;

        let article = parse(html).unwrap();
        assert_eq!(article.title, "Fallback heading");
    }

    #[test]
    fn test_no_content() {
        let html = r#"<html><head><title>Empty</title></head>
            <body><nav><a href="/">Home</a></nav><div>Hi</div></body></html>"#;
        assert!(parse(html).is_none());
    }

    #[test]
    fn test_large_table() {
        let rows: String = (0..5000)
            .map(|i| format!("<tr><td>Row {} holds a sentence long enough to score.</td></tr>", i))
            .collect();
        let html = format!("<html><body><table>{}</table></body></html>", rows);

        let article = parse(&html).unwrap();
        assert!(article.text_content.contains("Row 0 holds"));
        assert!(article.text_content.contains("Row 4999 holds"));
    }

    #[test]
    fn test_link_heavy_block_loses() {
        let html = r#"<html><body>
            <div id="links">
                <p><a href="/a">A long list of links that goes on, and on, and on, forever</a></p>
                <p><a href="/b">Another long list of links, with commas, and more commas</a></p>
            </div>
            <div id="story">
                <p>The actual story is written here, in plain prose, without any links at all.</p>
            </div>
        </body></html>"#;

        let article = parse(html).unwrap();
        assert!(article.text_content.contains("actual story"));
        assert!(!article.text_content.contains("list of links"));
    }
}
