//! Article page download and text extraction
//!
//! Fetches the page behind a feed entry and keeps the article body, dropping
//! navigation, scripts and other page chrome.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use insights_core::{NewsCandidate, NewsRecord, PipelineConfig};

use crate::error::NewsError;
use crate::source::ArticleSource;

/// Elements whose text never belongs to the article body
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "figure", "button", "iframe", "svg",
];

/// Containers tried in order before falling back to every paragraph
const CONTENT_CONTAINERS: &[&str] = &[
    "article",
    "main",
    "[role=main]",
    "[itemprop=articleBody]",
    ".article-body",
    ".post-content",
    ".entry-content",
    "#content",
    ".content",
];

/// Downloads article pages and turns them into news records
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    client: Client,
    truncate_length: usize,
}

impl ArticleExtractor {
    /// Create a new extractor from the pipeline configuration
    pub fn new(config: &PipelineConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(config.article_timeout())
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .map_err(|e| NewsError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            truncate_length: config.truncate_length,
        })
    }

    /// Download the raw HTML of a page
    async fn fetch_html(&self, url: &str) -> Result<String, NewsError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch article {}", url),
            });
        }

        response
            .text()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))
    }
}

#[async_trait]
impl ArticleSource for ArticleExtractor {
    #[instrument(skip(self, candidate), fields(link = %candidate.link))]
    async fn extract(&self, candidate: &NewsCandidate) -> Result<NewsRecord, NewsError> {
        let html = self.fetch_html(&candidate.link).await?;
        let text = extract_article_text(&html);

        if text.is_empty() {
            return Err(NewsError::ScrapeFailed(format!(
                "No article text found at {}",
                candidate.link
            )));
        }

        debug!("Extracted {} chars", text.chars().count());

        Ok(candidate.clone().into_record(&text, self.truncate_length))
    }
}

/// Extract the article body of an HTML page as plain text
///
/// Paragraphs are taken from the first content container that yields any,
/// then from the whole body, and finally the visible body text is used.
/// Boilerplate is only dropped when it sits inside the chosen container (or
/// body), so layouts wrapped in a page-level `<form>` or `<header>` still
/// yield their article. Paragraphs are separated by blank lines. Returns an
/// empty string when the page has no readable text.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let (Ok(paragraph), Ok(body)) = (Selector::parse("p"), Selector::parse("body")) else {
        return String::new();
    };
    let Some(body) = document.select(&body).next() else {
        return String::new();
    };
    let page = PageScan::new(&document);

    for container in CONTENT_CONTAINERS {
        let Ok(selector) = Selector::parse(container) else {
            continue;
        };
        let paragraphs = page.container_paragraphs(&selector, &paragraph, body);
        if !paragraphs.is_empty() {
            return paragraphs.join("\n\n");
        }
    }

    let paragraphs = page.paragraphs_within(body, &paragraph);
    if !paragraphs.is_empty() {
        return paragraphs.join("\n\n");
    }

    collapse_whitespace(&page.visible_text(body))
}

/// Per-document boilerplate rules
struct PageScan<'a> {
    /// Forms that wrap the page layout rather than a widget
    wrapper_forms: Vec<ElementRef<'a>>,
}

impl<'a> PageScan<'a> {
    fn new(document: &'a Html) -> Self {
        let (Ok(forms), Ok(containers)) = (
            Selector::parse("form"),
            Selector::parse(&CONTENT_CONTAINERS.join(", ")),
        ) else {
            return Self {
                wrapper_forms: Vec::new(),
            };
        };

        let wrapper_forms = document
            .select(&forms)
            .filter(|form| {
                form.select(&containers).next().is_some()
                    || form
                        .parent()
                        .and_then(ElementRef::wrap)
                        .is_some_and(|parent| parent.value().name() == "body")
            })
            .collect();

        Self { wrapper_forms }
    }

    fn is_boilerplate(&self, element: ElementRef<'a>) -> bool {
        let name = element.value().name();
        BOILERPLATE_TAGS.contains(&name)
            && !(name == "form" && self.wrapper_forms.contains(&element))
    }

    /// Whether a boilerplate element sits between `element` and `scope`
    fn hidden_within(&self, element: ElementRef<'a>, scope: ElementRef<'a>) -> bool {
        element
            .ancestors()
            .take_while(|ancestor| *ancestor != *scope)
            .filter_map(ElementRef::wrap)
            .any(|ancestor| self.is_boilerplate(ancestor))
    }

    /// Paragraphs of every outermost element matching `container`
    ///
    /// Containers outside page chrome are tried first; containers nested in
    /// boilerplate are only used when nothing else yields text.
    fn container_paragraphs(
        &self,
        container: &Selector,
        paragraph: &Selector,
        body: ElementRef<'a>,
    ) -> Vec<String> {
        let outermost: Vec<ElementRef<'a>> = body
            .select(container)
            .filter(|el| {
                !el.ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| container.matches(&ancestor))
            })
            .collect();

        let (clean, in_chrome): (Vec<_>, Vec<_>) = outermost
            .into_iter()
            .partition(|el| !self.hidden_within(*el, body));

        for group in [clean, in_chrome] {
            let paragraphs: Vec<String> = group
                .into_iter()
                .flat_map(|el| self.paragraphs_within(el, paragraph))
                .collect();
            if !paragraphs.is_empty() {
                return paragraphs;
            }
        }

        Vec::new()
    }

    /// Non-empty paragraph texts under `scope`, in document order
    fn paragraphs_within(&self, scope: ElementRef<'a>, paragraph: &Selector) -> Vec<String> {
        scope
            .select(paragraph)
            .filter(|p| !self.hidden_within(*p, scope))
            .map(|p| collapse_whitespace(&self.visible_text(p)))
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Text of an element, skipping text nested in boilerplate below it
    fn visible_text(&self, element: ElementRef<'a>) -> String {
        let mut text = String::new();

        for node in element.descendants() {
            let Some(fragment) = node.value().as_text() else {
                continue;
            };
            let hidden = node
                .ancestors()
                .take_while(|ancestor| *ancestor != *element)
                .filter_map(ElementRef::wrap)
                .any(|ancestor| self.is_boilerplate(ancestor));
            if !hidden {
                text.push_str(fragment);
                text.push(' ');
            }
        }

        text
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
