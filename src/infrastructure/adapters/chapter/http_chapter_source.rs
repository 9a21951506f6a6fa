//! HTTP Chapter Source - 抓取章节网页并转换为纯文本
//!
//! 只做通用的正文定位：取 `<title>` 作为标题，优先取 `<article>` 否则取 `<body>`，
//! 再交给 html2text 渲染，块级元素转为段落分隔。站点特定的选择器不在此处理。

use async_trait::async_trait;
use html2text::render::text_renderer::TrivialDecorator;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;

use crate::application::ports::{Chapter, ChapterSourcePort, FetchError};

/// HTTP 章节源配置
#[derive(Debug, Clone)]
pub struct HttpChapterSourceConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpChapterSourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("narrio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP 章节源
pub struct HttpChapterSource {
    client: Client,
}

impl HttpChapterSource {
    pub fn new(config: HttpChapterSourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ChapterSourcePort for HttpChapterSource {
    async fn fetch(&self, url: &str) -> Result<Chapter, FetchError> {
        tracing::info!(url = %url, "Fetching chapter");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let page = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        extract_chapter(url, &page)
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid extraction regex"))
}

fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>|<!--.*?-->|<hr\b[^>]*>",
    )
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?is)<title\b[^>]*>(.*?)</title>")
}

fn article_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?is)<article\b[^>]*>(.*)</article>")
}

fn body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?is)<body\b[^>]*>(.*)</body>")
}

/// 渲染宽度足够大，避免自动换行被分段器误当作段落
const RENDER_WIDTH: usize = 1 << 20;

/// 把 HTML 片段转换为以空行分隔段落的纯文本
fn html_to_text(html: &str) -> String {
    let rendered = html2text::from_read_with_decorator(
        html.as_bytes(),
        RENDER_WIDTH,
        TrivialDecorator::new(),
    );
    rendered
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 从页面内容提取章节
pub fn extract_chapter(url: &str, page: &str) -> Result<Chapter, FetchError> {
    let page = noise_re().replace_all(page, "");

    let content = article_re()
        .captures(&page)
        .or_else(|| body_re().captures(&page))
        .and_then(|caps| caps.get(1))
        .map_or(&*page, |m| m.as_str());

    let body = html_to_text(content);
    if body.is_empty() {
        return Err(FetchError::EmptyContent(url.to_string()));
    }

    let title = title_re()
        .captures(&page)
        .map(|caps| html_to_text(&caps[1]).replace("\n\n", " "))
        .filter(|title| !title.is_empty())
        .or_else(|| body.lines().next().map(str::to_string))
        .unwrap_or_default();

    Ok(Chapter {
        url: url.to_string(),
        title,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Son of the Dragon &ndash; Chapter 3</title>
  <style>p { color: red; }</style>
  <script>var x = "<p>not text</p>";</script>
</head>
<body>
  <nav>Home | Next</nav>
  <article class="entry">
    <h1>Chapter 3</h1>
    <p>The gate <em>creaked</em> open.</p>
    <p>&ldquo;Who goes there?&rdquo; asked the guard.</p>
    <!-- ad slot -->
  </article>
</body>
</html>"#;

    #[test]
    fn test_extracts_title_and_paragraphs() {
        let chapter = extract_chapter("https://example.com/c3", PAGE).unwrap();

        assert_eq!(chapter.title, "Son of the Dragon – Chapter 3");
        assert_eq!(
            chapter.body,
            "Chapter 3\n\nThe gate creaked open.\n\n“Who goes there?” asked the guard."
        );
    }

    #[test]
    fn test_falls_back_to_body_and_first_line() {
        let page = "<html><body><div>Prologue</div><div>It was dark &amp; cold.</div></body></html>";
        let chapter = extract_chapter("u", page).unwrap();

        assert_eq!(chapter.title, "Prologue");
        assert_eq!(chapter.body, "Prologue\n\nIt was dark & cold.");
    }

    #[test]
    fn test_empty_page_is_error() {
        let page = "<html><head><title>404</title></head><body><script>x()</script></body></html>";
        assert!(matches!(
            extract_chapter("u", page),
            Err(FetchError::EmptyContent(_))
        ));
    }

    #[test]
    fn test_decodes_named_and_numeric_entities() {
        let page = "<html><head><title>Caf&eacute; Tales &#8211; Chapter 2</title></head>\
            <body><p>Ren&eacute;e sighed&hellip; &lsquo;Fine,&rsquo; she said &mdash; \
            &copy; site &trade;</p><hr><p>it&#8217;s &#x2014; over</p></body></html>";
        let chapter = extract_chapter("u", page).unwrap();

        assert_eq!(chapter.title, "Café Tales – Chapter 2");
        assert!(chapter.body.contains("Renée sighed…"));
        assert!(chapter.body.contains("‘Fine,’ she said —"));
        assert!(chapter.body.contains("© site ™"));
        assert!(chapter.body.ends_with("it’s — over"));
        assert!(!chapter.body.contains('&'));
        assert!(!chapter.body.contains('─'));
    }
}
