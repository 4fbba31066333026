use anyhow::Result;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info};

use super::{FetchError, ResultSet, SearchBackend};
use crate::api::send_request::send_get_request;
use crate::config::AppConfig;

/// 结果总数无法确定时的中性值（乘法单位元）
pub const NEUTRAL_TOTAL_COUNT: u64 = 1;

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "cite",
    "section", "blockquote", "pre",
];
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "svg"];

/// 基于 HTML 结果页的网页搜索
pub struct GoogleSearch {
    client: Client,
    search_url: String,
    result_selector: Selector,
    stats_selector: Selector,
}

impl GoogleSearch {
    pub fn new(client: Client, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            result_selector: parse_selector(&config.result_selector)?,
            stats_selector: parse_selector(&config.result_stats_selector)?,
        })
    }

    fn url_for(&self, query: &str) -> String {
        format!("{}?q={}", self.search_url, query)
    }

    /// 解析结果页；`Html` 不是 Send，只能在同步代码里使用
    fn parse_page(&self, body: &str, want_total_count: bool) -> ResultSet {
        let doc = Html::parse_document(body);

        let snippets = doc
            .select(&self.result_selector)
            .map(|el| element_text(&el))
            .collect();

        let total_count = want_total_count.then(|| {
            doc.select(&self.stats_selector)
                .next()
                .map(|el| extract_total_count(&el.text().collect::<String>()))
                .unwrap_or(NEUTRAL_TOTAL_COUNT)
        });

        ResultSet {
            snippets,
            total_count,
        }
    }
}

impl SearchBackend for GoogleSearch {
    async fn fetch(&self, query: &str, want_total_count: bool) -> Result<ResultSet, FetchError> {
        let url = self.url_for(query);
        let body = send_get_request(&self.client, &url).await?;

        let result_set = self.parse_page(&body, want_total_count);
        info!(
            "搜索完成，找到 {} 条结果，总数: {:?}",
            result_set.snippets.len(),
            result_set.total_count
        );
        Ok(result_set)
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| anyhow::anyhow!("无效的选择器 {:?}: {:?}", raw, e))
}

/// 从结果总数文案中取出数字
///
/// 文案有两种形态：`Circa 1.230.000 risultati (0,45 secondi)`（4 段，数字在 1 号位）与
/// `1.230 risultati (0,45 secondi)`（3 段，数字在 0 号位），下标都等于 `段数 % 3`。
/// 只按 ASCII 空白切分，NBSP 属于段内字符。解析失败一律返回中性值。
pub fn extract_total_count(text: &str) -> u64 {
    // ASCII 空白（含制表符、换行）连续出现视为一个分隔符
    let tokens: Vec<&str> = text
        .split(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'))
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return NEUTRAL_TOTAL_COUNT;
    }

    let Some(token) = tokens.get(tokens.len() % 3) else {
        return NEUTRAL_TOTAL_COUNT;
    };

    let digits: String = token
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '\u{a0}' | '\''))
        .collect();

    match digits.parse::<u64>() {
        Ok(count) => count,
        Err(_) => {
            debug!("无法解析结果总数: {:?}", text);
            NEUTRAL_TOTAL_COUNT
        }
    }
}

/// 提取元素的可读文本，块级元素各占一行，行内空白折叠为单个空格
fn element_text(el: &ElementRef<'_>) -> String {
    let mut buf = String::new();
    collect_text(el, &mut buf);

    buf.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: &ElementRef<'_>, buf: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) => {
                let tag = el.name();
                if SKIP_TAGS.contains(&tag) {
                    continue;
                }
                let is_block = BLOCK_TAGS.contains(&tag);
                if is_block {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
                if is_block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}
