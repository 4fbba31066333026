//! 测试用的内存搜索后端

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{FetchError, ResultSet, SearchBackend};

/// 按解码后的查询内容返回预置结果
///
/// - 只带题干的查询（不要求总数）返回 `question_results`，`fail_question` 为真时返回 503
/// - 带选项的查询按结尾的选项文本查 `answer_results`，
///   查不到或值为 `None` 时返回 404 错误
/// - 设置 `delay` 后每次抓取都会等待，并记录同时进行的抓取数峰值
#[derive(Default)]
pub struct MockSearch {
    pub question_results: ResultSet,
    pub answer_results: HashMap<String, Option<ResultSet>>,
    pub fail_question: bool,
    pub delay: Option<Duration>,
    pub queries: Mutex<Vec<String>>,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl MockSearch {
    pub fn with_answer(mut self, answer: &str, result_set: Option<ResultSet>) -> Self {
        self.answer_results.insert(answer.to_string(), result_set);
        self
    }

    /// 已收到的查询（解码后）
    pub fn recorded(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// 同时进行的抓取数峰值
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub fn decode_query(query: &str) -> String {
    urlencoding::decode(&query.replace('+', " "))
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| query.to_string())
}

pub fn snippets(texts: &[&str]) -> ResultSet {
    ResultSet {
        snippets: texts.iter().map(|s| s.to_string()).collect(),
        total_count: None,
    }
}

pub fn counted(texts: &[&str], total: u64) -> ResultSet {
    ResultSet {
        total_count: Some(total),
        ..snippets(texts)
    }
}

impl SearchBackend for MockSearch {
    async fn fetch(&self, query: &str, want_total_count: bool) -> Result<ResultSet, FetchError> {
        let decoded = decode_query(query);
        self.queries.lock().unwrap().push(decoded.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if !want_total_count {
            if self.fail_question {
                return Err(FetchError::Status {
                    status: 503,
                    url: decoded,
                });
            }
            return Ok(self.question_results.clone());
        }

        let found = self
            .answer_results
            .iter()
            .find(|(answer, _)| decoded.ends_with(&format!(" {}", answer)))
            .and_then(|(_, result_set)| result_set.clone());

        found.ok_or(FetchError::Status {
            status: 404,
            url: decoded,
        })
    }
}
