use std::future::Future;

use thiserror::Error;

pub mod google;
pub mod query;

#[cfg(test)]
pub(crate) mod test_support;

/// 一次搜索请求解析后的结果集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// 每个结果容器的纯文本，块级元素之间保留换行
    pub snippets: Vec<String>,

    /// 页面给出的结果总数，仅在请求时要求提取才会有值
    pub total_count: Option<u64>,
}

/// 搜索请求在网络/传输层的失败
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("搜索请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("搜索返回非成功状态 {status}: {url}")]
    Status { status: u16, url: String },
}

/// 搜索后端
///
/// `query` 为已经编码好的查询串（见 [`query::build_query`]）
pub trait SearchBackend: Send + Sync + 'static {
    fn fetch(
        &self,
        query: &str,
        want_total_count: bool,
    ) -> impl Future<Output = Result<ResultSet, FetchError>> + Send;
}
