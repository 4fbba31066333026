use crate::api::search::ResultSet;
use crate::api::search::google::NEUTRAL_TOTAL_COUNT;

use super::result::DeepScoreRecord;

/// 判断一条结果是否与选项真正相关
///
/// 三个条件同时满足：
/// 1. 结果文本包含选项（大小写不敏感）
/// 2. 不含 “缺少关键词” 标记（搜索引擎放宽了查询，结果质量低）
/// 3. 选项不出现在最后一行（那一行是引擎附加的 “必须包含” 提示）
pub fn is_relevant(snippet: &str, answer_text: &str, missing_terms_marker: &str) -> bool {
    let needle = answer_text.to_lowercase();
    let lowered = snippet.to_lowercase();

    if !lowered.contains(&needle) {
        return false;
    }
    if !missing_terms_marker.is_empty() && snippet.contains(missing_terms_marker) {
        return false;
    }

    let last_line = lowered.split('\n').next_back().unwrap_or_default();
    !last_line.contains(&needle)
}

/// 阶段二：对 “题干 + 选项” 的搜索结果打分
pub fn deep_score(
    result_set: &ResultSet,
    position: usize,
    answer_text: &str,
    missing_terms_marker: &str,
) -> DeepScoreRecord {
    let filtered_result_count = result_set
        .snippets
        .iter()
        .filter(|snippet| is_relevant(snippet, answer_text, missing_terms_marker))
        .count() as u64;

    DeepScoreRecord {
        position,
        filtered_result_count,
        total_result_count: result_set.total_count.unwrap_or(NEUTRAL_TOTAL_COUNT),
    }
}
