use super::result::QuickMatchRecord;

/// 阶段一：统计包含选项文本的结果条数
///
/// 只做大小写折叠，不处理空白；同一条结果里出现多次只算一次
pub fn quick_match(snippets: &[String], position: usize, answer_text: &str) -> QuickMatchRecord {
    let needle = answer_text.to_lowercase();
    let match_count = snippets
        .iter()
        .filter(|snippet| snippet.to_lowercase().contains(&needle))
        .count() as u64;

    QuickMatchRecord {
        position,
        match_count,
    }
}

impl QuickMatchRecord {
    pub fn matched(&self) -> bool {
        self.match_count > 0
    }
}
