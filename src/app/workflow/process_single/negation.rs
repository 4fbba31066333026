//! 否定题的词法规则：题干中出现标记词（如 "NON"）即视为否定题。
//! 规则只在这里实现，换成分类器时不需要改决策逻辑。

/// 区分大小写，标记词需原样出现
pub fn detect_negation(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.contains(marker)
}

/// 去掉标记词，得到阶段二拼接查询使用的题干
pub fn strip_negation(text: &str, marker: &str) -> String {
    if marker.is_empty() {
        return text.to_string();
    }
    text.replace(marker, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
