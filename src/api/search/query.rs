/// 拼接题干与选项并编码为 URL 查询参数
///
/// 保留字符（含 `+`、`&`）一律百分号编码，空格按表单编码写成 `+`
pub fn build_query(question_text: &str, answer_text: Option<&str>) -> String {
    let raw = match answer_text {
        Some(answer) if !answer.is_empty() => format!("{} {}", question_text, answer),
        _ => question_text.to_string(),
    };

    // urlencoding 把空格编码为 %20，而真正的 `+` 已经是 %2B，这里替换不会产生歧义
    urlencoding::encode(&raw).replace("%20", "+")
}
