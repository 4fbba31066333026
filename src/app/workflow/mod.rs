pub mod pipeline;
pub mod process_single;

pub struct QuestionCtx {
    /// 题目在本轮中的序号（从1开始，仅用于日志显示）
    pub question_index: usize,
    /// 本轮使用的问答文件名
    pub quiz_name: String,
}

impl QuestionCtx {
    /// 生成日志前缀
    pub fn log_prefix(&self) -> String {
        format!("[{} 题目#{}]", self.quiz_name, self.question_index)
    }
}
