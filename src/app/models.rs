//! 题目与选项的数据模型
//!
//! 一道题固定 3 个选项，位置即屏幕上按钮的顺序。计数字段只在各自阶段的
//! 汇合点之后由协调者一次性写入。

pub const CANDIDATE_COUNT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    text: String,
    cleaned_text: String,
    /// 阶段一：题干搜索结果中出现该选项的结果条数
    pub match_count: u64,
    /// 阶段二：相关结果条数
    pub filtered_result_count: u64,
    /// 阶段二：搜索引擎给出的结果总数
    pub total_result_count: u64,
}

impl Answer {
    pub fn new(text: impl Into<String>, cleaned_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cleaned_text: cleaned_text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    /// `total_result_count * max(filtered_result_count, 1)`
    pub fn score(&self) -> u64 {
        compute_score(self.filtered_result_count, self.total_result_count)
    }
}

pub fn compute_score(filtered_result_count: u64, total_result_count: u64) -> u64 {
    total_result_count.saturating_mul(filtered_result_count.max(1))
}

#[derive(Debug, Clone)]
pub struct Question {
    text: String,
    cleaned_text: String,
    candidates: [Answer; CANDIDATE_COUNT],
    /// 阶段二之前做的否定检测结果
    pub is_negated: bool,
    /// 阶段一是否有任一选项命中
    pub match_found: bool,
    guessed_position: Option<usize>,
    actual_position: Option<usize>,
}

impl Question {
    /// 题干去掉首尾空白，换行替换为空格
    pub fn new(text: &str, cleaned_text: impl Into<String>, candidates: [Answer; CANDIDATE_COUNT]) -> Self {
        Self {
            text: text.trim().replace('\n', " "),
            cleaned_text: cleaned_text.into(),
            candidates,
            is_negated: false,
            match_found: false,
            guessed_position: None,
            actual_position: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn candidates(&self) -> &[Answer; CANDIDATE_COUNT] {
        &self.candidates
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut [Answer; CANDIDATE_COUNT] {
        &mut self.candidates
    }

    /// 0 起的位置
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.candidates.get(index)
    }

    pub fn scores(&self) -> [u64; CANDIDATE_COUNT] {
        self.candidates.each_ref().map(Answer::score)
    }

    /// 1 起的位置
    pub fn guessed_position(&self) -> Option<usize> {
        self.guessed_position
    }

    pub fn actual_position(&self) -> Option<usize> {
        self.actual_position
    }

    pub fn set_guessed_position(&mut self, position: usize) {
        debug_assert!((1..=CANDIDATE_COUNT).contains(&position));
        self.guessed_position = Some(position);
    }

    pub fn set_actual_position(&mut self, position: usize) {
        debug_assert!((1..=CANDIDATE_COUNT).contains(&position));
        self.actual_position = Some(position);
    }

    /// 两个位置都已知时才有结论
    pub fn guessed_right(&self) -> Option<bool> {
        match (self.guessed_position, self.actual_position) {
            (Some(guessed), Some(actual)) => Some(guessed == actual),
            _ => None,
        }
    }
}
