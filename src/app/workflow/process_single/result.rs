use std::fmt;

/// 阶段一单个选项的结果，由工作任务返回，汇合后再写回模型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickMatchRecord {
    /// 0 起的位置
    pub position: usize,
    pub match_count: u64,
}

/// 阶段二单个选项的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepScoreRecord {
    pub position: usize,
    pub filtered_result_count: u64,
    pub total_result_count: u64,
}

impl DeepScoreRecord {
    /// 抓取失败时使用的中性结果
    pub fn neutral(position: usize) -> Self {
        Self {
            position,
            filtered_result_count: 0,
            total_result_count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    QuickMatch,
    DeepScore,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::QuickMatch => "quick_match",
            Phase::DeepScore => "deep_score",
        }
    }
}

/// 决策结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 选中的 1 起位置，以及做出决策的阶段
    Guessed { position: usize, phase: Phase },
    /// 三个得分完全相同，没有可信的答案
    Indeterminate,
}

impl Decision {
    pub fn position(&self) -> Option<usize> {
        match self {
            Decision::Guessed { position, .. } => Some(*position),
            Decision::Indeterminate => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Guessed { position, phase } => {
                write!(f, "选项 {} ({})", position, phase.as_str())
            }
            Decision::Indeterminate => write!(f, "无法判断"),
        }
    }
}
