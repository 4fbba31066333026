//! 决策规则
//!
//! - 阶段一：取 match_count 最大的选项；并列时取位置靠前的（已知不理想，先这样约定）
//! - 阶段二：三个得分完全相同则无法判断；否则普通题取最大、否定题取最小

use crate::app::models::{CANDIDATE_COUNT, Question};

use super::result::{Decision, Phase};

/// 阶段一决策，只在有命中时调用
pub fn decide_by_matches(match_counts: &[u64; CANDIDATE_COUNT]) -> Decision {
    Decision::Guessed {
        position: first_extreme(match_counts, |candidate, best| candidate > best) + 1,
        phase: Phase::QuickMatch,
    }
}

/// 阶段二决策
///
/// 否定题的拼接查询去掉了 “不” 字，与题干描述最吻合的选项恰好是错误的，
/// 吻合度最低的才是题目要找的那个例外
pub fn decide_by_scores(scores: &[u64; CANDIDATE_COUNT], is_negated: bool) -> Decision {
    if scores.iter().all(|score| *score == scores[0]) {
        return Decision::Indeterminate;
    }

    let index = if is_negated {
        first_extreme(scores, |candidate, best| candidate < best)
    } else {
        first_extreme(scores, |candidate, best| candidate > best)
    };

    Decision::Guessed {
        position: index + 1,
        phase: Phase::DeepScore,
    }
}

/// 按题目当前状态做决策，并记录猜测位置
pub fn decide(question: &mut Question) -> Decision {
    let decision = if question.match_found {
        let counts = question.candidates().each_ref().map(|answer| answer.match_count);
        decide_by_matches(&counts)
    } else {
        decide_by_scores(&question.scores(), question.is_negated)
    };

    if let Some(position) = decision.position() {
        question.set_guessed_position(position);
    }
    decision
}

/// 严格比较，相等时保留先出现的下标
fn first_extreme(values: &[u64], better: impl Fn(u64, u64) -> bool) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if better(*value, values[best]) {
            best = index;
        }
    }
    best
}
