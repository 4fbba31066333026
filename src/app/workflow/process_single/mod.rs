//! 单题处理流程
//!
//! 阶段一（题干搜索 + 字面匹配）→ 有命中直接决策；
//! 否则阶段二（题干 + 选项拼接搜索 + 相关性过滤 + 总数加权）→ 决策

pub mod decision;
pub mod deep_score;
pub mod negation;
pub mod quick_match;
pub(crate) mod result;

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::api::search::query::build_query;
use crate::api::search::{FetchError, ResultSet, SearchBackend};
use crate::app::logger::GUESS_TARGET;
use crate::app::models::{CANDIDATE_COUNT, Question};
use crate::app::workflow::QuestionCtx;
use crate::config::AppConfig;
use decision::decide;
use deep_score::deep_score;
use negation::{detect_negation, strip_negation};
use quick_match::quick_match;
use result::{Decision, DeepScoreRecord, QuickMatchRecord};

/// 推断引擎：持有搜索后端和全局共享的并发池
pub struct GuessEngine<S> {
    backend: Arc<S>,
    /// 同时进行的抓取/打分任务数上限
    pool: Arc<Semaphore>,
    missing_terms_marker: Arc<str>,
    negation_marker: String,
}

impl<S: SearchBackend> GuessEngine<S> {
    pub fn new(backend: S, config: &AppConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            pool: Arc::new(Semaphore::new(config.pool_size.max(1))),
            missing_terms_marker: Arc::from(config.missing_terms_marker.as_str()),
            negation_marker: config.negation_marker.clone(),
        }
    }

    /// 单题处理主流程，返回决策并把各阶段计数写回题目
    pub async fn process_single_question(&self, question: &mut Question, ctx: &QuestionCtx) -> Decision {
        let prefix = ctx.log_prefix();
        info!("{} ========== 开始处理题目 ==========", prefix);
        info!("{} 题干: {}", prefix, question.text());

        // === 1. 题干搜索 + 字面匹配 ===
        info!("{} [阶段 1/2] 题干搜索", prefix);
        let records = self.run_quick_match(question, &prefix).await;
        for record in records {
            question.candidates_mut()[record.position].match_count = record.match_count;
            if record.matched() {
                question.match_found = true;
            }
        }

        if question.match_found {
            let decision = decide(question);
            log_decision(&prefix, question, &decision);
            return decision;
        }

        // === 2. 拼接搜索 + 打分 ===
        info!("{} [阶段 2/2] 没有字面命中，进入拼接搜索", prefix);
        question.is_negated = detect_negation(question.text(), &self.negation_marker);
        let scoring_text = if question.is_negated {
            info!("{} 检测到否定题，将取得分最低的选项", prefix);
            strip_negation(question.text(), &self.negation_marker)
        } else {
            question.text().to_string()
        };

        let records = self.run_deep_score(question, &scoring_text, &prefix).await;
        for record in records {
            let answer = &mut question.candidates_mut()[record.position];
            answer.filtered_result_count = record.filtered_result_count;
            answer.total_result_count = record.total_result_count;
        }

        let decision = decide(question);
        log_decision(&prefix, question, &decision);
        decision
    }

    /// 只搜一次题干，三个选项并发扫描同一份结果
    async fn run_quick_match(&self, question: &Question, prefix: &str) -> Vec<QuickMatchRecord> {
        let query = build_query(question.text(), None);
        let result_set = match self.fetch_with_permit(&query, false).await {
            Ok(result_set) => result_set,
            Err(e) => {
                warn!("{} 题干搜索失败，按无命中处理: {}", prefix, e);
                ResultSet::default()
            }
        };
        let snippets = Arc::new(result_set.snippets);

        let tasks = question.candidates().iter().enumerate().map(|(position, answer)| {
            let snippets = snippets.clone();
            let pool = self.pool.clone();
            let answer_text = answer.text().to_string();

            tokio::spawn(async move {
                let _permit = pool.acquire().await.ok();
                quick_match(&snippets, position, &answer_text)
            })
        });

        // 汇合点：三个任务全部结束才继续
        let results = join_all(tasks).await;

        results
            .into_iter()
            .enumerate()
            .map(|(position, res)| match res {
                Ok(record) => {
                    info!("{} 选项 {} 命中 {} 条", prefix, position + 1, record.match_count);
                    record
                }
                Err(e) => {
                    error!("{} 选项 {} 匹配任务异常（Panic）: {:?}", prefix, position + 1, e);
                    QuickMatchRecord {
                        position,
                        match_count: 0,
                    }
                }
            })
            .collect()
    }

    /// 每个选项一条拼接查询，并发抓取并打分
    async fn run_deep_score(
        &self,
        question: &Question,
        scoring_text: &str,
        prefix: &str,
    ) -> Vec<DeepScoreRecord> {
        let tasks = question.candidates().iter().enumerate().map(|(position, answer)| {
            let backend = self.backend.clone();
            let pool = self.pool.clone();
            let marker = self.missing_terms_marker.clone();
            let answer_text = answer.text().to_string();
            let query = build_query(scoring_text, Some(&answer_text));
            let prefix = prefix.to_string();

            tokio::spawn(async move {
                let _permit = pool.acquire().await.ok();
                match backend.fetch(&query, true).await {
                    Ok(result_set) => deep_score(&result_set, position, &answer_text, &marker),
                    Err(e) => {
                        warn!("{} 选项 {} 拼接搜索失败，按中性值处理: {}", prefix, position + 1, e);
                        DeepScoreRecord::neutral(position)
                    }
                }
            })
        });

        let results = join_all(tasks).await;

        results
            .into_iter()
            .enumerate()
            .map(|(position, res)| match res {
                Ok(record) => record,
                Err(e) => {
                    error!("{} 选项 {} 打分任务异常（Panic）: {:?}", prefix, position + 1, e);
                    DeepScoreRecord::neutral(position)
                }
            })
            .collect()
    }

    async fn fetch_with_permit(&self, query: &str, want_total_count: bool) -> Result<ResultSet, FetchError> {
        let _permit = self.pool.acquire().await.ok();
        self.backend.fetch(query, want_total_count).await
    }
}

fn log_decision(prefix: &str, question: &Question, decision: &Decision) {
    let scores = question.scores();
    let counts: [u64; CANDIDATE_COUNT] = question.candidates().each_ref().map(|a| a.match_count);
    match decision {
        Decision::Guessed { .. } => info!("{} 决策: {}", prefix, decision),
        Decision::Indeterminate => warn!("{} 三个选项得分相同，无法给出可信答案", prefix),
    }
    info!(
        target: GUESS_TARGET,
        "{} question={:?} negated={} match_found={} matches={:?} scores={:?} decision={}",
        prefix,
        question.text(),
        question.is_negated,
        question.match_found,
        counts,
        scores,
        decision
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::search::test_support::{MockSearch, counted, snippets};
    use crate::app::logger;
    use crate::app::models::Answer;
    use result::Phase;

    fn ctx() -> QuestionCtx {
        QuestionCtx {
            question_index: 1,
            quiz_name: "test".to_string(),
        }
    }

    fn question(text: &str, answers: [&str; 3]) -> Question {
        Question::new(text, "", answers.map(|a| Answer::new(a, a.to_lowercase())))
    }

    #[tokio::test]
    async fn test_negated_question_picks_minimum_score() {
        logger::init_test();

        let backend = MockSearch {
            question_results: snippets(&["Il sistema solare ha otto pianeti"]),
            ..Default::default()
        }
        .with_answer("Marte", Some(counted(&[], 4000)))
        .with_answer("Giove", Some(counted(&[], 3500)))
        .with_answer("Sedia", Some(counted(&[], 12)));
        let engine = GuessEngine::new(backend, &AppConfig::default());

        let mut q = question("Quale di questi NON è un pianeta?", ["Marte", "Giove", "Sedia"]);
        let decision = engine.process_single_question(&mut q, &ctx()).await;

        assert_eq!(
            decision,
            Decision::Guessed {
                position: 3,
                phase: Phase::DeepScore
            }
        );
        assert!(q.is_negated);
        assert!(!q.match_found);
        assert_eq!(q.scores(), [4000, 3500, 12]);
        assert_eq!(q.guessed_position(), Some(3));
        assert_eq!(q.text(), "Quale di questi NON è un pianeta?");

        let queries = engine.backend.recorded();
        assert_eq!(queries.len(), 4);
        assert!(
            queries[1..]
                .iter()
                .all(|q| q.starts_with("Quale di questi è un pianeta? "))
        );
    }

    #[tokio::test]
    async fn test_quick_match_short_circuits_deep_score() {
        logger::init_test();

        let backend = MockSearch {
            question_results: snippets(&[
                "Giove è il pianeta più grande",
                "Le lune di GIOVE",
                "Il sistema solare",
            ]),
            ..Default::default()
        };
        let engine = GuessEngine::new(backend, &AppConfig::default());

        let mut q = question("Qual è il pianeta più grande?", ["Marte", "Giove", "Sedia"]);
        let decision = engine.process_single_question(&mut q, &ctx()).await;

        assert_eq!(
            decision,
            Decision::Guessed {
                position: 2,
                phase: Phase::QuickMatch
            }
        );
        assert!(q.match_found);
        let counts: Vec<u64> = q.candidates().iter().map(|a| a.match_count).collect();
        assert_eq!(counts, vec![0, 2, 0]);
        // 只发出了题干查询
        assert_eq!(engine.backend.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_usual_question_picks_maximum_with_relevance_filter() {
        logger::init_test();

        let backend = MockSearch::default()
            .with_answer(
                "Roma",
                Some(counted(
                    &["Roma capitale d'Italia\nwikipedia", "Mancanti: capitale\nRoma"],
                    100,
                )),
            )
            .with_answer("Milano", Some(counted(&["Milano e la moda\nvogue"], 150)))
            .with_answer("Torino", Some(counted(&["Altro\nDeve includere: Torino"], 90)));
        let engine = GuessEngine::new(backend, &AppConfig::default());

        let mut q = question("Qual è la capitale d'Italia?", ["Roma", "Milano", "Torino"]);
        let decision = engine.process_single_question(&mut q, &ctx()).await;

        // Roma: 100 * 1, Milano: 150 * 1, Torino: 90 * max(0, 1)
        assert_eq!(q.scores(), [100, 150, 90]);
        assert!(!q.is_negated);
        assert_eq!(decision.position(), Some(2));
    }

    #[tokio::test]
    async fn test_fetch_errors_are_neutralized() {
        logger::init_test();

        let backend = MockSearch::default()
            .with_answer("Marte", None)
            .with_answer("Giove", Some(counted(&[], 20)));
        let engine = GuessEngine::new(backend, &AppConfig::default());

        let mut q = question("Quale pianeta è gassoso?", ["Marte", "Giove", "Sedia"]);
        let decision = engine.process_single_question(&mut q, &ctx()).await;

        let marte = q.answer(0).unwrap();
        assert_eq!(marte.filtered_result_count, 0);
        assert_eq!(marte.total_result_count, 1);
        assert_eq!(q.scores(), [1, 20, 1]);
        assert_eq!(decision.position(), Some(2));
    }

    #[tokio::test]
    async fn test_all_failures_are_indeterminate() {
        logger::init_test();

        let engine = GuessEngine::new(MockSearch::default(), &AppConfig::default());
        let mut q = question("Domanda senza risposte", ["a", "b", "c"]);

        let decision = engine.process_single_question(&mut q, &ctx()).await;
        assert_eq!(decision, Decision::Indeterminate);
        assert_eq!(q.guessed_position(), None);
        assert_eq!(q.scores(), [1, 1, 1]);
    }

    #[tokio::test]
    async fn test_pool_size_bounds_concurrent_fetches() {
        logger::init_test();

        let backend = MockSearch {
            delay: Some(Duration::from_millis(20)),
            ..Default::default()
        }
        .with_answer("Marte", Some(counted(&[], 30)))
        .with_answer("Giove", Some(counted(&[], 20)))
        .with_answer("Sedia", Some(counted(&[], 10)));
        let config = AppConfig {
            pool_size: 1,
            ..Default::default()
        };
        let engine = GuessEngine::new(backend, &config);

        let mut q = question("Quale pianeta è rosso?", ["Marte", "Giove", "Sedia"]);
        let decision = engine.process_single_question(&mut q, &ctx()).await;

        assert_eq!(engine.backend.peak_in_flight(), 1);
        assert_eq!(engine.backend.recorded().len(), 4);
        // 三条记录都在决策前合并
        assert_eq!(q.scores(), [30, 20, 10]);
        assert_eq!(
            decision,
            Decision::Guessed {
                position: 1,
                phase: Phase::DeepScore
            }
        );
    }

    #[tokio::test]
    async fn test_failed_question_search_falls_through_to_deep_score() {
        logger::init_test();

        let backend = MockSearch {
            question_results: snippets(&["Giove è il più grande"]),
            fail_question: true,
            ..Default::default()
        }
        .with_answer("Marte", Some(counted(&[], 50)))
        .with_answer("Giove", Some(counted(&[], 900)))
        .with_answer("Sedia", Some(counted(&[], 3)));
        let engine = GuessEngine::new(backend, &AppConfig::default());

        let mut q = question("Qual è il pianeta più grande?", ["Marte", "Giove", "Sedia"]);
        let decision = engine.process_single_question(&mut q, &ctx()).await;

        assert!(!q.match_found);
        assert!(q.candidates().iter().all(|a| a.match_count == 0));
        assert_eq!(engine.backend.recorded().len(), 4);
        assert_eq!(q.scores(), [50, 900, 3]);
        assert_eq!(
            decision,
            Decision::Guessed {
                position: 2,
                phase: Phase::DeepScore
            }
        );
    }
}
