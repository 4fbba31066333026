//! 问答文件与本轮目录
//!
//! 问答文件代替截图/OCR 环节，直接给出题干和三个选项的文本

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Deserialize;
use tracing::info;

use crate::app::models::{Answer, CANDIDATE_COUNT, Question};

#[derive(Debug, Clone, Deserialize)]
pub struct QuizFile {
    #[serde(default)]
    pub questions: Vec<QuizEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizEntry {
    /// OCR 原文
    pub text: String,
    pub answers: Vec<String>,
    /// 清洗后的文本，只用于报告
    #[serde(default)]
    pub cleaned_text: Option<String>,
    #[serde(default)]
    pub cleaned_answers: Option<Vec<String>>,
    /// 正确答案（1..=3），缺省时在交互中询问
    #[serde(default)]
    pub correct: Option<usize>,
}

impl QuizEntry {
    pub fn to_question(&self) -> Result<Question> {
        let answers: [String; CANDIDATE_COUNT] = self
            .answers
            .clone()
            .try_into()
            .map_err(|v: Vec<String>| anyhow::anyhow!("题目 {:?} 需要 3 个选项，实际 {} 个", self.text, v.len()))?;

        let cleaned: [String; CANDIDATE_COUNT] = match &self.cleaned_answers {
            Some(list) => list
                .clone()
                .try_into()
                .map_err(|v: Vec<String>| anyhow::anyhow!("题目 {:?} 的清洗选项需要 3 个，实际 {} 个", self.text, v.len()))?,
            None => Default::default(),
        };

        if let Some(correct) = self.correct {
            anyhow::ensure!(
                (1..=CANDIDATE_COUNT).contains(&correct),
                "题目 {:?} 的正确答案 {} 超出范围 (1..=3)",
                self.text,
                correct
            );
        }

        let [a0, a1, a2] = answers;
        let [c0, c1, c2] = cleaned;
        Ok(Question::new(
            &self.text,
            self.cleaned_text.clone().unwrap_or_default(),
            [Answer::new(a0, c0), Answer::new(a1, c1), Answer::new(a2, c2)],
        ))
    }
}

pub fn load_quiz(path: &Path) -> Result<QuizFile> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("读取问答文件失败: {:?}", path))?;
    let quiz: QuizFile =
        toml::from_str(&content).with_context(|| format!("解析问答文件失败: {:?}", path))?;

    // 提前校验，避免答到一半才报错
    for entry in &quiz.questions {
        entry.to_question()?;
    }
    info!("载入问答文件 {:?}，共 {} 题", path, quiz.questions.len());
    Ok(quiz)
}

/// 按时间段决定本轮目录：13–14 点为 AM 场，20–21 点为 PM 场，其余时间归入 Debug
pub fn folder_name(quizzes_dir: &str, now: NaiveDateTime) -> PathBuf {
    let base = Path::new(quizzes_dir);
    match now.hour() {
        13..=14 => base.join(now.format("%Y-%m-%d-AM").to_string()),
        20..=21 => base.join(now.format("%Y-%m-%d-PM").to_string()),
        _ => base.join("Debug"),
    }
}

/// 创建（或复用）本轮目录
pub fn prepare_folder(quizzes_dir: &str, override_dir: Option<&Path>) -> Result<PathBuf> {
    let folder = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => folder_name(quizzes_dir, Local::now().naive_local()),
    };

    if folder.exists() {
        info!("{:?} 已存在", folder);
    } else {
        std::fs::create_dir_all(&folder).with_context(|| format!("创建目录失败: {:?}", folder))?;
        info!("{:?} 已创建", folder);
    }
    Ok(folder)
}
