//! 本轮报告 (Report.csv)，每道题一行

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::app::models::Question;

pub const REPORT_FILE: &str = "Report.csv";

pub const CSV_HEADERS: [&str; 16] = [
    "Question",
    "First answer",
    "Second answer",
    "Third answer",
    "Cleaned question",
    "Cleaned first answer",
    "Cleaned second answer",
    "Cleaned third answer",
    "Guessed answer",
    "Correct answer",
    "Usual question",
    "One match",
    "Score first answer",
    "Score second answer",
    "Score third answer",
    "Did I guess?",
];

pub fn report_path(folder: &Path) -> PathBuf {
    folder.join(REPORT_FILE)
}

fn position_cell(position: Option<usize>) -> String {
    position.map(|p| p.to_string()).unwrap_or_default()
}

/// 单行报告
pub fn report_row(question: &Question) -> [String; 16] {
    let [a0, a1, a2] = question.candidates();
    let [s0, s1, s2] = question.scores();
    [
        question.text().to_string(),
        a0.text().to_string(),
        a1.text().to_string(),
        a2.text().to_string(),
        question.cleaned_text().to_string(),
        a0.cleaned_text().to_string(),
        a1.cleaned_text().to_string(),
        a2.cleaned_text().to_string(),
        position_cell(question.guessed_position()),
        position_cell(question.actual_position()),
        (!question.is_negated).to_string(),
        question.match_found.to_string(),
        s0.to_string(),
        s1.to_string(),
        s2.to_string(),
        question.guessed_right().unwrap_or(false).to_string(),
    ]
}

pub fn save_report(path: &Path, questions: &[Question]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("创建报告失败: {:?}", path))?;

    writer.write_record(CSV_HEADERS)?;
    for question in questions {
        writer.write_record(report_row(question))?;
    }
    writer.flush().with_context(|| format!("写入报告失败: {:?}", path))?;

    info!("报告已保存: {:?}，共 {} 题", path, questions.len());
    Ok(())
}
