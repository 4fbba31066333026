use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

use crate::api::search::SearchBackend;
use crate::api::search::google::GoogleSearch;
use crate::api::send_request::build_client;
use crate::app::models::{CANDIDATE_COUNT, Question};
use crate::app::quiz::{QuizFile, load_quiz, prepare_folder};
use crate::app::report::{report_path, save_report};
use crate::app::workflow::QuestionCtx;
use crate::app::workflow::process_single::GuessEngine;
use crate::app::workflow::process_single::result::Decision;
use crate::config::AppConfig;

/// 一轮问答的参数
pub struct RunOptions {
    pub quiz: PathBuf,
    pub max_questions: usize,
    /// 覆盖按时间段生成的本轮目录
    pub folder: Option<PathBuf>,
}

pub async fn run(config: &AppConfig, options: &RunOptions) -> Result<(), anyhow::Error> {
    let quiz = load_quiz(&options.quiz)?;
    let folder = prepare_folder(&config.quizzes_dir, options.folder.as_deref())?;

    let client = build_client(config)?;
    let engine = GuessEngine::new(GoogleSearch::new(client, config)?, config);

    let quiz_name = options
        .quiz
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("quiz")
        .to_string();

    let input = BufReader::new(tokio::io::stdin());
    run_quiz(&engine, &quiz, &quiz_name, options.max_questions, &folder, input).await?;
    Ok(())
}

/// 交互主循环：每题之前等待用户确认，结束后写报告
///
/// 报告已存在时不再收集正确答案，也不覆盖报告
pub async fn run_quiz<S, R>(
    engine: &GuessEngine<S>,
    quiz: &QuizFile,
    quiz_name: &str,
    max_questions: usize,
    folder: &Path,
    input: R,
) -> Result<Vec<Question>>
where
    S: SearchBackend,
    R: AsyncBufRead + Unpin,
{
    let report_path = report_path(folder);
    let report_exists = report_path.exists();
    if report_exists {
        info!("报告 {:?} 已存在，本轮不收集正确答案", report_path);
    }

    let mut lines = input.lines();
    let mut questions = Vec::new();

    for (index, entry) in quiz.questions.iter().take(max_questions).enumerate() {
        // 只在每题开始前检查退出
        prompt("按回车处理下一题，输入 e 退出: ");
        match lines.next_line().await? {
            None => break,
            Some(line) if line.trim() == "e" => break,
            Some(_) => {}
        }

        let mut question = entry.to_question()?;
        let ctx = QuestionCtx {
            question_index: index + 1,
            quiz_name: quiz_name.to_string(),
        };

        print_question(&ctx, &question);
        let decision = engine.process_single_question(&mut question, &ctx).await;
        print_decision(&question, &decision);

        if !report_exists {
            let actual = match entry.correct {
                Some(correct) => Some(correct),
                None => ask_correct_answer(&mut lines).await?,
            };
            if let Some(actual) = actual {
                question.set_actual_position(actual);
            }
        }

        println!("{}\n", "_".repeat(80));
        questions.push(question);
    }

    if !report_exists {
        save_report(&report_path, &questions)?;
    }

    let guessed = questions.iter().filter(|q| q.guessed_right() == Some(true)).count();
    info!("本轮结束，共 {} 题，猜中 {} 题", questions.len(), guessed);
    Ok(questions)
}

/// 询问正确答案，非法输入重新询问；输入结束时返回 None
async fn ask_correct_answer<R>(lines: &mut Lines<R>) -> Result<Option<usize>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        prompt("\n正确答案是? (1,2,3): ");
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(position) if (1..=CANDIDATE_COUNT).contains(&position) => return Ok(Some(position)),
            _ => warn!("无效输入 {:?}，请输入 1、2 或 3", line.trim()),
        }
    }
}

fn prompt(message: &str) {
    print!("{}", message);
    let _ = std::io::stdout().flush();
}

fn print_question(ctx: &QuestionCtx, question: &Question) {
    let answers: Vec<&str> = question.candidates().iter().map(|a| a.text()).collect();
    println!("\n第 {} 题: {}", ctx.question_index, question.text());
    println!("选项: [{}]", answers.join(", "));
}

fn print_decision(question: &Question, decision: &Decision) {
    if !question.match_found {
        println!(
            "\n{}",
            format!("{:^40}{:<10}{:^10}{:<10}", "Answer", "Score", "Results", "Total").bold()
        );
        for answer in question.candidates() {
            let text: String = answer.text().chars().take(40).collect();
            println!(
                "{:^40}{:<10}{:^10}{:<10}",
                text,
                answer.score(),
                answer.filtered_result_count,
                answer.total_result_count
            );
        }
    }

    match decision.position().and_then(|p| question.answer(p - 1)) {
        Some(answer) => {
            let signal = if question.match_found {
                answer.match_count
            } else {
                answer.score()
            };
            println!(
                "\n{:>40} {:<40}",
                answer.text().green().bold(),
                signal.cyan()
            );
        }
        None => println!(
            "\n{}",
            "三个选项得分相同，搜索没有给出有效信号，请自行选择".red().bold()
        ),
    }
}
