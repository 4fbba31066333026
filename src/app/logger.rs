use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 决策流水专用的 target
pub const GUESS_TARGET: &str = "guesses";

/// 初始化日志系统
/// 返回 Vec<WorkerGuard>，必须在 main 函数中一直持有，否则文件日志不生效
pub fn init(log_dir: &str, file_prefix: &str) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    // === 1. 系统错误日志 (logs/quiz_guesser.YYYY-MM-DD) ===
    let sys_appender = tracing_appender::rolling::daily(log_dir, file_prefix);
    let (sys_writer, sys_guard) = tracing_appender::non_blocking(sys_appender);
    guards.push(sys_guard);

    let sys_layer = fmt::layer()
        .with_writer(sys_writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_filter(tracing::metadata::LevelFilter::ERROR);

    // === 2. 决策流水 (logs/guesses.YYYY-MM-DD) ===
    // 每道题一行，只接受 target 为 "guesses" 的日志
    let guess_appender = tracing_appender::rolling::daily(log_dir, GUESS_TARGET);
    let (guess_writer, guess_guard) = tracing_appender::non_blocking(guess_appender);
    guards.push(guess_guard);

    let guess_layer = fmt::layer()
        .with_writer(guess_writer)
        .with_ansi(false)
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target() == GUESS_TARGET
        }));

    // === 3. 控制台输出，决策流水不重复打印 ===
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target() != GUESS_TARGET
        }));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(sys_layer)
        .with(guess_layer)
        .init();

    guards
}

/// 测试用日志，多个测试重复调用时忽略已初始化的错误
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_test_writer()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false),
        )
        .try_init();
}
