pub mod config;
pub mod error;
pub mod models;
pub mod db;

// 重新导出常用的类型和函数
pub use crate::config::Config;
pub use crate::error::SetupError;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

/// 持有日志写线程的 guard，drop 时刷新缓冲
pub struct LogGuard {
    _file: WorkerGuard,
    _console: WorkerGuard,
}

pub fn init_logging(file_name: &str) -> Result<LogGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::daily("logs", file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let (non_blocking_console, console_guard) = tracing_appender::non_blocking(std::io::stderr());

    // 创建环境过滤器
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 构建订阅者
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking_console)
                .with_ansi(true)  // 彩色输出
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)  // 文件不使用彩色
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
        )
        .try_init()?;

    Ok(LogGuard {
        _file: file_guard,
        _console: console_guard,
    })
}
