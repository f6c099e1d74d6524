//! 日志初始化
//!
//! 命令输出占用 stdout，日志只写 stderr 或按天滚动的文件。
//! 设置了 `RUST_LOG` 时以它为准，否则本 crate 使用配置的级别，HTTP 相关依赖只记录 warn 以上。

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::models::config::{LogConfig, LogFormat, LogLevel, LogOutput};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

const LOG_FILE_PREFIX: &str = "rollcall";

const QUIET_TARGETS: [&str; 4] = ["hyper", "reqwest", "h2", "tokio"];

/// 持有文件写入线程，丢弃时刷新缓冲区
///
/// 需要在 `main` 中一直持有到进程退出。
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// 按配置安装全局订阅者，只能调用一次
pub fn init_logger(config: &LogConfig) -> anyhow::Result<LogGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config.level));
    let (layers, file_guard) = build_layers(config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("日志系统已初始化: {e}"))?;

    tracing::debug!(
        level = config.level.as_str(),
        format = ?config.format,
        output = ?config.output,
        "日志系统初始化完成"
    );
    Ok(LogGuard { _file: file_guard })
}

fn default_filter(level: LogLevel) -> EnvFilter {
    let quiet = QUIET_TARGETS
        .iter()
        .map(|target| format!("{target}=warn"))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(format!("{LOG_FILE_PREFIX}={level},{quiet}"))
}

/// 每个输出目标一层，格式相同
fn build_layers(config: &LogConfig) -> anyhow::Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let mut layers = Vec::new();

    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        layers.push(format_layer(config.format, std::io::stderr, true));
    }

    let file_guard = if matches!(config.output, LogOutput::File | LogOutput::Both) {
        let dir = log_dir(config.file_path.as_deref())?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(dir)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(format_layer(config.format, writer, false));
        Some(guard)
    } else {
        None
    };

    Ok((layers, file_guard))
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(cfg!(debug_assertions))
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(false)
            .boxed(),
    }
}

/// 日志目录，缺省为配置目录下的 `logs`；目录不存在时创建
fn log_dir(file_path: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = match file_path {
        Some(path) => PathBuf::from(path),
        None => crate::utils::config::config_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(dir: &std::path::Path, output: LogOutput) -> LogConfig {
        LogConfig {
            level: LogLevel::Debug,
            format: LogFormat::Json,
            output,
            file_path: Some(dir.to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn test_log_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("nested").join("logs");
        let dir = log_dir(nested.to_str()).unwrap();
        assert_eq!(dir, nested);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_default_filter_quiets_http_stack() {
        let filter = default_filter(LogLevel::Debug).to_string();
        assert!(filter.contains("rollcall=debug"));
        assert!(filter.contains("reqwest=warn"));
        assert!(filter.contains("hyper=warn"));
    }

    #[test]
    fn test_layers_follow_output_target() {
        let tmp = tempfile::tempdir().unwrap();

        let console = LogConfig::default();
        let (layers, guard) = build_layers(&console).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_none());

        let (layers, guard) = build_layers(&file_config(tmp.path(), LogOutput::File)).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_some());

        let (layers, guard) = build_layers(&file_config(tmp.path(), LogOutput::Both)).unwrap();
        assert_eq!(layers.len(), 2);
        assert!(guard.is_some());
    }

    #[test]
    fn test_file_output_writes_json_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let (layers, guard) = build_layers(&file_config(tmp.path(), LogOutput::File)).unwrap();

        let subscriber = tracing_subscriber::registry().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(rows = 12, "表格已刷新");
        });
        drop(guard);

        let contents: String = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
            .map(|entry| std::fs::read_to_string(entry.path()).unwrap())
            .collect();
        let line: serde_json::Value =
            serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(line["fields"]["message"], "表格已刷新");
        assert_eq!(line["fields"]["rows"], 12);
    }
}
