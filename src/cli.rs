//! 命令行参数定义

use clap::{Args, Parser, Subcommand, ValueEnum};
use rollcall::models::LogLevel;

#[derive(Parser)]
#[command(
    name = "rollcall",
    version,
    about = "Roster 管理后台的终端表格",
    long_about = "从 Roster 远程 API 拉取成员、活动、出勤与学期状态，\n\
                  在终端以可过滤、可排序、可分页的表格展示。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 覆盖配置文件中的日志级别
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// 覆盖 API 地址（优先于配置文件和 ROLLCALL_API_URL）
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// 成员列表
    Members(TableArgs),

    /// 活动列表
    Events(TableArgs),

    /// 某次活动的出勤
    Attendance {
        #[arg(value_name = "EVENT_ID")]
        event_id: i64,
        #[command(flatten)]
        table: TableArgs,
    },

    /// 某学期的成员状态
    Actives {
        #[arg(value_name = "SEMESTER")]
        semester: String,
        #[command(flatten)]
        table: TableArgs,
    },

    /// 学期列表
    Semesters(TableArgs),

    /// 删除成员
    DeleteMember {
        #[arg(value_name = "ID")]
        id: i64,
        /// 跳过确认直接删除
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// 删除活动
    DeleteEvent {
        #[arg(value_name = "ID")]
        id: i64,
        /// 跳过确认直接删除
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// 查看或修改配置文件
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 打印当前生效的配置
    Show,

    /// 设置 API 地址
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// 设置默认页大小
    SetPageSize {
        #[arg(value_name = "SIZE")]
        size: usize,
    },
}

/// 表格类命令共用的选项
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TableArgs {
    /// 全局过滤（不区分大小写的子串匹配）
    #[arg(long = "filter", value_name = "TEXT")]
    pub filter: Option<String>,

    /// 排序列 id（例如 rollCall、lastName）
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Option<String>,

    /// 降序排序
    #[arg(long = "desc", requires = "sort")]
    pub desc: bool,

    /// 页码（从 1 开始）
    #[arg(long = "page", value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// 页大小（缺省使用配置文件）
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// 隐藏的列 id，可重复或用逗号分隔
    #[arg(long = "hide", value_name = "COLUMN", value_delimiter = ',')]
    pub hide: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_table_options() {
        let cli = Cli::parse_from([
            "rollcall", "members", "--filter", "smith", "--sort", "rollCall", "--desc", "--page",
            "2", "--hide", "email,phoneNumber",
        ]);
        let Command::Members(table) = cli.command else {
            panic!("expected members");
        };
        assert_eq!(table.filter.as_deref(), Some("smith"));
        assert_eq!(table.sort.as_deref(), Some("rollCall"));
        assert!(table.desc);
        assert_eq!(table.page, 2);
        assert_eq!(table.hide, vec!["email", "phoneNumber"]);
    }

    #[test]
    fn test_parse_positional_and_global() {
        let cli = Cli::parse_from(["rollcall", "actives", "Fall 2024", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some(LogLevelArg::Debug));
        match cli.command {
            Command::Actives { semester, table } => {
                assert_eq!(semester, "Fall 2024");
                assert_eq!(table.page, 1);
            }
            _ => panic!("expected actives"),
        }
    }

    #[test]
    fn test_parse_delete() {
        let cli = Cli::parse_from(["rollcall", "delete-event", "4", "-y"]);
        assert!(matches!(cli.command, Command::DeleteEvent { id: 4, yes: true }));
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["rollcall", "events", "--desc"]).is_err());
    }
}
