// 命令实现：解析后的子命令 -> 输出文本

pub mod config;
pub mod delete;
pub mod tables;

use rollcall::data::QueryCache;
use rollcall::models::AppConfig;
use rollcall::services::{RequestClient, RosterApi};
use rollcall::AppResult;

use crate::cli::{Command, ConfigAction};

/// 一次命令执行共享的客户端与缓存
pub struct Context {
    pub api: RosterApi,
    pub cache: QueryCache,
    pub page_size: usize,
}

impl Context {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api: RosterApi::new(RequestClient::from_config(&config.api)?),
            cache: QueryCache::new(&config.cache),
            page_size: config.table.page_size,
        })
    }
}

pub async fn run(config: &AppConfig, command: Command) -> anyhow::Result<String> {
    // 配置命令不需要构建 API 客户端
    let ctx = || Context::from_config(config);

    match command {
        Command::Config { action } => match action {
            ConfigAction::Show => config::show(config),
            ConfigAction::SetApiUrl { url } => config::set_api_url(&url),
            ConfigAction::SetPageSize { size } => config::set_page_size(size),
        },
        Command::Members(args) => tables::members(&ctx()?, &args).await,
        Command::Events(args) => tables::events(&ctx()?, &args).await,
        Command::Attendance { event_id, table } => {
            tables::attendance(&ctx()?, event_id, &table).await
        }
        Command::Actives { semester, table } => {
            tables::actives(&ctx()?, &semester, &table).await
        }
        Command::Semesters(args) => tables::semesters(&ctx()?, &args).await,
        Command::DeleteMember { id, yes } => delete::delete_member(&ctx()?, id, yes).await,
        Command::DeleteEvent { id, yes } => delete::delete_event(&ctx()?, id, yes).await,
    }
}
