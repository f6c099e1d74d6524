// 配置命令

use std::path::Path;

use rollcall::models::AppConfig;
use rollcall::utils::config::{config_path, read_config_from, write_config_to};
use rollcall::{AppError, AppResult};
use url::Url;

/// 打印当前生效的配置（含环境变量与命令行覆盖）
pub fn show(config: &AppConfig) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

pub fn set_api_url(url: &str) -> anyhow::Result<String> {
    let path = config_path()?;
    set_api_url_at(&path, url)?;
    Ok(format!("API 地址已更新: {url}"))
}

pub fn set_page_size(size: usize) -> anyhow::Result<String> {
    let path = config_path()?;
    set_page_size_at(&path, size)?;
    Ok(format!("默认页大小已更新: {size}"))
}

fn set_api_url_at(path: &Path, url: &str) -> AppResult<()> {
    Url::parse(url).map_err(|e| AppError::Config {
        reason: format!("API 地址无效 {url}: {e}"),
    })?;
    update_config(path, |config| config.api.base_url = url.to_string())
}

fn set_page_size_at(path: &Path, size: usize) -> AppResult<()> {
    if size == 0 {
        return Err(AppError::Config {
            reason: "页大小至少为 1".to_string(),
        });
    }
    update_config(path, |config| config.table.page_size = size)
}

/// 读取配置文件原始内容（不应用环境变量）修改后写回
fn update_config(path: &Path, change: impl FnOnce(&mut AppConfig)) -> AppResult<()> {
    let mut config = read_config_from(path)?;
    change(&mut config);
    write_config_to(path, &config)
}
