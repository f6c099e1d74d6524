use crate::core::error::{AppError, AppResult};
use crate::models::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 覆盖 `api.base_url` 的环境变量
pub const API_URL_ENV: &str = "ROLLCALL_API_URL";

/// Rollcall 配置目录 (~/.rollcall)，若不存在则创建
pub fn config_dir() -> AppResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| AppError::Config {
        reason: "无法获取用户主目录".to_string(),
    })?;
    let config_dir = home_dir.join(".rollcall");
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| AppError::io(&config_dir, e))?;
    }
    Ok(config_dir)
}

/// 全局配置文件路径
pub fn config_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// 读取全局配置并应用环境变量覆盖
pub fn read_config() -> AppResult<AppConfig> {
    let mut config = read_config_from(&config_path()?)?;
    apply_env_overrides(&mut config, std::env::var(API_URL_ENV).ok());
    Ok(config)
}

/// 从指定路径读取配置（文件不存在时返回默认配置）
pub fn read_config_from(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "配置文件不存在，使用默认配置");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// 写入全局配置
pub fn write_config(config: &AppConfig) -> AppResult<()> {
    write_config_to(&config_path()?, config)
}

/// 将配置写入指定路径（Unix 下权限为 0600）
pub fn write_config_to(path: &Path, config: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(|e| AppError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(path).map_err(|e| AppError::io(path, e))?;
        let mut perms = metadata.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| AppError::io(path, e))?;
    }

    tracing::debug!(path = %path.display(), "配置已保存");
    Ok(())
}

/// 用环境变量覆盖配置文件中的 API 地址
fn apply_env_overrides(config: &mut AppConfig, api_url: Option<String>) {
    if let Some(url) = api_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        tracing::debug!(base_url = %url, "使用环境变量中的 API 地址");
        config.api.base_url = url;
    }
}
