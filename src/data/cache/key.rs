//! 查询键
//!
//! 由基础名和有序参数组成，例如 `eventAttendance/12`。
//! 失效时按前缀匹配：只有基础名的键匹配该基础名下所有带参数的键。

use std::fmt;

/// 查询键
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct QueryKey {
    /// 基础名（资源名）
    base: String,
    /// 参数列表（序列化为字符串）
    params: Vec<String>,
}

impl QueryKey {
    /// 创建只有基础名的查询键
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    /// 追加一个参数
    pub fn with_param(mut self, param: impl ToString) -> Self {
        self.params.push(param.to_string());
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// `prefix` 的基础名相同且参数是本键参数的前缀时返回 true
    pub fn matches_prefix(&self, prefix: &QueryKey) -> bool {
        self.base == prefix.base && self.params.starts_with(&prefix.params)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for param in &self.params {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}
