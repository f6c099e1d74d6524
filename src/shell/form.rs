//! 表单校验
//!
//! 表单只在校验通过后才把值交给提交处理函数。

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

/// 字段级校验错误，非空时阻止提交
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 字段的第一条错误（表单下方展示的那条）
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// 没有错误时返回 `Ok(output)`
    pub fn into_result<T>(self, output: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(output)
        } else {
            Err(self)
        }
    }

    /// 必填文本，去掉首尾空白后不能为空
    pub fn require_text(&mut self, field: &str, value: &str, message: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, message);
        }
        trimmed.to_string()
    }

    /// 取值必须在固定列表中
    pub fn require_choice(
        &mut self,
        field: &str,
        value: &str,
        choices: &[&str],
        message: &str,
    ) -> String {
        if !choices.contains(&value) {
            self.add(field, message);
        }
        value.to_string()
    }

    /// 整数下限
    pub fn require_min(&mut self, field: &str, value: Option<i64>, min: i64, message: &str) -> i64 {
        match value {
            Some(value) if value >= min => value,
            _ => {
                self.add(field, message);
                value.unwrap_or_default()
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// 表单模式：原始输入 -> 校验后的提交值
pub trait FormSchema {
    type Output;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

/// 持有表单输入和最近一次校验错误
#[derive(Debug, Clone)]
pub struct Form<S> {
    values: S,
    errors: FieldErrors,
}

impl<S: FormSchema> Form<S> {
    pub fn new(values: S) -> Self {
        Self {
            values,
            errors: FieldErrors::default(),
        }
    }

    pub fn values(&self) -> &S {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut S {
        &mut self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// 校验并记录错误
    pub fn validate(&mut self) -> Result<S::Output, FieldErrors> {
        let result = self.values.validate();
        self.errors = match &result {
            Ok(_) => FieldErrors::default(),
            Err(errors) => errors.clone(),
        };
        result
    }

    /// 校验通过才调用 `handler`
    pub async fn submit<F, Fut, T>(&mut self, handler: F) -> Result<T, FieldErrors>
    where
        F: FnOnce(S::Output) -> Fut,
        Fut: Future<Output = T>,
    {
        let output = self.validate()?;
        Ok(handler(output).await)
    }
}
