//! 单元格取值
//!
//! 列访问器把记录字段转换成 `CellValue`，排序和全局过滤都只看这个值。

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// 过滤与默认渲染使用的字符串形式（数字为十进制）
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 全序比较
    ///
    /// 空值最小；整数与浮点数按精确数值比较（正负零相等，NaN 按符号排在两端）；
    /// 文本先忽略大小写比较，再区分大小写。
    /// 不同种类之间按固定的种类顺序。
    pub fn compare(&self, other: &CellValue) -> Ordering {
        use CellValue::*;

        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Empty, _) => Ordering::Less,
            (_, Empty) => Ordering::Greater,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => compare_floats(*a, *b),
            (Integer(a), Float(b)) => compare_integer_float(*a, *b),
            (Float(a), Integer(b)) => compare_integer_float(*b, *a).reverse(),
            (Text(a), Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (Date(a), DateTime(b)) => a.cmp(&b.date_naive()).then(Ordering::Less),
            (DateTime(a), Date(b)) => a.date_naive().cmp(b).then(Ordering::Greater),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Integer(_) | CellValue::Float(_) => 2,
            CellValue::Date(_) | CellValue::DateTime(_) => 3,
            CellValue::Text(_) => 4,
        }
    }
}

/// 2^63，i64 的取值上界
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn nan_rank(value: f64) -> i8 {
    match (value.is_nan(), value.is_sign_negative()) {
        (false, _) => 0,
        (true, true) => -1,
        (true, false) => 1,
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| nan_rank(a).cmp(&nan_rank(b)))
}

/// 不经过 `as f64`，超过 2^53 的整数也能精确比较
fn compare_integer_float(a: i64, b: f64) -> Ordering {
    if b.is_nan() {
        return 0.cmp(&nan_rank(b));
    }
    if b >= I64_BOUND {
        return Ordering::Less;
    }
    if b < -I64_BOUND {
        return Ordering::Greater;
    }
    // 此时 b 的整数部分落在 i64 范围内，转换无损
    let whole = b.trunc();
    a.cmp(&(whole as i64))
        .then_with(|| 0.0_f64.partial_cmp(&(b - whole)).unwrap_or(Ordering::Equal))
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(CellValue::Integer(9).compare(&CellValue::Integer(10)), Ordering::Less);
        assert_eq!(CellValue::Integer(2).compare(&CellValue::Float(1.5)), Ordering::Greater);
        assert_eq!(CellValue::Float(2.0).compare(&CellValue::Integer(2)), Ordering::Equal);
    }

    #[test]
    fn test_large_integers_compare_exactly_against_floats() {
        let two_pow_53 = 9_007_199_254_740_992_i64;
        let above = CellValue::Integer(two_pow_53 + 1);
        let float = CellValue::Float(two_pow_53 as f64);
        assert_eq!(above.compare(&float), Ordering::Greater);
        assert_eq!(float.compare(&above), Ordering::Less);
        assert_eq!(CellValue::Integer(two_pow_53).compare(&float), Ordering::Equal);

        let mut values = vec![
            above.clone(),
            float.clone(),
            CellValue::Integer(two_pow_53),
            CellValue::Float(f64::INFINITY),
            CellValue::Integer(i64::MAX),
            CellValue::Float(-0.5),
            CellValue::Integer(0),
        ];
        values.sort_by(CellValue::compare);
        assert_eq!(
            values,
            vec![
                CellValue::Float(-0.5),
                CellValue::Integer(0),
                float,
                CellValue::Integer(two_pow_53),
                above,
                CellValue::Integer(i64::MAX),
                CellValue::Float(f64::INFINITY),
            ]
        );
    }

    #[test]
    fn test_zero_and_nan_are_ordered_consistently() {
        let zero = CellValue::Integer(0);
        assert_eq!(zero.compare(&CellValue::Float(-0.0)), Ordering::Equal);
        assert_eq!(CellValue::Float(-0.0).compare(&CellValue::Float(0.0)), Ordering::Equal);
        assert_eq!(CellValue::Integer(i64::MAX).compare(&CellValue::Float(f64::NAN)), Ordering::Less);
        assert_eq!(CellValue::Float(-f64::NAN).compare(&CellValue::Integer(i64::MIN)), Ordering::Less);
        assert_eq!(CellValue::Float(f64::NAN).compare(&CellValue::Float(f64::INFINITY)), Ordering::Greater);
        assert_eq!(CellValue::Integer(i64::MIN).compare(&CellValue::Float(-I64_BOUND)), Ordering::Equal);
        assert_eq!(CellValue::Integer(3).compare(&CellValue::Float(3.5)), Ordering::Less);
        assert_eq!(CellValue::Integer(-3).compare(&CellValue::Float(-3.5)), Ordering::Greater);
    }

    #[test]
    fn test_text_is_case_insensitive_with_tiebreak() {
        let lower = CellValue::from("smith");
        let upper = CellValue::from("Smith");
        let other = CellValue::from("Adams");
        assert_eq!(other.compare(&lower), Ordering::Less);
        assert_eq!(other.compare(&upper), Ordering::Less);
        assert_ne!(lower.compare(&upper), Ordering::Equal);
        assert_eq!(lower.compare(&upper), upper.compare(&lower).reverse());
    }

    #[test]
    fn test_empty_sorts_first() {
        assert_eq!(CellValue::Empty.compare(&CellValue::Integer(-5)), Ordering::Less);
        assert_eq!(CellValue::from("a").compare(&CellValue::Empty), Ordering::Greater);
        assert_eq!(CellValue::from(None::<i64>), CellValue::Empty);
    }

    #[test]
    fn test_display_string() {
        assert_eq!(CellValue::Integer(301).to_display_string(), "301");
        assert_eq!(CellValue::Float(2.5).to_display_string(), "2.5");
        assert_eq!(CellValue::Empty.to_display_string(), "");
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(CellValue::from(date).to_string(), "2024-03-02");
    }

    #[test]
    fn test_mixed_kinds_have_stable_order() {
        let number = CellValue::Integer(1);
        let text = CellValue::from("1");
        assert_eq!(number.compare(&text), Ordering::Less);
        assert_eq!(text.compare(&number), Ordering::Greater);
    }
}
