// ==========================================
// 管材库存流水 - 宽松字段解析
// ==========================================
// 职责: 后端字段可能是数字、数字文本、null 或缺失
// 红线: 解析失败只产生 None，不让整条记录反序列化失败
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 从 JSON 值读取有限浮点数（数字或数字文本）
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// 从 JSON 值读取非负计数（小数部分截断）
pub fn count_from_value(value: &Value) -> Option<u64> {
    number_from_value(value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u64)
}

/// 从 JSON 值读取布尔标志（true / "true" / "1" / "Y" / 非零数字）
pub fn flag_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Some(true),
            "0" | "false" | "no" | "n" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_value))
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?.unwrap_or(0.0))
}

pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(count_from_value))
}

pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_u64(deserializer)?.unwrap_or(0))
}

pub fn flag_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(flag_from_value).unwrap_or(false))
}

/// 长度序列: 数组，或序列化成文本的数组
pub fn opt_f64_list<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let array = match raw {
        Some(Value::Array(items)) => items,
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Array(items)) => items,
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(array.iter().filter_map(number_from_value).collect()))
}

/// 可选文本: 非空字符串原样保留，数字/布尔转为文本，其余视为缺失
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// 记录标识: 字符串或数字，统一为字符串
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// 流水时间: RFC3339 / "YYYY-MM-DD HH:MM:SS" / "YYYY-MM-DD"
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => parse_datetime(&s),
        _ => None,
    })
}

pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(12.5)), Some(12.5));
        assert_eq!(number_from_value(&json!(" 40 ")), Some(40.0));
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!("NaN")), None);
        assert_eq!(number_from_value(&json!(null)), None);
    }

    #[test]
    fn test_count_from_value() {
        assert_eq!(count_from_value(&json!(3)), Some(3));
        assert_eq!(count_from_value(&json!("7")), Some(7));
        assert_eq!(count_from_value(&json!(2.9)), Some(2));
        assert_eq!(count_from_value(&json!(-1)), None);
    }

    #[derive(Deserialize)]
    struct Labelled {
        #[serde(default, deserialize_with = "opt_text")]
        label: Option<String>,
    }

    #[test]
    fn test_opt_text() {
        let read = |v: Value| serde_json::from_value::<Labelled>(v).unwrap().label;
        assert_eq!(read(json!({"label": "SALE"})), Some("SALE".to_string()));
        assert_eq!(read(json!({"label": 7})), Some("7".to_string()));
        assert_eq!(read(json!({"label": "  "})), None);
        assert_eq!(read(json!({"label": {"a": 1}})), None);
        assert_eq!(read(json!({})), None);
    }

    #[test]
    fn test_flag_from_value() {
        assert_eq!(flag_from_value(&json!(true)), Some(true));
        assert_eq!(flag_from_value(&json!("Y")), Some(true));
        assert_eq!(flag_from_value(&json!(0)), Some(false));
        assert_eq!(flag_from_value(&json!("maybe")), None);
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2025-03-01T08:30:00Z").is_some());
        assert!(parse_datetime("2025-03-01T08:30:00.123456").is_some());
        assert!(parse_datetime("2025-03-01 08:30:00").is_some());
        assert!(parse_datetime("2025-03-01").is_some());
        assert!(parse_datetime("01/03/2025").is_none());
    }
}
