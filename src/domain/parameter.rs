// ==========================================
// 管材库存流水 - 产品参数与筛选选项
// ==========================================

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// 已解码的产品参数（OD / PN / PE / Type ...）
pub type ParameterMap = Map<String, Value>;

/// 默认关注的参数键
pub const DEFAULT_PARAMETER_KEYS: [&str; 4] = ["OD", "PN", "PE", "Type"];

/// 参数值的展示文本: 字符串去空白，数字/布尔转文本，其余不参与筛选
pub fn parameter_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ==========================================
// ParameterOptions - 筛选选项
// ==========================================
// 键顺序 = 配置顺序; 值顺序 = 首次出现顺序，已去重
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOptions {
    entries: Vec<(String, Vec<String>)>,
}

impl ParameterOptions {
    pub(crate) fn from_entries(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// 某个参数键的可选值（键不存在时为空）
    pub fn get(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, values)| values.is_empty())
    }
}

impl Serialize for ParameterOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}
