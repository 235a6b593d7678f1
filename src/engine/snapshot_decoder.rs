// ==========================================
// 管材库存流水 - 快照解码器
// ==========================================
// 职责: parameters / roll_snapshot 字段 → 结构化值 或 明确的空默认值
// 输入: 已结构化的值 / JSON 文本（可能被重复序列化）/ null / 缺失
// 红线: 解码失败记录诊断并回退默认值，绝不向调用方抛错
// ==========================================

use crate::domain::diagnostic::EnrichDiagnostic;
use crate::domain::parameter::ParameterMap;
use crate::engine::error::{DecodeError, DecodeResult};
use serde_json::{Map, Value};

pub const FIELD_PARAMETERS: &str = "parameters";
pub const FIELD_ROLL_SNAPSHOT: &str = "roll_snapshot";

// ==========================================
// DecodeOutcome - 单字段解码结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome<T> {
    /// 解码成功
    Decoded(T),
    /// 字段缺失 / null / 空文本
    Absent,
    /// 解码失败，调用方应使用默认值
    Defaulted(DecodeError),
}

impl<T> DecodeOutcome<T> {
    /// 取值; 缺失与失败都返回 None
    pub fn value(self) -> Option<T> {
        match self {
            DecodeOutcome::Decoded(v) => Some(v),
            DecodeOutcome::Absent | DecodeOutcome::Defaulted(_) => None,
        }
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            DecodeOutcome::Defaulted(e) => Some(e),
            _ => None,
        }
    }

    /// 失败时转换为诊断
    pub fn diagnostic(&self) -> Option<EnrichDiagnostic> {
        self.error().map(|e| EnrichDiagnostic::DecodeFailed {
            field: e.field().to_string(),
            message: e.to_string(),
        })
    }
}

impl<T: Default> DecodeOutcome<T> {
    pub fn value_or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

/// JSON 值的类型名（诊断信息使用）
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ==========================================
// SnapshotDecoder
// ==========================================
#[derive(Debug, Clone)]
pub struct SnapshotDecoder {
    max_depth: u8,
}

impl Default for SnapshotDecoder {
    fn default() -> Self {
        Self::new(2)
    }
}

impl SnapshotDecoder {
    /// # 参数
    /// - max_depth: JSON 文本最多解码层数（至少 1）
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    /// 解码产品参数; 默认值为空映射
    pub fn decode_parameters(&self, raw: Option<&Value>) -> DecodeOutcome<ParameterMap> {
        self.decode_object(FIELD_PARAMETERS, raw)
    }

    /// 解码库存快照; 默认值为“无快照”
    pub fn decode_snapshot(&self, raw: Option<&Value>) -> DecodeOutcome<Map<String, Value>> {
        self.decode_object(FIELD_ROLL_SNAPSHOT, raw)
    }

    /// 解码为对象
    pub fn decode_object(&self, field: &str, raw: Option<&Value>) -> DecodeOutcome<Map<String, Value>> {
        let outcome = match raw.map(|v| self.decode_value(field, v)) {
            None | Some(Ok(None)) => DecodeOutcome::Absent,
            Some(Ok(Some(Value::Object(map)))) => DecodeOutcome::Decoded(map),
            Some(Ok(Some(other))) => DecodeOutcome::Defaulted(DecodeError::UnexpectedShape {
                field: field.to_string(),
                expected: "object",
                found: json_type_name(&other),
            }),
            Some(Err(e)) => DecodeOutcome::Defaulted(e),
        };

        if let Some(e) = outcome.error() {
            tracing::warn!("{}, 使用默认值", e);
        }
        outcome
    }

    /// 解码为数组（快照内嵌套字段使用）
    ///
    /// # 返回
    /// - Ok(Some(items)): 数组或可解码为数组的文本
    /// - Ok(None): 缺失 / null / 其他类型
    /// - Err: 文本无法解析
    pub fn decode_sequence(&self, field: &str, raw: &Value) -> DecodeResult<Option<Vec<Value>>> {
        match self.decode_value(field, raw)? {
            Some(Value::Array(items)) => Ok(Some(items)),
            _ => Ok(None),
        }
    }

    /// 逐层解码 JSON 文本，直到得到非字符串值
    ///
    /// null 与空白文本视为缺失
    pub fn decode_value(&self, field: &str, raw: &Value) -> DecodeResult<Option<Value>> {
        let mut current = raw.clone();
        let mut depth = 0u8;

        loop {
            let text = match current {
                Value::Null => return Ok(None),
                Value::String(text) => text,
                other => return Ok(Some(other)),
            };

            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if depth >= self.max_depth {
                return Err(DecodeError::NestingTooDeep {
                    field: field.to_string(),
                    max_depth: self.max_depth,
                });
            }

            current = serde_json::from_str::<Value>(trimmed).map_err(|e| DecodeError::MalformedText {
                field: field.to_string(),
                message: e.to_string(),
            })?;
            depth += 1;
        }
    }
}
