// ==========================================
// 管材库存流水 - 解码错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 解码错误只在引擎内部就地恢复，不向调用方抛出
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("字段 {field} 的 JSON 文本无法解析: {message}")]
    MalformedText { field: String, message: String },

    #[error("字段 {field} 类型不符: 期望 {expected}，实际 {found}")]
    UnexpectedShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("字段 {field} 重复编码超过 {max_depth} 层")]
    NestingTooDeep { field: String, max_depth: u8 },
}

impl DecodeError {
    pub fn field(&self) -> &str {
        match self {
            DecodeError::MalformedText { field, .. }
            | DecodeError::UnexpectedShape { field, .. }
            | DecodeError::NestingTooDeep { field, .. } => field,
        }
    }
}

/// Result 类型别名
pub type DecodeResult<T> = Result<T, DecodeError>;
