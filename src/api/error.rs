// ==========================================
// 管材库存流水 - API层错误类型
// ==========================================
// 职责: 负载读取阶段的错误（整批无法读取时才返回）
// 说明: 单条记录的问题不走这里，而是以诊断形式随结果返回
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("负载文件读取失败 ({path}): {source}")]
    PayloadRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("负载不是合法 JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("负载结构不符: 期望流水数组，实际 {found}")]
    UnexpectedPayload { found: &'static str },
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
