// ==========================================
// 管材库存流水 - 处理诊断
// ==========================================
// 职责: 单条记录处理过程中被就地恢复的问题
// 红线: 诊断只用于展示/排查，不中断批次处理
// ==========================================

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnrichDiagnostic {
    /// 字段文本无法解码，已回退为默认值
    DecodeFailed { field: String, message: String },

    /// 快照非空，但不符合任何已知结构
    UnknownSnapshotShape { keys: Vec<String> },

    /// 快照明细无法读取，已跳过
    InvalidStockEntry { index: usize, message: String },

    /// 未识别的库存形态，不计入任何分桶
    UnrecognizedStockType { stock_type: String, quantity: u64 },

    /// 流水类型缺失或无法识别，记录照常补全，但不计入类型统计
    UnrecognizedTransactionType { value: Option<String> },

    /// 整条记录无法读取，已排除出批次
    RecordRejected { message: String },
}

/// 批次内某条记录的诊断
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDiagnostic {
    pub record_index: usize,
    pub transaction_id: Option<String>,
    #[serde(flatten)]
    pub diagnostic: EnrichDiagnostic,
}
