// ==========================================
// 管材库存流水 - 流水记录领域模型
// ==========================================
// 职责: 接口原始流水记录 + 补全派生字段后的流水记录
// 红线: 原始记录只读; 补全生成新值，不回写原记录
// ==========================================

use crate::domain::lenient;
use crate::domain::parameter::ParameterMap;
use crate::domain::snapshot::QuantityBreakdown;
use crate::domain::types::{SnapshotKind, TransactionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// TransactionRecord - 原始流水记录
// ==========================================
// parameters / roll_snapshot 可能是对象、JSON 文本、null 或缺失，由解码器处理
// 数值字段宽松读取: 无法解析的值视为缺失
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    // ===== 标识 =====
    #[serde(default, deserialize_with = "lenient::id_string")]
    pub id: String,

    /// 原始类型文本; 由补全步骤识别为 TransactionType，无法识别时记录仍参与补全
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub transaction_type: Option<String>,

    // ===== 数量 =====
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity_change: f64, // 带符号数量变化（m）

    // ===== 原始负载 =====
    #[serde(default)]
    pub parameters: Option<Value>,

    #[serde(default)]
    pub roll_snapshot: Option<Value>,

    // ===== 重量与长度 =====
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_weight: Option<f64>, // 总重（kg）

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub weight_per_meter: Option<f64>, // 米重（kg/m）

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub roll_length_meters: Option<f64>, // 后端存储的卷长（快照算不出长度时兜底）

    // ===== 时间 =====
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub transaction_date: Option<DateTime<Utc>>,

    // ===== 其余字段原样保留 =====
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ==========================================
// EnrichedTransaction - 补全后的流水记录
// ==========================================
// 原始字段 + quantity_breakdown / roll_length_meters / total_rolls_count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    pub id: String,

    /// None 表示类型缺失或无法识别（原始文本保留在 extra 中）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    pub quantity_change: f64,
    pub total_weight: Option<f64>,
    pub weight_per_meter: Option<f64>,
    pub transaction_date: Option<DateTime<Utc>>,

    // ===== 解码后的负载 =====
    pub parameters: ParameterMap,
    pub roll_snapshot: Option<Map<String, Value>>,

    // ===== 派生字段 =====
    pub snapshot_variant: SnapshotKind,
    pub quantity_breakdown: QuantityBreakdown,
    pub roll_length_meters: f64,
    pub total_rolls_count: u64,
    pub unrecognized_quantity: u64, // 未识别库存形态的件数，不计入 total_rolls_count

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnrichedTransaction {
    /// 由补全步骤计算的字段名; 原始负载中的同名旧值不再保留
    pub const DERIVED_KEYS: [&'static str; 4] = [
        "snapshot_variant",
        "quantity_breakdown",
        "total_rolls_count",
        "unrecognized_quantity",
    ];

    /// 参数值的展示文本（筛选使用）
    pub fn parameter_text(&self, key: &str) -> Option<String> {
        self.parameters
            .get(key)
            .and_then(crate::domain::parameter::parameter_text)
    }
}
