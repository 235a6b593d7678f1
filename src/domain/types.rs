// ==========================================
// 管材库存流水 - 领域类型定义
// ==========================================
// 职责: 流水类型 / 库存形态 / 快照版本 枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与后端接口一致)
// ==========================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// 流水类型 (Transaction Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum TransactionType {
    Production,    // 生产入库
    Sale,          // 销售出库
    CutRoll,       // 整卷裁切
    Adjustment,    // 盘点调整
    Return,        // 退货
    TransferOut,   // 调拨出
    TransferIn,    // 调拨入
    InternalUse,   // 内部领用
    Cut,           // 裁切
    SplitBundle,   // 拆捆
    CombineSpares, // 散件合捆
}

impl TransactionType {
    pub const ALL: [TransactionType; 11] = [
        TransactionType::Production,
        TransactionType::Sale,
        TransactionType::CutRoll,
        TransactionType::Adjustment,
        TransactionType::Return,
        TransactionType::TransferOut,
        TransactionType::TransferIn,
        TransactionType::InternalUse,
        TransactionType::Cut,
        TransactionType::SplitBundle,
        TransactionType::CombineSpares,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Production => "PRODUCTION",
            TransactionType::Sale => "SALE",
            TransactionType::CutRoll => "CUT_ROLL",
            TransactionType::Adjustment => "ADJUSTMENT",
            TransactionType::Return => "RETURN",
            TransactionType::TransferOut => "TRANSFER_OUT",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::InternalUse => "INTERNAL_USE",
            TransactionType::Cut => "CUT",
            TransactionType::SplitBundle => "SPLIT_BUNDLE",
            TransactionType::CombineSpares => "COMBINE_SPARES",
        }
    }

    /// 从字符串解析（忽略大小写与首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.iter().copied().find(|t| t.as_str() == upper)
    }
}

impl TryFrom<String> for TransactionType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TransactionType::parse(&value).ok_or_else(|| format!("未知的流水类型: {}", value))
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 库存形态 (Stock Type)
// ==========================================
// 未识别的标签原样保留，不参与分桶
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StockType {
    FullRoll,             // 整卷
    CutRoll,              // 裁切卷
    Bundle,               // 捆
    Spare,                // 散件
    Unrecognized(String), // 未识别标签
}

impl StockType {
    pub fn as_str(&self) -> &str {
        match self {
            StockType::FullRoll => "FULL_ROLL",
            StockType::CutRoll => "CUT_ROLL",
            StockType::Bundle => "BUNDLE",
            StockType::Spare => "SPARE",
            StockType::Unrecognized(tag) => tag.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, StockType::Unrecognized(_))
    }
}

impl Default for StockType {
    fn default() -> Self {
        StockType::Unrecognized(String::new())
    }
}

impl From<&str> for StockType {
    fn from(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "FULL_ROLL" => StockType::FullRoll,
            "CUT_ROLL" => StockType::CutRoll,
            "BUNDLE" => StockType::Bundle,
            "SPARE" => StockType::Spare,
            _ => StockType::Unrecognized(value.trim().to_string()),
        }
    }
}

impl Serialize for StockType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // 非字符串标签（数字/对象等）同样视为未识别，不让整条明细失败
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::String(s) => StockType::from(s.as_str()),
            serde_json::Value::Null => StockType::default(),
            other => StockType::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for StockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 快照版本 (Snapshot Kind)
// ==========================================
// 顺序即判定优先级: StockEntries > LegacyRolls > LegacyTotalRolls > Empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    StockEntries,     // 当前结构: stock_entries 数组
    LegacyRolls,      // 旧结构: rolls 数组
    LegacyTotalRolls, // 旧结构: 仅 total_rolls 标量
    Empty,            // 无快照 / 无法识别
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::StockEntries => write!(f, "stock_entries"),
            SnapshotKind::LegacyRolls => write!(f, "rolls"),
            SnapshotKind::LegacyTotalRolls => write!(f, "total_rolls"),
            SnapshotKind::Empty => write!(f, "empty"),
        }
    }
}
