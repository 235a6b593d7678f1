// ==========================================
// 管材库存流水 - 库存快照领域模型
// ==========================================
// 职责: 快照明细（新旧结构）、快照版本、数量拆分值对象
// 红线: QuantityBreakdown 只能经由 new() 构造，total_items 恒为四桶之和
// ==========================================

use crate::domain::lenient;
use crate::domain::types::{SnapshotKind, StockType};
use serde::{Deserialize, Serialize};
use std::iter::Sum;

// ==========================================
// StockEntryItem - 当前结构快照明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntryItem {
    #[serde(default)]
    pub stock_type: StockType, // 库存形态

    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub quantity: u64, // 件数（卷数/捆数/散件数）

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub length_per_unit: f64, // 单位长度（m）

    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub pieces_per_bundle: Option<u64>, // 每捆根数

    #[serde(default, deserialize_with = "lenient::opt_f64_list")]
    pub cut_piece_lengths: Option<Vec<f64>>, // 裁切卷逐段长度（m）

    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub spare_piece_count: Option<u64>, // 散件根数
}

impl StockEntryItem {
    /// 整卷明细（旧结构映射使用）
    pub fn full_roll(quantity: u64, length_per_unit: f64) -> Self {
        Self {
            stock_type: StockType::FullRoll,
            quantity,
            length_per_unit,
            pieces_per_bundle: None,
            cut_piece_lengths: None,
            spare_piece_count: None,
        }
    }
}

// ==========================================
// LegacyRollItem - 旧结构整卷记录
// ==========================================
// 无 stock_type 字段; 无论 is_cut_roll 如何，统计时一律按整卷计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRollItem {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub length_meters: f64,

    #[serde(default, deserialize_with = "lenient::flag_or_false")]
    pub is_cut_roll: bool,
}

impl From<&LegacyRollItem> for StockEntryItem {
    fn from(roll: &LegacyRollItem) -> Self {
        StockEntryItem::full_roll(1, roll.length_meters)
    }
}

// ==========================================
// SnapshotVariant - 已识别的快照结构
// ==========================================
// 一个快照只会落入其中一种，不会同时按两种结构计数
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotVariant {
    StockEntries(Vec<StockEntryItem>),
    LegacyRolls(Vec<LegacyRollItem>),
    LegacyTotalRolls(u64),
    Empty,
}

impl SnapshotVariant {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            SnapshotVariant::StockEntries(_) => SnapshotKind::StockEntries,
            SnapshotVariant::LegacyRolls(_) => SnapshotKind::LegacyRolls,
            SnapshotVariant::LegacyTotalRolls(_) => SnapshotKind::LegacyTotalRolls,
            SnapshotVariant::Empty => SnapshotKind::Empty,
        }
    }

    /// 统一为当前结构的明细列表
    ///
    /// - StockEntries: 原样返回
    /// - LegacyRolls: 每卷 → FULL_ROLL × 1，单位长度 = length_meters
    /// - LegacyTotalRolls: 单条 FULL_ROLL × total_rolls，单位长度未知记 0
    /// - Empty: 空列表
    pub fn items(&self) -> Vec<StockEntryItem> {
        match self {
            SnapshotVariant::StockEntries(entries) => entries.clone(),
            SnapshotVariant::LegacyRolls(rolls) => rolls.iter().map(StockEntryItem::from).collect(),
            SnapshotVariant::LegacyTotalRolls(total) => vec![StockEntryItem::full_roll(*total, 0.0)],
            SnapshotVariant::Empty => Vec::new(),
        }
    }
}

// ==========================================
// QuantityBreakdown - 数量拆分
// ==========================================
// 派生值对象，不落库，每次由快照重新计算
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityBreakdown {
    full_rolls: u64,
    cut_rolls: u64,
    bundles: u64,
    spare_pieces: u64,
    total_items: u64,
}

impl QuantityBreakdown {
    pub fn new(full_rolls: u64, cut_rolls: u64, bundles: u64, spare_pieces: u64) -> Self {
        let total_items = full_rolls
            .saturating_add(cut_rolls)
            .saturating_add(bundles)
            .saturating_add(spare_pieces);
        Self {
            full_rolls,
            cut_rolls,
            bundles,
            spare_pieces,
            total_items,
        }
    }

    pub fn full_rolls(&self) -> u64 {
        self.full_rolls
    }

    pub fn cut_rolls(&self) -> u64 {
        self.cut_rolls
    }

    pub fn bundles(&self) -> u64 {
        self.bundles
    }

    pub fn spare_pieces(&self) -> u64 {
        self.spare_pieces
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// 两个拆分逐桶相加（汇总卡片使用）
    pub fn combine(self, other: QuantityBreakdown) -> Self {
        QuantityBreakdown::new(
            self.full_rolls.saturating_add(other.full_rolls),
            self.cut_rolls.saturating_add(other.cut_rolls),
            self.bundles.saturating_add(other.bundles),
            self.spare_pieces.saturating_add(other.spare_pieces),
        )
    }
}

impl Sum for QuantityBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(QuantityBreakdown::default(), QuantityBreakdown::combine)
    }
}

impl<'a> Sum<&'a QuantityBreakdown> for QuantityBreakdown {
    fn sum<I: Iterator<Item = &'a QuantityBreakdown>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
