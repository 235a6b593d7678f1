// ==========================================
// 管材库存流水 - 数量拆分计算器
// ==========================================
// 职责: 统一结构的快照明细 → QuantityBreakdown + 总长度（m）
// 红线: 纯函数; 不修改输入; 重复调用结果完全一致
// ==========================================
// 分桶规则:
// - FULL_ROLL: full_rolls += quantity;      长度 quantity × length_per_unit
// - CUT_ROLL:  cut_rolls += quantity;       长度 Σcut_piece_lengths（缺失时 quantity × length_per_unit）
// - BUNDLE:    bundles += quantity;         长度 quantity × pieces_per_bundle × length_per_unit
// - SPARE:     spare_pieces += 散件根数;     长度 散件根数 × length_per_unit
// - 未识别:    不计入任何分桶，单独统计件数并告警
// ==========================================

use crate::domain::diagnostic::EnrichDiagnostic;
use crate::domain::snapshot::{QuantityBreakdown, StockEntryItem};
use crate::domain::types::StockType;

/// 一次计算的完整结果
#[derive(Debug, Clone, PartialEq)]
pub struct StockComputation {
    pub breakdown: QuantityBreakdown,
    pub total_length_m: f64,
    /// 未识别库存形态的件数合计
    pub unrecognized_quantity: u64,
    pub diagnostics: Vec<EnrichDiagnostic>,
}

impl StockComputation {
    pub fn empty() -> Self {
        Self {
            breakdown: QuantityBreakdown::default(),
            total_length_m: 0.0,
            unrecognized_quantity: 0,
            diagnostics: Vec::new(),
        }
    }
}

// ==========================================
// QuantityBreakdownCalculator
// ==========================================
// 无状态引擎，所有方法都是纯函数
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantityBreakdownCalculator;

impl QuantityBreakdownCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算数量拆分与总长度
    pub fn compute(&self, items: &[StockEntryItem]) -> StockComputation {
        let mut full_rolls = 0u64;
        let mut cut_rolls = 0u64;
        let mut bundles = 0u64;
        let mut spare_pieces = 0u64;
        let mut total_length_m = 0.0f64;
        let mut unrecognized_quantity = 0u64;
        let mut diagnostics = Vec::new();

        for item in items {
            match &item.stock_type {
                StockType::FullRoll => {
                    full_rolls = full_rolls.saturating_add(item.quantity);
                }
                StockType::CutRoll => {
                    cut_rolls = cut_rolls.saturating_add(item.quantity);
                }
                StockType::Bundle => {
                    bundles = bundles.saturating_add(item.quantity);
                }
                StockType::Spare => {
                    spare_pieces = spare_pieces.saturating_add(Self::spare_count(item));
                }
                StockType::Unrecognized(tag) => {
                    tracing::warn!(
                        stock_type = %tag,
                        quantity = item.quantity,
                        "未识别的库存形态, 不计入分桶"
                    );
                    unrecognized_quantity = unrecognized_quantity.saturating_add(item.quantity);
                    diagnostics.push(EnrichDiagnostic::UnrecognizedStockType {
                        stock_type: tag.clone(),
                        quantity: item.quantity,
                    });
                    continue;
                }
            }
            total_length_m += Self::item_length(item);
        }

        StockComputation {
            breakdown: QuantityBreakdown::new(full_rolls, cut_rolls, bundles, spare_pieces),
            total_length_m,
            unrecognized_quantity,
            diagnostics,
        }
    }

    /// 单条明细的长度贡献（m）
    pub fn item_length(item: &StockEntryItem) -> f64 {
        let quantity = item.quantity as f64;
        match item.stock_type {
            StockType::FullRoll => quantity * item.length_per_unit,
            StockType::CutRoll => match item.cut_piece_lengths.as_deref() {
                Some(pieces) if !pieces.is_empty() => pieces.iter().sum::<f64>(),
                _ => quantity * item.length_per_unit,
            },
            StockType::Bundle => match item.pieces_per_bundle {
                Some(per_bundle) if per_bundle > 0 => {
                    quantity * per_bundle as f64 * item.length_per_unit
                }
                _ => quantity * item.length_per_unit,
            },
            StockType::Spare => Self::spare_count(item) as f64 * item.length_per_unit,
            StockType::Unrecognized(_) => 0.0,
        }
    }

    /// 散件根数: spare_piece_count 优先，否则取 quantity
    fn spare_count(item: &StockEntryItem) -> u64 {
        item.spare_piece_count.unwrap_or(item.quantity)
    }
}
