// ==========================================
// 管材库存流水 - 汇总指标
// ==========================================
// 职责: 对已补全流水集合做纯归约（汇总卡片使用）
// 红线: 全函数，任意规模输入都不失败; 缺失/无法解析的重量按 0 计
// ==========================================

use crate::domain::snapshot::QuantityBreakdown;
use crate::domain::transaction::EnrichedTransaction;
use crate::domain::types::TransactionType;
use serde::Serialize;
use std::collections::BTreeMap;

/// 汇总卡片数据
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub transaction_count: usize,
    pub total_production_weight: f64, // 生产入库总重（kg）
    pub total_meters: f64,            // Σ|quantity_change|
    pub total_snapshot_length_m: f64, // Σroll_length_meters
    pub counts_by_type: BTreeMap<TransactionType, usize>,
    pub untyped_count: usize,         // 类型缺失/无法识别的条数（不计入 counts_by_type）
    pub breakdown: QuantityBreakdown, // 各记录拆分逐桶相加
}

pub struct AggregateMetrics;

impl AggregateMetrics {
    /// 生产入库总重: 仅统计 PRODUCTION
    pub fn total_production_weight<'a, I>(transactions: I) -> f64
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>,
    {
        transactions
            .into_iter()
            .filter(|t| t.transaction_type == Some(TransactionType::Production))
            .map(|t| t.total_weight.unwrap_or(0.0))
            .sum()
    }

    /// 按流水类型计数（类型无法识别的记录不计入）
    pub fn counts_by_type<'a, I>(transactions: I) -> BTreeMap<TransactionType, usize>
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>,
    {
        let mut counts = BTreeMap::new();
        for transaction_type in transactions.into_iter().filter_map(|t| t.transaction_type) {
            *counts.entry(transaction_type).or_insert(0) += 1;
        }
        counts
    }

    /// 总米数: Σ|quantity_change|
    pub fn total_meters<'a, I>(transactions: I) -> f64
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>,
    {
        transactions.into_iter().map(|t| t.quantity_change.abs()).sum()
    }

    /// 一次遍历得到全部汇总指标
    pub fn summarize<'a, I>(transactions: I) -> DashboardSummary
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>,
    {
        let mut summary = DashboardSummary::default();

        for t in transactions {
            summary.transaction_count += 1;
            match t.transaction_type {
                Some(transaction_type) => {
                    if transaction_type == TransactionType::Production {
                        summary.total_production_weight += t.total_weight.unwrap_or(0.0);
                    }
                    *summary.counts_by_type.entry(transaction_type).or_insert(0) += 1;
                }
                None => summary.untyped_count += 1,
            }
            summary.total_meters += t.quantity_change.abs();
            summary.total_snapshot_length_m += t.roll_length_meters;
            summary.breakdown = summary.breakdown.combine(t.quantity_breakdown);
        }

        summary
    }
}
