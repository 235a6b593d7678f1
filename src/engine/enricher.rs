// ==========================================
// 管材库存流水 - 流水补全编排
// ==========================================
// 职责: 逐条执行 解码 → 结构识别 → 数量拆分，并把派生字段附加到新记录
// 输出: quantity_breakdown / roll_length_meters / total_rolls_count
// 红线: 单条记录的问题只影响该条（拆分归零），不中断整批
// ==========================================

use crate::config::EnrichConfig;
use crate::domain::diagnostic::{EnrichDiagnostic, RecordDiagnostic};
use crate::domain::transaction::{EnrichedTransaction, TransactionRecord};
use crate::domain::types::TransactionType;
use crate::engine::breakdown::QuantityBreakdownCalculator;
use crate::engine::snapshot_decoder::SnapshotDecoder;
use crate::engine::variant_resolver::SnapshotVariantResolver;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// 单条补全结果
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichOutcome {
    pub transaction: EnrichedTransaction,
    pub diagnostics: Vec<EnrichDiagnostic>,
}

/// 整批补全结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentBatch {
    pub transactions: Vec<EnrichedTransaction>,
    pub diagnostics: Vec<RecordDiagnostic>,
}

// ==========================================
// TransactionEnricher
// ==========================================
#[derive(Debug, Clone)]
pub struct TransactionEnricher {
    decoder: SnapshotDecoder,
    resolver: SnapshotVariantResolver,
    calculator: QuantityBreakdownCalculator,
    fallback_to_stored_length: bool,
}

impl Default for TransactionEnricher {
    fn default() -> Self {
        Self::new(&EnrichConfig::default())
    }
}

impl TransactionEnricher {
    pub fn new(config: &EnrichConfig) -> Self {
        let decoder = SnapshotDecoder::new(config.max_decode_depth);
        Self {
            resolver: SnapshotVariantResolver::new(decoder.clone()),
            decoder,
            calculator: QuantityBreakdownCalculator::new(),
            fallback_to_stored_length: config.fallback_to_stored_length,
        }
    }

    /// 补全单条流水
    pub fn enrich(&self, record: &TransactionRecord) -> EnrichOutcome {
        let mut diagnostics = Vec::new();

        // === 步骤 0: 识别流水类型 ===
        let transaction_type = record
            .transaction_type
            .as_deref()
            .and_then(TransactionType::parse);
        if transaction_type.is_none() {
            tracing::warn!(
                transaction_id = %record.id,
                raw = ?record.transaction_type,
                "流水类型缺失或无法识别, 不计入类型统计"
            );
            diagnostics.push(EnrichDiagnostic::UnrecognizedTransactionType {
                value: record.transaction_type.clone(),
            });
        }

        // === 步骤 1: 解码 parameters / roll_snapshot ===
        let parameters_outcome = self.decoder.decode_parameters(record.parameters.as_ref());
        diagnostics.extend(parameters_outcome.diagnostic());
        let parameters = parameters_outcome.value_or_default();

        let snapshot_outcome = self.decoder.decode_snapshot(record.roll_snapshot.as_ref());
        diagnostics.extend(snapshot_outcome.diagnostic());
        let roll_snapshot = snapshot_outcome.value();

        // === 步骤 2: 识别快照结构 ===
        let resolution = self.resolver.resolve(roll_snapshot.as_ref());
        diagnostics.extend(resolution.diagnostics);
        let snapshot_variant = resolution.variant.kind();

        // === 步骤 3: 数量拆分 ===
        let computation = self.calculator.compute(&resolution.variant.items());
        diagnostics.extend(computation.diagnostics);

        // === 步骤 4: 长度兜底 ===
        // 负的计算长度（明细里带负长度）按 0 计，与算不出长度同样走存储值
        let computed_length = computation.total_length_m.max(0.0);
        let roll_length_meters = if computed_length > 0.0 {
            computed_length
        } else if self.fallback_to_stored_length {
            record.roll_length_meters.unwrap_or(0.0)
        } else {
            0.0
        };

        // 派生字段只取本次计算结果; 未识别的类型文本原样保留
        let mut extra = record.extra.clone();
        for key in EnrichedTransaction::DERIVED_KEYS {
            extra.remove(key);
        }
        if let (None, Some(raw)) = (transaction_type, &record.transaction_type) {
            extra.insert("transaction_type".to_string(), Value::String(raw.clone()));
        }

        tracing::debug!(
            transaction_id = %record.id,
            variant = %snapshot_variant,
            total_items = computation.breakdown.total_items(),
            roll_length_meters,
            "流水补全完成"
        );

        EnrichOutcome {
            transaction: EnrichedTransaction {
                id: record.id.clone(),
                transaction_type,
                quantity_change: record.quantity_change,
                total_weight: record.total_weight,
                weight_per_meter: record.weight_per_meter,
                transaction_date: record.transaction_date,
                parameters,
                roll_snapshot,
                snapshot_variant,
                quantity_breakdown: computation.breakdown,
                roll_length_meters,
                total_rolls_count: computation.breakdown.total_items(),
                unrecognized_quantity: computation.unrecognized_quantity,
                extra,
            },
            diagnostics,
        }
    }

    /// 补全整批流水
    ///
    /// 每条记录独立处理; 诊断按记录收集，不短路
    #[instrument(skip_all, fields(count = records.len()))]
    pub fn enrich_all(&self, records: &[TransactionRecord]) -> EnrichmentBatch {
        let mut batch = EnrichmentBatch {
            transactions: Vec::with_capacity(records.len()),
            diagnostics: Vec::new(),
        };

        for (record_index, record) in records.iter().enumerate() {
            let outcome = self.enrich(record);
            batch
                .diagnostics
                .extend(outcome.diagnostics.into_iter().map(|diagnostic| RecordDiagnostic {
                    record_index,
                    transaction_id: Some(record.id.clone()).filter(|id| !id.is_empty()),
                    diagnostic,
                }));
            batch.transactions.push(outcome.transaction);
        }

        tracing::info!(
            transactions = batch.transactions.len(),
            diagnostics = batch.diagnostics.len(),
            "流水批次补全完成"
        );
        batch
    }
}
