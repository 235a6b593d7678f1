// ==========================================
// 管材库存流水 - 驾驶舱 API
// ==========================================
// 职责: 原始接口负载 → 补全流水 + 筛选选项 + 汇总指标
// 架构: API 层 → 引擎层 (TransactionEnricher / ParameterOptionExtractor / AggregateMetrics)
// 红线: 单条记录读取失败只排除该条; 负载为空时照常产出空视图
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::EnrichConfig;
use crate::domain::diagnostic::{EnrichDiagnostic, RecordDiagnostic};
use crate::domain::parameter::ParameterOptions;
use crate::domain::transaction::{EnrichedTransaction, TransactionRecord};
use crate::engine::snapshot_decoder::json_type_name;
use crate::engine::{
    AggregateMetrics, DashboardSummary, ParameterOptionExtractor, TransactionEnricher,
    TransactionFilter,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::instrument;

/// 负载中包裹流水数组的字段名（按顺序尝试）
const PAYLOAD_ARRAY_KEYS: [&str; 2] = ["transactions", "data"];

// ==========================================
// DashboardView - 驾驶舱视图
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub transactions: Vec<EnrichedTransaction>,
    pub parameter_options: ParameterOptions,
    pub summary: DashboardSummary,
    pub diagnostics: Vec<RecordDiagnostic>,
}

/// 负载读取结果
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<TransactionRecord>,
    /// 与 records 一一对应的原始序号
    pub source_indexes: Vec<usize>,
    pub diagnostics: Vec<RecordDiagnostic>,
}

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi {
    enricher: TransactionEnricher,
    extractor: ParameterOptionExtractor,
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new(&EnrichConfig::default())
    }
}

impl DashboardApi {
    pub fn new(config: &EnrichConfig) -> Self {
        Self {
            enricher: TransactionEnricher::new(config),
            extractor: ParameterOptionExtractor::new(config.parameter_keys.clone()),
        }
    }

    /// 逐条读取流水记录
    ///
    /// # 参数
    /// - payload: 流水数组，或以 transactions / data 包裹数组的对象; null 视为空集合
    ///
    /// # 返回
    /// - Ok(LoadedRecords): 可读取的记录 + 被排除记录的诊断
    /// - Err(ApiError::UnexpectedPayload): 负载整体不是流水集合
    pub fn load_records(&self, payload: &Value) -> ApiResult<LoadedRecords> {
        let items = match payload {
            Value::Null => return Ok(LoadedRecords::default()),
            Value::Array(items) => items,
            Value::Object(map) => PAYLOAD_ARRAY_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .ok_or(ApiError::UnexpectedPayload { found: "object" })?,
            other => {
                return Err(ApiError::UnexpectedPayload {
                    found: json_type_name(other),
                })
            }
        };

        let mut loaded = LoadedRecords::default();
        for (index, item) in items.iter().enumerate() {
            // 只有非对象条目整条排除; 字段层面的问题交给补全步骤就地恢复
            if !item.is_object() {
                let found = json_type_name(item);
                tracing::warn!(index, found, "流水条目不是对象, 已排除");
                loaded.diagnostics.push(RecordDiagnostic {
                    record_index: index,
                    transaction_id: None,
                    diagnostic: EnrichDiagnostic::RecordRejected {
                        message: format!("期望流水对象，实际 {}", found),
                    },
                });
                continue;
            }

            match serde_json::from_value::<TransactionRecord>(item.clone()) {
                Ok(record) => {
                    loaded.records.push(record);
                    loaded.source_indexes.push(index);
                }
                Err(e) => {
                    let transaction_id = item.get("id").and_then(|id| match id {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    });
                    tracing::warn!(index, ?transaction_id, "流水记录无法读取, 已排除: {}", e);
                    loaded.diagnostics.push(RecordDiagnostic {
                        record_index: index,
                        transaction_id,
                        diagnostic: EnrichDiagnostic::RecordRejected {
                            message: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(loaded)
    }

    /// 构建驾驶舱视图
    #[instrument(skip_all)]
    pub fn build_view(&self, payload: &Value) -> ApiResult<DashboardView> {
        let loaded = self.load_records(payload)?;
        let batch = self.enricher.enrich_all(&loaded.records);

        // 诊断序号换算回原始负载中的位置
        let mut diagnostics = loaded.diagnostics;
        diagnostics.extend(batch.diagnostics.into_iter().map(|mut d| {
            d.record_index = loaded.source_indexes[d.record_index];
            d
        }));
        diagnostics.sort_by_key(|d| d.record_index);

        let parameter_options = self.extractor.extract_from_transactions(&batch.transactions);
        let summary = AggregateMetrics::summarize(&batch.transactions);

        Ok(DashboardView {
            transactions: batch.transactions,
            parameter_options,
            summary,
            diagnostics,
        })
    }

    /// 从 JSON 文本构建视图
    pub fn build_view_from_str(&self, text: &str) -> ApiResult<DashboardView> {
        if text.trim().is_empty() {
            return self.build_view(&Value::Null);
        }
        let payload: Value = serde_json::from_str(text)?;
        self.build_view(&payload)
    }

    /// 从 JSON 文件构建视图
    pub fn build_view_from_path(&self, path: &Path) -> ApiResult<DashboardView> {
        let text = std::fs::read_to_string(path).map_err(|source| ApiError::PayloadRead {
            path: path.display().to_string(),
            source,
        })?;
        self.build_view_from_str(&text)
    }

    /// 按筛选条件重新派生视图（筛选选项与汇总只针对筛选后的流水）
    pub fn filtered_view(&self, view: &DashboardView, filter: &TransactionFilter) -> DashboardView {
        let selected = filter.apply(&view.transactions);
        let parameter_options = self.extractor.extract_from_transactions(selected.iter().copied());
        let summary = AggregateMetrics::summarize(selected.iter().copied());

        DashboardView {
            transactions: selected.into_iter().cloned().collect(),
            parameter_options,
            summary,
            diagnostics: view.diagnostics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TransactionType;
    use serde_json::json;

    #[test]
    fn test_load_wrapped_payload() {
        let api = DashboardApi::default();
        let loaded = api
            .load_records(&json!({"data": [{"id": 1, "transaction_type": "SALE"}]}))
            .unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].id, "1");
    }

    #[test]
    fn test_load_rejects_non_collection() {
        let api = DashboardApi::default();
        assert!(matches!(
            api.load_records(&json!("hello")),
            Err(ApiError::UnexpectedPayload { found: "string" })
        ));
        assert!(matches!(
            api.load_records(&json!({"rows": []})),
            Err(ApiError::UnexpectedPayload { found: "object" })
        ));
    }

    #[test]
    fn test_null_payload_yields_empty_view() {
        let api = DashboardApi::default();
        let view = api.build_view(&Value::Null).unwrap();
        assert!(view.transactions.is_empty());
        assert_eq!(view.summary.transaction_count, 0);
        assert!(view.parameter_options.is_empty());
    }

    #[test]
    fn test_rejected_record_keeps_batch() {
        let api = DashboardApi::default();
        let view = api
            .build_view(&json!([
                "not-a-record",
                {"id": "Y", "transaction_type": "PRODUCTION", "roll_snapshot": "{broken"},
                {"id": "Z", "transaction_type": "PRODUCTION", "roll_snapshot": {"total_rolls": 2}}
            ]))
            .unwrap();

        assert_eq!(view.transactions.len(), 2);
        assert_eq!(view.summary.breakdown.full_rolls(), 2);
        assert_eq!(view.diagnostics.len(), 2);
        assert_eq!(view.diagnostics[0].record_index, 0);
        assert!(matches!(view.diagnostics[0].diagnostic, EnrichDiagnostic::RecordRejected { .. }));
        assert_eq!(view.diagnostics[1].record_index, 1);
        assert_eq!(view.diagnostics[1].transaction_id.as_deref(), Some("Y"));
    }

    #[test]
    fn test_unknown_or_missing_type_kept_in_view() {
        let api = DashboardApi::default();
        let view = api
            .build_view(&json!([
                {"id": "S", "transaction_type": "SCRAP", "roll_snapshot": {"total_rolls": 4}},
                {"id": "N", "roll_snapshot": {"total_rolls": 2}},
                {"id": "P", "transaction_type": "PRODUCTION", "roll_snapshot": {"total_rolls": 1}}
            ]))
            .unwrap();

        assert_eq!(view.transactions.len(), 3);
        assert_eq!(view.summary.breakdown.total_items(), 7);
        assert_eq!(view.summary.untyped_count, 2);
        assert_eq!(view.summary.counts_by_type.get(&TransactionType::Production), Some(&1));

        let flagged: Vec<usize> = view
            .diagnostics
            .iter()
            .filter(|d| matches!(d.diagnostic, EnrichDiagnostic::UnrecognizedTransactionType { .. }))
            .map(|d| d.record_index)
            .collect();
        assert_eq!(flagged, vec![0, 1]);
    }

    #[test]
    fn test_filtered_view_recomputes() {
        let api = DashboardApi::default();
        let view = api
            .build_view(&json!([
                {"id": 1, "transaction_type": "PRODUCTION", "total_weight": 80, "parameters": {"OD": "20"}},
                {"id": 2, "transaction_type": "SALE", "quantity_change": -10, "parameters": {"OD": "25"}}
            ]))
            .unwrap();
        assert_eq!(view.parameter_options.get("OD"), ["20".to_string(), "25".to_string()]);

        let filtered = api.filtered_view(&view, &TransactionFilter::new().with_type(TransactionType::Sale));
        assert_eq!(filtered.transactions.len(), 1);
        assert_eq!(filtered.summary.total_production_weight, 0.0);
        assert_eq!(filtered.summary.total_meters, 10.0);
        assert_eq!(filtered.parameter_options.get("OD"), ["25".to_string()]);
    }

    #[test]
    fn test_invalid_json_text() {
        let api = DashboardApi::default();
        assert!(matches!(api.build_view_from_str("[{"), Err(ApiError::InvalidJson(_))));
        assert!(api.build_view_from_str("  ").unwrap().transactions.is_empty());
    }
}
