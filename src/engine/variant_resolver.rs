// ==========================================
// 管材库存流水 - 快照结构识别
// ==========================================
// 职责: 已解码快照 → 唯一的 SnapshotVariant
// 判定顺序（先命中者胜出，互斥）:
//   1. stock_entries 为数组
//   2. rolls 为数组
//   3. total_rolls 为数值
//   4. 其余 → Empty
// 红线: 一个快照不能同时按两种结构计数
// ==========================================

use crate::domain::diagnostic::EnrichDiagnostic;
use crate::domain::lenient;
use crate::domain::snapshot::{LegacyRollItem, SnapshotVariant, StockEntryItem};
use crate::engine::snapshot_decoder::SnapshotDecoder;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub const KEY_STOCK_ENTRIES: &str = "stock_entries";
pub const KEY_ROLLS: &str = "rolls";
pub const KEY_TOTAL_ROLLS: &str = "total_rolls";

/// 识别结果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub variant: SnapshotVariant,
    pub diagnostics: Vec<EnrichDiagnostic>,
}

impl Resolution {
    fn new(variant: SnapshotVariant, diagnostics: Vec<EnrichDiagnostic>) -> Self {
        Self { variant, diagnostics }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotVariantResolver {
    decoder: SnapshotDecoder,
}

impl SnapshotVariantResolver {
    pub fn new(decoder: SnapshotDecoder) -> Self {
        Self { decoder }
    }

    /// 识别快照结构
    ///
    /// # 参数
    /// - snapshot: 已解码快照（None 表示无快照）
    pub fn resolve(&self, snapshot: Option<&Map<String, Value>>) -> Resolution {
        let mut diagnostics = Vec::new();

        let Some(snapshot) = snapshot else {
            return Resolution::new(SnapshotVariant::Empty, diagnostics);
        };

        if let Some(entries) = self.sequence_field(snapshot, KEY_STOCK_ENTRIES, &mut diagnostics) {
            let items: Vec<StockEntryItem> =
                self.parse_items(KEY_STOCK_ENTRIES, entries, &mut diagnostics);
            return Resolution::new(SnapshotVariant::StockEntries(items), diagnostics);
        }

        if let Some(rolls) = self.sequence_field(snapshot, KEY_ROLLS, &mut diagnostics) {
            let items: Vec<LegacyRollItem> = self.parse_items(KEY_ROLLS, rolls, &mut diagnostics);
            return Resolution::new(SnapshotVariant::LegacyRolls(items), diagnostics);
        }

        if let Some(total) = snapshot.get(KEY_TOTAL_ROLLS).and_then(lenient::count_from_value) {
            return Resolution::new(SnapshotVariant::LegacyTotalRolls(total), diagnostics);
        }

        if !snapshot.is_empty() {
            let keys: Vec<String> = snapshot.keys().cloned().collect();
            tracing::warn!(keys = ?keys, "快照结构无法识别, 按空快照处理");
            diagnostics.push(EnrichDiagnostic::UnknownSnapshotShape { keys });
        }

        Resolution::new(SnapshotVariant::Empty, diagnostics)
    }

    /// 读取数组字段（字段本身也可能是 JSON 文本）
    fn sequence_field(
        &self,
        snapshot: &Map<String, Value>,
        key: &str,
        diagnostics: &mut Vec<EnrichDiagnostic>,
    ) -> Option<Vec<Value>> {
        let raw = snapshot.get(key)?;
        match self.decoder.decode_sequence(key, raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("{}, 忽略该字段", e);
                diagnostics.push(EnrichDiagnostic::DecodeFailed {
                    field: key.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    /// 逐条读取明细; 单条失败跳过，不影响其余明细
    fn parse_items<T: DeserializeOwned>(
        &self,
        key: &str,
        raw_items: Vec<Value>,
        diagnostics: &mut Vec<EnrichDiagnostic>,
    ) -> Vec<T> {
        let mut items = Vec::with_capacity(raw_items.len());

        for (index, raw) in raw_items.into_iter().enumerate() {
            let parsed = self
                .decoder
                .decode_value(key, &raw)
                .map_err(|e| e.to_string())
                .and_then(|value| {
                    let value = value.ok_or_else(|| "明细为空".to_string())?;
                    serde_json::from_value::<T>(value).map_err(|e| e.to_string())
                });

            match parsed {
                Ok(item) => items.push(item),
                Err(message) => {
                    tracing::warn!(field = key, index, "快照明细无法读取, 已跳过: {}", message);
                    diagnostics.push(EnrichDiagnostic::InvalidStockEntry { index, message });
                }
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{SnapshotKind, StockType};
    use serde_json::json;

    fn resolve(value: Value) -> Resolution {
        let resolver = SnapshotVariantResolver::default();
        resolver.resolve(value.as_object())
    }

    #[test]
    fn test_resolve_stock_entries() {
        let r = resolve(json!({
            "stock_entries": [
                {"stock_type": "FULL_ROLL", "quantity": 3, "length_per_unit": 100}
            ]
        }));
        assert_eq!(r.variant.kind(), SnapshotKind::StockEntries);
        let items = r.variant.items();
        assert_eq!(items, vec![StockEntryItem::full_roll(3, 100.0)]);
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn test_stock_entries_win_over_rolls() {
        let r = resolve(json!({
            "stock_entries": [{"stock_type": "BUNDLE", "quantity": 2, "length_per_unit": 6}],
            "rolls": [{"length_meters": 50}, {"length_meters": 75}],
            "total_rolls": 9
        }));
        assert_eq!(r.variant.kind(), SnapshotKind::StockEntries);
        let items = r.variant.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stock_type, StockType::Bundle);
    }

    #[test]
    fn test_resolve_legacy_rolls() {
        let r = resolve(json!({
            "rolls": [{"length_meters": 50, "is_cut_roll": false}, {"length_meters": "75"}],
            "total_rolls": 2
        }));
        assert_eq!(
            r.variant,
            SnapshotVariant::LegacyRolls(vec![
                LegacyRollItem { length_meters: 50.0, is_cut_roll: false },
                LegacyRollItem { length_meters: 75.0, is_cut_roll: false },
            ])
        );
    }

    #[test]
    fn test_resolve_total_rolls() {
        assert_eq!(resolve(json!({"total_rolls": 7})).variant, SnapshotVariant::LegacyTotalRolls(7));
        assert_eq!(resolve(json!({"total_rolls": "5"})).variant, SnapshotVariant::LegacyTotalRolls(5));
    }

    #[test]
    fn test_non_sequence_field_falls_through() {
        // stock_entries 不是数组 → 按下一种结构判定
        let r = resolve(json!({"stock_entries": {"a": 1}, "total_rolls": 3}));
        assert_eq!(r.variant, SnapshotVariant::LegacyTotalRolls(3));
    }

    #[test]
    fn test_stringified_stock_entries() {
        let r = resolve(json!({
            "stock_entries": "[{\"stock_type\": \"SPARE\", \"quantity\": 4, \"length_per_unit\": 2}]"
        }));
        assert_eq!(r.variant.kind(), SnapshotKind::StockEntries);
        assert_eq!(r.variant.items()[0].stock_type, StockType::Spare);
    }

    #[test]
    fn test_malformed_nested_field_is_reported() {
        let r = resolve(json!({"stock_entries": "[{broken", "rolls": [{"length_meters": 10}]}));
        assert_eq!(r.variant.kind(), SnapshotKind::LegacyRolls);
        assert!(matches!(
            r.diagnostics.as_slice(),
            [EnrichDiagnostic::DecodeFailed { field, .. }] if field == "stock_entries"
        ));
    }

    #[test]
    fn test_invalid_item_skipped() {
        let r = resolve(json!({
            "stock_entries": [
                42,
                {"stock_type": "FULL_ROLL", "quantity": 1, "length_per_unit": 10}
            ]
        }));
        assert_eq!(r.variant.items().len(), 1);
        assert!(matches!(
            r.diagnostics.as_slice(),
            [EnrichDiagnostic::InvalidStockEntry { index: 0, .. }]
        ));
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        let r = resolve(json!({"pieces": [1, 2]}));
        assert_eq!(r.variant, SnapshotVariant::Empty);
        assert_eq!(
            r.diagnostics,
            vec![EnrichDiagnostic::UnknownSnapshotShape { keys: vec!["pieces".to_string()] }]
        );
    }

    #[test]
    fn test_absent_and_empty_snapshot() {
        let resolver = SnapshotVariantResolver::default();
        let r = resolver.resolve(None);
        assert_eq!(r.variant, SnapshotVariant::Empty);
        assert!(r.diagnostics.is_empty());

        let r = resolve(json!({}));
        assert_eq!(r.variant, SnapshotVariant::Empty);
        assert!(r.diagnostics.is_empty());
    }
}
