// ==========================================
// 测试数据构建器 - 流水记录 JSON
// ==========================================

use pipe_inventory::TransactionRecord;
use serde_json::{json, Map, Value};

// ==========================================
// 快照明细构建
// ==========================================

pub fn full_roll(quantity: u64, length_per_unit: f64) -> Value {
    json!({"stock_type": "FULL_ROLL", "quantity": quantity, "length_per_unit": length_per_unit})
}

pub fn cut_roll(pieces: &[f64]) -> Value {
    json!({"stock_type": "CUT_ROLL", "quantity": 1, "length_per_unit": 0, "cut_piece_lengths": pieces})
}

pub fn bundle(quantity: u64, pieces_per_bundle: u64, length_per_unit: f64) -> Value {
    json!({
        "stock_type": "BUNDLE",
        "quantity": quantity,
        "pieces_per_bundle": pieces_per_bundle,
        "length_per_unit": length_per_unit
    })
}

pub fn spare(pieces: u64, length_per_unit: f64) -> Value {
    json!({"stock_type": "SPARE", "quantity": 1, "spare_piece_count": pieces, "length_per_unit": length_per_unit})
}

// ==========================================
// 流水记录构建器
// ==========================================

pub struct TransactionBuilder {
    fields: Map<String, Value>,
}

impl TransactionBuilder {
    pub fn new(id: &str, transaction_type: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(id));
        fields.insert("transaction_type".to_string(), json!(transaction_type));
        Self { fields }
    }

    pub fn quantity_change(mut self, value: f64) -> Self {
        self.fields.insert("quantity_change".to_string(), json!(value));
        self
    }

    pub fn total_weight(mut self, value: Value) -> Self {
        self.fields.insert("total_weight".to_string(), value);
        self
    }

    pub fn parameters(mut self, value: Value) -> Self {
        self.fields.insert("parameters".to_string(), value);
        self
    }

    /// 参数以 JSON 文本形式存储
    pub fn parameters_text(mut self, value: Value) -> Self {
        self.fields
            .insert("parameters".to_string(), Value::String(value.to_string()));
        self
    }

    pub fn snapshot(mut self, value: Value) -> Self {
        self.fields.insert("roll_snapshot".to_string(), value);
        self
    }

    /// 快照以 JSON 文本形式存储
    pub fn snapshot_text(mut self, value: Value) -> Self {
        self.fields
            .insert("roll_snapshot".to_string(), Value::String(value.to_string()));
        self
    }

    pub fn stock_entries(self, entries: Vec<Value>) -> Self {
        self.snapshot(json!({"stock_entries": entries}))
    }

    pub fn stored_length(mut self, value: f64) -> Self {
        self.fields.insert("roll_length_meters".to_string(), json!(value));
        self
    }

    pub fn date(mut self, value: &str) -> Self {
        self.fields.insert("transaction_date".to_string(), json!(value));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn to_json(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn build(self) -> TransactionRecord {
        serde_json::from_value(self.to_json()).expect("测试流水记录应可反序列化")
    }
}
