// ==========================================
// 管材库存流水 - 流水筛选
// ==========================================
// 职责: 按流水类型 / 参数取值 / 日期区间筛选已补全流水
// 说明: 筛选条件之间为“与”，同一条件内多个类型为“或”
// ==========================================

use crate::domain::transaction::EnrichedTransaction;
use crate::domain::types::TransactionType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// 为空表示不限类型
    #[serde(default)]
    pub transaction_types: Vec<TransactionType>,

    /// 参数键 → 期望取值（与筛选选项的展示文本精确匹配）
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,

    /// 起止日期（含），按 transaction_date 的 UTC 日期比较
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        if !self.transaction_types.contains(&transaction_type) {
            self.transaction_types.push(transaction_type);
        }
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.trim().to_string());
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_types.is_empty()
            && self.parameters.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// 单条流水是否满足筛选条件
    ///
    /// 设置了日期区间时，缺少 transaction_date 的流水不匹配
    pub fn matches(&self, transaction: &EnrichedTransaction) -> bool {
        // 设置了类型条件时，类型无法识别的流水不匹配
        if !self.transaction_types.is_empty()
            && !transaction
                .transaction_type
                .is_some_and(|t| self.transaction_types.contains(&t))
        {
            return false;
        }

        let parameters_match = self
            .parameters
            .iter()
            .all(|(key, expected)| transaction.parameter_text(key).as_deref() == Some(expected.as_str()));
        if !parameters_match {
            return false;
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = transaction.transaction_date.map(|dt| dt.date_naive()) else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, transactions: &'a [EnrichedTransaction]) -> Vec<&'a EnrichedTransaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}
