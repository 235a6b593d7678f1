// ==========================================
// 管材库存流水 - 参数筛选选项提取
// ==========================================
// 职责: 扫描流水参数，按配置的键收集去重取值（首次出现顺序）
// 红线: 参数为空/缺失的记录不贡献取值，也不使扫描失败
// ==========================================

use crate::domain::parameter::{parameter_text, ParameterMap, ParameterOptions, DEFAULT_PARAMETER_KEYS};
use crate::domain::transaction::EnrichedTransaction;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ParameterOptionExtractor {
    keys: Vec<String>,
}

impl Default for ParameterOptionExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PARAMETER_KEYS.iter().map(|k| k.to_string()).collect())
    }
}

impl ParameterOptionExtractor {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// 从参数映射集合提取筛选选项
    pub fn extract<'a, I>(&self, parameter_maps: I) -> ParameterOptions
    where
        I: IntoIterator<Item = &'a ParameterMap>,
    {
        let mut seen: Vec<HashSet<String>> = vec![HashSet::new(); self.keys.len()];
        let mut values: Vec<Vec<String>> = vec![Vec::new(); self.keys.len()];

        for params in parameter_maps {
            if params.is_empty() {
                continue;
            }
            for (slot, key) in self.keys.iter().enumerate() {
                let Some(text) = params.get(key).and_then(parameter_text) else {
                    continue;
                };
                if seen[slot].insert(text.clone()) {
                    values[slot].push(text);
                }
            }
        }

        ParameterOptions::from_entries(self.keys.iter().cloned().zip(values).collect())
    }

    /// 从已补全流水提取筛选选项
    pub fn extract_from_transactions<'a, I>(&self, transactions: I) -> ParameterOptions
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>,
    {
        self.extract(transactions.into_iter().map(|t| &t.parameters))
    }
}
