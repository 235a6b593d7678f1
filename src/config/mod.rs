// ==========================================
// 管材库存流水 - 配置层
// ==========================================
// 职责: 补全流程配置，支持 JSON 与环境变量
// ==========================================

pub mod enrich_config;

// 重导出核心配置
pub use enrich_config::{ConfigError, ConfigResult, EnrichConfig};
