// ==========================================
// 管材库存流水 - 核心库
// ==========================================
// 职责: 流水快照归一化与数量拆分
// 输入: 后端返回的流水记录（快照结构随版本演进，字段可能被序列化为文本）
// 输出: 补全后的流水、筛选选项、汇总指标
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 解码/识别/拆分/汇总
pub mod engine;

// 配置层
pub mod config;

// API 层 - 驾驶舱接口
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    EnrichDiagnostic, EnrichedTransaction, LegacyRollItem, ParameterOptions, QuantityBreakdown,
    RecordDiagnostic, SnapshotKind, SnapshotVariant, StockEntryItem, StockType,
    TransactionRecord, TransactionType,
};

// 引擎
pub use engine::{
    AggregateMetrics, DashboardSummary, ParameterOptionExtractor, QuantityBreakdownCalculator,
    SnapshotDecoder, SnapshotVariantResolver, TransactionEnricher, TransactionFilter,
};

// 配置
pub use config::EnrichConfig;

// API
pub use api::{DashboardApi, DashboardView};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "管材库存流水";
