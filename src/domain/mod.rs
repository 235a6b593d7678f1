// ==========================================
// 管材库存流水 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、值对象
// 红线: 不含解码/计算逻辑，不含接口逻辑
// ==========================================

pub mod diagnostic;
pub mod lenient;
pub mod parameter;
pub mod snapshot;
pub mod transaction;
pub mod types;

// 重导出核心类型
pub use diagnostic::{EnrichDiagnostic, RecordDiagnostic};
pub use parameter::{ParameterMap, ParameterOptions, DEFAULT_PARAMETER_KEYS};
pub use snapshot::{LegacyRollItem, QuantityBreakdown, SnapshotVariant, StockEntryItem};
pub use transaction::{EnrichedTransaction, TransactionRecord};
pub use types::{SnapshotKind, StockType, TransactionType};
