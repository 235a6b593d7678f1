// ==========================================
// 管材库存流水 - 引擎层
// ==========================================
// 职责: 快照解码、结构识别、数量拆分、流水补全、筛选与汇总
// 红线: 纯计算，不做网络/持久化; 单条记录问题不中断整批
// ==========================================
// 数据流:
//   原始流水 → SnapshotDecoder → SnapshotVariantResolver
//           → QuantityBreakdownCalculator → TransactionEnricher
//           → ParameterOptionExtractor / AggregateMetrics / TransactionFilter
// ==========================================

pub mod aggregate;
pub mod breakdown;
pub mod enricher;
pub mod error;
pub mod filter;
pub mod parameter_options;
pub mod snapshot_decoder;
pub mod variant_resolver;

// 重导出核心引擎
pub use aggregate::{AggregateMetrics, DashboardSummary};
pub use breakdown::{QuantityBreakdownCalculator, StockComputation};
pub use enricher::{EnrichOutcome, EnrichmentBatch, TransactionEnricher};
pub use error::{DecodeError, DecodeResult};
pub use filter::TransactionFilter;
pub use parameter_options::ParameterOptionExtractor;
pub use snapshot_decoder::{DecodeOutcome, SnapshotDecoder};
pub use variant_resolver::{Resolution, SnapshotVariantResolver};
