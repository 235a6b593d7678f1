// ==========================================
// 管材库存流水 - API 层
// ==========================================
// 职责: 提供驾驶舱使用的业务接口
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardView, LoadedRecords};
pub use error::{ApiError, ApiResult};
