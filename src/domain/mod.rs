// ==========================================
// 智能补货决策系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、派生对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod analysis;
pub mod order;
pub mod sku;
pub mod types;

// 重导出核心类型
pub use analysis::{
    AnalyzedSku, DashboardSummary, ForecastResult, OrderRecommendation, ReorderDecision,
    NO_SALES_COVERAGE_DAYS,
};
pub use order::OrderRecord;
pub use sku::{ImportBatch, RawSkuRecord, SalesReference, SkuRecord};
pub use types::{
    AbcGrade, CoverageStatus, ForecastMethod, PriorityTier, StockStatus, Trend, XyzGrade,
};
