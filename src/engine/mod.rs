// ==========================================
// 智能补货决策系统 - 引擎层
// ==========================================
// 职责: 实现补货决策规则引擎，纯内存计算
// 红线: Engine 不拼 SQL、不做 I/O；每行结果只依赖自身快照 +
//       静态策略常量，与顺序执行逐字节一致
// ==========================================

pub mod abc_xyz;
pub mod auto_order;
pub mod classifier;
pub mod eoq;
pub mod forecast;
pub mod procurement;
pub mod reorder;

// 重导出核心引擎
pub use abc_xyz::{AbcThresholds, AbcXyzEngine, AbcXyzMatrixItem, AbcResult, XyzResult, XyzThresholds};
pub use auto_order::{AutoOrderGenerator, AUTO_ORDER_HORIZON_DAYS};
pub use classifier::InventoryClassifier;
pub use eoq::{EoqCalculator, EoqInput, EoqResult, HoldingCostInput};
pub use forecast::DemandForecaster;
pub use procurement::ProcurementAnalyzer;
pub use reorder::{
    BaselineReorderPolicy, DynamicPolicyParams, DynamicReorderPolicy, ReorderPolicy,
};
