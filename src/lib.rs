// ==========================================
// 智能补货决策系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 采购补货决策支持（人工最终控制权）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 补货决策规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 策略配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AbcGrade, CoverageStatus, ForecastMethod, PriorityTier, StockStatus, Trend, XyzGrade,
};

// 领域实体
pub use domain::{
    AnalyzedSku, DashboardSummary, ForecastResult, ImportBatch, OrderRecommendation, OrderRecord,
    RawSkuRecord, ReorderDecision, SalesReference, SkuRecord, NO_SALES_COVERAGE_DAYS,
};

// 引擎
pub use engine::{
    AbcXyzEngine, AutoOrderGenerator, BaselineReorderPolicy, DemandForecaster,
    DynamicReorderPolicy, EoqCalculator, InventoryClassifier, ProcurementAnalyzer, ReorderPolicy,
};

// API
pub use api::{ApiError, ApiResult, DashboardApi, ProcurementApi};

// 配置
pub use config::{ConfigManager, PolicyConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "智能补货决策系统";
