// ==========================================
// 智能补货决策系统 - 分析派生对象
// ==========================================
// 红线: 派生对象只在一次分析流程内有效，不得独立持久化
// 用途: 引擎写入，展示层/发注层只读
// ==========================================

use crate::domain::sku::SkuRecord;
use crate::domain::types::{
    AbcGrade, CoverageStatus, ForecastMethod, PriorityTier, StockStatus, Trend, XyzGrade,
};
use serde::{Deserialize, Serialize};

/// 无销售时的再库消尽天数哨兵值
///
/// 红线: 哨兵值不得直接参与阈值比较，比较前必须先排除
pub const NO_SALES_COVERAGE_DAYS: f64 = 999.0;

// ==========================================
// ForecastResult - 需求预测结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub forecast_daily: f64,    // 预测日需求（1 位小数）
    pub forecast_total: f64,    // 预测期总需求（取整）
    pub confidence: u8,         // 置信度（0-100 整数）
    pub trend: Trend,           // 趋势标签
    pub method: ForecastMethod, // 预测方法标签

    // ===== 诊断字段（仅 exponential_smoothing 有效，其余为 0）=====
    pub trend_slope: f64, // 回归斜率（1 位小数）
    pub cv: f64,          // 变动系数（1 位小数）
}

impl ForecastResult {
    /// 置信度的小数形式（0.0-1.0），用于安全系数修正判定
    pub fn confidence_fraction(&self) -> f64 {
        f64::from(self.confidence) / 100.0
    }
}

// ==========================================
// ReorderDecision - 发注点决策（动态口径）
// ==========================================
// 生命周期: 单次分析内有效；current_stock 变化即失效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderDecision {
    pub safety_stock: f64,    // 动态安全库存（取整，非负）
    pub reorder_point: f64,   // 动态发注点（取整，非负）
    pub recommended_qty: u64, // 推荐发注量（非负整数；有 MOQ 时为其倍数）
    pub forecast_daily: f64,  // 实际采用的日需求（1 位小数）
    pub coverage_days: f64,   // 当前再库消尽天数（1 位小数，999=无销售）
    pub order_needed: bool,   // 是否需要发注（现在库 < 发注点）
}

// ==========================================
// AnalyzedSku - 批量分析结果行
// ==========================================
// 用途: analyze_procurement 的输出行 = SKU 快照 + 派生列
// 约束: 同一输入两次分析结果逐字节一致（幂等）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedSku {
    pub sku: SkuRecord, // 输入快照（含参照表合并结果）

    // ===== 派生列（基线口径）=====
    pub reorder_point: f64,              // 基线发注点 = 日均销量×提前期 + 安全库存
    pub order_needed: bool,              // 最终发注判定（双重闸门后）
    pub status: StockStatus,             // 库存状态
    pub recommended_qty: u64,            // 推荐发注量（整数，MOQ 倍数）
    pub coverage_days: i64,              // 再库消尽天数（截尾取整，999=无销售）
    pub coverage_status: CoverageStatus, // 充分度状态
    pub lead_time_ratio: f64,            // 提前期对比 = 消尽天数/提前期（1 位小数）
}

// ==========================================
// OrderRecommendation - 自动发注推荐
// ==========================================
// 用途: AutoOrderGenerator 输出，按优先级分值降序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecommendation {
    // ===== 识别字段 =====
    pub sku_id: String,
    pub name: String,
    pub abc_grade: AbcGrade,
    pub xyz_grade: Option<XyzGrade>,

    // ===== 库存与发注数字（动态口径）=====
    pub current_stock: f64,
    pub safety_stock: f64,    // 动态安全库存
    pub reorder_point: f64,   // 动态发注点
    pub recommended_qty: u64, // 推荐发注量
    pub moq: Option<f64>,
    pub lead_time_days: i64,

    // ===== 预测字段 =====
    pub forecast_daily: f64,
    pub forecast_confidence: u8,
    pub forecast_trend: Trend,

    // ===== 优先级 =====
    pub priority: PriorityTier, // 等级（展示用）
    pub priority_score: i32,    // 分值（排序用）

    // ===== 附加信息 =====
    pub status: StockStatus,  // 分析层库存状态
    pub coverage_days: f64,   // 再库消尽天数（1 位小数，999=无销售）
    pub unit_cost: f64,       // 采购单价
    pub estimated_cost: f64,  // 预计发注金额 = 推荐量 × 单价
}

// ==========================================
// DashboardSummary - 驾驶舱汇总
// ==========================================
// 口径: 平均消尽天数排除 999 哨兵行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sku: usize,        // SKU 总数
    pub total_stock_value: f64,  // 库存总金额 = Σ 现在库 × 单价
    pub avg_coverage_days: f64,  // 平均再库消尽天数（排除无销售行）
    pub shortage_count: usize,   // 不足品目数
    pub reorder_count: usize,    // 需再订货品目数
    pub order_needed_count: usize, // 最终发注判定为真的品目数
}
