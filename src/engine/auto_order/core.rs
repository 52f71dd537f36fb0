use super::scoring::priority_for;
use super::AUTO_ORDER_HORIZON_DAYS;
use crate::domain::analysis::{AnalyzedSku, OrderRecommendation};
use crate::engine::forecast::DemandForecaster;
use crate::engine::reorder::{DynamicPolicyParams, DynamicReorderPolicy, ReorderPolicy};
use tracing::{instrument, warn};

// ==========================================
// AutoOrderGenerator - 自动发注生成引擎
// ==========================================
pub struct AutoOrderGenerator {
    forecaster: DemandForecaster,
    dynamic_policy: DynamicReorderPolicy,
}

impl AutoOrderGenerator {
    /// 以默认策略参数创建
    pub fn new() -> Self {
        Self {
            forecaster: DemandForecaster::new(),
            dynamic_policy: DynamicReorderPolicy::new(),
        }
    }

    /// 以自定义动态策略参数创建（参数化策略入口）
    pub fn with_params(params: DynamicPolicyParams) -> Self {
        Self {
            forecaster: DemandForecaster::new(),
            dynamic_policy: DynamicReorderPolicy::with_params(params),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 批量生成发注推荐（主入口）
    ///
    /// 流程（每个判定需发注的 SKU）:
    /// 1) 简单预测（日均销量，30 天期）
    /// 2) 动态发注点策略（带预测置信度修正）
    /// 3) 优先级: 状态定等级/基础分，ABC 等级加分
    /// 4) 预计发注金额 = 推荐量 × 单价
    /// 最后按优先级分值降序稳定排序（同分保持输入顺序）
    #[instrument(skip(self, analyzed_rows), fields(row_count = analyzed_rows.len()))]
    pub fn generate(&self, analyzed_rows: &[AnalyzedSku]) -> Vec<OrderRecommendation> {
        let mut recommendations: Vec<OrderRecommendation> = analyzed_rows
            .iter()
            .filter(|row| row.order_needed)
            .map(|row| self.generate_one(row))
            .collect();

        // 稳定排序: 分值降序，同分不跨界重排
        recommendations.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        recommendations
    }

    /// 单个 SKU 的发注推荐
    ///
    /// 防御口径: 任何非有限中间值降级为 0 并告警，不中断整批
    fn generate_one(&self, row: &AnalyzedSku) -> OrderRecommendation {
        let sku = &row.sku;

        // 1. 需求预测（简单口径，30 天）
        let forecast = self
            .forecaster
            .forecast_simple(sku.daily_avg_sales, AUTO_ORDER_HORIZON_DAYS);

        // 2. 动态发注点
        let decision = self.dynamic_policy.evaluate(sku, Some(&forecast));

        // 3. 优先级
        let (priority, priority_score) = priority_for(row.status, sku.abc_grade);

        // 4. 预计发注金额（单价异常降级为 0）
        let unit_cost = if sku.unit_cost.is_finite() && sku.unit_cost >= 0.0 {
            sku.unit_cost
        } else {
            warn!(sku_id = %sku.sku_id, "采购单价异常，预计金额按 0 处理");
            0.0
        };
        let estimated_cost = decision.recommended_qty as f64 * unit_cost;

        OrderRecommendation {
            sku_id: sku.sku_id.clone(),
            name: sku.name.clone(),
            abc_grade: sku.abc_grade,
            xyz_grade: sku.xyz_grade,
            current_stock: sku.current_stock,
            safety_stock: decision.safety_stock,
            reorder_point: decision.reorder_point,
            recommended_qty: decision.recommended_qty,
            moq: sku.moq,
            lead_time_days: sku.effective_lead_time(),
            forecast_daily: forecast.forecast_daily,
            forecast_confidence: forecast.confidence,
            forecast_trend: forecast.trend,
            priority,
            priority_score,
            status: row.status,
            coverage_days: decision.coverage_days,
            unit_cost,
            estimated_cost,
        }
    }
}

impl Default for AutoOrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}
