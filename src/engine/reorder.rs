// ==========================================
// 智能补货决策系统 - 发注点策略引擎
// ==========================================
// 职责: 由 SKU 快照（+可选预测）计算安全库存、发注点、推荐发注量
// 红线: 系统内存在两套发注点口径（基线/动态），二者刻意分离，
//       不得合并（口径差异见 DESIGN.md 未决问题 1）
// ==========================================

use crate::domain::analysis::{ForecastResult, ReorderDecision, NO_SALES_COVERAGE_DAYS};
use crate::domain::sku::SkuRecord;
use crate::domain::types::AbcGrade;
use serde::{Deserialize, Serialize};

// ==========================================
// ReorderPolicy Trait - 发注点策略接口
// ==========================================
// 实现者: DynamicReorderPolicy（自动发注用）/ BaselineReorderPolicy（批量分析用）
pub trait ReorderPolicy: Send + Sync {
    /// 策略标识（日志/诊断用）
    fn name(&self) -> &'static str;

    /// 对单个 SKU 求值
    ///
    /// # 参数
    /// - sku: SKU 快照（含参照表合并结果）
    /// - forecast: 可选的需求预测结果（仅动态口径使用）
    fn evaluate(&self, sku: &SkuRecord, forecast: Option<&ForecastResult>) -> ReorderDecision;
}

// ==========================================
// DynamicPolicyParams - 动态策略参数
// ==========================================
// 默认值即参考行为；自定义策略仅允许覆写这些"无需查库"的参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicPolicyParams {
    /// ABC 等级安全系数: A
    pub safety_factor_a: f64,
    /// ABC 等级安全系数: B（等级无法识别时也用 B）
    pub safety_factor_b: f64,
    /// ABC 等级安全系数: C
    pub safety_factor_c: f64,
    /// 低置信度阈值（预测置信度小数形式低于此值时加成安全系数）
    pub low_confidence_threshold: f64,
    /// 低置信度安全系数加成倍率
    pub low_confidence_multiplier: f64,
    /// 目标库存倍率（目标库存 = 发注点 × 此倍率）
    pub target_stock_multiplier: f64,
}

impl Default for DynamicPolicyParams {
    fn default() -> Self {
        Self {
            safety_factor_a: 1.5,
            safety_factor_b: 1.2,
            safety_factor_c: 1.0,
            low_confidence_threshold: 0.6,
            low_confidence_multiplier: 1.2,
            target_stock_multiplier: 1.5,
        }
    }
}

impl DynamicPolicyParams {
    /// 按 ABC 等级取基础安全系数
    pub fn safety_factor_for(&self, grade: AbcGrade) -> f64 {
        match grade {
            AbcGrade::A => self.safety_factor_a,
            AbcGrade::B => self.safety_factor_b,
            AbcGrade::C => self.safety_factor_c,
        }
    }
}

// ==========================================
// DynamicReorderPolicy - 动态发注点策略
// ==========================================
// 口径: ABC 安全系数 + 预测置信度修正 + 目标库存 1.5 倍发注点
// 说明: 目标库存按发注点的 1.5 倍补齐（而非只补缺口），
//       对应"补到健康水位，而不是补到最低限"的采购实务口径
pub struct DynamicReorderPolicy {
    params: DynamicPolicyParams,
}

impl DynamicReorderPolicy {
    /// 以默认参数创建
    pub fn new() -> Self {
        Self {
            params: DynamicPolicyParams::default(),
        }
    }

    /// 以自定义参数创建（参数化策略入口）
    pub fn with_params(params: DynamicPolicyParams) -> Self {
        Self { params }
    }
}

impl Default for DynamicReorderPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderPolicy for DynamicReorderPolicy {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn evaluate(&self, sku: &SkuRecord, forecast: Option<&ForecastResult>) -> ReorderDecision {
        let lead_time = sku.effective_lead_time() as f64;

        // 1. 有效日需求: 优先使用预测值
        let effective_daily = match forecast {
            Some(f) => f.forecast_daily,
            None => sku.daily_avg_sales,
        };

        // 2. ABC 等级安全系数
        let mut safety_factor = self.params.safety_factor_for(sku.abc_grade);

        // 3. 低置信度修正（补偿预测不确定性）
        if let Some(f) = forecast {
            if f.confidence_fraction() < self.params.low_confidence_threshold {
                safety_factor *= self.params.low_confidence_multiplier;
            }
        }

        // 4. 动态安全库存 = 有效日需求 × 提前期 × 安全系数
        let safety_stock = effective_daily * lead_time * safety_factor;

        // 5. 动态发注点 = 安全库存 + 有效日需求 × 提前期
        let reorder_point = safety_stock + effective_daily * lead_time;

        // 6. 推荐发注量（目标库存 = 发注点 × 1.5）
        let order_needed = sku.current_stock < reorder_point;
        let recommended_qty = if order_needed {
            let target_stock = reorder_point * self.params.target_stock_multiplier;
            let qty = (target_stock - sku.current_stock).max(0.0);
            round_up_to_moq(qty, sku.effective_moq())
        } else {
            0.0
        };

        // 7. 再库消尽天数（999 = 无销售哨兵值）
        let coverage_days = if effective_daily > 0.0 {
            round1(sku.current_stock / effective_daily)
        } else {
            NO_SALES_COVERAGE_DAYS
        };

        ReorderDecision {
            safety_stock: safety_stock.round(),
            reorder_point: reorder_point.round(),
            recommended_qty: recommended_qty.round().max(0.0) as u64,
            forecast_daily: round1(effective_daily),
            coverage_days,
            order_needed,
        }
    }
}

// ==========================================
// BaselineReorderPolicy - 基线发注点策略
// ==========================================
// 口径: 发注点 = 日均销量 × 提前期 + 既有安全库存
// 说明: 无 ABC 加权、无目标库存倍率；发注量 = 缺口 + 一周销量安全边际。
//       这是批量分析使用的较简单口径，与动态口径并存
pub struct BaselineReorderPolicy;

impl BaselineReorderPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BaselineReorderPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderPolicy for BaselineReorderPolicy {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn evaluate(&self, sku: &SkuRecord, _forecast: Option<&ForecastResult>) -> ReorderDecision {
        let lead_time = sku.effective_lead_time() as f64;
        let daily_sales = sku.daily_avg_sales;

        // 基线发注点（安全库存按外部给定值，不做修正）
        let reorder_point = daily_sales * lead_time + sku.safety_stock;

        // 发注判定: 现在库 <= 发注点（含相等，与动态口径的严格小于不同）
        let order_needed = sku.current_stock <= reorder_point;

        // 发注量 = 缺口 + 一周销量（安全边际），向下取整后按 MOQ 上取
        let recommended_qty = if !order_needed || daily_sales <= 0.0 {
            0.0
        } else {
            let shortfall = reorder_point - sku.current_stock;
            if shortfall <= 0.0 {
                0.0
            } else {
                let base_qty = (shortfall + daily_sales * 7.0).floor();
                round_up_to_moq(base_qty, sku.effective_moq())
            }
        };

        // 再库消尽天数: 基线口径按截尾取整（保留原行为）
        let coverage_days = if daily_sales > 0.0 {
            (sku.current_stock / daily_sales).trunc()
        } else {
            NO_SALES_COVERAGE_DAYS
        };

        ReorderDecision {
            safety_stock: sku.safety_stock,
            reorder_point,
            recommended_qty: recommended_qty.round().max(0.0) as u64,
            forecast_daily: round1(daily_sales),
            coverage_days,
            order_needed,
        }
    }
}

// ==========================================
// 共用辅助
// ==========================================

/// 按 MOQ 向上取整为其倍数（MOQ 缺失/非正或数量为 0 时原样返回）
fn round_up_to_moq(qty: f64, moq: Option<f64>) -> f64 {
    match moq {
        Some(m) if m > 0.0 && qty > 0.0 => (qty / m).ceil() * m,
        _ => qty,
    }
}

/// 1 位小数舍入
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ForecastMethod, Trend};
    use chrono::Utc;

    fn test_sku(
        grade: AbcGrade,
        current_stock: f64,
        safety_stock: f64,
        daily_avg_sales: f64,
        lead_time_days: i64,
        moq: Option<f64>,
    ) -> SkuRecord {
        SkuRecord {
            sku_id: "SKU-001".to_string(),
            name: "测试品目".to_string(),
            category: None,
            supplier: None,
            abc_grade: grade,
            xyz_grade: None,
            current_stock,
            safety_stock,
            daily_avg_sales,
            lead_time_days,
            moq,
            unit_cost: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_forecast(forecast_daily: f64, confidence: u8) -> ForecastResult {
        ForecastResult {
            forecast_daily,
            forecast_total: forecast_daily * 30.0,
            confidence,
            trend: Trend::Stable,
            method: ForecastMethod::SimpleAverage,
            trend_slope: 0.0,
            cv: 0.0,
        }
    }

    // ===== 动态策略 =====

    #[test]
    fn test_dynamic_safety_factor_by_grade() {
        let policy = DynamicReorderPolicy::new();
        // 置信度 >= 0.6，不触发低置信度修正
        let forecast = test_forecast(10.0, 70);

        for (grade, factor) in [
            (AbcGrade::A, 1.5_f64),
            (AbcGrade::B, 1.2),
            (AbcGrade::C, 1.0),
        ] {
            let sku = test_sku(grade, 10_000.0, 0.0, 10.0, 30, None);
            let decision = policy.evaluate(&sku, Some(&forecast));
            // 安全库存 = 10 × 30 × factor
            assert_eq!(decision.safety_stock, (10.0 * 30.0 * factor).round());
        }
    }

    #[test]
    fn test_dynamic_low_confidence_raises_safety_factor() {
        // 等级 A、日需求 10、提前期 30、置信度 0.5
        // → 安全系数 1.5×1.2=1.8 → 安全库存 540，发注点 840
        let policy = DynamicReorderPolicy::new();
        let sku = test_sku(AbcGrade::A, 10_000.0, 0.0, 10.0, 30, None);
        let forecast = test_forecast(10.0, 50);

        let decision = policy.evaluate(&sku, Some(&forecast));
        assert_eq!(decision.safety_stock, 540.0);
        assert_eq!(decision.reorder_point, 840.0);
    }

    #[test]
    fn test_dynamic_no_order_when_stock_above_reorder_point() {
        let policy = DynamicReorderPolicy::new();
        // B 级: 安全库存 = 10×10×1.2 = 120，发注点 = 120+100 = 220
        let sku = test_sku(AbcGrade::B, 500.0, 0.0, 10.0, 10, Some(30.0));
        let decision = policy.evaluate(&sku, None);

        assert!(!decision.order_needed);
        assert_eq!(decision.recommended_qty, 0);
    }

    #[test]
    fn test_dynamic_order_up_to_target_stock() {
        let policy = DynamicReorderPolicy::new();
        // C 级: 安全库存 = 10×10×1.0 = 100，发注点 = 200，目标 = 300
        let sku = test_sku(AbcGrade::C, 50.0, 0.0, 10.0, 10, None);
        let decision = policy.evaluate(&sku, None);

        assert!(decision.order_needed);
        // 推荐量 = 300 - 50 = 250
        assert_eq!(decision.recommended_qty, 250);
    }

    #[test]
    fn test_dynamic_moq_rounding_up() {
        let policy = DynamicReorderPolicy::new();
        let sku = test_sku(AbcGrade::C, 50.0, 0.0, 10.0, 10, Some(60.0));
        let decision = policy.evaluate(&sku, None);

        // 裸推荐量 250 → 上取为 60 的倍数 = 300
        assert_eq!(decision.recommended_qty, 300);
        assert_eq!(decision.recommended_qty % 60, 0);
    }

    #[test]
    fn test_dynamic_zero_demand_coverage_sentinel() {
        let policy = DynamicReorderPolicy::new();
        let sku = test_sku(AbcGrade::B, 100.0, 0.0, 0.0, 30, None);
        let decision = policy.evaluate(&sku, None);

        assert_eq!(decision.coverage_days, NO_SALES_COVERAGE_DAYS);
        // 需求为 0 → 发注点 0，现在库 > 发注点 → 不发注
        assert!(!decision.order_needed);
        assert_eq!(decision.recommended_qty, 0);
    }

    #[test]
    fn test_dynamic_stock_monotonicity() {
        // 现在库增加时，推荐发注量单调不增
        let policy = DynamicReorderPolicy::new();
        let mut last_qty = u64::MAX;
        for stock in [0.0, 50.0, 100.0, 200.0, 400.0, 800.0] {
            let sku = test_sku(AbcGrade::B, stock, 0.0, 10.0, 10, None);
            let decision = policy.evaluate(&sku, None);
            assert!(decision.recommended_qty <= last_qty);
            last_qty = decision.recommended_qty;
        }
    }

    // ===== 基线策略 =====

    #[test]
    fn test_baseline_reorder_point_formula() {
        let policy = BaselineReorderPolicy::new();
        // 发注点 = 5×20 + 40 = 140（无 ABC 加权）
        let sku = test_sku(AbcGrade::A, 200.0, 40.0, 5.0, 20, None);
        let decision = policy.evaluate(&sku, None);

        assert_eq!(decision.reorder_point, 140.0);
        assert!(!decision.order_needed); // 200 > 140
        assert_eq!(decision.recommended_qty, 0);
    }

    #[test]
    fn test_baseline_order_qty_with_weekly_margin() {
        let policy = BaselineReorderPolicy::new();
        // 发注点 = 10×10 + 50 = 150，缺口 = 150-100 = 50
        // 发注量 = 50 + 10×7 = 120
        let sku = test_sku(AbcGrade::B, 100.0, 50.0, 10.0, 10, None);
        let decision = policy.evaluate(&sku, None);

        assert!(decision.order_needed);
        assert_eq!(decision.recommended_qty, 120);
    }

    #[test]
    fn test_baseline_order_needed_includes_equality() {
        let policy = BaselineReorderPolicy::new();
        // 现在库恰好等于发注点 → 基线口径仍判发注
        let sku = test_sku(AbcGrade::B, 150.0, 50.0, 10.0, 10, None);
        let decision = policy.evaluate(&sku, None);

        assert!(decision.order_needed);
    }

    #[test]
    fn test_baseline_moq_floor_when_below_minimum() {
        let policy = BaselineReorderPolicy::new();
        // 缺口 = 150-140 = 10，发注量 = 10+70 = 80 → MOQ 100 上取 = 100
        let sku = test_sku(AbcGrade::B, 140.0, 50.0, 10.0, 10, Some(100.0));
        let decision = policy.evaluate(&sku, None);

        assert_eq!(decision.recommended_qty, 100);
    }

    #[test]
    fn test_baseline_zero_sales_no_order_qty() {
        let policy = BaselineReorderPolicy::new();
        // 无销售: 发注点 = 0 + 60 = 60，现在库 30 <= 60 判发注，但量为 0
        let sku = test_sku(AbcGrade::C, 30.0, 60.0, 0.0, 30, None);
        let decision = policy.evaluate(&sku, None);

        assert!(decision.order_needed);
        assert_eq!(decision.recommended_qty, 0);
        assert_eq!(decision.coverage_days, NO_SALES_COVERAGE_DAYS);
    }
}
