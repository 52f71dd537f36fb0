// ==========================================
// 智能补货决策系统 - 经济发注量引擎
// ==========================================
// 职责: 计算最小化总库存成本（发注成本 + 持有成本）的经济发注量
// 公式: EOQ = sqrt(2DS/H)，D=年需求，S=单次发注成本，H=单位年持有成本
// 前提: 需求恒定可预测、提前期恒定、整批一次到货、无折扣
// ==========================================

use serde::{Deserialize, Serialize};

/// 年持有成本率默认值（资金占用 + 仓储 + 保险 + 陈旧化）
const DEFAULT_HOLDING_RATE: f64 = 0.25;

// ==========================================
// 输入/输出对象
// ==========================================

/// EOQ 计算输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EoqInput {
    pub annual_demand: f64,        // 年需求量
    pub ordering_cost: f64,        // 单次发注成本
    pub holding_cost_per_unit: f64, // 单位年持有成本（或单价 × 持有率）
}

/// EOQ 计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoqResult {
    pub eoq: u64,                  // 经济发注量（上取整）
    pub orders_per_year: f64,      // 年发注次数（2 位小数）
    pub order_cycle_days: f64,     // 发注周期（天，取整）
    pub annual_ordering_cost: f64, // 年发注总成本（取整）
    pub annual_holding_cost: f64,  // 年持有总成本（取整）
    pub total_annual_cost: f64,    // 年库存总成本（取整）
}

impl EoqResult {
    /// 全零结果（非法输入的降级返回）
    fn zero() -> Self {
        Self {
            eoq: 0,
            orders_per_year: 0.0,
            order_cycle_days: 0.0,
            annual_ordering_cost: 0.0,
            annual_holding_cost: 0.0,
            total_annual_cost: 0.0,
        }
    }
}

/// 持有成本计算输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingCostInput {
    pub unit_price: f64,                  // 单价
    pub holding_rate: Option<f64>,        // 年持有率（默认 0.25）
    pub monthly_storage_cost: Option<f64>, // 仓储成本（月，单位量）
    pub annual_insurance_cost: Option<f64>, // 保险（年，单位量）
    pub other_annual_cost: Option<f64>,   // 其他（年，单位量）
}

// ==========================================
// EoqCalculator - 经济发注量引擎
// ==========================================
pub struct EoqCalculator;

impl EoqCalculator {
    /// 创建新的经济发注量引擎
    pub fn new() -> Self {
        Self
    }

    /// EOQ 计算
    ///
    /// 边界: 任一输入非正 → 全零结果（降级，不报错）
    pub fn calculate(&self, input: &EoqInput) -> EoqResult {
        if input.annual_demand <= 0.0
            || input.ordering_cost <= 0.0
            || input.holding_cost_per_unit <= 0.0
        {
            return EoqResult::zero();
        }

        let raw_eoq =
            ((2.0 * input.annual_demand * input.ordering_cost) / input.holding_cost_per_unit)
                .sqrt();
        let eoq = raw_eoq.ceil();

        let orders_per_year = input.annual_demand / eoq;
        let order_cycle_days = 365.0 / orders_per_year;

        let annual_ordering_cost = orders_per_year * input.ordering_cost;
        let annual_holding_cost = (eoq / 2.0) * input.holding_cost_per_unit;
        let total_annual_cost = annual_ordering_cost + annual_holding_cost;

        EoqResult {
            eoq: eoq as u64,
            orders_per_year: round2(orders_per_year),
            order_cycle_days: order_cycle_days.round(),
            annual_ordering_cost: annual_ordering_cost.round(),
            annual_holding_cost: annual_holding_cost.round(),
            total_annual_cost: total_annual_cost.round(),
        }
    }

    /// 单位年持有成本
    ///
    /// 口径: 单价 × 持有率 + 仓储成本×12 + 保险 + 其他
    pub fn holding_cost(&self, input: &HoldingCostInput) -> f64 {
        let holding_rate = input.holding_rate.unwrap_or(DEFAULT_HOLDING_RATE);
        let capital_cost = input.unit_price * holding_rate;
        let annual_storage = input.monthly_storage_cost.unwrap_or(0.0) * 12.0;

        capital_cost
            + annual_storage
            + input.annual_insurance_cost.unwrap_or(0.0)
            + input.other_annual_cost.unwrap_or(0.0)
    }
}

impl Default for EoqCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
