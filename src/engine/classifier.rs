// ==========================================
// 智能补货决策系统 - 库存状态判定引擎
// ==========================================
// 职责: 由 (现在库, 安全库存, 日均销量) 判定库存状态标签 + 充分度标签
// 红线: 规则按声明顺序判定，先命中先返回；判定是"规则制"不是评分制
// ==========================================

use crate::domain::analysis::NO_SALES_COVERAGE_DAYS;
use crate::domain::types::{CoverageStatus, StockStatus};

/// 安全库存缺失时的短缺判定天数阈值
const ZERO_SAFETY_SHORTAGE_DAYS: f64 = 7.0;

// ==========================================
// InventoryClassifier - 库存状态判定引擎
// ==========================================
pub struct InventoryClassifier;

impl InventoryClassifier {
    /// 创建新的库存状态判定引擎
    pub fn new() -> Self {
        Self
    }

    /// 判定库存状态
    ///
    /// 规则（顺序执行，命中即返回）:
    /// 1) 现在库 = 0 且 有销售 → 不足
    /// 2) 现在库 = 0 且 无销售 → 休眠
    /// 3) 安全库存 = 0 且 有销售 且 现在库/日均销量 <= 7 → 不足
    /// 4) 安全库存 = 0（其余情况）→ 休眠
    /// 5) 其余按 现在库/安全库存 比率:
    ///    <1.0 → 不足; <1.5 → 需再订货; <=2.0 → 适正; >2.0 → 过剩
    pub fn classify(
        &self,
        current_stock: f64,
        safety_stock: f64,
        daily_avg_sales: f64,
    ) -> StockStatus {
        // 现在库为零
        if current_stock == 0.0 {
            return if daily_avg_sales > 0.0 {
                StockStatus::Shortage
            } else {
                StockStatus::Dormant
            };
        }

        // 安全库存缺失（现在库 > 0）
        if safety_stock == 0.0 {
            if daily_avg_sales > 0.0
                && current_stock / daily_avg_sales <= ZERO_SAFETY_SHORTAGE_DAYS
            {
                return StockStatus::Shortage;
            }
            return StockStatus::Dormant;
        }

        // 正常判定: 安全库存对比比率
        let ratio = current_stock / safety_stock;
        if ratio < 1.0 {
            StockStatus::Shortage
        } else if ratio < 1.5 {
            StockStatus::ReorderNeeded
        } else if ratio <= 2.0 {
            StockStatus::Optimal
        } else {
            StockStatus::Excess
        }
    }

    /// 计算再库消尽天数（截尾取整；无销售返回哨兵值 999）
    pub fn coverage_days(&self, current_stock: f64, daily_avg_sales: f64) -> i64 {
        if daily_avg_sales > 0.0 {
            (current_stock / daily_avg_sales).trunc() as i64
        } else {
            NO_SALES_COVERAGE_DAYS as i64
        }
    }

    /// 由再库消尽天数判定充分度标签
    ///
    /// 999 哨兵值单独归入"无销售"，不参与天数阈值比较
    pub fn coverage_status(&self, coverage_days: i64) -> CoverageStatus {
        if coverage_days >= NO_SALES_COVERAGE_DAYS as i64 {
            return CoverageStatus::NoSales;
        }
        if coverage_days <= 7 {
            CoverageStatus::AtRisk
        } else if coverage_days <= 14 {
            CoverageStatus::Caution
        } else if coverage_days <= 30 {
            CoverageStatus::Healthy
        } else {
            CoverageStatus::Overstocked
        }
    }
}

impl Default for InventoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}
