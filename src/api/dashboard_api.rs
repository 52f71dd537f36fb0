// ==========================================
// 智能补货决策系统 - 驾驶舱 API
// ==========================================
// 职责: 对分析结果做聚合，供驾驶舱/汇总展示使用
// 口径: 平均消尽天数排除 999 哨兵行（无销售不计入均值）
// ==========================================

use crate::domain::analysis::{AnalyzedSku, DashboardSummary, NO_SALES_COVERAGE_DAYS};
use crate::domain::types::StockStatus;

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi;

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    pub fn new() -> Self {
        Self
    }

    /// 汇总分析结果
    pub fn summarize(&self, analyzed_rows: &[AnalyzedSku]) -> DashboardSummary {
        let total_sku = analyzed_rows.len();

        let total_stock_value = analyzed_rows
            .iter()
            .map(|row| row.sku.current_stock * row.sku.unit_cost)
            .sum();

        // 平均消尽天数: 哨兵行（无销售）排除后求均值
        let sentinel = NO_SALES_COVERAGE_DAYS as i64;
        let real_coverage: Vec<i64> = analyzed_rows
            .iter()
            .map(|row| row.coverage_days)
            .filter(|days| *days < sentinel)
            .collect();
        let avg_coverage_days = if real_coverage.is_empty() {
            0.0
        } else {
            let sum: i64 = real_coverage.iter().sum();
            round1(sum as f64 / real_coverage.len() as f64)
        };

        let shortage_count = analyzed_rows
            .iter()
            .filter(|row| row.status == StockStatus::Shortage)
            .count();
        let reorder_count = analyzed_rows
            .iter()
            .filter(|row| row.status == StockStatus::ReorderNeeded)
            .count();
        let order_needed_count = analyzed_rows.iter().filter(|row| row.order_needed).count();

        DashboardSummary {
            total_sku,
            total_stock_value,
            avg_coverage_days,
            shortage_count,
            reorder_count,
            order_needed_count,
        }
    }
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
