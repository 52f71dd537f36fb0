// ==========================================
// 智能补货决策系统 - 批量采购分析引擎
// ==========================================
// 职责: 对全量 SKU 表做单遍批量分析（参照表合并 → 基线发注点 →
//       状态判定 → 推荐发注量 → 充分度 → 发注判定双重闸门）
// 红线: 每行只依赖自身快照 + 静态策略常量，行间无共享可变状态；
//       同一输入两次分析结果必须逐字节一致
// ==========================================

use crate::config::DEFAULT_LEAD_TIME_DAYS;
use crate::domain::analysis::AnalyzedSku;
use crate::domain::sku::{SalesReference, SkuRecord};
use crate::engine::classifier::InventoryClassifier;
use crate::engine::reorder::{BaselineReorderPolicy, ReorderPolicy};
use std::collections::HashMap;
use tracing::instrument;

/// 发注判定双重闸门: 消尽天数达到此值的 SKU 一律不发注
const ORDER_COVERAGE_GATE_DAYS: i64 = 30;

// ==========================================
// ProcurementAnalyzer - 批量采购分析引擎
// ==========================================
pub struct ProcurementAnalyzer {
    classifier: InventoryClassifier,
    baseline_policy: BaselineReorderPolicy,
}

impl ProcurementAnalyzer {
    /// 创建新的批量采购分析引擎
    pub fn new() -> Self {
        Self {
            classifier: InventoryClassifier::new(),
            baseline_policy: BaselineReorderPolicy::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 批量分析（主入口）
    ///
    /// # 参数
    /// - sku_rows: SKU 主数据快照（库存侧: 识别字段 + 现在库 + 安全库存）
    /// - reference_rows: 销售参照表（左连接源: 日均销量/提前期/XYZ/MOQ/供应商）
    ///
    /// # 返回
    /// - Vec<AnalyzedSku>: 输入顺序保持不变的分析结果表
    #[instrument(skip(self, sku_rows, reference_rows), fields(sku_count = sku_rows.len()))]
    pub fn analyze(
        &self,
        sku_rows: Vec<SkuRecord>,
        reference_rows: &[SalesReference],
    ) -> Vec<AnalyzedSku> {
        // 参照表索引（按 sku_id 左连接）
        let reference_by_id: HashMap<&str, &SalesReference> = reference_rows
            .iter()
            .map(|r| (r.sku_id.as_str(), r))
            .collect();

        sku_rows
            .into_iter()
            .map(|sku| {
                let merged = self.merge_reference(sku, &reference_by_id);
                self.analyze_row(merged)
            })
            .collect()
    }

    /// 合并参照表行（左连接语义）
    ///
    /// 未命中时: 日均销量默认 0，提前期默认 30，其余保留原值
    fn merge_reference(
        &self,
        mut sku: SkuRecord,
        reference_by_id: &HashMap<&str, &SalesReference>,
    ) -> SkuRecord {
        match reference_by_id.get(sku.sku_id.as_str()) {
            Some(reference) => {
                sku.daily_avg_sales = coerce_non_negative(reference.daily_avg_sales);
                sku.lead_time_days = coerce_lead_time(reference.lead_time_days);
                sku.xyz_grade = reference.xyz_grade.or(sku.xyz_grade);
                sku.moq = reference.moq.or(sku.moq);
                sku.supplier = reference.supplier.clone().or(sku.supplier);
            }
            None => {
                sku.daily_avg_sales = 0.0;
                sku.lead_time_days = DEFAULT_LEAD_TIME_DAYS;
            }
        }

        // 数值防御: 负值/非数一律回退安全默认（计算继续，不报错）
        sku.current_stock = coerce_non_negative(sku.current_stock);
        sku.safety_stock = coerce_non_negative(sku.safety_stock);
        sku
    }

    /// 单行分析
    fn analyze_row(&self, sku: SkuRecord) -> AnalyzedSku {
        // 基线发注点口径（无 ABC 加权、无目标倍率）
        let decision = self.baseline_policy.evaluate(&sku, None);

        // 库存状态
        let status = self
            .classifier
            .classify(sku.current_stock, sku.safety_stock, sku.daily_avg_sales);

        // 充分度
        let coverage_days = self
            .classifier
            .coverage_days(sku.current_stock, sku.daily_avg_sales);
        let coverage_status = self.classifier.coverage_status(coverage_days);

        // 提前期对比 = 消尽天数 / 提前期（1 位小数；哨兵值也按原口径参与）
        let lead_time = sku.effective_lead_time();
        let lead_time_ratio = if lead_time > 0 {
            round1(coverage_days as f64 / lead_time as f64)
        } else {
            0.0
        };

        // 发注判定双重闸门: 原始判定 且 消尽天数 < 30
        // 消尽天数 >= 30 天的 SKU 一律不发注（哨兵值 999 自然落入不发注侧）
        let order_needed = decision.order_needed && coverage_days < ORDER_COVERAGE_GATE_DAYS;

        AnalyzedSku {
            sku,
            reorder_point: decision.reorder_point,
            order_needed,
            status,
            recommended_qty: decision.recommended_qty,
            coverage_days,
            coverage_status,
            lead_time_ratio,
        }
    }
}

impl Default for ProcurementAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 数值防御辅助
// ==========================================

/// 负值/非数回退为 0
fn coerce_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// 非正提前期回退默认 30 天
fn coerce_lead_time(value: i64) -> i64 {
    if value > 0 {
        value
    } else {
        DEFAULT_LEAD_TIME_DAYS
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
    use crate::domain::types::{AbcGrade, CoverageStatus, StockStatus};
    use chrono::Utc;

    fn test_sku(sku_id: &str, current_stock: f64, safety_stock: f64) -> SkuRecord {
        SkuRecord {
            sku_id: sku_id.to_string(),
            name: format!("品目{}", sku_id),
            category: None,
            supplier: None,
            abc_grade: AbcGrade::B,
            xyz_grade: None,
            current_stock,
            safety_stock,
            daily_avg_sales: 0.0, // 参照表合并后才有值
            lead_time_days: 0,
            moq: None,
            unit_cost: 100.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_reference(sku_id: &str, daily_avg_sales: f64, lead_time_days: i64) -> SalesReference {
        SalesReference {
            sku_id: sku_id.to_string(),
            daily_avg_sales,
            lead_time_days,
            xyz_grade: None,
            moq: None,
            supplier: None,
        }
    }

    #[test]
    fn test_reference_join_defaults_on_miss() {
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(vec![test_sku("S1", 100.0, 50.0)], &[]);

        // 未命中参照表: 日均销量 0、提前期 30 → 发注点 = 0×30+50 = 50
        assert_eq!(rows[0].sku.daily_avg_sales, 0.0);
        assert_eq!(rows[0].sku.lead_time_days, 30);
        assert_eq!(rows[0].reorder_point, 50.0);
    }

    #[test]
    fn test_shortage_row_end_to_end() {
        // 现在库 0、日均销量 5、安全库存 20 → 不足 + 消尽 0 天 → 危险
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(
            vec![test_sku("S1", 0.0, 20.0)],
            &[test_reference("S1", 5.0, 30)],
        );

        assert_eq!(rows[0].status, StockStatus::Shortage);
        assert_eq!(rows[0].coverage_days, 0);
        assert_eq!(rows[0].coverage_status, CoverageStatus::AtRisk);
        assert!(rows[0].order_needed);
    }

    #[test]
    fn test_reorder_needed_by_ratio() {
        // 现在库 50 / 安全库存 40 = 1.25 → 需再订货
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(
            vec![test_sku("S1", 50.0, 40.0)],
            &[test_reference("S1", 5.0, 30)],
        );

        assert_eq!(rows[0].status, StockStatus::ReorderNeeded);
    }

    #[test]
    fn test_no_order_when_stock_above_reorder_point() {
        // 发注点 = 10×10 + 0 = 100 < 现在库 → 不发注、量 0
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(
            vec![test_sku("S1", 150.0, 0.0)],
            &[test_reference("S1", 10.0, 10)],
        );

        assert!(!rows[0].order_needed);
        assert_eq!(rows[0].recommended_qty, 0);
    }

    #[test]
    fn test_coverage_gate_blocks_order() {
        // 发注点 = 2×30 + 200 = 260 >= 现在库 120 → 原始判定发注
        // 但消尽天数 = 120/2 = 60 >= 30 → 双重闸门否决
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(
            vec![test_sku("S1", 120.0, 200.0)],
            &[test_reference("S1", 2.0, 30)],
        );

        assert_eq!(rows[0].coverage_days, 60);
        assert!(!rows[0].order_needed);
        // 推荐量按基线公式仍会计算（闸门只改判定，不清量）
        assert!(rows[0].recommended_qty > 0);
    }

    #[test]
    fn test_no_sales_sentinel_never_orders() {
        // 无销售: 消尽天数 = 999 哨兵 → 充分度"无销售"，闸门否决发注
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(
            vec![test_sku("S1", 10.0, 50.0)],
            &[test_reference("S1", 0.0, 30)],
        );

        assert_eq!(rows[0].coverage_days, 999);
        assert_eq!(rows[0].coverage_status, CoverageStatus::NoSales);
        assert!(!rows[0].order_needed);
    }

    #[test]
    fn test_order_qty_includes_weekly_margin_and_moq() {
        let mut sku = test_sku("S1", 100.0, 50.0);
        sku.moq = Some(60.0);
        let mut reference = test_reference("S1", 10.0, 10);
        reference.moq = Some(60.0);

        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(vec![sku], &[reference]);

        // 发注点 = 150，缺口 50 + 周销量 70 = 120 → MOQ 60 上取 = 120
        assert!(rows[0].order_needed);
        assert_eq!(rows[0].recommended_qty, 120);
        assert_eq!(rows[0].recommended_qty % 60, 0);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = ProcurementAnalyzer::new();
        let skus = vec![
            test_sku("S1", 0.0, 20.0),
            test_sku("S2", 50.0, 40.0),
            test_sku("S3", 500.0, 40.0),
        ];
        let references = vec![
            test_reference("S1", 5.0, 30),
            test_reference("S2", 5.0, 15),
        ];

        let first = analyzer.analyze(skus.clone(), &references);
        let second = analyzer.analyze(skus, &references);

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_inputs_are_coerced() {
        // 参照表带负销量 → 回退 0；不报错
        let analyzer = ProcurementAnalyzer::new();
        let rows = analyzer.analyze(
            vec![test_sku("S1", 10.0, 20.0)],
            &[test_reference("S1", -5.0, -3)],
        );

        assert_eq!(rows[0].sku.daily_avg_sales, 0.0);
        assert_eq!(rows[0].sku.lead_time_days, 30);
        assert_eq!(rows[0].coverage_days, 999);
    }
}
