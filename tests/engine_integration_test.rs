// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证 ProcurementAnalyzer → AutoOrderGenerator 的协作与数据流转
// 场景: 批量分析 → 发注推荐 全链路（纯内存，不触库）
// ==========================================

mod helpers;

use helpers::test_data_builder::{build_reference, build_sku};
use smart_procurement::domain::types::{AbcGrade, PriorityTier, StockStatus};
use smart_procurement::engine::{AutoOrderGenerator, ProcurementAnalyzer};

#[test]
fn test_full_pipeline_shortage_to_high_priority_order() {
    // 场景: 零库存 A 级品 → 分析判不足 → 推荐为最高优先级
    let analyzer = ProcurementAnalyzer::new();
    let generator = AutoOrderGenerator::new();

    let skus = vec![
        build_sku("SKU-001", AbcGrade::A, 0.0, 20.0, 1500.0),
        build_sku("SKU-002", AbcGrade::C, 80.0, 40.0, 300.0), // ratio 2.0 → 适正
    ];
    let references = vec![
        build_reference("SKU-001", 5.0, 30, None),
        build_reference("SKU-002", 5.0, 30, None),
    ];

    let analyzed = analyzer.analyze(skus, &references);
    assert_eq!(analyzed.len(), 2);

    let shortage_row = &analyzed[0];
    assert_eq!(shortage_row.status, StockStatus::Shortage);
    assert!(shortage_row.order_needed);
    assert_eq!(shortage_row.coverage_days, 0);

    let optimal_row = &analyzed[1];
    assert_eq!(optimal_row.status, StockStatus::Optimal);
    // 80/5 = 16 天 < 30，但 80 > 发注点(150+40=190)? 否——80 <= 190 → 原始判定真，
    // 消尽 16 天 < 30 → 最终仍需发注
    assert!(optimal_row.order_needed);

    let orders = generator.generate(&analyzed);
    assert_eq!(orders.len(), 2);

    // A 级不足品排最前: HIGH / 10+5
    assert_eq!(orders[0].sku_id, "SKU-001");
    assert_eq!(orders[0].priority, PriorityTier::High);
    assert_eq!(orders[0].priority_score, 15);

    // 动态口径数字: A 级、日均 5、提前期 30、简单预测置信度 70
    // 安全库存 = 5×30×1.5 = 225，发注点 = 225+150 = 375
    assert_eq!(orders[0].safety_stock, 225.0);
    assert_eq!(orders[0].reorder_point, 375.0);
    // 目标 562.5 - 0 = 562.5 → 563
    assert_eq!(orders[0].recommended_qty, 563);
    assert_eq!(orders[0].estimated_cost, 563.0 * 1500.0);
}

#[test]
fn test_coverage_gate_excludes_slow_movers_from_orders() {
    // 场景: 双重闸门——消尽天数 >= 30 的 SKU 不进入发注推荐
    let analyzer = ProcurementAnalyzer::new();
    let generator = AutoOrderGenerator::new();

    // 发注点 = 2×30 + 200 = 260 >= 现在库 120（原始判定真）
    // 但消尽 = 120/2 = 60 天 → 闸门否决
    let skus = vec![build_sku("SLOW", AbcGrade::B, 120.0, 200.0, 100.0)];
    let references = vec![build_reference("SLOW", 2.0, 30, None)];

    let analyzed = analyzer.analyze(skus, &references);
    assert!(!analyzed[0].order_needed);

    let orders = generator.generate(&analyzed);
    assert!(orders.is_empty());
}

#[test]
fn test_moq_respected_across_both_formulas() {
    // 场景: 基线口径与动态口径的推荐量都必须是 MOQ 的倍数
    let analyzer = ProcurementAnalyzer::new();
    let generator = AutoOrderGenerator::new();

    let mut sku = build_sku("SKU-MOQ", AbcGrade::B, 10.0, 50.0, 700.0);
    sku.moq = Some(24.0);
    let references = vec![build_reference("SKU-MOQ", 5.0, 10, Some(24.0))];

    let analyzed = analyzer.analyze(vec![sku], &references);
    let row = &analyzed[0];
    assert!(row.order_needed);
    assert!(row.recommended_qty > 0);
    assert_eq!(row.recommended_qty % 24, 0);

    let orders = generator.generate(&analyzed);
    assert_eq!(orders.len(), 1);
    assert!(orders[0].recommended_qty > 0);
    assert_eq!(orders[0].recommended_qty % 24, 0);
}

#[test]
fn test_two_reorder_formulas_stay_separate() {
    // 场景: 同一 SKU 的基线发注点与动态发注点按不同口径计算，互不污染
    let analyzer = ProcurementAnalyzer::new();
    let generator = AutoOrderGenerator::new();

    let skus = vec![build_sku("SKU-001", AbcGrade::A, 10.0, 60.0, 100.0)];
    let references = vec![build_reference("SKU-001", 4.0, 20, None)];

    let analyzed = analyzer.analyze(skus, &references);
    // 基线: 4×20 + 60 = 140
    assert_eq!(analyzed[0].reorder_point, 140.0);

    let orders = generator.generate(&analyzed);
    // 动态: 安全库存 = 4×20×1.5 = 120，发注点 = 120 + 80 = 200
    assert_eq!(orders[0].safety_stock, 120.0);
    assert_eq!(orders[0].reorder_point, 200.0);
}

#[test]
fn test_batch_is_deterministic_end_to_end() {
    // 场景: 幂等——同一输入两次全链路结果一致
    let analyzer = ProcurementAnalyzer::new();
    let generator = AutoOrderGenerator::new();

    let skus: Vec<_> = (0..20)
        .map(|i| {
            build_sku(
                &format!("SKU-{:03}", i),
                if i % 3 == 0 { AbcGrade::A } else { AbcGrade::C },
                (i as f64) * 10.0,
                40.0,
                500.0,
            )
        })
        .collect();
    let references: Vec<_> = (0..20)
        .map(|i| build_reference(&format!("SKU-{:03}", i), (i % 7) as f64, 15, None))
        .collect();

    let first = generator.generate(&analyzer.analyze(skus.clone(), &references));
    let second = generator.generate(&analyzer.analyze(skus, &references));

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
