// ==========================================
// 智能补货决策系统 - ABC-XYZ 分级引擎
// ==========================================
// 职责: 按销售额贡献做 ABC 分级、按需求波动做 XYZ 分级，
//       并给出 AX..CZ 矩阵的管理优先级与策略口径
// 输入: 品目销售额 / 按期需求历史
// 输出: 分级结果（纯函数，无副作用）
// ==========================================

use crate::domain::types::{AbcGrade, XyzGrade};
use serde::{Deserialize, Serialize};

/// 需求均值为 0 时的变动系数哨兵值（显示用；等级一律判 Z）
const CV_SENTINEL: f64 = 999.0;

// ==========================================
// 阈值参数
// ==========================================

/// ABC 分级阈值（累计销售额占比）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbcThresholds {
    /// A 级上界（累计占比 <= a → A）
    pub a: f64,
    /// B 级上界（累计占比 <= b → B，其余 C）
    pub b: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self { a: 0.80, b: 0.95 }
    }
}

/// XYZ 分级阈值（变动系数 cv = std/mean）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct XyzThresholds {
    /// X 级上界（cv < x → X）
    pub x: f64,
    /// Y 级上界（cv < y → Y，其余 Z）
    pub y: f64,
}

impl Default for XyzThresholds {
    fn default() -> Self {
        Self { x: 0.5, y: 1.0 }
    }
}

// ==========================================
// 结果对象
// ==========================================

/// ABC 分级结果行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcResult {
    pub sku_id: String,
    pub value: f64,                 // 销售额（或使用额）
    pub cumulative_percentage: f64, // 累计占比（0-1）
    pub grade: AbcGrade,
    pub rank: usize, // 全量内排名（1 起）
}

/// XYZ 分级结果行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XyzResult {
    pub sku_id: String,
    pub average_demand: f64,           // 平均需求
    pub std_dev: f64,                  // 需求标准差
    pub coefficient_of_variation: f64, // 变动系数（mean=0 时为哨兵值 999）
    pub grade: XyzGrade,
}

/// ABC-XYZ 矩阵行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcXyzMatrixItem {
    pub sku_id: String,
    pub abc_grade: AbcGrade,
    pub xyz_grade: XyzGrade,
    pub combined_grade: String, // 如 "AX"、"CZ"
    pub priority: u8,           // 管理优先级 1-9（1 最高）
    pub strategy: String,       // 推荐管理策略（本地化文案）
}

// ==========================================
// AbcXyzEngine - ABC-XYZ 分级引擎
// ==========================================
pub struct AbcXyzEngine {
    abc_thresholds: AbcThresholds,
    xyz_thresholds: XyzThresholds,
}

impl AbcXyzEngine {
    /// 以默认阈值创建（A<=80% / B<=95%；X<0.5 / Y<1.0）
    pub fn new() -> Self {
        Self {
            abc_thresholds: AbcThresholds::default(),
            xyz_thresholds: XyzThresholds::default(),
        }
    }

    /// 以自定义阈值创建
    pub fn with_thresholds(abc: AbcThresholds, xyz: XyzThresholds) -> Self {
        Self {
            abc_thresholds: abc,
            xyz_thresholds: xyz,
        }
    }

    // ==========================================
    // ABC 分级
    // ==========================================

    /// ABC 分级（按销售额降序累计占比）
    ///
    /// 边界: 总额为 0 时全部判 C，累计占比按序号均摊
    pub fn classify_abc(&self, items: &[(String, f64)]) -> Vec<AbcResult> {
        if items.is_empty() {
            return Vec::new();
        }

        // 销售额降序
        let mut sorted: Vec<(String, f64)> = items.to_vec();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

        let total: f64 = sorted.iter().map(|(_, v)| v).sum();

        if total <= 0.0 {
            // 全零: 均摊累计占比，全部 C
            let n = sorted.len();
            return sorted
                .into_iter()
                .enumerate()
                .map(|(index, (sku_id, value))| AbcResult {
                    sku_id,
                    value,
                    cumulative_percentage: (index + 1) as f64 / n as f64,
                    grade: AbcGrade::C,
                    rank: index + 1,
                })
                .collect();
        }

        let mut cumulative = 0.0;
        sorted
            .into_iter()
            .enumerate()
            .map(|(index, (sku_id, value))| {
                cumulative += value;
                let cumulative_percentage = cumulative / total;

                let grade = if cumulative_percentage <= self.abc_thresholds.a {
                    AbcGrade::A
                } else if cumulative_percentage <= self.abc_thresholds.b {
                    AbcGrade::B
                } else {
                    AbcGrade::C
                };

                AbcResult {
                    sku_id,
                    value,
                    cumulative_percentage,
                    grade,
                    rank: index + 1,
                }
            })
            .collect()
    }

    // ==========================================
    // XYZ 分级
    // ==========================================

    /// XYZ 分级（按需求历史的变动系数）
    ///
    /// 边界: 均值为 0（无需求）→ cv 取哨兵值 999，等级 Z
    pub fn classify_xyz(&self, sku_id: &str, demand_history: &[f64]) -> XyzResult {
        let mean = mean(demand_history);
        let std_dev = std_dev(demand_history, mean);

        let (cv, grade) = if mean > 0.0 {
            let cv = std_dev / mean;
            let grade = if cv < self.xyz_thresholds.x {
                XyzGrade::X
            } else if cv < self.xyz_thresholds.y {
                XyzGrade::Y
            } else {
                XyzGrade::Z
            };
            (round2(cv), grade)
        } else {
            (CV_SENTINEL, XyzGrade::Z)
        };

        XyzResult {
            sku_id: sku_id.to_string(),
            average_demand: mean,
            std_dev,
            coefficient_of_variation: cv,
            grade,
        }
    }

    // ==========================================
    // 矩阵合成
    // ==========================================

    /// 合成 ABC-XYZ 矩阵行（管理优先级 1-9）
    pub fn combine(&self, sku_id: &str, abc: AbcGrade, xyz: XyzGrade) -> AbcXyzMatrixItem {
        let combined_grade = format!("{}{}", abc, xyz);
        let (priority, strategy_key) = matrix_strategy(abc, xyz);

        AbcXyzMatrixItem {
            sku_id: sku_id.to_string(),
            abc_grade: abc,
            xyz_grade: xyz,
            combined_grade,
            priority,
            strategy: crate::i18n::t(strategy_key),
        }
    }
}

impl Default for AbcXyzEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 矩阵格 → (管理优先级, 策略文案 i18n 键)
fn matrix_strategy(abc: AbcGrade, xyz: XyzGrade) -> (u8, &'static str) {
    match (abc, xyz) {
        (AbcGrade::A, XyzGrade::X) => (1, "matrix.ax"),
        (AbcGrade::A, XyzGrade::Y) => (2, "matrix.ay"),
        (AbcGrade::A, XyzGrade::Z) => (3, "matrix.az"),
        (AbcGrade::B, XyzGrade::X) => (4, "matrix.bx"),
        (AbcGrade::B, XyzGrade::Y) => (5, "matrix.by"),
        (AbcGrade::B, XyzGrade::Z) => (6, "matrix.bz"),
        (AbcGrade::C, XyzGrade::X) => (7, "matrix.cx"),
        (AbcGrade::C, XyzGrade::Y) => (8, "matrix.cy"),
        (AbcGrade::C, XyzGrade::Z) => (9, "matrix.cz"),
    }
}

// ==========================================
// 统计辅助函数
// ==========================================

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 总体标准差
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abc_cumulative_share_grading() {
        let engine = AbcXyzEngine::new();
        let items = vec![
            ("S1".to_string(), 700.0),
            ("S2".to_string(), 200.0),
            ("S3".to_string(), 60.0),
            ("S4".to_string(), 40.0),
        ];

        let results = engine.classify_abc(&items);

        // 降序: S1 70% → A; S2 90% → B; S3 96% → C; S4 100% → C
        assert_eq!(results[0].sku_id, "S1");
        assert_eq!(results[0].grade, AbcGrade::A);
        assert_eq!(results[1].grade, AbcGrade::B);
        assert_eq!(results[2].grade, AbcGrade::C);
        assert_eq!(results[3].grade, AbcGrade::C);
        assert_eq!(results[0].rank, 1);
    }

    #[test]
    fn test_abc_all_zero_values_are_grade_c() {
        let engine = AbcXyzEngine::new();
        let items = vec![("S1".to_string(), 0.0), ("S2".to_string(), 0.0)];

        let results = engine.classify_abc(&items);
        assert!(results.iter().all(|r| r.grade == AbcGrade::C));
        assert_eq!(results[1].cumulative_percentage, 1.0);
    }

    #[test]
    fn test_abc_empty_input() {
        let engine = AbcXyzEngine::new();
        assert!(engine.classify_abc(&[]).is_empty());
    }

    #[test]
    fn test_xyz_grading_by_cv() {
        let engine = AbcXyzEngine::new();

        // 稳定序列 → X
        let stable = engine.classify_xyz("S1", &[10.0, 11.0, 9.0, 10.0]);
        assert_eq!(stable.grade, XyzGrade::X);

        // 高波动序列（cv = 49/40 ≈ 1.22）→ Z
        let volatile = engine.classify_xyz("S2", &[0.0, 100.0, 0.0, 100.0, 0.0]);
        assert_eq!(volatile.grade, XyzGrade::Z);
    }

    #[test]
    fn test_xyz_zero_demand_is_z_with_sentinel() {
        let engine = AbcXyzEngine::new();
        let result = engine.classify_xyz("S1", &[0.0, 0.0, 0.0]);

        assert_eq!(result.grade, XyzGrade::Z);
        assert_eq!(result.coefficient_of_variation, 999.0);
    }

    #[test]
    fn test_matrix_priority_order() {
        let engine = AbcXyzEngine::new();

        let ax = engine.combine("S1", AbcGrade::A, XyzGrade::X);
        let cz = engine.combine("S2", AbcGrade::C, XyzGrade::Z);

        assert_eq!(ax.priority, 1);
        assert_eq!(ax.combined_grade, "AX");
        assert_eq!(cz.priority, 9);
        assert_eq!(cz.combined_grade, "CZ");
    }
}
