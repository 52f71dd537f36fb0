use crate::domain::types::{AbcGrade, PriorityTier, StockStatus};

/// 状态基础分
const SCORE_SHORTAGE: i32 = 10;
const SCORE_REORDER: i32 = 5;
const SCORE_OTHER: i32 = 1;

/// ABC 等级加分
const BONUS_GRADE_A: i32 = 5;
const BONUS_GRADE_B: i32 = 2;

/// 由库存状态与 ABC 等级计算优先级
///
/// 规则:
/// - 等级只看状态: 不足→HIGH / 需再订货→MEDIUM / 其余→LOW
/// - 分值 = 状态基础分（10/5/1）+ ABC 加分（A+5 / B+2 / C+0）
///   加分只抬分值，不改等级
pub(super) fn priority_for(status: StockStatus, abc_grade: AbcGrade) -> (PriorityTier, i32) {
    let (tier, base_score) = match status {
        StockStatus::Shortage => (PriorityTier::High, SCORE_SHORTAGE),
        StockStatus::ReorderNeeded => (PriorityTier::Medium, SCORE_REORDER),
        _ => (PriorityTier::Low, SCORE_OTHER),
    };

    let bonus = match abc_grade {
        AbcGrade::A => BONUS_GRADE_A,
        AbcGrade::B => BONUS_GRADE_B,
        AbcGrade::C => 0,
    };

    (tier, base_score + bonus)
}
