// ==========================================
// 智能补货决策系统 - 领域类型定义
// ==========================================
// 依据: SCM 分级体系 (ABC/XYZ) 与库存状态口径
// 红线: 状态判定是"规则制",不是评分制
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ABC 等级 (ABC Grade)
// ==========================================
// 按销售额贡献分级: A=核心品, B=重要品, C=一般品
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcGrade {
    A,
    B,
    C,
}

impl AbcGrade {
    /// 解析等级字符串（无法识别时返回 None，由调用方决定默认值）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "A" => Some(AbcGrade::A),
            "B" => Some(AbcGrade::B),
            "C" => Some(AbcGrade::C),
            _ => None,
        }
    }
}

impl fmt::Display for AbcGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcGrade::A => write!(f, "A"),
            AbcGrade::B => write!(f, "B"),
            AbcGrade::C => write!(f, "C"),
        }
    }
}

// ==========================================
// XYZ 等级 (XYZ Grade)
// ==========================================
// 按需求波动分级: X=稳定, Y=波动, Z=不稳定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XyzGrade {
    X,
    Y,
    Z,
}

impl XyzGrade {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "X" => Some(XyzGrade::X),
            "Y" => Some(XyzGrade::Y),
            "Z" => Some(XyzGrade::Z),
            _ => None,
        }
    }
}

impl fmt::Display for XyzGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XyzGrade::X => write!(f, "X"),
            XyzGrade::Y => write!(f, "Y"),
            XyzGrade::Z => write!(f, "Z"),
        }
    }
}

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 判定顺序见 InventoryClassifier（先命中先返回）
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Shortage,      // 不足（紧急补货）
    ReorderNeeded, // 需再订货
    Optimal,       // 适正
    Excess,        // 过剩
    Dormant,       // 休眠品（无销售/无安全库存）
}

impl StockStatus {
    /// 本地化显示名（走 i18n，默认 zh-CN）
    pub fn display_name(&self) -> String {
        match self {
            StockStatus::Shortage => crate::i18n::t("status.shortage"),
            StockStatus::ReorderNeeded => crate::i18n::t("status.reorder_needed"),
            StockStatus::Optimal => crate::i18n::t("status.optimal"),
            StockStatus::Excess => crate::i18n::t("status.excess"),
            StockStatus::Dormant => crate::i18n::t("status.dormant"),
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Shortage => write!(f, "SHORTAGE"),
            StockStatus::ReorderNeeded => write!(f, "REORDER_NEEDED"),
            StockStatus::Optimal => write!(f, "OPTIMAL"),
            StockStatus::Excess => write!(f, "EXCESS"),
            StockStatus::Dormant => write!(f, "DORMANT"),
        }
    }
}

// ==========================================
// 充分度状态 (Coverage Status)
// ==========================================
// 仅由再库消尽天数派生（999 哨兵值 = 无销售）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    AtRisk,      // 危险（7 日以内）
    Caution,     // 注意（14 日以内）
    Healthy,     // 良好（30 日以内）
    Overstocked, // 过多（超 30 日）
    NoSales,     // 无销售（哨兵值 999）
}

impl CoverageStatus {
    pub fn display_name(&self) -> String {
        match self {
            CoverageStatus::AtRisk => crate::i18n::t("coverage.at_risk"),
            CoverageStatus::Caution => crate::i18n::t("coverage.caution"),
            CoverageStatus::Healthy => crate::i18n::t("coverage.healthy"),
            CoverageStatus::Overstocked => crate::i18n::t("coverage.overstocked"),
            CoverageStatus::NoSales => crate::i18n::t("coverage.no_sales"),
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageStatus::AtRisk => write!(f, "AT_RISK"),
            CoverageStatus::Caution => write!(f, "CAUTION"),
            CoverageStatus::Healthy => write!(f, "HEALTHY"),
            CoverageStatus::Overstocked => write!(f, "OVERSTOCKED"),
            CoverageStatus::NoSales => write!(f, "NO_SALES"),
        }
    }
}

// ==========================================
// 需求趋势 (Demand Trend)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,       // 上升（回归斜率 > 均值 5%）
    Decreasing,       // 下降（回归斜率 < 均值 -5%）
    Stable,           // 平稳
    Unknown,          // 无法判断（零销售）
    InsufficientData, // 样本不足（< 3 期）
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Stable => write!(f, "stable"),
            Trend::Unknown => write!(f, "unknown"),
            Trend::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

// ==========================================
// 预测方法 (Forecast Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    ZeroSales,            // 零销售短路
    SimpleAverage,        // 简单平均（现值保持）
    ExponentialSmoothing, // 指数平滑（α=0.3）+ 趋势修正
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMethod::ZeroSales => write!(f, "zero_sales"),
            ForecastMethod::SimpleAverage => write!(f, "simple_average"),
            ForecastMethod::ExponentialSmoothing => write!(f, "exponential_smoothing"),
        }
    }
}

// ==========================================
// 发注优先级 (Priority Tier)
// ==========================================
// 等级 + 数值分双轨: 等级用于展示，分值用于排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityTier::High => write!(f, "HIGH"),
            PriorityTier::Medium => write!(f, "MEDIUM"),
            PriorityTier::Low => write!(f, "LOW"),
        }
    }
}
