// ==========================================
// 智能补货决策系统 - 需求预测引擎
// ==========================================
// 职责: 由日均销量或销售历史推算预测日需求、趋势标签、置信度
// 输入: 标量日均销量 / 按期销售历史（旧→新，最近一期在末位）
// 输出: ForecastResult（纯函数，无副作用）
// 红线: 任何输入异常都降级返回，不抛错
// ==========================================

use crate::domain::analysis::ForecastResult;
use crate::domain::types::{ForecastMethod, Trend};
use tracing::instrument;

/// 指数平滑系数 α
const SMOOTHING_ALPHA: f64 = 0.3;

/// 趋势判定阈值（回归斜率相对均值的比例）
const TREND_SLOPE_RATIO: f64 = 0.05;

// ==========================================
// DemandForecaster - 需求预测引擎
// ==========================================
pub struct DemandForecaster;

impl DemandForecaster {
    /// 创建新的需求预测引擎
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 简单预测（现值保持）
    // ==========================================

    /// 简单需求预测
    ///
    /// 规则:
    /// - daily_sales <= 0 → 全零结果，置信度 0，趋势 unknown
    /// - 否则假定当前销量保持: 日需求 = daily_sales，总需求 = daily_sales × horizon
    ///   置信度固定 70，趋势 stable
    pub fn forecast_simple(&self, daily_sales: f64, horizon_days: u32) -> ForecastResult {
        if daily_sales <= 0.0 {
            return ForecastResult {
                forecast_daily: 0.0,
                forecast_total: 0.0,
                confidence: 0,
                trend: Trend::Unknown,
                method: ForecastMethod::ZeroSales,
                trend_slope: 0.0,
                cv: 0.0,
            };
        }

        let forecast_daily = daily_sales;
        let forecast_total = daily_sales * f64::from(horizon_days);

        ForecastResult {
            forecast_daily: round1(forecast_daily),
            forecast_total: forecast_total.round(),
            confidence: 70, // 基础置信度
            trend: Trend::Stable,
            method: ForecastMethod::SimpleAverage,
            trend_slope: 0.0,
            cv: 0.0,
        }
    }

    // ==========================================
    // 高级预测（趋势分析 + 指数平滑）
    // ==========================================

    /// 高级需求预测
    ///
    /// 步骤:
    /// 1) 历史为空 → 退化为简单预测(0)
    /// 2) 均值/标准差（总体口径）
    /// 3) 样本 >= 3 → 一次线性回归取斜率判趋势:
    ///    斜率 > 均值×5% → increasing ×1.10
    ///    斜率 < 均值×-5% → decreasing ×0.90
    ///    否则 stable ×1.00；样本 < 3 → insufficient_data ×1.00
    /// 4) 指数平滑 α=0.3: 样本 >= 2 时 日需求 = α×最近值 + (1-α)×均值，否则取均值
    /// 5) 趋势修正后 总需求 = 日需求 × horizon
    /// 6) 置信度按变动系数 cv = std/mean（mean=0 按 1.0 处理）:
    ///    <0.2→90, <0.5→75, <1.0→60, 其余→40
    #[instrument(skip(self, history), fields(periods = history.len()))]
    pub fn forecast_advanced(&self, history: &[f64], horizon_days: u32) -> ForecastResult {
        if history.is_empty() {
            return self.forecast_simple(0.0, horizon_days);
        }

        let mean = mean(history);
        let std = std_dev(history, mean);

        // 趋势分析（一次线性回归，x 为 0 基索引）
        let (trend, trend_factor, slope) = if history.len() >= 3 {
            let slope = ols_slope(history);
            if slope > mean * TREND_SLOPE_RATIO {
                (Trend::Increasing, 1.10, slope)
            } else if slope < -mean * TREND_SLOPE_RATIO {
                (Trend::Decreasing, 0.90, slope)
            } else {
                (Trend::Stable, 1.00, slope)
            }
        } else {
            (Trend::InsufficientData, 1.00, 0.0)
        };

        // 指数平滑
        let last = history[history.len() - 1];
        let mut forecast_daily = if history.len() >= 2 {
            last * SMOOTHING_ALPHA + (1.0 - SMOOTHING_ALPHA) * mean
        } else {
            mean
        };

        // 趋势修正
        forecast_daily *= trend_factor;
        let forecast_total = forecast_daily * f64::from(horizon_days);

        // 置信度（变动系数口径；mean=0 时视为高波动）
        let cv = if mean > 0.0 { std / mean } else { 1.0 };
        let confidence: u8 = if cv < 0.2 {
            90
        } else if cv < 0.5 {
            75
        } else if cv < 1.0 {
            60
        } else {
            40
        };

        ForecastResult {
            forecast_daily: round1(forecast_daily),
            forecast_total: forecast_total.round(),
            confidence,
            trend,
            method: ForecastMethod::ExponentialSmoothing,
            trend_slope: round1(slope),
            cv: round1(cv),
        }
    }
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 统计辅助函数
// ==========================================

/// 均值（空切片返回 0）
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

/// 一次线性回归斜率（最小二乘，x = 0,1,2,...）
fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    if sxx > 0.0 {
        sxy / sxx
    } else {
        0.0
    }
}

/// 1 位小数舍入
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
