// ==========================================
// 智能补货决策系统 - 采购决策 API
// ==========================================
// 职责: 封装引擎层，向展示/发注协作方提供三类调用契约:
//       批量分析、自动发注生成、单 SKU 即席查询（预测/动态发注点）
// 架构: API 层 → 引擎层（纯计算）+ 仓储层（数据访问）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PolicyConfigReader};
use crate::domain::analysis::{
    AnalyzedSku, ForecastResult, OrderRecommendation, ReorderDecision,
};
use crate::domain::order::OrderRecord;
use crate::domain::sku::{SalesReference, SkuRecord};
use crate::engine::auto_order::AutoOrderGenerator;
use crate::engine::forecast::DemandForecaster;
use crate::engine::procurement::ProcurementAnalyzer;
use crate::engine::reorder::{DynamicPolicyParams, DynamicReorderPolicy, ReorderPolicy};
use crate::repository::{
    OrderRecordRepository, SalesHistoryRepository, SalesReferenceRepository, SkuMasterRepository,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// ProcurementApi - 采购决策 API
// ==========================================
pub struct ProcurementApi {
    sku_repo: Arc<SkuMasterRepository>,
    reference_repo: Arc<SalesReferenceRepository>,
    history_repo: Arc<SalesHistoryRepository>,
    order_repo: Arc<OrderRecordRepository>,
    config: Arc<ConfigManager>,

    analyzer: ProcurementAnalyzer,
    forecaster: DemandForecaster,
}

impl ProcurementApi {
    /// 创建新的 ProcurementApi 实例
    pub fn new(
        sku_repo: Arc<SkuMasterRepository>,
        reference_repo: Arc<SalesReferenceRepository>,
        history_repo: Arc<SalesHistoryRepository>,
        order_repo: Arc<OrderRecordRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            sku_repo,
            reference_repo,
            history_repo,
            order_repo,
            config,
            analyzer: ProcurementAnalyzer::new(),
            forecaster: DemandForecaster::new(),
        }
    }

    // ==========================================
    // 批量分析契约
    // ==========================================

    /// 批量采购分析（外部供表口径）
    ///
    /// 契约: 输入 SKU 行 + 参照表行，返回追加派生列的分析表
    pub fn analyze_procurement(
        &self,
        sku_rows: Vec<SkuRecord>,
        reference_rows: &[SalesReference],
    ) -> ApiResult<Vec<AnalyzedSku>> {
        Ok(self.analyzer.analyze(sku_rows, reference_rows))
    }

    /// 批量采购分析（仓储加载口径）
    #[instrument(skip(self))]
    pub fn analyze_from_repository(&self) -> ApiResult<Vec<AnalyzedSku>> {
        let sku_rows = self.sku_repo.list_all()?;
        let reference_rows = self.reference_repo.list_all()?;
        Ok(self.analyzer.analyze(sku_rows, &reference_rows))
    }

    // ==========================================
    // 自动发注契约
    // ==========================================

    /// 生成自动发注推荐（默认策略参数）
    pub fn generate_auto_orders(
        &self,
        analyzed_rows: &[AnalyzedSku],
    ) -> ApiResult<Vec<OrderRecommendation>> {
        let generator = AutoOrderGenerator::new();
        Ok(generator.generate(analyzed_rows))
    }

    /// 生成自动发注推荐（配置覆写口径）
    ///
    /// 从 config_kv 读取动态策略参数；未覆写项保持参考默认值
    pub async fn generate_auto_orders_with_config(
        &self,
        analyzed_rows: &[AnalyzedSku],
    ) -> ApiResult<Vec<OrderRecommendation>> {
        let params = self
            .config
            .get_dynamic_policy_params()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let generator = AutoOrderGenerator::with_params(params);
        Ok(generator.generate(analyzed_rows))
    }

    /// 生成自动发注推荐（自定义策略口径）
    ///
    /// 加载 custom_policy/{policy_id} 的覆写项并合并到默认参数之上；
    /// 策略不存在或无任何覆写项时退回默认策略（避免行为漂移）
    pub fn generate_auto_orders_with_policy(
        &self,
        analyzed_rows: &[AnalyzedSku],
        policy_id: &str,
    ) -> ApiResult<Vec<OrderRecommendation>> {
        let profile = self
            .config
            .get_custom_policy_profile(policy_id)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let generator = match profile {
            Some(p) if p.parameters.has_any() => AutoOrderGenerator::with_params(
                p.parameters.apply_to(DynamicPolicyParams::default()),
            ),
            _ => AutoOrderGenerator::new(),
        };
        Ok(generator.generate(analyzed_rows))
    }

    // ==========================================
    // 单 SKU 即席查询契约
    // ==========================================

    /// 即席需求预测
    ///
    /// 口径: 有销售历史用高级预测（指数平滑 + 趋势），否则用
    ///       简单预测（日均销量现值保持）
    pub fn forecast_demand(&self, sku_id: &str, horizon_days: u32) -> ApiResult<ForecastResult> {
        let sku = self.sku_repo.get_by_id(sku_id)?;
        let history = self.history_repo.get_history(sku_id)?;

        let forecast = if history.is_empty() {
            self.forecaster
                .forecast_simple(sku.daily_avg_sales, horizon_days)
        } else {
            self.forecaster.forecast_advanced(&history, horizon_days)
        };

        Ok(forecast)
    }

    /// 即席动态发注点计算（纯函数口径，外部供记录）
    pub fn calculate_dynamic_reorder_point(
        &self,
        sku: &SkuRecord,
        forecast: Option<&ForecastResult>,
    ) -> ReorderDecision {
        DynamicReorderPolicy::new().evaluate(sku, forecast)
    }

    /// 即席动态发注点计算（仓储加载 + 即席预测）
    pub fn dynamic_reorder_point_for(&self, sku_id: &str) -> ApiResult<ReorderDecision> {
        let sku = self.sku_repo.get_by_id(sku_id)?;
        let forecast = self.forecast_demand(sku_id, 30)?;
        Ok(DynamicReorderPolicy::new().evaluate(&sku, Some(&forecast)))
    }

    // ==========================================
    // 发注提交契约
    // ==========================================

    /// 提交发注（推荐行 → 发注台账）
    ///
    /// 校验: 发注量必须为正；记录发注前后消尽天数与预计到货日
    #[instrument(skip(self, recommendation), fields(sku_id = %recommendation.sku_id))]
    pub fn submit_order(&self, recommendation: &OrderRecommendation) -> ApiResult<OrderRecord> {
        if recommendation.recommended_qty == 0 {
            return Err(ApiError::InvalidInput(format!(
                "发注量为 0，不可提交: sku_id={}",
                recommendation.sku_id
            )));
        }

        let order_date = Utc::now().date_naive();
        let record = OrderRecord {
            order_id: Uuid::new_v4().to_string(),
            order_date,
            sku_id: recommendation.sku_id.clone(),
            name: recommendation.name.clone(),
            abc_grade: recommendation.abc_grade,
            xyz_grade: recommendation.xyz_grade,
            current_stock: recommendation.current_stock,
            order_qty: recommendation.recommended_qty,
            unit_cost: recommendation.unit_cost,
            order_amount: recommendation.estimated_cost,
            lead_time_days: recommendation.lead_time_days,
            expected_receipt_date: OrderRecord::expected_receipt(
                order_date,
                recommendation.lead_time_days,
            ),
            coverage_days_before: recommendation.coverage_days,
            coverage_days_after: OrderRecord::coverage_after_order(
                recommendation.current_stock,
                recommendation.recommended_qty,
                recommendation.forecast_daily,
            ),
            created_at: Utc::now(),
        };

        self.order_repo.append(&record)?;
        info!(
            order_id = %record.order_id,
            qty = record.order_qty,
            amount = record.order_amount,
            "发注已记录"
        );

        Ok(record)
    }

    /// 查询发注台账（全量，发注日降序）
    pub fn list_orders(&self) -> ApiResult<Vec<OrderRecord>> {
        Ok(self.order_repo.list_all()?)
    }
}
