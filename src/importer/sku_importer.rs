// ==========================================
// 智能补货决策系统 - SKU 导入编排
// ==========================================
// 职责: 文件解析 → 字段映射 → 数据清洗 → 仓储写入 的导入管道
// 红线: 单行 DQ 不合格只跳过该行并告警，不中断整个批次
// ==========================================

use crate::domain::sku::{ImportBatch, SalesReference, SkuRecord};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::repository::{SalesReferenceRepository, SkuMasterRepository};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SkuImporter - SKU 导入编排器
// ==========================================
pub struct SkuImporter {
    sku_repo: Arc<SkuMasterRepository>,
    reference_repo: Arc<SalesReferenceRepository>,
    parser: UniversalFileParser,
    mapper: FieldMapper,
    cleaner: DataCleaner,
}

impl SkuImporter {
    /// 创建新的导入编排器
    pub fn new(
        sku_repo: Arc<SkuMasterRepository>,
        reference_repo: Arc<SalesReferenceRepository>,
    ) -> Self {
        Self {
            sku_repo,
            reference_repo,
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
            cleaner: DataCleaner::new(),
        }
    }

    // ==========================================
    // SKU 主数据导入
    // ==========================================

    /// 导入 SKU 主数据文件（.csv/.xlsx）
    ///
    /// 流程: 解析 → 映射 → 清洗（单行失败跳过）→ 单事务批量写入
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_sku_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportBatch> {
        let path = file_path.as_ref();
        let rows = self
            .parser
            .parse(path)
            .map_err(|e| ImportError::FileReadError(e.to_string()))?;

        let total_rows = rows.len();
        let mut records: Vec<SkuRecord> = Vec::with_capacity(total_rows);
        let mut skipped_rows = 0usize;

        for (index, row) in rows.iter().enumerate() {
            // 数据行从第 2 行起（第 1 行为表头）
            let row_number = index + 2;
            let raw = self.mapper.map_to_raw_sku(row, row_number);

            match self.cleaner.clean(&raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(row = row_number, error = %e, "DQ 不合格，跳过该行");
                    skipped_rows += 1;
                }
            }
        }

        let success_rows = self
            .sku_repo
            .batch_upsert(records)
            .map_err(|e| ImportError::DatabaseWriteError(e.to_string()))?;

        let batch = ImportBatch {
            batch_id: Uuid::new_v4().to_string(),
            file_name: path.file_name().map(|n| n.to_string_lossy().to_string()),
            total_rows,
            success_rows,
            skipped_rows,
            imported_at: Utc::now(),
        };

        info!(
            batch_id = %batch.batch_id,
            total = total_rows,
            success = success_rows,
            skipped = skipped_rows,
            "SKU 主数据导入完成"
        );

        Ok(batch)
    }

    // ==========================================
    // 销售参照表导入
    // ==========================================

    /// 导入销售参照表文件（安全库存表: 日均销量/提前期/XYZ/MOQ/供应商）
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_reference_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportBatch> {
        let path = file_path.as_ref();
        let rows = self
            .parser
            .parse(path)
            .map_err(|e| ImportError::FileReadError(e.to_string()))?;

        let total_rows = rows.len();
        let mut references: Vec<SalesReference> = Vec::with_capacity(total_rows);
        let mut skipped_rows = 0usize;

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 2;
            let raw = self.mapper.map_to_raw_sku(row, row_number);

            // 参照表同样以 sku_id 为阻断项
            let sku_id = match &raw.sku_id {
                Some(id) if !id.trim().is_empty() => id.trim().to_string(),
                _ => {
                    warn!(row = row_number, "参照表行缺少 sku_id，跳过");
                    skipped_rows += 1;
                    continue;
                }
            };

            // 复用清洗口径: 销量缺失→0，提前期缺失→30，MOQ 非正→无约束
            let cleaned = match self.cleaner.clean(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(row = row_number, error = %e, "DQ 不合格，跳过该行");
                    skipped_rows += 1;
                    continue;
                }
            };

            references.push(SalesReference {
                sku_id,
                daily_avg_sales: cleaned.daily_avg_sales,
                lead_time_days: cleaned.lead_time_days,
                xyz_grade: cleaned.xyz_grade,
                moq: cleaned.moq,
                supplier: cleaned.supplier,
            });
        }

        let success_rows = self
            .reference_repo
            .batch_upsert(references)
            .map_err(|e| ImportError::DatabaseWriteError(e.to_string()))?;

        let batch = ImportBatch {
            batch_id: Uuid::new_v4().to_string(),
            file_name: path.file_name().map(|n| n.to_string_lossy().to_string()),
            total_rows,
            success_rows,
            skipped_rows,
            imported_at: Utc::now(),
        };

        info!(
            batch_id = %batch.batch_id,
            total = total_rows,
            success = success_rows,
            skipped = skipped_rows,
            "销售参照表导入完成"
        );

        Ok(batch)
    }
}
