// ==========================================
// 导入管道端到端测试
// ==========================================
// 职责: 验证 CSV 文件 → 解析 → 映射 → 清洗 → 仓储 的完整导入链路
// ==========================================

use smart_procurement::db::{initialize_schema, open_sqlite_connection};
use smart_procurement::domain::types::AbcGrade;
use smart_procurement::importer::SkuImporter;
use smart_procurement::repository::{SalesReferenceRepository, SkuMasterRepository};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct TestContext {
    importer: SkuImporter,
    sku_repo: Arc<SkuMasterRepository>,
    reference_repo: Arc<SalesReferenceRepository>,
    temp_dir: TempDir,
}

fn setup() -> TestContext {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("import_test.db");

    let conn = open_sqlite_connection(db_path.to_str().unwrap()).unwrap();
    initialize_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    let sku_repo = Arc::new(SkuMasterRepository::from_connection(conn.clone()));
    let reference_repo = Arc::new(SalesReferenceRepository::from_connection(conn));
    let importer = SkuImporter::new(sku_repo.clone(), reference_repo.clone());

    TestContext {
        importer,
        sku_repo,
        reference_repo,
        temp_dir,
    }
}

fn write_csv(ctx: &TestContext, name: &str, content: &str) -> std::path::PathBuf {
    let path = ctx.temp_dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_sku_csv_import_end_to_end() {
    let ctx = setup();

    // 韩文 PSI 表头
    let path = write_csv(
        &ctx,
        "sku.csv",
        "SKU코드,제품명,ABC등급,현재고,안전재고,매입원가\n\
         SKU-001,아메리카노 원두,A,120,40,1500\n\
         SKU-002,필터,C,0,10,200\n",
    );

    let batch = ctx.importer.import_sku_file(&path).unwrap();
    assert_eq!(batch.total_rows, 2);
    assert_eq!(batch.success_rows, 2);
    assert_eq!(batch.skipped_rows, 0);

    let records = ctx.sku_repo.list_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sku_id, "SKU-001");
    assert_eq!(records[0].abc_grade, AbcGrade::A);
    assert_eq!(records[0].current_stock, 120.0);
    assert_eq!(records[0].unit_cost, 1500.0);
    // 导入层不提供的字段补安全默认
    assert_eq!(records[0].daily_avg_sales, 0.0);
    assert_eq!(records[0].lead_time_days, 30);
}

#[test]
fn test_import_skips_bad_rows_but_continues() {
    let ctx = setup();

    // 第 3 行缺主键 → 跳过，其余行照常导入
    let path = write_csv(
        &ctx,
        "sku.csv",
        "SKU코드,제품명,ABC등급,현재고\n\
         SKU-001,원두,A,120\n\
         ,무명품목,B,50\n\
         SKU-003,컵,C,abc\n",
    );

    let batch = ctx.importer.import_sku_file(&path).unwrap();
    assert_eq!(batch.total_rows, 3);
    assert_eq!(batch.success_rows, 2);
    assert_eq!(batch.skipped_rows, 1);

    // 非法数值按缺失清洗为 0，不阻断
    let record = ctx.sku_repo.get_by_id("SKU-003").unwrap();
    assert_eq!(record.current_stock, 0.0);
    assert_eq!(record.abc_grade, AbcGrade::C);
}

#[test]
fn test_reference_csv_import() {
    let ctx = setup();

    let path = write_csv(
        &ctx,
        "reference.csv",
        "SKU코드,일평균판매,리드타임,XYZ등급,MOQ,공급업체\n\
         SKU-001,5.5,15,Y,24,커피상사\n\
         SKU-002,0,,Z,,\n",
    );

    let batch = ctx.importer.import_reference_file(&path).unwrap();
    assert_eq!(batch.success_rows, 2);

    let references = ctx.reference_repo.list_all().unwrap();
    assert_eq!(references.len(), 2);

    assert_eq!(references[0].daily_avg_sales, 5.5);
    assert_eq!(references[0].lead_time_days, 15);
    assert_eq!(references[0].moq, Some(24.0));
    assert_eq!(references[0].supplier.as_deref(), Some("커피상사"));

    // 缺失口径: 提前期 → 30，MOQ → 无约束
    assert_eq!(references[1].lead_time_days, 30);
    assert_eq!(references[1].moq, None);
}

#[test]
fn test_import_missing_file_fails() {
    let ctx = setup();
    let result = ctx
        .importer
        .import_sku_file(ctx.temp_dir.path().join("nope.csv"));
    assert!(result.is_err());
}
