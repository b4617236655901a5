//! Import pipeline against a real database.

use ngo_impact_lib::error::{AppError, ImportError};
use ngo_impact_lib::models::{DashboardStats, JobProgress, JobStatus, NewReport, Region};
use ngo_impact_lib::services::{run_import, spawn_import};
use uuid::Uuid;

use super::test_helpers::{assert_terminal, create_test_context, job_snapshot, wait_for_job};

const THREE_ROWS: &str = "ngoId,month,peopleHelped,eventsConducted,fundsUtilized,region\n\
NGO1,2024-01,100,5,1500.5,North\n\
,2024-01,50,2,200,South\n\
NGO3,2024-01,75,3,900,East\n";

#[tokio::test]
async fn test_mixed_rows_complete_with_row_errors() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();
    let path = ctx.write_csv("three.csv", THREE_ROWS);

    let progress = run_import(&ctx.pool, &path, job_id, None).await.unwrap();
    assert_eq!(progress.processed, 2);
    assert_eq!(progress.failed, 1);

    let job = job_snapshot(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Completed);
    assert_eq!(job.total_rows, 3);
    assert_eq!(job.processed_rows, 2);
    assert_eq!(job.failed_rows, 1);
    assert_eq!(job.processed_rows + job.failed_rows, job.total_rows);

    assert_eq!(job.errors.len(), 1);
    assert_eq!(job.errors[0].row, Some(2));
    assert_eq!(job.errors[0].message, "Missing ngoId or month");
    let data = job.errors[0].data.as_ref().unwrap();
    assert_eq!(data["peopleHelped"], "50");

    let reports = ctx.pool.get_reports_by_job_id(job_id, 100).await.unwrap();
    assert_eq!(reports.len(), 2);

    let ngo1 = ctx
        .pool
        .get_report_by_key("NGO1", "2024-01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ngo1.people_helped, 100);
    assert_eq!(ngo1.funds_utilized, 1500.5);
    assert_eq!(ngo1.region, "North");

    assert!(!path.exists(), "source file should be removed");
}

#[tokio::test]
async fn test_reimport_keeps_one_report_per_key() {
    let ctx = create_test_context().await;

    let first = Uuid::now_v7();
    ctx.pool.insert_import_job(first).await.unwrap();
    let path = ctx.write_csv("first.csv", "ngoId,month,peopleHelped\nNGO1,2024-02,10\n");
    run_import(&ctx.pool, &path, first, None).await.unwrap();

    let original = ctx
        .pool
        .get_report_by_key("NGO1", "2024-02")
        .await
        .unwrap()
        .unwrap();

    let second = Uuid::now_v7();
    ctx.pool.insert_import_job(second).await.unwrap();
    let path = ctx.write_csv("second.csv", "ngoId,month,peopleHelped\nNGO1,2024-02,25\n");
    run_import(&ctx.pool, &path, second, None).await.unwrap();

    assert_eq!(ctx.pool.count_reports_by_key("NGO1", "2024-02").await.unwrap(), 1);

    let updated = ctx
        .pool
        .get_report_by_key("NGO1", "2024-02")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.people_helped, 25);
    assert_eq!(updated.job_id, Some(second));
}

#[tokio::test]
async fn test_duplicate_keys_in_one_file_collapse() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();
    let path = ctx.write_csv(
        "dupes.csv",
        "ngoId,month,peopleHelped\nNGO1,2024-03,1\nNGO1,2024-03,2\nNGO1,2024-03,3\n",
    );

    let progress = run_import(&ctx.pool, &path, job_id, None).await.unwrap();

    assert_eq!(progress.processed, 3);
    assert_eq!(ctx.pool.count_reports_by_key("NGO1", "2024-03").await.unwrap(), 1);
    let report = ctx
        .pool
        .get_report_by_key("NGO1", "2024-03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.people_helped, 3);
}

#[tokio::test]
async fn test_default_region_applies_to_empty_cells() {
    let ctx = create_test_context().await;
    let csv = "ngoId,month,region\nNGO1,2024-04,\nNGO2,2024-04,West\n";

    let with_default = Uuid::now_v7();
    ctx.pool.insert_import_job(with_default).await.unwrap();
    let path = ctx.write_csv("north.csv", csv);
    run_import(&ctx.pool, &path, with_default, Some(Region::North))
        .await
        .unwrap();

    let ngo1 = ctx.pool.get_report_by_key("NGO1", "2024-04").await.unwrap().unwrap();
    let ngo2 = ctx.pool.get_report_by_key("NGO2", "2024-04").await.unwrap().unwrap();
    assert_eq!(ngo1.region, "North");
    assert_eq!(ngo2.region, "West");

    let without_default = Uuid::now_v7();
    ctx.pool.insert_import_job(without_default).await.unwrap();
    let path = ctx.write_csv("south.csv", "ngoId,month,region\nNGO3,2024-04,\n");
    run_import(&ctx.pool, &path, without_default, None).await.unwrap();

    let ngo3 = ctx.pool.get_report_by_key("NGO3", "2024-04").await.unwrap().unwrap();
    assert_eq!(ngo3.region, "South");
}

#[tokio::test]
async fn test_unreadable_file_fails_job() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();
    let path = ctx.upload_dir.join("missing.csv");

    let result = run_import(&ctx.pool, &path, job_id, None).await;
    assert!(matches!(result, Err(ImportError::Stream(_))));

    let job = job_snapshot(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Failed);
    assert_eq!(job.total_rows, 0);
    assert_eq!(job.processed_rows, 0);
    assert_eq!(job.failed_rows, 0);
    assert_eq!(job.errors.len(), 1);
    assert_eq!(job.errors[0].row, None);
    assert!(job.errors[0].data.is_none());
    assert_eq!(job.errors[0].message, "Failed to read CSV file");
    assert!(!job.errors[0].message.contains("missing.csv"));
}

#[tokio::test]
async fn test_corrupt_file_fails_before_any_write() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();

    let mut bytes = b"ngoId,month\nNGO1,2024-05\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b',', b'x', b'\n']);
    let path = ctx.upload_dir.join("corrupt.csv");
    std::fs::write(&path, bytes).unwrap();

    let result = run_import(&ctx.pool, &path, job_id, None).await;
    assert!(result.is_err());

    let job = job_snapshot(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Failed);
    assert!(ctx.pool.get_report_by_key("NGO1", "2024-05").await.unwrap().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_header_only_file_completes_with_zero_rows() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();
    let path = ctx.write_csv("empty.csv", "ngoId,month,peopleHelped\n");

    let progress = run_import(&ctx.pool, &path, job_id, None).await.unwrap();
    assert_eq!(progress, JobProgress::default());

    let job = job_snapshot(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Completed);
    assert_eq!(job.total_rows, 0);
    assert!(job.errors.is_empty());
}

#[tokio::test]
async fn test_terminal_job_rejects_writes() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();
    let path = ctx.write_csv("done.csv", "ngoId,month\nNGO1,2024-06\n");
    run_import(&ctx.pool, &path, job_id, None).await.unwrap();

    let restart = ctx.pool.start_import_job(job_id, 10).await;
    assert!(matches!(restart, Err(AppError::InvalidInput(_))));

    let fail = ctx.pool.fail_import_job(job_id, "late failure").await;
    assert!(matches!(fail, Err(AppError::InvalidInput(_))));

    let job = job_snapshot(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Completed);
    assert_eq!(job.total_rows, 1);
}

#[tokio::test]
async fn test_unknown_job_cannot_be_started() {
    let ctx = create_test_context().await;

    let result = ctx.pool.start_import_job(Uuid::now_v7(), 1).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_progress_is_visible_after_large_import() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();

    let mut csv = String::from("ngoId,month,peopleHelped\n");
    for i in 0..25 {
        if i % 5 == 4 {
            csv.push_str(",2024-07,1\n");
        } else {
            csv.push_str(&format!("NGO{},2024-07,{}\n", i, i));
        }
    }
    let path = ctx.write_csv("large.csv", &csv);

    spawn_import(ctx.pool.clone(), path, job_id, None)
        .await
        .unwrap();

    let job = wait_for_job(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Completed);
    assert_eq!(job.total_rows, 25);
    assert_eq!(job.processed_rows, 20);
    assert_eq!(job.failed_rows, 5);
    let rows: Vec<_> = job.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![Some(5), Some(10), Some(15), Some(20), Some(25)]);
}

#[tokio::test]
async fn test_free_form_month_and_long_ngo_id_are_stored() {
    let ctx = create_test_context().await;
    let job_id = Uuid::now_v7();
    ctx.pool.insert_import_job(job_id).await.unwrap();
    let long_ngo = "N".repeat(300);
    let csv = format!(
        "ngoId,month,peopleHelped\nNGO1,January 2024,5\nNGO2,2024-01-15,6\n{},2024-01,7\n",
        long_ngo
    );
    let path = ctx.write_csv("months.csv", &csv);

    let progress = run_import(&ctx.pool, &path, job_id, None).await.unwrap();
    assert_eq!(progress.processed, 3);
    assert_eq!(progress.failed, 0);

    let january = ctx
        .pool
        .get_report_by_key("NGO1", "January 2024")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(january.people_helped, 5);
    assert!(ctx.pool.get_report_by_key(&long_ngo, "2024-01").await.unwrap().is_some());
}

#[tokio::test]
async fn test_concurrent_imports_keep_one_report_per_key() {
    let ctx = create_test_context().await;

    let mut csv = String::from("ngoId,month,peopleHelped\n");
    for i in 0..40 {
        csv.push_str(&format!("NGO{},2024-08,{}\n", i, i));
    }

    let mut job_ids = Vec::new();
    let mut handles = Vec::new();
    for n in 0..6 {
        let job_id = Uuid::now_v7();
        ctx.pool.insert_import_job(job_id).await.unwrap();
        let path = ctx.write_csv(&format!("concurrent-{}.csv", n), &csv);
        handles.push(spawn_import(ctx.pool.clone(), path, job_id, None));
        job_ids.push(job_id);
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for job_id in job_ids {
        let job = wait_for_job(&ctx.pool, job_id).await;
        assert_terminal(&job, JobStatus::Completed);
        assert_eq!(job.processed_rows, 40);
        assert_eq!(job.failed_rows, 0);
    }

    for i in 0..40 {
        let ngo = format!("NGO{}", i);
        assert_eq!(ctx.pool.count_reports_by_key(&ngo, "2024-08").await.unwrap(), 1);
    }
}

#[tokio::test]
async fn test_dashboard_aggregates() {
    let ctx = create_test_context().await;
    let reports = [
        ("A", "2024-01", 10, 1, 100.0, Region::North),
        ("B", "2024-01", 20, 2, 200.5, Region::South),
        ("C", "2024-02", 30, 3, 300.0, Region::North),
    ];
    for (ngo, month, people, events, funds, region) in reports {
        ctx.pool
            .upsert_report(
                &NewReport {
                    ngo_id: ngo.to_string(),
                    month: month.to_string(),
                    people_helped: people,
                    events_conducted: events,
                    funds_utilized: funds,
                    region,
                },
                None,
            )
            .await
            .unwrap();
    }

    let all = ctx.pool.dashboard_stats(None, None).await.unwrap();
    assert_eq!(all.total_ngos, 3);
    assert_eq!(all.total_people_helped, 60);
    assert_eq!(all.total_events_conducted, 6);
    assert_eq!(all.total_funds_utilized, 600.5);

    let january = ctx
        .pool
        .dashboard_stats(Some("2024-01"), Some(Region::All))
        .await
        .unwrap();
    assert_eq!(january.total_ngos, 2);
    assert_eq!(january.total_people_helped, 30);

    let north = ctx.pool.dashboard_stats(None, Some(Region::North)).await.unwrap();
    assert_eq!(north.total_ngos, 2);
    assert_eq!(north.total_people_helped, 40);

    let none = ctx.pool.dashboard_stats(Some("1999-01"), None).await.unwrap();
    assert_eq!(none, DashboardStats::default());

    let regions = ctx.pool.distinct_regions().await.unwrap();
    assert_eq!(regions, vec!["North".to_string(), "South".to_string()]);
}
