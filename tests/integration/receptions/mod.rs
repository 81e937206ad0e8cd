//! Reception lifecycle tests against the database

use chrono::{Duration, TimeZone, Utc};
use pickup_common::Error;
use pickup_pvz::{DateRange, ReceptionStatus};
use serial_test::serial;
use uuid::Uuid;

use crate::common::TestApp;

#[tokio::test]
#[serial]
async fn test_open_then_close_reception() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;

    let opened_at = Utc.with_ymd_and_hms(2025, 4, 9, 10, 0, 0).unwrap();
    let reception_id = app.pvz.create_reception(pvz.id, Some(opened_at)).await.unwrap();

    let repos = app.pvz.repos();
    let open = repos
        .receptions
        .find_open_by_pvz(&repos.executor(), pvz.id)
        .await
        .unwrap();
    assert_eq!(open.id, reception_id);
    assert_eq!(open.date_time, opened_at);
    assert_eq!(open.status, ReceptionStatus::InProgress);

    let closed_id = app.pvz.close_reception(pvz.id).await.unwrap();
    assert_eq!(closed_id, reception_id);

    let all = repos
        .receptions
        .list_by_pvz(&repos.executor(), pvz.id, DateRange::unbounded())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, ReceptionStatus::Closed);
}

#[tokio::test]
#[serial]
async fn test_second_open_reception_is_rejected() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    let before = app.counter("receptions_created_total");

    app.pvz.create_reception(pvz.id, None).await.unwrap();
    let err = app.pvz.create_reception(pvz.id, None).await.unwrap_err();

    assert!(matches!(err, Error::OpenReceptionExists));
    assert_eq!(app.count("receptions").await, 1);
    assert_eq!(app.counter("receptions_created_total") - before, 1.0);
}

#[tokio::test]
#[serial]
async fn test_new_reception_allowed_after_close() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;

    let first = app.pvz.create_reception(pvz.id, None).await.unwrap();
    app.pvz.close_reception(pvz.id).await.unwrap();
    let second = app.pvz.create_reception(pvz.id, None).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(app.count("receptions").await, 2);
}

#[tokio::test]
#[serial]
async fn test_close_twice_reports_reception_not_found() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;

    app.pvz.create_reception(pvz.id, None).await.unwrap();
    app.pvz.close_reception(pvz.id).await.unwrap();

    let err = app.pvz.close_reception(pvz.id).await.unwrap_err();
    assert!(matches!(err, Error::ReceptionNotFound));
    assert_eq!(err.error_code(), "RECEPTION_NOT_FOUND");
}

#[tokio::test]
#[serial]
async fn test_reception_for_unknown_pvz_is_not_found() {
    let app = TestApp::new().await.unwrap();

    let err = app
        .pvz
        .create_reception(Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(app.count("receptions").await, 0);
}

#[tokio::test]
#[serial]
async fn test_concurrent_opens_leave_exactly_one_reception() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = app.pvz.clone();
            tokio::spawn(async move { service.create_reception(pvz.id, None).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(Error::OpenReceptionExists) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(app.count("receptions").await, 1);
}

#[tokio::test]
#[serial]
async fn test_receptions_filtered_by_inclusive_date_range() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    let base = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap();

    for day in 0..3 {
        app.pvz
            .create_reception(pvz.id, Some(base + Duration::days(day)))
            .await
            .unwrap();
        app.pvz.close_reception(pvz.id).await.unwrap();
    }

    let repos = app.pvz.repos();
    let range = DateRange::new(Some(base + Duration::days(1)), Some(base + Duration::days(2)))
        .unwrap();
    let in_range = repos
        .receptions
        .list_by_pvz(&repos.executor(), pvz.id, range)
        .await
        .unwrap();

    let dates: Vec<_> = in_range.iter().map(|r| r.date_time).collect();
    assert_eq!(dates, vec![base + Duration::days(1), base + Duration::days(2)]);
}
