use crate::support::{steam_id, test_config, RecordingPoster, ScriptedClient, Step};
use std::collections::HashSet;
use std::sync::Arc;
use steam_commenter::application::models::target::Target;
use steam_commenter::error::{AppError, AuthError};
use steam_commenter::storage::targets_csv::parse_csv_targets;
use steam_commenter::utils::job::run_job;
use tempfile::tempdir;

#[tokio::test]
async fn test_job_records_failure_and_continues() {
    let dir = tempdir().unwrap();
    let cfg = test_config(dir.path());
    let client = Arc::new(ScriptedClient::new(vec![vec![
        Step::LoggedOn,
        Step::WebSession,
    ]]));
    let poster = Arc::new(RecordingPoster {
        failing: HashSet::from([steam_id(2)]),
        ..RecordingPoster::default()
    });
    let targets = vec![
        Target::new(steam_id(1), "first"),
        Target::new(steam_id(2), ""),
        Target::new(steam_id(3), "third"),
    ];

    let report = run_job(&cfg, client.clone(), poster.clone(), &targets)
        .await
        .unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].steam_id, steam_id(2));
    assert_eq!(client.call_count(), 1);
    assert_eq!(
        *poster.posted.lock().unwrap(),
        vec![
            (steam_id(1), "first".to_string()),
            (steam_id(2), "default".to_string()),
            (steam_id(3), "third".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_job_without_targets_skips_login() {
    let dir = tempdir().unwrap();
    let cfg = test_config(dir.path());
    let client = Arc::new(ScriptedClient::new(vec![]));
    let poster = Arc::new(RecordingPoster::default());

    let report = run_job(&cfg, client.clone(), poster.clone(), &[])
        .await
        .unwrap();

    assert_eq!(report.attempted, 0);
    assert!(report.is_clean());
    assert_eq!(client.call_count(), 0);
    assert!(poster.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_job_login_failure_posts_nothing() {
    let dir = tempdir().unwrap();
    let cfg = test_config(dir.path());
    let client = Arc::new(ScriptedClient::new(vec![vec![Step::Fail(
        "InvalidPassword",
    )]]));
    let poster = Arc::new(RecordingPoster::default());
    let targets = vec![Target::new(steam_id(1), "hi")];

    let err = run_job(&cfg, client, poster.clone(), &targets)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Auth(AuthError::Client(_))));
    assert!(poster.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_job_missing_password_without_stored_key() {
    let dir = tempdir().unwrap();
    let mut cfg = test_config(dir.path());
    cfg.credentials.password = None;
    let client = Arc::new(ScriptedClient::new(vec![]));
    let poster = Arc::new(RecordingPoster::default());
    let targets = vec![Target::new(steam_id(1), "hi")];

    let err = run_job(&cfg, client.clone(), poster, &targets)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Auth(AuthError::MissingPassword)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_job_from_csv_rows() {
    let dir = tempdir().unwrap();
    let cfg = test_config(dir.path());
    let csv = "profile,message\n\
               https://steamcommunity.com/profiles/76561198000000001,hello\n\
               https://steamcommunity.com/id/vanity,skipped\n\
               76561198000000003,\n";
    let targets = parse_csv_targets(csv, &cfg.default_message).unwrap();
    let client = Arc::new(ScriptedClient::new(vec![vec![Step::WebSession]]));
    let poster = Arc::new(RecordingPoster::default());

    let report = run_job(&cfg, client, poster.clone(), &targets)
        .await
        .unwrap();

    assert_eq!(report.attempted, 2);
    assert!(report.is_clean());
    assert_eq!(
        *poster.posted.lock().unwrap(),
        vec![
            (steam_id(1), "hello".to_string()),
            (steam_id(3), "default".to_string()),
        ]
    );
}
