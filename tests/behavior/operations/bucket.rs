use crate::*;
use assert_cmd::prelude::*;
use bucketry::error::Result;
use bucketry::storage::{CreateBucketOutcome, StorageClient};
use predicates::prelude::*;
use uuid::Uuid;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_create_bucket_then_list,
        test_create_existing_bucket_is_conflict,
        e2e_test_mb_command_creates_bucket,
        e2e_test_mb_command_reports_existing_bucket,
        e2e_test_buckets_command_lists_buckets
    ));
}

async fn test_create_bucket_then_list(client: StorageClient) -> Result<()> {
    let name = format!("bucket-{}", Uuid::new_v4());

    let outcome = client.create_bucket(&name).await?;

    assert_eq!(outcome, CreateBucketOutcome::Created);
    assert!(client.list_buckets().await?.contains(&name));
    Ok(())
}

async fn test_create_existing_bucket_is_conflict(client: StorageClient) -> Result<()> {
    let name = TEST_FIXTURE.new_bucket(&client).await?;

    let outcome = client.create_bucket(&name).await?;

    assert_eq!(outcome, CreateBucketOutcome::AlreadyExists);
    let count = client
        .list_buckets()
        .await?
        .iter()
        .filter(|b| **b == name)
        .count();
    assert_eq!(count, 1);
    Ok(())
}

async fn e2e_test_mb_command_creates_bucket(client: StorageClient) -> Result<()> {
    let name = format!("bucket-{}", Uuid::new_v4());

    bucketry_cmd()
        .arg("mb")
        .arg(&name)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Created bucket: {name}")));

    assert!(client.list_buckets().await?.contains(&name));
    Ok(())
}

async fn e2e_test_mb_command_reports_existing_bucket(client: StorageClient) -> Result<()> {
    let name = TEST_FIXTURE.new_bucket(&client).await?;

    bucketry_cmd()
        .arg("mb")
        .arg(&name)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Bucket already exists: {name}"
        )));
    Ok(())
}

async fn e2e_test_buckets_command_lists_buckets(client: StorageClient) -> Result<()> {
    let first = TEST_FIXTURE.new_bucket(&client).await?;
    let second = TEST_FIXTURE.new_bucket(&client).await?;

    bucketry_cmd()
        .arg("buckets")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(&first)
                .and(predicate::str::contains(&second))
                .and(predicate::str::contains("-- 1: ")),
        );
    Ok(())
}
