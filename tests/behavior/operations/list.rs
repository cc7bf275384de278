use crate::*;
use assert_cmd::prelude::*;
use bucketry::error::Result;
use bucketry::storage::{CreateBucketOutcome, StorageClient};
use predicates::prelude::*;
use uuid::Uuid;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_list_files_in_folder,
        test_list_files_at_root,
        test_list_folders,
        test_list_empty_bucket,
        test_list_missing_bucket_does_not_create_it,
        e2e_test_ls_command_filters_folder,
        e2e_test_folders_command,
        e2e_test_ls_command_missing_bucket
    ));
}

async fn seed_bucket(client: &StorageClient) -> Result<String> {
    let bucket = TEST_FIXTURE.new_bucket(client).await?;
    let op = client.operator(&bucket)?;
    op.create_dir("a/").await?;
    op.write("a/x.txt", "x").await?;
    op.write("b.txt", "b").await?;
    Ok(bucket)
}

async fn test_list_files_in_folder(client: StorageClient) -> Result<()> {
    let bucket = seed_bucket(&client).await?;

    assert_eq!(client.list_files(&bucket, Some("a")).await?, vec!["x.txt"]);
    Ok(())
}

async fn test_list_files_at_root(client: StorageClient) -> Result<()> {
    let bucket = seed_bucket(&client).await?;

    assert_eq!(client.list_files(&bucket, None).await?, vec!["b.txt"]);
    Ok(())
}

async fn test_list_folders(client: StorageClient) -> Result<()> {
    let bucket = seed_bucket(&client).await?;
    client.operator(&bucket)?.create_dir("c/d/").await?;

    let mut folders = client.list_folders(&bucket).await?;
    folders.sort();

    assert_eq!(folders, vec!["a/", "c/", "c/d/"]);
    Ok(())
}

async fn test_list_empty_bucket(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;

    assert!(client.list_keys(&bucket).await?.is_empty());
    assert!(client.list_files(&bucket, None).await?.is_empty());
    Ok(())
}

async fn test_list_missing_bucket_does_not_create_it(client: StorageClient) -> Result<()> {
    let ghost = format!("ghost-{}", Uuid::new_v4());

    let err = client
        .list_files(&ghost, None)
        .await
        .expect_err("listing a missing bucket must fail");

    assert!(err.to_string().contains("Bucket does not exist"), "{err}");
    assert!(!client.list_buckets().await?.contains(&ghost));
    assert_eq!(client.create_bucket(&ghost).await?, CreateBucketOutcome::Created);
    Ok(())
}

async fn e2e_test_ls_command_filters_folder(client: StorageClient) -> Result<()> {
    let bucket = seed_bucket(&client).await?;

    bucketry_cmd()
        .arg("ls")
        .arg(&bucket)
        .arg("a")
        .assert()
        .success()
        .stdout(predicate::str::contains("x.txt").and(predicate::str::contains("b.txt").not()));

    bucketry_cmd()
        .arg("ls")
        .arg(&bucket)
        .assert()
        .success()
        .stdout(predicate::str::contains("b.txt").and(predicate::str::contains("x.txt").not()));
    Ok(())
}

async fn e2e_test_folders_command(client: StorageClient) -> Result<()> {
    let bucket = seed_bucket(&client).await?;

    bucketry_cmd()
        .arg("folders")
        .arg(&bucket)
        .assert()
        .success()
        .stdout(predicate::str::contains("a/").and(predicate::str::contains("b.txt").not()));
    Ok(())
}

async fn e2e_test_ls_command_missing_bucket(_client: StorageClient) -> Result<()> {
    let ghost = format!("ghost-{}", Uuid::new_v4());

    bucketry_cmd()
        .arg("ls")
        .arg(&ghost)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bucket does not exist"));

    bucketry_cmd()
        .arg("buckets")
        .assert()
        .success()
        .stdout(predicate::str::contains(ghost.as_str()).not());
    Ok(())
}
