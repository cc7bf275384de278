use crate::*;
use assert_cmd::prelude::*;
use bucketry::error::Result;
use bucketry::storage::StorageClient;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_upload_files_into_folder,
        test_upload_missing_file_fails,
        e2e_test_put_command_reports_progress,
        e2e_test_put_command_multiple_files,
        e2e_test_put_command_empty_file,
        e2e_test_put_command_missing_file
    ));
}

async fn test_upload_files_into_folder(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;
    let (path, content) = TEST_FIXTURE.new_local_file("data.bin", 1..4 * 1024 * 1024);

    let keys = client.upload_files(&bucket, &[&path], "reports").await?;

    assert_eq!(keys, vec!["reports/data.bin"]);
    let uploaded = client.operator(&bucket)?.read("reports/data.bin").await?;
    assert_eq!(uploaded.to_vec(), content);
    Ok(())
}

async fn test_upload_missing_file_fails(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;
    let missing = TEST_FIXTURE.new_local_path("missing.txt");

    let err = client
        .upload_files(&bucket, &[&missing], "")
        .await
        .expect_err("upload of a missing file must fail");

    assert!(err.to_string().contains("Path does not exist"), "{err}");
    Ok(())
}

async fn e2e_test_put_command_reports_progress(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;
    let (path, content) = TEST_FIXTURE.new_local_file("small.txt", 100..5000);

    bucketry_cmd()
        .arg("put")
        .arg(&bucket)
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Uploading:")
                .and(predicate::str::contains("Progress: 100.00%"))
                .and(predicate::str::contains("✅ Upload:")),
        );

    let uploaded = client.operator(&bucket)?.read("small.txt").await?;
    assert_eq!(uploaded.to_vec(), content);
    Ok(())
}

async fn e2e_test_put_command_multiple_files(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;
    let (first, _) = TEST_FIXTURE.new_local_file("one.txt", 10..100);
    let (second, _) = TEST_FIXTURE.new_local_file("two.txt", 10..100);

    bucketry_cmd()
        .arg("put")
        .arg(&bucket)
        .arg(&first)
        .arg(&second)
        .arg("--folder")
        .arg("docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 / 2:").and(predicate::str::contains("2 / 2:")));

    let files = client.list_files(&bucket, Some("docs")).await?;
    assert!(files.contains(&"one.txt".to_string()));
    assert!(files.contains(&"two.txt".to_string()));
    Ok(())
}

async fn e2e_test_put_command_empty_file(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;
    let (path, _) = TEST_FIXTURE.new_local_file("empty.txt", 0..0);

    bucketry_cmd()
        .arg("put")
        .arg(&bucket)
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 100.00%"));

    let meta = client.operator(&bucket)?.stat("empty.txt").await?;
    assert_eq!(meta.content_length(), 0);
    Ok(())
}

async fn e2e_test_put_command_missing_file(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket(&client).await?;
    let missing = TEST_FIXTURE.new_local_path("missing.txt");

    bucketry_cmd()
        .arg("put")
        .arg(&bucket)
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path does not exist"));
    Ok(())
}
