use crate::error::Result;
use crate::storage::{CreateBucketOutcome, StorageClient};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bucketry")]
#[command(about = "List, create, upload to and download from object storage buckets")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List buckets owned by the account
    Buckets,
    /// Create a bucket
    Mb {
        /// Bucket name
        name: String,
    },
    /// List files directly inside a folder (bucket root by default)
    Ls {
        bucket: String,
        /// Folder to list
        folder: Option<String>,
    },
    /// List folder markers in a bucket
    Folders { bucket: String },
    /// Upload local files
    Put {
        bucket: String,
        /// Local files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Folder the files are stored under
        #[arg(short, long, default_value = "")]
        folder: String,
    },
    /// Download an object
    Get {
        bucket: String,
        /// Object key
        key: String,
        /// Local file or directory
        local: PathBuf,
    },
}

pub async fn run(args: Args, client: StorageClient) -> Result<()> {
    match args.command {
        Command::Buckets => {
            for (i, name) in client.list_buckets().await?.iter().enumerate() {
                println!("-- {}: {name}", i + 1);
            }
        }
        Command::Mb { name } => match client.create_bucket(&name).await? {
            CreateBucketOutcome::Created => println!("Created bucket: {name}"),
            CreateBucketOutcome::AlreadyExists => {
                println!("Bucket already exists: {name}");
            }
        },
        Command::Ls { bucket, folder } => {
            for file in client.list_files(&bucket, folder.as_deref()).await? {
                println!("{file}");
            }
        }
        Command::Folders { bucket } => {
            for folder in client.list_folders(&bucket).await? {
                println!("{folder}");
            }
        }
        Command::Put {
            bucket,
            files,
            folder,
        } => {
            client.upload_files(&bucket, &files, &folder).await?;
        }
        Command::Get { bucket, key, local } => {
            client.download_file(&bucket, &key, &local).await?;
        }
    }
    Ok(())
}
