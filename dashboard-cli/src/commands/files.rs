use std::path::PathBuf;

use anyhow::{Context, Result};
use api_client::utils::{format_date, format_file_size, TagPalette};
use api_client::{
    FileDeckClient, LocalFile, ProgressReporter, UploadOptions, UploadQueue, UploadStatus, UploadTask,
};
use clap::Subcommand;

use super::{cancel_on_ctrl_c, completed, confirm, or_dash, require_login};
use crate::output::{Cell, Output};

#[derive(Subcommand, Debug)]
pub enum FilesCmd {
    /// List every file
    List,
    /// Upload local files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Registered as the file type instead of the MIME subtype
        #[arg(long)]
        category: Option<String>,
        /// May be given more than once
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show file details
    Info { id: i64 },
    /// Download a file
    Download {
        id: i64,
        /// Destination path (defaults to the stored file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a file
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Prints one line per progress update
struct LineReporter {
    total: usize,
}

impl ProgressReporter for LineReporter {
    fn report(&self, index: usize, task: &UploadTask) {
        let position = format!("[{}/{}]", index + 1, self.total);
        match &task.status {
            UploadStatus::Failed(e) => println!("{} {} failed: {}", position, task.file.name(), e),
            UploadStatus::Completed => println!(
                "{} {} uploaded (id {})",
                position,
                task.file.name(),
                task.remote_id.map(|id| id.to_string()).unwrap_or_default()
            ),
            _ => println!("{} {} {:>3}%", position, task.file.name(), task.progress),
        }
    }
}

pub async fn run(client: &FileDeckClient, cmd: FilesCmd, out: &Output) -> Result<()> {
    require_login(client)?;

    match cmd {
        FilesCmd::List => {
            let cancel = cancel_on_ctrl_c();
            let outcome = client
                .files()
                .list_all(client.page_limit(), &cancel)
                .await
                .context("list files")?;
            let Some(files) = completed(outcome) else {
                return Ok(());
            };
            if out.is_json() {
                return out.json(&files);
            }

            let mut palette = TagPalette::new();
            let rows: Vec<Vec<Cell>> = files
                .iter()
                .map(|f| {
                    vec![
                        f.id.to_string().into(),
                        f.name.clone().into(),
                        f.size.map(format_file_size).unwrap_or_else(|| or_dash(None)).into(),
                        or_dash(Some(f.file_type.as_str())).into(),
                        or_dash(f.category.as_deref()).into(),
                        out.tags(&mut palette, &f.tags),
                        f.updated_at.as_deref().map(format_date).unwrap_or_else(|| or_dash(None)).into(),
                    ]
                })
                .collect();
            out.table(&["ID", "NAME", "SIZE", "TYPE", "CATEGORY", "TAGS", "MODIFIED"], rows);
        }
        FilesCmd::Upload {
            paths,
            category,
            tags,
        } => {
            let mut queue = UploadQueue::new();
            for path in &paths {
                let file = LocalFile::from_path(path)
                    .await
                    .with_context(|| format!("open {}", path.display()))?;
                queue.add(file);
            }

            let mut options = UploadOptions::default().with_tags(tags);
            if let Some(category) = category {
                options = options.with_category(category);
            }

            let reporter = LineReporter { total: queue.len() };
            let report = queue
                .upload(&client.files().uploader(), &options, &reporter)
                .await
                .context("upload files")?;

            if out.is_json() {
                let ids: Vec<i64> = report.uploaded.iter().map(|f| f.id).collect();
                return out.json(&serde_json::json!({
                    "uploaded": ids,
                    "failed": report.failed.iter().map(|i| paths[*i].display().to_string()).collect::<Vec<_>>(),
                }));
            }
            println!(
                "{} of {} files uploaded, {} failed.",
                report.uploaded.len(),
                report.attempted(),
                report.failed.len()
            );
        }
        FilesCmd::Info { id } => {
            let info = client.files().info(id).await.context("load file info")?;
            if out.is_json() {
                return out.json(&info);
            }
            println!("Name:        {}", info.file_name);
            println!("Type:        {}", or_dash(info.content_type.as_deref()));
            if let Some(size) = info.size {
                println!("Size:        {}", format_file_size(size));
            }
            println!("Uploaded by: {}", or_dash(info.uploaded_by.as_deref()));
            println!(
                "Uploaded at: {}",
                info.uploaded_at.as_deref().map(format_date).unwrap_or_else(|| or_dash(None))
            );
        }
        FilesCmd::Download { id, output } => {
            let destination = match output {
                Some(path) => path,
                None => {
                    let info = client.files().info(id).await.context("load file info")?;
                    PathBuf::from(&info.file_name)
                        .file_name()
                        .map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from(format!("file-{}", id)))
                }
            };
            let written = client
                .files()
                .download_to(id, &destination)
                .await
                .context("download file")?;
            println!("Saved {} ({}).", destination.display(), format_file_size(written));
        }
        FilesCmd::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete file {}?", id))? {
                println!("Aborted.");
                return Ok(());
            }
            client.files().delete(id).await.context("delete file")?;
            println!("File {} deleted.", id);
        }
    }
    Ok(())
}
