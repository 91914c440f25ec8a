use anyhow::{Context, Result};
use api_client::utils::{format_date, format_file_size, TagPalette};
use api_client::FileDeckClient;
use clap::Subcommand;

use super::{cancel_on_ctrl_c, completed, or_dash, require_login};
use crate::output::{Cell, Output};

#[derive(Subcommand, Debug)]
pub enum DashboardCmd {
    /// Storage totals
    Stats,
    /// Recently modified files
    Recent,
}

pub async fn run(client: &FileDeckClient, cmd: DashboardCmd, out: &Output) -> Result<()> {
    require_login(client)?;

    match cmd {
        DashboardCmd::Stats => {
            let stats = client.dashboard().stats().await.context("load dashboard stats")?;
            if out.is_json() {
                return out.json(&stats);
            }
            println!("Total size:  {}", format_file_size(stats.total_file_size));
            println!("Folders:     {}", stats.total_folders);
            println!("Categories:  {}", stats.total_categories);
            println!("Tags:        {}", stats.total_tags);
        }
        DashboardCmd::Recent => {
            let cancel = cancel_on_ctrl_c();
            let outcome = client
                .dashboard()
                .recent_files(client.page_limit(), &cancel)
                .await
                .context("load recent files")?;
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
                        out.tags(&mut palette, &f.tags),
                        f.updated_at.as_deref().map(format_date).unwrap_or_else(|| or_dash(None)).into(),
                    ]
                })
                .collect();
            out.table(&["ID", "NAME", "SIZE", "TAGS", "MODIFIED"], rows);
        }
    }
    Ok(())
}
