use anyhow::{Context, Result};
use api_client::models::{ManagementType, NewProject, StorageService};
use api_client::FileDeckClient;
use clap::Subcommand;

use super::{cancel_on_ctrl_c, completed, or_dash, require_login};
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum ProjectsCmd {
    /// List every project
    List,
    /// Show the storage services a project can use
    Services,
    /// Create a project
    Create {
        #[arg(long)]
        title: String,
        /// One of S3, B2, GCS, DIGITAL_OCEAN, LINODE, MinIO, AZURE, R2
        #[arg(long)]
        service: StorageService,
        #[arg(long, default_value = "MANAGED")]
        management: ManagementType,
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        region: String,
        /// Access key (custom projects only)
        #[arg(long, default_value = "")]
        key: String,
        #[arg(long, default_value = "")]
        secret_key: String,
    },
}

pub async fn run(client: &FileDeckClient, cmd: ProjectsCmd, out: &Output) -> Result<()> {
    match cmd {
        ProjectsCmd::Services => {
            let rows: Vec<Vec<String>> = StorageService::ALL
                .iter()
                .map(|s| vec![s.as_str().to_string(), s.display_name().to_string()])
                .collect();
            out.table(&["SERVICE", "NAME"], rows);
        }
        ProjectsCmd::List => {
            require_login(client)?;
            let cancel = cancel_on_ctrl_c();
            let outcome = client
                .projects()
                .list_all(client.page_limit(), &cancel)
                .await
                .context("list projects")?;
            let Some(projects) = completed(outcome) else {
                return Ok(());
            };
            if out.is_json() {
                return out.json(&projects);
            }

            let rows: Vec<Vec<String>> = projects
                .iter()
                .map(|p| {
                    vec![
                        p.title.clone(),
                        p.service_name().to_string(),
                        p.management_type.clone(),
                        or_dash(p.bucket_name.as_deref()),
                        or_dash(p.region.as_deref()),
                    ]
                })
                .collect();
            out.table(&["TITLE", "SERVICE", "MANAGEMENT", "BUCKET", "REGION"], rows);
        }
        ProjectsCmd::Create {
            title,
            service,
            management,
            bucket,
            region,
            key,
            secret_key,
        } => {
            require_login(client)?;
            let project = NewProject {
                title: title.trim().to_string(),
                compatibility_services: service,
                management_type: management,
                key,
                secret_key,
                bucket_name: bucket.trim().to_string(),
                region: region.trim().to_string(),
            };
            let name = project.title.clone();
            client.projects().create(project).await.context("create project")?;
            println!("Project {} created on {}.", name, service.display_name());
        }
    }
    Ok(())
}
