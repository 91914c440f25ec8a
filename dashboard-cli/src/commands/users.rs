use anyhow::{Context, Result};
use api_client::models::{NewUser, UserType};
use api_client::FileDeckClient;
use clap::Subcommand;

use super::{cancel_on_ctrl_c, completed, or_dash, require_login};
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum UsersCmd {
    /// List every user
    List,
    /// Add a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// USER or ADMIN
        #[arg(long, default_value = "USER")]
        user_type: UserType,
    },
}

pub async fn run(client: &FileDeckClient, cmd: UsersCmd, out: &Output) -> Result<()> {
    require_login(client)?;

    match cmd {
        UsersCmd::List => {
            let cancel = cancel_on_ctrl_c();
            let outcome = client
                .users()
                .list_all(client.page_limit(), &cancel)
                .await
                .context("list users")?;
            let Some(users) = completed(outcome) else {
                return Ok(());
            };
            if out.is_json() {
                return out.json(&users);
            }

            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|u| {
                    vec![
                        u.full_name.clone(),
                        u.email.clone(),
                        u.service.join(", "),
                        or_dash(u.role.as_deref()),
                        or_dash(u.status.as_deref()),
                        or_dash(u.last_login.as_deref()),
                    ]
                })
                .collect();
            out.table(&["NAME", "EMAIL", "SERVICES", "ROLE", "STATUS", "LAST LOGIN"], rows);
        }
        UsersCmd::Add {
            name,
            email,
            phone,
            user_type,
        } => {
            let user = NewUser::new(name, email)
                .with_phone(phone)
                .with_user_type(user_type);
            let email = user.email.trim().to_string();
            client.users().add(user).await.context("add user")?;
            println!("User {} added.", email);
        }
    }
    Ok(())
}
