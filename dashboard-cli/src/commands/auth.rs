use anyhow::{Context, Result};
use api_client::models::OTP_LENGTH;
use api_client::FileDeckClient;

use super::prompt;
use crate::output::Output;

pub async fn login(client: &FileDeckClient, email: &str, otp: Option<String>) -> Result<()> {
    let otp = match otp {
        Some(otp) => otp,
        None => {
            client
                .auth()
                .request_otp(email)
                .await
                .context("request one-time password")?;
            prompt(&format!(
                "Enter the {}-digit code sent to {}: ",
                OTP_LENGTH,
                email.trim()
            ))?
        }
    };

    let user = client
        .auth()
        .verify_otp(email, &otp)
        .await
        .context("verify one-time password")?;

    println!("Signed in as {} <{}>", user.full_name, user.email);
    Ok(())
}

pub fn logout(client: &FileDeckClient) -> Result<()> {
    client.auth().logout().context("clear session")?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(client: &FileDeckClient, out: &Output) -> Result<()> {
    match client.context().user().filter(|_| client.context().is_authenticated()) {
        Some(user) if out.is_json() => out.json(&user),
        Some(user) => {
            println!("{} <{}>", user.full_name, user.email);
            if !user.user_type.is_empty() {
                println!("Role: {}", user.user_type);
            }
            Ok(())
        }
        None => {
            println!("Not signed in.");
            Ok(())
        }
    }
}
