#![allow(dead_code)]

use api_client::{AppContext, ClientConfig, FileDeckClient};
use mockito::Matcher;

pub fn client(server_url: &str) -> FileDeckClient {
    client_with_context(server_url, AppContext::ephemeral())
}

pub fn client_with_context(server_url: &str, context: AppContext) -> FileDeckClient {
    let mut config = ClientConfig::default();
    config.api.base_url = server_url.to_string();
    config.api.timeout_seconds = 5;
    FileDeckClient::new(&config, context).expect("client should build")
}

pub fn page_query(page: u32, limit: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("limit".into(), limit.to_string()),
    ])
}
