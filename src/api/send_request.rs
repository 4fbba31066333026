use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use tracing::debug;

use crate::api::search::FetchError;
use crate::config::AppConfig;

/// 按配置构建共享的 HTTP 客户端（固定 UA 与超时）
pub fn build_client(config: &AppConfig) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("创建 HTTP 客户端失败")
}

/// 发送 GET 请求并返回响应正文
///
/// 非 2xx 状态视为失败，不返回空正文
pub async fn send_get_request(client: &Client, url: &str) -> Result<String, FetchError> {
    debug!("GET {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    debug!("响应长度: {} 字节", body.len());
    Ok(body)
}
