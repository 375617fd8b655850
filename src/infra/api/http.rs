use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// HTTPクライアントの抽象化トレイト
///
/// このトレイトは、実際のHTTP通信とモック実装の両方を
/// 統一的に扱えるようにするためのインターフェースです。
#[async_trait]
pub trait HttpClient {
    /// 指定されたURLからテキストを取得する
    ///
    /// 2xx以外のステータスはエラーとして返す。
    ///
    /// # Arguments
    /// * `url` - 取得対象のURL
    /// * `timeout_secs` - タイムアウト時間（秒）
    async fn fetch_text(&self, url: &str, timeout_secs: u64) -> Result<String>;
}

/// `reqwest` を使用した本番用のHTTPクライアント実装
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// 新しいHTTPクライアントを作成
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn fetch_text(&self, url: &str, timeout_secs: u64) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .context(format!("HTTPリクエストの送信に失敗: {}", url))?
            .error_for_status()
            .context(format!("HTTPステータスがエラーを示しています: {}", url))?;

        response
            .text()
            .await
            .context("レスポンステキストの取得に失敗")
    }
}

/// モックが返すレスポンス
#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Error(String),
}

/// テスト用のモックHTTPクライアント
///
/// URLごとに定義済みのレスポンスやエラーを返し、
/// 受け付けたリクエストのURLを記録します。
pub struct MockHttpClient {
    responses: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockHttpClient {
    /// 何も登録されていないモッククライアントを作成（未登録URLはエラー）
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 全URLに同じ成功レスポンスを返すモッククライアントを作成
    pub fn new_success(mock_response: &str) -> Self {
        Self {
            fallback: Some(MockResponse::Body(mock_response.to_string())),
            ..Self::new()
        }
    }

    /// 全URLにエラーを返すモッククライアントを作成
    pub fn new_error(error_message: &str) -> Self {
        Self {
            fallback: Some(MockResponse::Error(error_message.to_string())),
            ..Self::new()
        }
    }

    /// 指定URLの成功レスポンスを登録
    pub fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Body(body.to_string()));
        self
    }

    /// 指定URLのエラーを登録
    pub fn with_error(mut self, url: &str, error_message: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            MockResponse::Error(error_message.to_string()),
        );
        self
    }

    /// これまでに要求されたURLの一覧
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// 指定URLが要求された回数
    pub fn request_count(&self, url: &str) -> usize {
        self.requested_urls().iter().filter(|u| *u == url).count()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn fetch_text(&self, url: &str, _timeout_secs: u64) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        match self.responses.get(url).or(self.fallback.as_ref()) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Error(message)) => {
                Err(anyhow::anyhow!("モックHTTPエラー: {}", message))
            }
            None => Err(anyhow::anyhow!("モックHTTPエラー: 未登録のURL {}", url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_http_client_success() {
        let mock_client = MockHttpClient::new_success("<rss>テストXML内容</rss>");

        let result = mock_client
            .fetch_text("https://example.com/rss.xml", 30)
            .await;

        assert!(result.is_ok());
        let response = result.unwrap();
        assert!(response.contains("テストXML内容"));
    }

    #[tokio::test]
    async fn test_mock_http_client_error() {
        let mock_client = MockHttpClient::new_error("接続失敗");

        let result = mock_client
            .fetch_text("https://example.com/rss.xml", 30)
            .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("接続失敗"));
    }

    #[tokio::test]
    async fn test_mock_http_client_per_url() {
        let mock_client = MockHttpClient::new()
            .with_response("https://dr.dk/a", "<p>Aarhus</p>")
            .with_error("https://dr.dk/b", "タイムアウト");

        assert_eq!(
            mock_client.fetch_text("https://dr.dk/a", 10).await.unwrap(),
            "<p>Aarhus</p>"
        );
        assert!(mock_client.fetch_text("https://dr.dk/b", 10).await.is_err());
        let unknown = mock_client.fetch_text("https://dr.dk/c", 10).await;
        assert!(unknown.unwrap_err().to_string().contains("未登録のURL"));

        assert_eq!(mock_client.request_count("https://dr.dk/a"), 1);
        assert_eq!(mock_client.requested_urls().len(), 3);
    }

    /// 軽量オンラインテスト - 実際のHTTP通信での基本接続確認
    #[cfg(feature = "online")]
    #[tokio::test]
    async fn test_http_online_basic() -> Result<(), anyhow::Error> {
        let client = ReqwestHttpClient::new();
        let result = client
            .fetch_text("https://www.dr.dk/nyheder/service/feeds/indland", 10)
            .await;

        match result {
            Ok(content) => {
                assert!(!content.is_empty(), "取得した内容が空");
                assert!(content.contains("<rss"), "RSSコンテンツを含むべき");
                println!("✅ HTTP軽量オンラインテスト成功: {}文字取得", content.len());
            }
            Err(e) => {
                println!("⚠️ HTTPリクエストが失敗: {}", e);
                println!("ネットワーク接続を確認してください");
                // ネットワーク問題の場合は失敗にしない
                return Ok(());
            }
        }

        Ok(())
    }
}
