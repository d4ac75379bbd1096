//! HTTP gateway: talks to the board REST service.

use super::PersistenceGateway;
use crate::error::{BoardError, Result};
use crate::types::{Board, BoardId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Error body returned by the service
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct HttpGateway {
    client: Client,
    /// Collection URL, e.g. `http://localhost:5000/api/boards`
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one board. The id is percent-encoded as a single path
    /// segment, so ids containing `/`, `?` or `#` stay opaque.
    fn board_url(&self, id: &BoardId) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BoardError::invalid_value("api_url", e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BoardError::invalid_value("api_url", "cannot hold a board id"))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    /// Turn non-success statuses into errors, keeping the service's message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(BoardError::Http {
            status: status.as_u16(),
            message,
        })
    }

    /// Decode a JSON body; decoding failures are malformed data, not
    /// transport errors
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BoardError::malformed(e.to_string()))
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn create(&self, board: &Board) -> Result<Board> {
        let response = self.client.post(&self.base_url).json(board).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn replace(&self, id: &BoardId, board: &Board) -> Result<Board> {
        let response = self
            .client
            .put(self.board_url(id)?)
            .json(board)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BoardError::BoardNotFound { id: id.to_string() });
        }
        Self::decode(Self::check(response).await?).await
    }

    async fn delete(&self, id: &BoardId) -> Result<()> {
        let response = self.client.delete(self.board_url(id)?).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Board>> {
        let response = self.client.get(&self.base_url).send().await?;
        Self::decode(Self::check(response).await?).await
    }
}
