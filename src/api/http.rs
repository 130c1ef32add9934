//! HTTP client for the game server's REST API.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::wire::{
    BoardResponse, LegalMovesResponse, MoveRequest, MoveResponse, ResetResponse, StartAiResponse,
    TaskStatusResponse,
};
use super::{AiStart, GameApi, MoveVerdict};
use crate::error::ClientError;
use crate::game::{Coord, GameSnapshot, TaskId, TaskState};

/// REST game client.
///
/// The server keys game state off a session cookie, so the underlying
/// `reqwest::Client` keeps a cookie store for its whole lifetime. Clone the
/// client to share the session.
#[derive(Debug, Clone)]
pub struct RestGameClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestGameClient {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip_all)]
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating REST game client");

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client");
                ClientError::transport(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { base_url, client })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let request = self.client.post(&url);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl GameApi for RestGameClient {
    #[instrument(skip(self))]
    async fn fetch_board(&self) -> Result<GameSnapshot, ClientError> {
        let resp: BoardResponse = self.get_json("/board").await?;
        debug!(
            current_player = resp.current_player,
            black = resp.black,
            white = resp.white,
            game_over = resp.game_over,
            "Received board state"
        );
        GameSnapshot::try_from(resp)
    }

    #[instrument(skip(self))]
    async fn fetch_legal_moves(&self) -> Result<Vec<Coord>, ClientError> {
        let resp: LegalMovesResponse = self.get_json("/legal_moves").await?;
        let coords = resp.into_coords();
        debug!(count = coords.len(), "Received legal moves");
        Ok(coords)
    }

    #[instrument(skip(self), fields(coord = %coord))]
    async fn submit_move(&self, coord: Coord) -> Result<MoveVerdict, ClientError> {
        info!("Submitting move");
        let resp: MoveResponse = self
            .post_json("/make_move", Some(&MoveRequest::from(coord)))
            .await?;

        if resp.success {
            info!("Move accepted");
            Ok(MoveVerdict::Accepted)
        } else {
            warn!(reason = ?resp.error, "Move rejected");
            Ok(MoveVerdict::Rejected { reason: resp.error })
        }
    }

    #[instrument(skip(self))]
    async fn start_ai_turn(&self) -> Result<AiStart, ClientError> {
        info!("Starting AI turn");
        let resp: StartAiResponse = self.post_json::<(), _>("/start_ai_move", None).await?;
        let start = AiStart::try_from(resp)?;
        debug!(?start, "AI turn started");
        Ok(start)
    }

    #[instrument(skip(self), fields(task_id = %task))]
    async fn poll_ai_task(&self, task: &TaskId) -> Result<TaskState, ClientError> {
        let resp: TaskStatusResponse = self
            .get_json(&format!("/get_ai_result/{}", task.as_str()))
            .await?;
        debug!(state = %resp.state, player_must_pass = resp.player_must_pass, "Polled AI task");
        Ok(TaskState::from(resp))
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> Result<(), ClientError> {
        info!("Resetting game");
        let resp: ResetResponse = self.post_json::<(), _>("/reset", None).await?;
        match resp.success {
            Some(false) => Err(ClientError::protocol("Server refused to reset the game")),
            _ => Ok(()),
        }
    }
}
