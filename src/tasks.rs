//! Background tasks for backend calls.
//!
//! The main loop never awaits the backend directly:
//! 1. The app queues a pending request
//! 2. The main loop hands it to `TaskSpawner`, which spawns a tokio task
//! 3. The task sends an `ApiMessage` through the channel when done
//! 4. The main loop drains the channel with `try_recv()` and feeds the app
//!
//! Lookups run concurrently and may finish in any order; each result
//! carries the token it was issued with.

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::types::{Candidate, SimulationChart, SimulationOption, SimulationRequest};
use crate::api::{ApiError, SimClient};
use crate::error::AppError;
use crate::ui::components::LookupToken;

/// Messages sent from background tasks to the main event loop.
///
/// Errors cross the channel as the message to show the user.
#[derive(Debug)]
pub enum ApiMessage {
    /// Ticker lookup finished.
    TickersSearched {
        token: LookupToken,
        result: Result<Vec<Candidate>, String>,
    },

    /// Simulation catalogue loaded.
    SimulationsFetched(Result<Vec<SimulationOption>, String>),

    /// Simulation run finished.
    SimulationFinished(Result<SimulationChart, String>),

    /// Result cache cleared; carries the server's confirmation.
    CacheCleared(Result<String, String>),

    /// Market-data cache deleted; carries the server's confirmation.
    DataCacheDeleted(Result<String, String>),
}

fn user_message(e: ApiError) -> String {
    AppError::from(e).user_message()
}

/// Spawns background tasks for backend calls.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Look up tickers matching `query`.
    pub fn spawn_search_tickers(&self, client: &SimClient, token: LookupToken, query: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.search_tickers(&query).await.map_err(user_message);
            debug!(?token, query = %query, ok = result.is_ok(), "Ticker lookup returned");
            let _ = tx.send(ApiMessage::TickersSearched { token, result });
        });
    }

    /// Load the simulation catalogue.
    pub fn spawn_fetch_simulations(&self, client: &SimClient) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.available_simulations().await.map_err(user_message);
            let _ = tx.send(ApiMessage::SimulationsFetched(result));
        });
    }

    /// Run a simulation.
    pub fn spawn_simulate(&self, client: &SimClient, request: SimulationRequest) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.simulate(&request).await.map_err(user_message);
            let _ = tx.send(ApiMessage::SimulationFinished(result));
        });
    }

    /// Clear the server's result cache.
    pub fn spawn_clear_cache(&self, client: &SimClient) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.clear_cache().await.map_err(user_message);
            let _ = tx.send(ApiMessage::CacheCleared(result));
        });
    }

    /// Delete the server's market-data cache.
    pub fn spawn_delete_data_cache(&self, client: &SimClient) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.delete_data_cache().await.map_err(user_message);
            let _ = tx.send(ApiMessage::DataCacheDeleted(result));
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}
