//! Axum web server with WebSocket control for step-by-step playback.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stepgraph_algorithms::Algorithm;
use stepgraph_topology::GraphInput;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::playback::{PlaybackSpeed, PlaybackStatus};
use crate::session::{sample_input, Session};
use crate::snapshot::PlayerSnapshot;

/// Shared application state.
pub struct AppState {
    session: RwLock<Session>,
    config: ServerConfig,
    started: Instant,
}

impl AppState {
    /// Milliseconds since the server started, never 0 so that a stamp of 0
    /// keeps meaning "never read".
    fn now(&self) -> u64 {
        self.started.elapsed().as_millis() as u64 + 1
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server around an already-recorded session.
    pub fn new(session: Session, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                session: RwLock::new(session),
                config,
                started: Instant::now(),
            }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/snapshot", get(snapshot_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/stop", post(stop_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/run", post(run_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Spawn the task that drives playback on a fixed-rate timer.
    pub fn spawn_ticker(&self) -> tokio::task::JoinHandle<()> {
        let state = self.state.clone();
        tokio::spawn(async move {
            // tokio rejects a zero period
            let period = state.config.tick.max(std::time::Duration::from_millis(1));
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let now = state.now();
                let mut session = state.session.write().await;
                if let Err(e) = session.playback_mut().tick(now) {
                    error!("Playback halted: {}", e);
                    session.playback_mut().pause();
                }
            }
        })
    }

    /// Run the server until it fails.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = self.state.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://{}", addr);
        let ticker = self.spawn_ticker();
        let result = axum::serve(listener, self.router()).await;
        ticker.abort();
        result
    }
}

type ApiError = (StatusCode, String);

/// Server status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: &'static str,
    algorithm: Algorithm,
    title: &'static str,
    vertex_count: usize,
    edge_count: usize,
    event_count: usize,
    algorithms: Vec<Algorithm>,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.session.read().await;
    Json(StatusResponse {
        status: "ok",
        algorithm: session.algorithm(),
        title: session.algorithm().title(),
        vertex_count: session.input().n,
        edge_count: session.input().edges.len(),
        event_count: session.playback().player().event_count(),
        algorithms: Algorithm::ALL.to_vec(),
    })
}

async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Json<PlayerSnapshot> {
    let session = state.session.read().await;
    Json(session.playback().snapshot())
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let session = state.session.read().await;
    Json(PlaybackStatus::from(session.playback()))
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let mut session = state.session.write().await;
    session.playback_mut().play();
    Json(PlaybackStatus::from(session.playback()))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let mut session = state.session.write().await;
    session.playback_mut().pause();
    Json(PlaybackStatus::from(session.playback()))
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let mut session = state.session.write().await;
    session.playback_mut().stop();
    Json(PlaybackStatus::from(session.playback()))
}

#[derive(Debug, Deserialize)]
struct SeekRequest {
    step: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<PlaybackStatus>, ApiError> {
    let now = state.now();
    let mut session = state.session.write().await;
    session.playback_mut().seek(req.step, now).map_err(internal)?;
    Ok(Json(PlaybackStatus::from(session.playback())))
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    speed: PlaybackSpeed,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    let mut session = state.session.write().await;
    session.playback_mut().set_speed(req.speed);
    Json(PlaybackStatus::from(session.playback()))
}

async fn step_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlayerSnapshot>, ApiError> {
    let now = state.now();
    let mut session = state.session.write().await;
    session.playback_mut().step(now).map_err(internal)?;
    Ok(Json(session.playback().snapshot()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunRequest {
    algorithm: Algorithm,
    /// Graph to run on; a sample graph is generated when absent
    input: Option<GraphInput>,
    seed: Option<u64>,
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<PlaybackStatus>, ApiError> {
    let config = &state.config;
    let input = match req.input {
        Some(input) => input,
        None => sample_input(
            req.algorithm,
            config.vertices,
            config.max_weight,
            req.seed.unwrap_or(config.seed),
        ),
    };
    let fresh = Session::record(req.algorithm, input, config.tick_ms())
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let mut session = state.session.write().await;
    *session = fresh;
    Ok(Json(PlaybackStatus::from(session.playback())))
}

fn internal(e: impl std::fmt::Display) -> ApiError {
    error!("Replay failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");
    let initial = {
        let session = state.session.read().await;
        WsResponse::Snapshot(session.playback().snapshot())
    };
    if let Ok(json) = serde_json::to_string(&initial) {
        if socket.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let response = match serde_json::from_str::<WsCommand>(&text) {
                    Ok(cmd) => handle_ws_command(&state, cmd).await,
                    Err(e) => {
                        warn!("Bad WebSocket command: {}", e);
                        WsResponse::Error { message: e.to_string() }
                    }
                };
                if let Ok(json) = serde_json::to_string(&response) {
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    debug!("WebSocket client disconnected");
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetSnapshot,
    GetStatus,
    Step,
    Seek { step: usize },
    Play,
    Pause,
    Stop,
    Speed { speed: PlaybackSpeed },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Snapshot(PlayerSnapshot),
    Status(PlaybackStatus),
    Error { message: String },
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    let now = state.now();
    match cmd {
        WsCommand::GetSnapshot => {
            let session = state.session.read().await;
            WsResponse::Snapshot(session.playback().snapshot())
        }
        WsCommand::GetStatus => {
            let session = state.session.read().await;
            WsResponse::Status(PlaybackStatus::from(session.playback()))
        }
        WsCommand::Step => {
            let mut session = state.session.write().await;
            match session.playback_mut().step(now) {
                Ok(_) => WsResponse::Snapshot(session.playback().snapshot()),
                Err(e) => WsResponse::Error { message: e.to_string() },
            }
        }
        WsCommand::Seek { step } => {
            let mut session = state.session.write().await;
            match session.playback_mut().seek(step, now) {
                Ok(()) => WsResponse::Snapshot(session.playback().snapshot()),
                Err(e) => WsResponse::Error { message: e.to_string() },
            }
        }
        WsCommand::Play => {
            let mut session = state.session.write().await;
            session.playback_mut().play();
            WsResponse::Status(PlaybackStatus::from(session.playback()))
        }
        WsCommand::Pause => {
            let mut session = state.session.write().await;
            session.playback_mut().pause();
            WsResponse::Status(PlaybackStatus::from(session.playback()))
        }
        WsCommand::Stop => {
            let mut session = state.session.write().await;
            session.playback_mut().stop();
            WsResponse::Status(PlaybackStatus::from(session.playback()))
        }
        WsCommand::Speed { speed } => {
            let mut session = state.session.write().await;
            session.playback_mut().set_speed(speed);
            WsResponse::Status(PlaybackStatus::from(session.playback()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;

    fn state() -> Arc<AppState> {
        let config = ServerConfig::default();
        let input = GraphInput::unweighted(4, &[(0, 1), (1, 2), (2, 3)]);
        let session = Session::record(Algorithm::Bfs, input, config.tick_ms()).unwrap();
        VisServer::new(session, config).state
    }

    #[test]
    fn router_builds() {
        let server = VisServer { state: state() };
        let _router = server.router();
    }

    #[test]
    fn play_pause_stop_cycle() {
        let state = state();
        tokio_test::block_on(async {
            let Json(status) = play_handler(State(state.clone())).await;
            assert_eq!(status.state, PlaybackState::Playing);
            let Json(status) = pause_handler(State(state.clone())).await;
            assert_eq!(status.state, PlaybackState::Paused);
            let Json(status) = stop_handler(State(state.clone())).await;
            assert_eq!(status.state, PlaybackState::Stopped);
            assert_eq!(status.current_step, 0);
        });
    }

    #[tokio::test]
    async fn status_reports_session() {
        let Json(status) = status_handler(State(state())).await;
        assert_eq!(status.algorithm, Algorithm::Bfs);
        assert_eq!(status.vertex_count, 4);
        assert_eq!(status.algorithms.len(), Algorithm::ALL.len());
    }

    #[tokio::test]
    async fn step_and_seek_move_playback() {
        let state = state();
        let Json(snapshot) = step_handler(State(state.clone())).await.unwrap();
        assert_eq!(snapshot.pc, 1);

        let Json(status) = seek_handler(State(state.clone()), Json(SeekRequest { step: 1_000 }))
            .await
            .unwrap();
        assert_eq!(status.state, PlaybackState::Finished);
        assert_eq!(status.pc, status.event_count);
    }

    #[tokio::test]
    async fn run_replaces_session() {
        let state = state();
        let request = RunRequest {
            algorithm: Algorithm::Kruskal,
            input: Some(GraphInput::new(3, vec![(0, 1, 1), (1, 2, 2), (0, 2, 3)], false)),
            seed: None,
        };
        let Json(status) = run_handler(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(status.current_step, 0);
        assert_eq!(state.session.read().await.algorithm(), Algorithm::Kruskal);
    }

    #[tokio::test]
    async fn run_rejects_invalid_input() {
        let request = RunRequest {
            algorithm: Algorithm::Bfs,
            input: Some(GraphInput::new(2, vec![(0, 5, 1)], false)),
            seed: None,
        };
        let err = run_handler(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn ws_commands() {
        let state = state();
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"seek","step":2}"#).unwrap();
        match handle_ws_command(&state, cmd).await {
            WsResponse::Snapshot(snapshot) => assert!(snapshot.pc >= 2),
            other => panic!("unexpected {:?}", other),
        }

        let cmd: WsCommand = serde_json::from_str(r#"{"type":"speed","speed":"double"}"#).unwrap();
        match handle_ws_command(&state, cmd).await {
            WsResponse::Status(status) => assert_eq!(status.speed, PlaybackSpeed::Double),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn ticker_advances_playing_session() {
        let mut config = ServerConfig::default();
        config.tick = std::time::Duration::from_millis(1);
        let input = GraphInput::unweighted(3, &[(0, 1), (1, 2)]);
        let session = Session::record(Algorithm::Dfs, input, 0).unwrap();
        let server = VisServer::new(session, config);
        server.state.session.write().await.playback_mut().play();

        let ticker = server.spawn_ticker();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        ticker.abort();
        assert!(server.state.session.read().await.playback().current_step() > 0);
    }
}
