use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::{ScoreError, ScoreResult},
    models::{CreateGameRequest, GameResponse, ShotRequest},
    state::AppState,
};

/// Register a new game
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `headers` - Request headers, checked for a JSON content type
/// * `body` - Empty, or a JSON body with a caller-chosen game id
///
/// # Returns
///
/// 201 with the new game, 409 if the id is taken, 400 for a malformed body
pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ScoreResult<impl IntoResponse> {
    let request = parse_create_request(&headers, &body)?;

    let keeper = match request.validated_game_id()? {
        Some(game_id) => state.registry.create_game(&game_id).await?,
        None => state.registry.create_generated_game().await,
    };

    Ok((
        StatusCode::CREATED,
        Json(GameResponse::from_keeper(&keeper)),
    ))
}

/// Read a create request; an empty body asks for a generated id
fn parse_create_request(headers: &HeaderMap, body: &[u8]) -> ScoreResult<CreateGameRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateGameRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"));
    if !is_json {
        return Err(ScoreError::InvalidArgument(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    Json::<CreateGameRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| ScoreError::InvalidArgument(rejection.body_text()))
}

/// Current state of a game
pub async fn get_game(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> ScoreResult<Json<GameResponse>> {
    let keeper = state.registry.get_game(&game_id).await?;
    Ok(Json(GameResponse::from_keeper(&keeper)))
}

/// Start the game clock
///
/// Starting a running game leaves its clock untouched.
pub async fn start_game(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> ScoreResult<Json<GameResponse>> {
    let keeper = state.registry.get_game(&game_id).await?;
    keeper.start();
    Ok(Json(GameResponse::from_keeper(&keeper)))
}

/// Record a made shot
///
/// # Arguments
///
/// * `game_id` - The game from path
/// * `state` - Shared application state
/// * `request` - Team and points
///
/// # Returns
///
/// Snapshot after the shot, 400 for a bad team or points
pub async fn record_shot(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<ShotRequest>,
) -> ScoreResult<impl IntoResponse> {
    let team = request.team()?;
    let keeper = state.registry.get_game(&game_id).await?;
    let snapshot = keeper.shot_made(team, request.points)?;

    Ok(Json(snapshot))
}

/// Remove a game, ending all of its score streams
///
/// # Returns
///
/// 204 on removal, 404 if the game was not registered
pub async fn remove_game(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> ScoreResult<StatusCode> {
    state
        .registry
        .remove_game(&game_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ScoreError::NotFound(game_id))
}
