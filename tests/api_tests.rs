//! Integration tests for the game management API
//!
//! These tests drive the full router through `axum-test` and cover:
//! - Game creation, lookup and removal
//! - Shot recording and validation
//! - Error status mapping
//! - Stream endpoints rejecting unknown games

use axum::http::StatusCode;
use axum_test::TestServer;
use courtside::{routes, state::AppState};
use serde_json::{json, Value};
use std::time::Duration;

/// Helper to create a test server with the full app configuration
fn create_test_server() -> (TestServer, AppState) {
    let state = AppState::new(Duration::from_millis(20));
    let server = TestServer::new(routes::router(state.clone())).unwrap();
    (server, state)
}

mod game_lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_game_with_id() {
        let (server, _state) = create_test_server();

        let response = server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["game_id"], "G1");
        assert_eq!(body["started"], false);
        assert_eq!(body["score"]["home_score"], 0);
        assert_eq!(body["score"]["away_score"], 0);
    }

    #[tokio::test]
    async fn test_create_game_generates_id() {
        let (server, state) = create_test_server();

        let response = server.post("/api/games").await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        let game_id = body["game_id"].as_str().unwrap();
        assert_eq!(game_id.len(), 12);
        assert!(state.registry.get_game(game_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_duplicate_game() {
        let (server, _state) = create_test_server();

        let first = server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;
        assert_eq!(first.status_code(), StatusCode::CREATED);

        let second = server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;
        assert_eq!(second.status_code(), StatusCode::CONFLICT);

        let body: Value = second.json();
        assert!(body["error"].as_str().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn test_create_game_invalid_id() {
        let (server, _state) = create_test_server();

        let response = server
            .post("/api/games")
            .json(&json!({"game_id": "bad id!"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_game_malformed_body_rejected() {
        let (server, state) = create_test_server();

        let wrong_type = server
            .post("/api/games")
            .json(&json!({"game_id": 42}))
            .await;
        assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);

        let misspelled = server
            .post("/api/games")
            .json(&json!({"gameid": "G1"}))
            .await;
        assert_eq!(misspelled.status_code(), StatusCode::BAD_REQUEST);

        let not_json = server
            .post("/api/games")
            .text(r#"{"game_id":"G1"}"#)
            .await;
        assert_eq!(not_json.status_code(), StatusCode::BAD_REQUEST);

        // None of them fell back to a generated game
        assert!(state.registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_unknown_game() {
        let (server, _state) = create_test_server();

        let response = server.get("/api/games/nope").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_game() {
        let (server, _state) = create_test_server();

        server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;

        let response = server.delete("/api/games/G1").await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        let response = server.get("/api/games/G1").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = server.delete("/api/games/G1").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_start_game_twice() {
        let (server, _state) = create_test_server();

        server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;

        let first = server.post("/api/games/G1/start").await;
        assert_eq!(first.status_code(), StatusCode::OK);
        assert_eq!(first.json::<Value>()["started"], true);

        let second = server.post("/api/games/G1/start").await;
        assert_eq!(second.status_code(), StatusCode::OK);
        assert_eq!(second.json::<Value>()["started"], true);
    }

    #[tokio::test]
    async fn test_health_counts_games() {
        let (server, _state) = create_test_server();

        server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["games"], 1);
    }
}

mod shot_tests {
    use super::*;

    async fn server_with_game() -> (TestServer, AppState) {
        let (server, state) = create_test_server();
        server
            .post("/api/games")
            .json(&json!({"game_id": "G1"}))
            .await;
        (server, state)
    }

    #[tokio::test]
    async fn test_record_shots() {
        let (server, _state) = server_with_game().await;

        server
            .post("/api/games/G1/shots")
            .json(&json!({"team": "home", "points": 2}))
            .await;
        server
            .post("/api/games/G1/shots")
            .json(&json!({"team": "away", "points": 3}))
            .await;
        let response = server
            .post("/api/games/G1/shots")
            .json(&json!({"team": "home", "points": 1}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["home_score"], 3);
        assert_eq!(body["away_score"], 3);

        let game: Value = server.get("/api/games/G1").await.json();
        assert_eq!(game["score"]["home_score"], 3);
        assert_eq!(game["score"]["away_score"], 3);
    }

    #[tokio::test]
    async fn test_non_positive_points_rejected() {
        let (server, _state) = server_with_game().await;

        for points in [0, -5] {
            let response = server
                .post("/api/games/G1/shots")
                .json(&json!({"team": "home", "points": points}))
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        }

        let game: Value = server.get("/api/games/G1").await.json();
        assert_eq!(game["score"]["home_score"], 0);
    }

    #[tokio::test]
    async fn test_unknown_team_rejected() {
        let (server, _state) = server_with_game().await;

        let response = server
            .post("/api/games/G1/shots")
            .json(&json!({"team": "referee", "points": 2}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_shot_on_unknown_game() {
        let (server, _state) = create_test_server();

        let response = server
            .post("/api/games/nope/shots")
            .json(&json!({"team": "home", "points": 2}))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}

mod stream_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_sse_unknown_game() {
        let (server, _state) = create_test_server();

        let response = server.get("/api/games/nope/score/events").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sse_streams_until_game_removed() {
        let (server, state) = create_test_server();
        let keeper = state.registry.create_game("G1").await.unwrap();
        keeper.shot_made(courtside::core::Team::Home, 3).unwrap();

        let registry = state.registry.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            registry.remove_game("G1").await;
        });

        let response = server.get("/api/games/G1/score/events").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body = response.text();
        let events = parse_events(&body);

        let (name, first) = &events[0];
        assert_eq!(name, "score");
        assert_eq!(first["type"], "score");
        assert_eq!(first["data"]["home_score"], 3);
        assert_eq!(first["data"]["away_score"], 0);

        let (name, last) = events.last().unwrap();
        assert_eq!(name, "ended");
        assert_eq!(last["type"], "ended");
        assert_eq!(last["data"]["reason"], "game removed");
    }

    /// Split an SSE body into `(event name, parsed data)` pairs
    fn parse_events(body: &str) -> Vec<(String, Value)> {
        body.split("\n\n")
            .filter_map(|block| {
                let mut name = None;
                let mut data = None;
                for line in block.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        name = Some(value.trim().to_string());
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data = Some(serde_json::from_str(value.trim()).unwrap());
                    }
                }
                Some((name?, data?))
            })
            .collect()
    }
}
