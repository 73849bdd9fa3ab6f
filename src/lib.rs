// Score keeping and the game registry
pub mod core;

// Live score streaming
pub mod services;

// API models (requests/responses)
pub mod models;

// HTTP, WebSocket and SSE routes
pub mod routes;

// Application state
pub mod state;

// Command line / environment configuration
pub mod config;

// Error types
pub mod error;

// Score stream client
pub mod client;
