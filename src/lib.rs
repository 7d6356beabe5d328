// HTTP server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

// Websocket chat
pub mod chat;

// Persistence and configuration
pub mod auth;
pub mod config;
pub mod settings;
pub mod store;

// Model-serving client
pub mod ollama;

// Operational subcommands
pub mod commands;
