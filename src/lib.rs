//! Web-grounded generative search exposed as an MCP tool (JSON-RPC over
//! stdio) and as a small HTTP API.

pub mod api;
pub mod cli;
pub mod clients;
pub mod core;
pub mod domain;
pub mod infra;
pub mod tools;
