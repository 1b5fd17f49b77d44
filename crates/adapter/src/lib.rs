//! Adapter module - headless control over a JSON line protocol
//!
//! This crate lets external agents play a session without a terminal. The
//! `cascade-adapter` binary serves it over stdin/stdout; [`server::run`] takes
//! any async reader/writer pair.
//!
//! # Protocol Overview
//!
//! 1. **Handshake**: client sends `hello`, adapter answers `welcome`
//! 2. **Sequencing**: every later message must carry a larger `seq`
//! 3. **Commanding**: `swap`, `hint`, `observe`, `restart`
//!
//! # Message Types
//!
//! ## Client → Adapter
//!
//! - **hello**: handshake, optional `client {name, version}`
//! - **swap**: `from: [x, y]`, `to: [x, y]`
//! - **hint**: list every swap the session would accept
//! - **observe**: request an observation
//! - **restart**: new session, optional `seed`
//!
//! ## Adapter → Client
//!
//! - **welcome**: protocol version and board size
//! - **ack**: accepted swap with its resolution path and remaining moves,
//!   always followed by **events**
//! - **events**: core events emitted while resolving the swap
//! - **observation**: board rows (top row first), counters, outcome, hash
//! - **hint**: candidate swaps with their predicted cascade
//! - **error**: `code` and `message`
//!
//! Replies echo the `seq` of the request they answer.
//!
//! # Environment Variables
//!
//! See [`config`]. `CASCADE_ADAPTER_LOG_PATH` appends every line read and
//! written to a file.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Adapter: {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"}}
//! Adapter -> Client: {"type":"welcome","seq":1,"protocol_version":"1.0.0","width":8,"height":8}
//! Client -> Adapter: {"type":"swap","seq":2,"from":[3,4],"to":[3,5]}
//! Adapter -> Client: {"type":"ack","seq":2,"status":"ok","path":"match","moves_remaining":29,...}
//! Adapter -> Client: {"type":"events","seq":2,"events":[{"kind":"tile_moved",...},...]}
//! Client -> Adapter: {"type":"swap","seq":3,"from":[0,0],"to":[5,5]}
//! Adapter -> Client: {"type":"error","seq":3,"code":"not_adjacent","message":"..."}
//! ```

pub mod config;
pub mod protocol;
pub mod server;

pub use tile_cascade_core as core;
pub use tile_cascade_engine as engine;
pub use tile_cascade_types as types;

pub use config::{session_config_from_env, session_config_from_lookup, AdapterConfig};
pub use protocol::*;
pub use server::{run, AdapterSession, Outbound};
