//! # ChemVerse
//!
//! Backend of an educational chemistry lab: a periodic table browser, an element-mixing
//! lab that looks up curated reactions or asks a language model, a small knowledge base
//! of lessons and a chemistry assistant.
//!
//! - `chemistry`: element, reaction and lesson records and their read-only stores
//! - `library_manager`: loading of the JSON libraries the stores are built from
//! - `ai`: OpenRouter gateway with ordered model fallback, retries and backoff
//! - `resolver`: curated lookup with AI fallback for mixed elements
//! - `server`: axum HTTP API
//! - `cli`: command line entry point
//! - `settings`: configuration file and environment overrides
pub mod ai;
pub mod chemistry;
pub mod cli;
pub mod library_manager;
pub mod resolver;
pub mod server;
pub mod settings;
