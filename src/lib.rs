//! # mealmate
//!
//! Recipe backend: relevance-ranked search and listing over a schema-free
//! recipe collection, plus LLM-assisted ingredient detection and recipe
//! generation.
//!
//! ## Read path
//!
//! ```text
//!   term / category / area ──► Query Builder ──► Filter
//!                                                  │
//!                   ┌──────────────────────────────┴───────────────┐
//!                   │ no sort_by + term               sort_by given │ neither
//!                   ▼                                 ▼             ▼
//!        match → score → sort(score↓, title↑)   match → sort(field)   match → sort(title↑)
//!                   │                                 │             │
//!                   └────────── skip → limit ─────────┴─────────────┘
//!                                        │
//!                                        ▼
//!                                Field Normalizer ──► Recipe
//! ```
//!
//! Relevance: title +10, category +8, area +7, any tag +5, +1 per matching
//! ingredient; ties break alphabetically by title.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, data dir and LLM settings
//! - [`models`] - API types: `Recipe`, request/response bodies, LLM payloads
//! - [`store`] - JSON document store: filters, aggregation stages, persistence
//! - [`search::filter`] - Query Builder turning term/category/area into a store filter
//! - [`search::relevance`] - Weighted relevance score expression
//! - [`search::normalize`] - Stored document → API `Recipe` (string ids, display units)
//! - [`search::listing`] - List/search orchestration, random sampling, distinct values, lookup
//! - [`catalog`] - Recipe create/update/delete
//! - [`llm`] - Chat transport (Ollama, OpenAI, Azure OpenAI), JSON cleanup, generators
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
