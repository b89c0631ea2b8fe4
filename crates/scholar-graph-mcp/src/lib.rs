//! Semantic Scholar Graph MCP Server
//!
//! A Model Context Protocol (MCP) server exposing eight Semantic Scholar
//! Academic Graph API endpoints as agent tools: paper search, paper details,
//! authors, citations, references, author search, author details and author
//! papers.
//!
//! # Features
//!
//! - **Pass-through tools**: upstream JSON comes back exactly as received
//! - **Bounded retry**: rate limits, 5xx and network failures are retried with a flat delay
//! - **Paced calls**: a fixed delay before each call (3 s without API key, 1 s with)
//! - **Two transports**: stdio and stateless streamable HTTP
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scholar_graph_mcp::{Config, SemanticScholarClient, tools::{self, ToolContext}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SemanticScholarClient::new(Config::from_env()?)?;
//!     let ctx = ToolContext::new(Arc::new(client));
//!
//!     let paper =
//!         tools::get_paper_details(&ctx, "DOI:10.1038/nature14539", &["title", "year"]).await?;
//!     println!("{}", paper.body);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use client::{ApiResponse, SemanticScholarClient};
pub use config::Config;
pub use error::{ClientError, ErrorKind, ToolError};
