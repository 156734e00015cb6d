//! # Bookloop Architecture
//!
//! Bookloop is a small marketplace for used books: sellers list books, buyers search and
//! buy them, and an admin collects a commission on every sale and manages accounts.
//! It is a **library with a CLI client**, not a CLI with some library code. Any UI (the
//! bundled terminal client, a web front end, a test) drives the same core.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints results, sets exit codes        │
//! │  - The ONLY place that knows about stdout/stderr            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Authenticates every request, enforces roles              │
//! │  - Validates input, returns CmdResult with messages         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - catalog, directory, ledger, purchase, doctor             │
//! │  - Plain Rust in, plain Rust out; no notion of callers      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore trait: whole-document load/save/update       │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Cache
//!
//! Every operation re-reads the documents it needs and writes back whole documents. The
//! data set is small and this keeps several processes (or a UI that re-renders after each
//! action) looking at the same state.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against [`store::memory::InMemoryStore`]. Most testing lives here.
//! 2. **API**: role and validation rules, also in memory.
//! 3. **Storage and CLI**: integration tests in `tests/` on real temporary directories.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: business logic per collection
//! - [`store`]: storage abstraction and implementations
//! - [`model`]: books, users, the profit ledger
//! - [`config`]: file names, commission rate, password policy
//! - [`ids`]: book id generation
//! - [`password`]: password hashing
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod password;
pub mod store;
