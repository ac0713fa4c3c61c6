//! critique core library: LLM-backed code review with persisted sessions.
//!
//! A [`session::Session`] hydrates history, cached results and the usage
//! ledger from a [`store::Store`] and writes every change through. One
//! analysis is one round trip through [`llm::InferenceClient`]; the caller
//! records the outcome with [`session::Session::record_analysis`].

pub mod config;
pub mod error;
pub mod estimate;
pub mod history;
pub mod ledger;
pub mod llm;
pub mod mode;
pub mod models;
pub mod progress;
pub mod project;
pub mod results;
pub mod session;
pub mod settings;
pub mod store;
pub mod validate;
