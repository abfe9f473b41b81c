//! The payment stack: a typed client for the cross-chain intent service,
//! the wallet session it draws on, and the orchestrator that runs one boost
//! purchase through quote → commit → execute → receipt polling.
//!
//! Nothing in here registers ECS systems; the `boost` domain plugin owns the
//! glue between these types and the game loop.

pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod types;
pub mod wallet;
