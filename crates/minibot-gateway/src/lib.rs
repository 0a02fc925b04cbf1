//! # MiniBot Gateway
//!
//! HTTP API in front of the knowledge base.
//!
//! | route            | method | body / response                                  |
//! |------------------|--------|--------------------------------------------------|
//! | `/ask`           | POST   | `{question}` → `{question, answer}` or 400 error |
//! | `/health`        | GET    | liveness                                         |
//! | `/api/v1/info`   | GET    | version, uptime, corpus size, threshold          |

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
