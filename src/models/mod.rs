//! Data models for the serving APIs
//!
//! This module organizes the request, response and error bodies the HTTP
//! surfaces exchange. Each model mirrors one wire shape exactly.

pub mod health;
pub mod historico;
pub mod previsao;

// Re-export commonly used types for convenience
pub use health::HealthStatus;
pub use historico::{ErroHistorico, RegistroHistorico};
pub use previsao::{ErroPrevisao, PrevisaoRequest, PrevisaoResponse};
