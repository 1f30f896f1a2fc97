pub mod historico_service;
pub mod previsao_service;

pub use previsao_service::PrevisaoError;
