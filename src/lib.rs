//! Serving stack for LSTM-based B3 stock price forecasting: a REST proxy
//! over the Yahoo Finance chart API, a prediction service evaluating
//! offline-trained artifacts, and a load driver for the latter.

pub mod api;
pub mod config;
pub mod forecast;
pub mod loadtest;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;
