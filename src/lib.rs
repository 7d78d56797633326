//! `BioKing` webhook client
//!
//! A library for calling the `BioKing` automation workflows (chat, research,
//! stock data and news) over HTTP webhooks, retrying failed calls with an
//! exponential backoff scaled by each request's importance.

pub mod config;
pub mod news;
pub mod services;
pub mod time;
pub mod webhook;
