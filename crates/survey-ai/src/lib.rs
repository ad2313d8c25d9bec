//! Core library for the customer satisfaction survey service.
//!
//! The interesting part lives in [`workflows::surveys::submissions`]: a
//! hybrid sentiment engine that consolidates heterogeneous survey answers
//! into one verdict, a point score, and a dissatisfaction-alert decision.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
