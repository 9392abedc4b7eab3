//! # packrat-analytics
//!
//! Usage report assembly over the packrat store.
//!
//! Pulls the cross-user aggregates through
//! [`packrat_core::AnalyticsRepository`] and shapes them into serializable
//! report structures. Rendering (text, charts) is the consumer's business;
//! nothing here produces user-facing strings.

pub mod report;

pub use report::{KindShare, LanguageShare, ReportBuilder, TimeSeries, UsageReport};
