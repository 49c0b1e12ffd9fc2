//! Turn bank and credit-card CSV exports into a categorized tax-prep report set.

pub mod categorizer;
pub mod error;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod reports;
pub mod settings;
