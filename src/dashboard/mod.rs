//! Dashboard Module - interactive client of the scoring API
//!
//! Loads an applicant dataset, compares one applicant against the
//! population, requests a score and its attribution, and renders both.

pub mod client;
pub mod dataset;
pub mod session;
pub mod view;
pub mod waterfall;

pub use client::{ApiClient, ApiConfig, ClientError, DEFAULT_API_URL};
pub use dataset::{compare_applicant, Dataset, DatasetError, FeatureComparison, FeatureStats};
pub use session::DashboardSession;
pub use waterfall::{Waterfall, WaterfallRow, DEFAULT_MAX_DISPLAY};
