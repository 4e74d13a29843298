pub mod aggregator;
pub mod archive;
pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod progress;
pub mod prune;
pub mod relocate;
pub mod scanner;

pub use aggregator::{ItemFailure, ResultAggregator, SortSummary};
pub use category::{Category, DestinationTree};
pub use config::{AppConfig, CollisionPolicy};
pub use engine::{SortEngine, SortResult};
pub use error::Error;
pub use normalize::normalize;
pub use progress::{ProgressReporter, SilentReporter};
