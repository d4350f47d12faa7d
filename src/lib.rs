pub mod chart;
pub mod config;
pub mod report;
pub mod results;
pub mod units;

pub use config::PlotConfig;
pub use results::{ResultDocument, SeriesData, TestCase};
