//! Serde model of the Catch2 XML reporter output.
//!
//! Only the parts needed for plotting are modelled; everything else in the
//! report (`OverallResults`, `outliers`, file/line attributes, ...) is ignored.
//! Repeated elements deserialize into `Vec`s, so a lone `<Section>` and a run
//! of several sections end up in the same shape.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root `<Catch2TestRun>` element
#[derive(Debug, Clone, Deserialize)]
pub struct TestRun {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "TestCase", default)]
    pub test_cases: Vec<TestCaseRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseRecord {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "Section", default)]
    pub sections: Vec<SectionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionRecord {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "BenchmarkResults", default)]
    pub benchmarks: Vec<BenchmarkRecord>,
}

/// One `<BenchmarkResults>` element. All values are in nanoseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkRecord {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@samples")]
    pub samples: u64,
    pub mean: Estimate,
    #[serde(rename = "standardDeviation")]
    pub standard_deviation: Estimate,
}

/// A bootstrapped estimate (`<mean>` or `<standardDeviation>`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Estimate {
    #[serde(rename = "@value")]
    pub value: f64,
    #[serde(rename = "@lowerBound", default)]
    pub lower_bound: Option<f64>,
    #[serde(rename = "@upperBound", default)]
    pub upper_bound: Option<f64>,
}

impl TestRun {
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).context("Malformed Catch2 XML report")
    }

    /// Read the whole report into memory and deserialize it
    pub fn open(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_xml(&xml).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
