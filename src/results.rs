use crate::report::TestRun;
use crate::units::TimeUnit;
use anyhow::{bail, Result};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;

/// Per-benchmark statistics, one entry per section the benchmark ran in.
///
/// The three sequences are index-aligned and always the same length; entry
/// `i` of each describes the `i`-th section encountered in the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesData {
    mean: Vec<f64>,
    std: Vec<f64>,
    xdata: Vec<String>,
}

impl SeriesData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mean: f64, std: f64, label: impl Into<String>) {
        self.mean.push(mean);
        self.std.push(std);
        self.xdata.push(label.into());
    }

    /// Mean durations in nanoseconds
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Standard deviations in nanoseconds
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// Section names, used as x-axis labels
    pub fn xdata(&self) -> &[String] {
        &self.xdata
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Benchmarks of one test case, in the order they first appeared
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCase {
    pub benchmarks: IndexMap<String, SeriesData>,
}

impl TestCase {
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

/// All test cases of a report, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultDocument {
    pub test_cases: IndexMap<String, TestCase>,
}

impl ResultDocument {
    /// Group a deserialized report into per-benchmark series
    pub fn from_report(run: &TestRun) -> Result<Self> {
        Self::build(run, false)
    }

    fn build(run: &TestRun, verbose: bool) -> Result<Self> {
        let mut test_cases = IndexMap::new();

        if verbose {
            if let Some(name) = &run.name {
                println!("Test run: {}", name);
            }
        }

        for record in &run.test_cases {
            if test_cases.contains_key(&record.name) {
                bail!("Duplicate test case {:?}", record.name);
            }

            if verbose {
                println!("{:=<40}", "");
                println!("Testcase: {}", record.name);
            }

            let mut test_case = TestCase::default();

            for section in &record.sections {
                if verbose {
                    println!("  Section: {}", section.name);
                }

                let mut seen = HashSet::new();
                for bench in &section.benchmarks {
                    if !seen.insert(bench.name.as_str()) {
                        bail!(
                            "Benchmark {:?} appears twice in section {:?} of test case {:?}",
                            bench.name,
                            section.name,
                            record.name
                        );
                    }

                    let mean = bench.mean.value;
                    let std = bench.standard_deviation.value;

                    if verbose {
                        println!("    Benchmark {}", bench.name);
                        println!("      section: {}", section.name);
                        println!("      samples: {}", bench.samples);
                        match (bench.mean.lower_bound, bench.mean.upper_bound) {
                            (Some(lo), Some(hi)) => {
                                println!("      mean:    {} ns [{} .. {}]", mean, lo, hi)
                            }
                            _ => println!("      mean:    {} ns", mean),
                        }
                        println!("      std:     {} ns", std);
                    }

                    test_case
                        .benchmarks
                        .entry(bench.name.clone())
                        .or_insert_with(SeriesData::new)
                        .push(mean, std, section.name.as_str());
                }
            }

            test_cases.insert(record.name.clone(), test_case);
        }

        Ok(Self { test_cases })
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }
}

/// Parse a Catch2 XML report into a [`ResultDocument`]
pub fn parse_results(path: &Path) -> Result<ResultDocument> {
    parse_results_with_logging(path, false)
}

/// Parse a Catch2 XML report, optionally tracing every parsed value to stdout
pub fn parse_results_with_logging(path: &Path, verbose: bool) -> Result<ResultDocument> {
    let run = TestRun::open(path)?;
    ResultDocument::build(&run, verbose)
}

/// Print a per-test-case table of the parsed statistics
pub fn print_summary(document: &ResultDocument, unit: TimeUnit) {
    println!("\n{:=<80}", "");
    println!("Benchmark Results");
    println!("{:=<80}\n", "");

    for (name, test_case) in &document.test_cases {
        println!("Testcase: {}", name);
        println!("{:-<70}", "");

        if test_case.is_empty() {
            println!("  (no benchmarks)\n");
            continue;
        }

        println!(
            "  {:<28} {:>10} {:>12} {:>12}",
            "Benchmark",
            "Section",
            format!("Mean ({})", unit.symbol()),
            format!("Std ({})", unit.symbol())
        );
        println!("  {:-<66}", "");

        for (bench_name, series) in &test_case.benchmarks {
            let means = unit.convert(series.mean());
            let stds = unit.convert(series.std());
            for ((label, mean), std) in series.xdata().iter().zip(&means).zip(&stds) {
                println!(
                    "  {:<28} {:>10} {:>12.3} {:>12.3}",
                    bench_name, label, mean, std
                );
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fmt::Write as _;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn bench_xml(name: &str, mean: f64, std: f64) -> String {
        format!(
            r#"<BenchmarkResults name="{name}" samples="100" resamples="100000" iterations="1">
  <mean value="{mean}" lowerBound="{mean}" upperBound="{mean}" ci="0.95"/>
  <standardDeviation value="{std}" lowerBound="{std}" upperBound="{std}" ci="0.95"/>
  <outliers variance="0" lowMild="0" lowSevere="0" highMild="0" highSevere="0"/>
</BenchmarkResults>"#
        )
    }

    fn add_report() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Catch2TestRun name="bench">
  <TestCase name="Add">
    <Section name="4">
      {}
      {}
      <OverallResults successes="0" failures="0" expectedFailures="0"/>
    </Section>
    <Section name="8">
      {}
      {}
      <OverallResults successes="0" failures="0" expectedFailures="0"/>
    </Section>
    <OverallResult success="true"/>
  </TestCase>
  <OverallResults successes="0" failures="0" expectedFailures="0"/>
</Catch2TestRun>"#,
            bench_xml("Scalar", 100.0, 2.0),
            bench_xml("Vector", 40.0, 1.0),
            bench_xml("Scalar", 150.0, 5.0),
            bench_xml("Vector", 60.0, 2.0),
        )
    }

    fn parse_str(xml: &str) -> Result<ResultDocument> {
        ResultDocument::from_report(&TestRun::from_xml(xml)?)
    }

    #[test]
    fn test_groups_by_test_case_and_benchmark() {
        let doc = parse_str(&add_report()).unwrap();
        assert_eq!(doc.len(), 1);

        let add = &doc.test_cases["Add"];
        assert_eq!(add.benchmarks.keys().collect::<Vec<_>>(), ["Scalar", "Vector"]);

        let scalar = &add.benchmarks["Scalar"];
        assert_eq!(scalar.mean(), &[100.0, 150.0]);
        assert_eq!(scalar.std(), &[2.0, 5.0]);
        assert_eq!(scalar.xdata(), &["4".to_string(), "8".to_string()]);

        let vector = &add.benchmarks["Vector"];
        assert_eq!(vector.mean(), &[40.0, 60.0]);
        assert_eq!(vector.std(), &[1.0, 2.0]);
        assert_eq!(vector.xdata(), &["4".to_string(), "8".to_string()]);
    }

    #[test]
    fn test_parse_results_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(add_report().as_bytes()).unwrap();

        let doc = parse_results(file.path()).unwrap();
        assert_eq!(doc, parse_str(&add_report()).unwrap());
    }

    #[test]
    fn test_trace_does_not_change_grouping() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(add_report().as_bytes()).unwrap();

        let traced = parse_results_with_logging(file.path(), true).unwrap();
        assert_eq!(traced, parse_results(file.path()).unwrap());
        assert_eq!(traced.test_cases["Add"].benchmarks["Vector"].mean(), &[40.0, 60.0]);
    }

    #[test]
    fn test_single_records_parse_like_lists() {
        let single = format!(
            r#"<Catch2TestRun><TestCase name="Add"><Section name="4">{}</Section></TestCase></Catch2TestRun>"#,
            bench_xml("Scalar", 100.0, 2.0)
        );
        let doc = parse_str(&single).unwrap();

        let mut expected = SeriesData::new();
        expected.push(100.0, 2.0, "4");
        let mut test_case = TestCase::default();
        test_case.benchmarks.insert("Scalar".to_string(), expected);
        let mut want = ResultDocument::default();
        want.test_cases.insert("Add".to_string(), test_case);

        assert_eq!(doc, want);
    }

    #[test]
    fn test_test_case_without_sections() {
        let doc = parse_str(r#"<Catch2TestRun><TestCase name="Empty"/></Catch2TestRun>"#).unwrap();
        assert!(doc.test_cases["Empty"].is_empty());
    }

    #[test]
    fn test_document_order_is_preserved() {
        let xml = format!(
            r#"<Catch2TestRun>
  <TestCase name="Zeta"><Section name="1">{a}</Section></TestCase>
  <TestCase name="Alpha"><Section name="1">{a}</Section></TestCase>
  <TestCase name="Mid"><Section name="1">{a}</Section></TestCase>
</Catch2TestRun>"#,
            a = bench_xml("x", 1.0, 0.1)
        );
        let doc = parse_str(&xml).unwrap();
        let names: Vec<_> = doc.test_cases.keys().cloned().collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_duplicate_test_case_is_rejected() {
        let xml = format!(
            r#"<Catch2TestRun>
  <TestCase name="Add"><Section name="4">{a}</Section></TestCase>
  <TestCase name="Add"><Section name="8">{a}</Section></TestCase>
</Catch2TestRun>"#,
            a = bench_xml("Scalar", 1.0, 0.1)
        );
        let err = parse_str(&xml).unwrap_err();
        assert!(err.to_string().contains("Duplicate test case"));
    }

    #[test]
    fn test_duplicate_benchmark_in_section_is_rejected() {
        let xml = format!(
            r#"<Catch2TestRun><TestCase name="Add"><Section name="4">{a}{a}</Section></TestCase></Catch2TestRun>"#,
            a = bench_xml("Scalar", 1.0, 0.1)
        );
        let err = parse_str(&xml).unwrap_err();
        assert!(err.to_string().contains("appears twice"));
    }

    #[test]
    fn test_missing_name_fails_the_parse() {
        let xml = r#"<Catch2TestRun><TestCase><Section name="4"/></TestCase></Catch2TestRun>"#;
        assert!(parse_str(xml).is_err());
    }

    fn arb_layout() -> impl Strategy<Value = Vec<Vec<Vec<(usize, u32, u32)>>>> {
        // test cases -> sections -> (benchmark id, mean, std)
        let section = proptest::collection::btree_map(0usize..5, (1u32..100_000, 0u32..1_000), 0..5)
            .prop_map(|m| m.into_iter().map(|(k, (a, b))| (k, a, b)).collect::<Vec<_>>());
        proptest::collection::vec(proptest::collection::vec(section, 0..6), 1..4)
    }

    fn render_layout(layout: &[Vec<Vec<(usize, u32, u32)>>]) -> String {
        let mut xml = String::from("<Catch2TestRun>");
        for (t, sections) in layout.iter().enumerate() {
            write!(xml, r#"<TestCase name="case{t}">"#).unwrap();
            for (s, benches) in sections.iter().enumerate() {
                write!(xml, r#"<Section name="s{s}">"#).unwrap();
                for (b, mean, std) in benches {
                    xml.push_str(&bench_xml(&format!("b{b}"), *mean as f64, *std as f64));
                }
                xml.push_str("</Section>");
            }
            xml.push_str("</TestCase>");
        }
        xml.push_str("</Catch2TestRun>");
        xml
    }

    proptest! {
        #[test]
        fn prop_series_stay_aligned(layout in arb_layout()) {
            let doc = parse_str(&render_layout(&layout)).unwrap();
            prop_assert_eq!(doc.len(), layout.len());

            for (t, sections) in layout.iter().enumerate() {
                let case = &doc.test_cases[&format!("case{t}")];
                for (name, series) in &case.benchmarks {
                    prop_assert_eq!(series.mean().len(), series.std().len());
                    prop_assert_eq!(series.std().len(), series.xdata().len());

                    // xdata follows the section order of the report
                    let expected: Vec<String> = sections
                        .iter()
                        .enumerate()
                        .filter(|(_, benches)| benches.iter().any(|(b, _, _)| &format!("b{b}") == name))
                        .map(|(s, _)| format!("s{s}"))
                        .collect();
                    prop_assert_eq!(series.xdata(), expected.as_slice());
                }
            }
        }
    }
}
