use crate::config::{Marker, OutputFormat, PlotConfig};
use crate::results::{ResultDocument, TestCase};
use anyhow::{ensure, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

// Font sizes
const TITLE_FONT_SIZE: u32 = 36;
const AXIS_LABEL_FONT_SIZE: u32 = 24;
const TICK_LABEL_FONT_SIZE: u32 = 20;
const LEGEND_FONT_SIZE: u32 = 20;

// Marker, line and cap sizes in the config are in points
const PIXELS_PER_POINT: u32 = 2;

// Fraction of the data span added above and below the error bars
const Y_PADDING: f64 = 0.05;

/// One benchmark, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPlan {
    pub name: String,
    pub color: RGBColor,
    /// (x index, mean, std) in the display unit
    pub points: Vec<(f64, f64, f64)>,
}

/// Everything needed to draw one test case
#[derive(Debug, Clone, PartialEq)]
pub struct FigurePlan {
    pub title: String,
    pub file_name: String,
    pub x_labels: Vec<String>,
    pub y_desc: String,
    pub y_range: Range<f64>,
    pub series: Vec<SeriesPlan>,
}

/// Output file name for a test case. Path separators are replaced so the
/// figure always lands in the output directory.
pub fn figure_file_name(test_case: &str, suffix: &str) -> String {
    format!("{}{}", test_case.replace(['/', '\\'], "_"), suffix)
}

/// Check a test case against the config and convert it for drawing.
///
/// Fails if there are more benchmarks than palette colours, or if the
/// benchmarks disagree on their sections (they share one x axis).
pub fn plan_figure(name: &str, test_case: &TestCase, config: &PlotConfig) -> Result<FigurePlan> {
    ensure!(!test_case.is_empty(), "Test case {:?} has no benchmarks", name);
    ensure!(
        test_case.len() <= config.palette.len(),
        "Test case {:?} has {} benchmarks but the palette only has {} colours",
        name,
        test_case.len(),
        config.palette.len()
    );

    let unit = config.time_unit;
    let mut x_labels: Option<&[String]> = None;
    let mut series = Vec::with_capacity(test_case.len());

    for (idx, (bench_name, data)) in test_case.benchmarks.iter().enumerate() {
        match x_labels {
            None => x_labels = Some(data.xdata()),
            Some(expected) => ensure!(
                expected == data.xdata(),
                "Benchmark {:?} in test case {:?} ran in sections {:?}, but {:?} ran in {:?}",
                bench_name,
                name,
                data.xdata(),
                series
                    .first()
                    .map(|s: &SeriesPlan| s.name.as_str())
                    .unwrap_or_default(),
                expected
            ),
        }

        let means = unit.convert(data.mean());
        let errors = unit.convert(data.std());
        let points = means
            .into_iter()
            .zip(errors)
            .enumerate()
            .map(|(x, (y, err))| (x as f64, y, err))
            .collect();

        series.push(SeriesPlan {
            name: bench_name.clone(),
            color: config.palette[idx],
            points,
        });
    }

    Ok(FigurePlan {
        title: name.to_string(),
        file_name: figure_file_name(name, &config.suffix),
        x_labels: x_labels.unwrap_or_default().to_vec(),
        y_desc: unit.axis_label(),
        y_range: y_range(&series),
        series,
    })
}

/// Y axis range covering every error bar, with some padding
fn y_range(series: &[SeriesPlan]) -> Range<f64> {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.points.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y, err)| {
            (lo.min(y - err), hi.max(y + err))
        });

    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }

    let span = if hi > lo { hi - lo } else { hi.abs().max(1.0) };
    (lo - span * Y_PADDING)..(hi + span * Y_PADDING)
}

/// Draw a planned figure onto any plotters backend
pub fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    plan: &FigurePlan,
    config: &PlotConfig,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let theme = config.theme();
    root.fill(&theme.background)?;

    let num_labels = plan.x_labels.len();

    let mut chart = ChartBuilder::on(root)
        .caption(
            &plan.title,
            ("sans-serif", TITLE_FONT_SIZE, FontStyle::Bold)
                .into_font()
                .color(&theme.foreground),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(-0.5..(num_labels as f64 - 0.5), plan.y_range.clone())?;

    chart
        .configure_mesh()
        .x_labels(num_labels)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if idx < num_labels && (x - idx as f64).abs() < 0.3 {
                plan.x_labels[idx].clone()
            } else {
                String::new()
            }
        })
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid.mix(0.3))
        .axis_style(theme.foreground)
        .y_desc(plan.y_desc.as_str())
        .x_desc(config.x_desc.as_str())
        .label_style(
            ("sans-serif", TICK_LABEL_FONT_SIZE)
                .into_font()
                .color(&theme.foreground),
        )
        .axis_desc_style(
            ("sans-serif", AXIS_LABEL_FONT_SIZE)
                .into_font()
                .color(&theme.foreground),
        )
        .draw()?;

    let line_width = config.line_width * PIXELS_PER_POINT;
    let cap_thickness = config.cap_thickness * PIXELS_PER_POINT;
    let cap_width = config.cap_size * PIXELS_PER_POINT * 2;
    let marker_size = (config.marker_size * PIXELS_PER_POINT) as i32;

    for series in &plan.series {
        let color = series.color;
        let line_style = color.stroke_width(line_width);

        chart
            .draw_series(LineSeries::new(
                series.points.iter().map(|&(x, y, _)| (x, y)),
                line_style,
            ))?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        let bar_style = color.stroke_width(cap_thickness);
        chart.draw_series(series.points.iter().map(|&(x, y, err)| {
            ErrorBar::new_vertical(x, y - err, y, y + err, bar_style, cap_width)
        }))?;

        let centers = series.points.iter().map(|&(x, y, _)| (x, y));
        let marker_style = color.filled();
        match config.marker {
            Marker::Circle => {
                chart.draw_series(centers.map(|c| Circle::new(c, marker_size, marker_style)))?;
            }
            Marker::Square => {
                chart.draw_series(centers.map(|c| {
                    EmptyElement::at(c)
                        + Rectangle::new(
                            [(-marker_size, -marker_size), (marker_size, marker_size)],
                            marker_style,
                        )
                }))?;
            }
            Marker::Triangle => {
                chart.draw_series(
                    centers.map(|c| TriangleMarker::new(c, marker_size, marker_style)),
                )?;
            }
            Marker::Cross => {
                chart.draw_series(centers.map(|c| Cross::new(c, marker_size, line_style)))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(theme.background.mix(0.8))
        .border_style(theme.foreground)
        .label_font(
            ("sans-serif", LEGEND_FONT_SIZE)
                .into_font()
                .color(&theme.foreground),
        )
        .draw()?;

    Ok(())
}

/// Generate one figure per test case into `output_dir`.
///
/// Every figure is planned before the first file is written, so a test case
/// that violates the config produces no output at all.
pub fn generate_charts(
    document: &ResultDocument,
    config: &PlotConfig,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let format = config.output_format()?;

    let mut plans = Vec::with_capacity(document.len());
    for (name, test_case) in &document.test_cases {
        if test_case.is_empty() {
            println!("Skipped {} (no benchmarks)", name);
            continue;
        }
        plans.push(plan_figure(name, test_case, config)?);
    }

    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let mut written = Vec::with_capacity(plans.len());
    for plan in &plans {
        let path = output_dir.join(&plan.file_name);
        render_to_file(&path, format, plan, config)
            .with_context(|| format!("Failed to render {}", path.display()))?;
        println!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn render_to_file(
    path: &Path,
    format: OutputFormat,
    plan: &FigurePlan,
    config: &PlotConfig,
) -> Result<()> {
    match format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, config.size).into_drawing_area();
            draw_figure(&root, plan, config)?;
            root.present()?;
        }
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, config.size).into_drawing_area();
            draw_figure(&root, plan, config)?;
            root.present()?;
        }
    }
    Ok(())
}
