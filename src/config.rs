use crate::units::TimeUnit;
use anyhow::{bail, Result};
use plotters::style::RGBColor;

/// Named colours used by the default palette and theme
pub mod colours {
    use plotters::style::RGBColor;

    pub const GREEN: RGBColor = RGBColor(0x00, 0xC7, 0x9C);
    pub const BLACK: RGBColor = RGBColor(0x26, 0x26, 0x26);
    pub const ORANGE: RGBColor = RGBColor(0xFF, 0x6D, 0x4A);
    pub const BLUE: RGBColor = RGBColor(0x69, 0x89, 0xC4);
    pub const RED: RGBColor = RGBColor(0xFF, 0x45, 0x54);
    pub const WHITE: RGBColor = RGBColor(0xFF, 0xFF, 0xFF);
}

/// Data point marker drawn on top of each mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Image format, picked from the output suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_suffix(suffix: &str) -> Result<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            ".svg" => Ok(OutputFormat::Svg),
            ".png" => Ok(OutputFormat::Png),
            other => bail!("Unsupported output suffix {:?} (expected .svg or .png)", other),
        }
    }
}

/// Foreground colours derived from the figure background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
}

impl Theme {
    pub fn for_background(background: RGBColor) -> Self {
        if background == colours::BLACK {
            Self {
                background,
                foreground: RGBColor(0xEE, 0xEE, 0xEE),
                grid: RGBColor(0x5A, 0x5A, 0x5A),
            }
        } else {
            Self {
                background,
                foreground: RGBColor(0x00, 0x00, 0x00),
                grid: RGBColor(0xB0, 0xB0, 0xB0),
            }
        }
    }

    pub fn is_dark(&self) -> bool {
        self.background == colours::BLACK
    }
}

/// Styling for every generated figure.
///
/// Built once at startup and handed to the chart generator by reference.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub marker: Marker,
    /// Marker radius in pixels
    pub marker_size: u32,
    pub line_width: u32,
    /// Error bar cap width in pixels
    pub cap_size: u32,
    pub cap_thickness: u32,
    /// Figure face colour; [`colours::BLACK`] selects the dark theme
    pub background: RGBColor,
    /// Series colours, assigned to benchmarks by position
    pub palette: Vec<RGBColor>,
    pub time_unit: TimeUnit,
    /// Appended to the test case name; decides the image format
    pub suffix: String,
    /// Figure size in pixels
    pub size: (u32, u32),
    pub x_desc: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            marker: Marker::Circle,
            marker_size: 3,
            line_width: 2,
            cap_size: 3,
            cap_thickness: 2,
            background: colours::BLACK,
            palette: vec![
                colours::ORANGE,
                colours::BLUE,
                colours::GREEN,
                colours::RED,
            ],
            time_unit: TimeUnit::Nanoseconds,
            suffix: ".svg".to_string(),
            size: (1000, 600),
            x_desc: "Vector size".to_string(),
        }
    }
}

impl PlotConfig {
    pub fn theme(&self) -> Theme {
        Theme::for_background(self.background)
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_suffix(&self.suffix)
    }
}
