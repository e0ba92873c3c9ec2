//! `/color` family: color swatches and gradients.
//!
//! Pure computation, no network. Output HTML is built entirely from values
//! this module formats itself, so results are trusted.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::{ParseError, ParseResult};
use crate::result::CommandResult;

use super::Command;

/// Parse `/color <hex>` or `/color gradient`.
pub fn parse(subcommands: &[&str], params: &str) -> ParseResult<Command> {
    match subcommands {
        ["gradient"] => ColorGradientCommand::parse(params).map(Command::ColorGradient),
        [input] => ColorCommand::parse_hex(input).map(Command::Color),
        _ => Err(ParseError::UnknownSubcommand {
            family: "color",
            subcommands: subcommands.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// An sRGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

// D65 reference white.
const WHITE_X: f64 = 0.950_47;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088_83;

impl Color {
    /// Parse `#rgb` or `#rrggbb`, case-insensitive.
    pub fn from_hex(input: &str) -> Option<Self> {
        let digits = input.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = match digits.len() {
            3 => {
                let short = |i: usize| channel(digits.get(i..=i)?).map(|v| v * 17);
                (short(0)?, short(1)?, short(2)?)
            }
            6 => (
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            ),
            _ => return None,
        };

        Some(Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        })
    }

    /// 8-bit channels, rounded.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rgb255(self) -> (u8, u8, u8) {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (to_byte(self.r), to_byte(self.g), to_byte(self.b))
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb255();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CIE XYZ (D65) from linearized sRGB.
    pub fn xyz(self) -> (f64, f64, f64) {
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        (
            0.412_390_799_265_959_5 * r + 0.357_584_339_383_878 * g + 0.180_480_788_401_834_3 * b,
            0.212_639_005_871_510_36 * r + 0.715_168_678_767_756 * g + 0.072_192_315_330_808_72 * b,
            0.019_330_818_715_591_85 * r + 0.119_194_779_794_625_99 * g + 0.950_532_152_249_660_6 * b,
        )
    }

    /// CIE L*a*b* (D65), with L* in `0..=100`.
    pub fn lab(self) -> (f64, f64, f64) {
        let (x, y, z) = self.xyz();
        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);
        (116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
    }
}

fn linearize(v: f64) -> f64 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// `/color <hex>`: a swatch with hex, sRGB and Lab values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorCommand {
    pub input: String,
    #[serde(skip)]
    pub color: Color,
}

impl ColorCommand {
    pub fn parse_hex(input: &str) -> ParseResult<Self> {
        let color = Color::from_hex(input).ok_or_else(|| ParseError::InvalidColor {
            input: input.to_string(),
        })?;
        Ok(Self {
            input: input.to_string(),
            color,
        })
    }

    pub fn run(&self) -> CommandResult {
        let hex = self.color.hex();
        let (red, green, blue) = self.color.rgb255();
        let (l, a, b) = self.color.lab();

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div style="width: 12em; height: 12em; background-color:{hex}"></div>"#
        );
        html.push_str(r#"<dl class="mt-4">"#);
        let _ = write!(html, r#"<dt class="mt-2 font-bold">Hex</dt><dd>{hex}</dd>"#);
        let _ = write!(
            html,
            r#"<dt class="mt-2 font-bold">sRGB</dt><dd>rgb({red}, {green}, {blue})</dd>"#
        );
        let _ = write!(
            html,
            r#"<dt class="mt-2 font-bold">Lab</dt><dd>lab({l:.2} {a:.2} {b:.2})</dd>"#
        );
        html.push_str("</dl>");

        CommandResult::dangerous_from_trusted_html(html).with_plain_text(hex)
    }
}

/// `/color gradient`: one color per line, in stop order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorGradientCommand {
    pub inputs: Vec<String>,
    #[serde(skip)]
    pub colors: Vec<Color>,
}

impl ColorGradientCommand {
    /// Every non-blank line must be a color; blank lines are ignored.
    pub fn parse(params: &str) -> ParseResult<Self> {
        let inputs: Vec<String> = params
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();

        if inputs.is_empty() {
            return Err(ParseError::EmptyGradient);
        }

        let colors = inputs
            .iter()
            .map(|input| {
                Color::from_hex(input).ok_or_else(|| ParseError::InvalidColor {
                    input: input.clone(),
                })
            })
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Self { inputs, colors })
    }

    /// Stop hex values in input order.
    pub fn stops(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.hex()).collect()
    }

    /// The CSS `linear-gradient(...)` expression.
    pub fn css(&self) -> String {
        format!("linear-gradient({})", self.stops().join(","))
    }

    pub fn run(&self) -> CommandResult {
        let css = self.css();

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div style="width: 12em; height: 12em; background: {css}"></div>"#
        );
        html.push_str(r#"<dl class="mt-4">"#);
        let _ = write!(
            html,
            r#"<dt class="mt-2 font-bold">Hex</dt><dd>{}</dd>"#,
            self.stops().join(", ")
        );
        let _ = write!(html, r#"<dt class="mt-2 font-bold">CSS</dt><dd><code>{css}</code></dd>"#);
        html.push_str("</dl>");

        CommandResult::dangerous_from_trusted_html(html).with_plain_text(css)
    }
}
