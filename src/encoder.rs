//! Fixed-width text encoding of a converted contour
//!
//! Output layout, `\n` line endings only:
//!
//! ```text
//! Pitch
//! <nx>
//! <dx>
//! <x1>
//! <pitch> x nx    every line exactly 17 characters
//! <0|1>   x nx
//! ```
//!
//! Every pitch line has the same width so a reader can jump to frame `i`
//! at a fixed byte offset from the first pitch line.

use crate::convert::ConversionResult;
use crate::Result;
use std::io::Write;

/// Width of one encoded pitch value
pub const PITCH_WIDTH: usize = 17;
/// Significant digits kept before padding/truncation
const SIGNIFICANT_DIGITS: usize = 16;

/// Tag written on the first output line
const OUTPUT_TAG: &str = "Pitch";

/// Write a conversion result in the fixed-width format
pub fn write_result<W: Write>(result: &ConversionResult, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", OUTPUT_TAG)?;
    writeln!(writer, "{}", result.frame_count())?;
    writeln!(writer, "{}", format_float(result.frame_step))?;
    writeln!(writer, "{}", format_float(result.first_frame_time))?;
    for &pitch in &result.pitch {
        writeln!(writer, "{}", format_pitch_value(pitch))?;
    }
    for &voiced in &result.voiced {
        writeln!(writer, "{}", if voiced { '1' } else { '0' })?;
    }
    Ok(())
}

/// Format a pitch value as exactly 17 characters.
///
/// The value is written with 16 significant digits, right-padded with `0`
/// and cut to 17 characters. Values needing more than 17 characters (a sign
/// plus three integer digits, or exponent notation) lose their tail.
pub fn format_pitch_value(value: f64) -> String {
    let mut text = format_general(value, SIGNIFICANT_DIGITS);
    while text.len() < PITCH_WIDTH {
        text.push('0');
    }
    text.truncate(PITCH_WIDTH);
    text
}

/// General notation with `precision` significant digits.
///
/// Trailing zeros are dropped, but a fixed-point result keeps one digit after
/// the point (`69.0`, not `69`). Exponents below -4 or at least
/// `precision - 1` switch to exponent notation (`1.5e-05`, `1e+15`).
fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = split_exponent(&scientific);

    if exponent < -4 || exponent >= precision as i32 - 1 {
        let mantissa = strip_fraction_zeros(mantissa);
        return format!("{}{}", mantissa, exponent_suffix(exponent));
    }

    let decimals = (precision as i32 - 1 - exponent) as usize;
    let fixed = format!("{:.*}", decimals, value);
    let mut text = strip_fraction_zeros(&fixed).to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Shortest text that reads back as the same `f64`, always with a point or exponent.
///
/// `0.01` -> `0.01`, `0` -> `0.0`, `1e-5` -> `1e-05`, `1e16` -> `1e+16`.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let shortest = format!("{:e}", value);
    let (mantissa, exponent) = split_exponent(&shortest);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-4..16).contains(&exponent) {
        let fraction = &digits[1..];
        let point = if fraction.is_empty() { "" } else { "." };
        return format!(
            "{}{}{}{}{}",
            sign,
            &digits[..1],
            point,
            fraction,
            exponent_suffix(exponent)
        );
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{}0.{}{}", sign, zeros, digits);
    }

    let int_len = exponent as usize + 1;
    if digits.len() <= int_len {
        let zeros = "0".repeat(int_len - digits.len());
        format!("{}{}{}.0", sign, digits, zeros)
    } else {
        format!("{}{}.{}", sign, &digits[..int_len], &digits[int_len..])
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Split Rust's `{:e}` output into mantissa and decimal exponent
fn split_exponent(text: &str) -> (&str, i32) {
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

/// `e+05` / `e-12` style suffix: explicit sign, at least two digits
fn exponent_suffix(exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("e{}{:02}", sign, exponent.abs())
}

fn strip_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
