//! JSON lines written by the CLI.
//!
//! Output follows the layout of the harness baselines: `", "` and `": "`
//! separators, floats in shortest round-trip form with a trailing `.0` for
//! whole numbers and exponents like `1e-05` outside `[1e-4, 1e16)`, and
//! non-ASCII characters escaped as `\uXXXX`.

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Envelope written to stderr when reading or analysis fails.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    pub fn new(err: &dyn std::error::Error) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Serialize `message` as a single JSON line and flush.
pub fn write_json_line<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    message: &T,
) -> io::Result<()> {
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, BaselineFormatter);
    message.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

struct BaselineFormatter;

impl Formatter for BaselineFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_float(value).as_bytes())
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Shortest round-trip text for `value`: positional between 1e-4 and 1e16,
/// otherwise scientific with a signed exponent of at least two digits.
pub fn format_float(value: f64) -> String {
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..16).contains(&exponent) {
        let positional = value.to_string();
        if positional.contains('.') {
            positional
        } else {
            format!("{positional}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}
