use anyhow::{Context, Result, anyhow, bail};
use eframe::egui::Color32;

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(value: &str) -> Result<Color32> {
    let trimmed = value.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).with_context(|| format!("invalid hex color {value:?}"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let (arguments, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest, false)
    } else {
        bail!("unrecognised color {value:?}; expected rgba(...), rgb(...) or #rrggbb[aa]");
    };

    let arguments = arguments
        .strip_suffix(')')
        .ok_or_else(|| anyhow!("missing closing parenthesis in color {value:?}"))?;
    let parts = arguments.split(',').map(str::trim).collect::<Vec<_>>();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        bail!("color {value:?} needs {expected} components, found {}", parts.len());
    }

    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        *channel = part
            .parse::<u8>()
            .with_context(|| format!("invalid channel {part:?} in color {value:?}"))?;
    }

    let alpha = if has_alpha {
        let alpha = parts[3]
            .parse::<f32>()
            .with_context(|| format!("invalid alpha {:?} in color {value:?}", parts[3]))?;
        if !(0.0..=1.0).contains(&alpha) {
            bail!("alpha {alpha} in color {value:?} is outside 0..=1");
        }
        (alpha * 255.0).round() as u8
    } else {
        u8::MAX
    };

    Ok(Color32::from_rgba_unmultiplied(
        channels[0],
        channels[1],
        channels[2],
        alpha,
    ))
}

fn parse_hex(hex: &str) -> Result<Color32> {
    if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
        bail!("expected 6 or 8 hex digits");
    }

    let byte = |offset: usize| -> Result<u8> {
        u8::from_str_radix(&hex[offset..offset + 2], 16)
            .with_context(|| format!("bad hex pair {:?}", &hex[offset..offset + 2]))
    };
    let alpha = if hex.len() == 8 { byte(6)? } else { u8::MAX };

    Ok(Color32::from_rgba_unmultiplied(byte(0)?, byte(2)?, byte(4)?, alpha))
}
