//! Human-readable byte sizes for progress lines.

const UNITS: [(u64, &str); 6] = [
    (1 << 60, "E"),
    (1 << 50, "P"),
    (1 << 40, "T"),
    (1 << 30, "G"),
    (1 << 20, "M"),
    (1 << 10, "K"),
];

/// Formats `bytes` with binary units and at most one decimal place,
/// e.g. `512B`, `1.5K`, `3M`. Zero renders as `0`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0".to_string();
    }
    let (value, unit) = UNITS
        .iter()
        .find(|(scale, _)| bytes >= *scale)
        .map(|(scale, unit)| (bytes as f64 / *scale as f64, *unit))
        .unwrap_or((bytes as f64, "B"));
    let text = format!("{:.1}", value);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, unit)
}
