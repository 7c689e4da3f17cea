//! Size parsing and formatting helpers for CLI output.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Parses a size argument like `500`, `100M` or `2GB` into bytes.
///
/// Suffixes are case-insensitive: `K`/`KB`, `M`/`MB`, `G`/`GB`. A bare
/// number is bytes.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let normalized = input.trim().to_ascii_uppercase();

    let (digits, multiplier) = if let Some(rest) = normalized
        .strip_suffix("KB")
        .or_else(|| normalized.strip_suffix('K'))
    {
        (rest, KIB)
    } else if let Some(rest) = normalized
        .strip_suffix("MB")
        .or_else(|| normalized.strip_suffix('M'))
    {
        (rest, MIB)
    } else if let Some(rest) = normalized
        .strip_suffix("GB")
        .or_else(|| normalized.strip_suffix('G'))
    {
        (rest, GIB)
    } else {
        (normalized.as_str(), 1)
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("invalid size '{}'", input))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{}' is out of range", input))
}

/// Formats a byte count as a short human-readable string (`512B`, `1.5M`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.1}G", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1}M", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1}K", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}
