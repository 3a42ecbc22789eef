//! Audio format selection and variant descriptor parsing.

use serde_json::Value;

use voxtube_core::types::MediaVariant;

/// Pick the highest-bitrate audio-only M4A/AAC variant.
///
/// Variants carrying video or any other container/codec are skipped. A
/// later candidate only replaces the current best with a strictly greater
/// bitrate, so the earliest variant wins ties.
pub fn select_best_audio_format(variants: &[MediaVariant]) -> Option<&MediaVariant> {
    variants
        .iter()
        .filter(|v| v.is_compatible_audio())
        .fold(None, |best, candidate| match best {
            Some(current) if candidate.audio_bitrate <= current.audio_bitrate => Some(current),
            _ => Some(candidate),
        })
}

/// Build a [`MediaVariant`] from one ytdl-style format descriptor.
///
/// Returns `None` for entries that are not JSON objects. Missing string
/// fields become empty and an unusable `audioBitrate` becomes 0.
pub fn parse_variant(format: &Value) -> Option<MediaVariant> {
    let format = format.as_object()?;
    let text = |key: &str| {
        format
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Some(MediaVariant {
        has_video: format.get("bitrate").is_some_and(is_truthy),
        container: text("container"),
        audio_encoding: text("audioEncoding"),
        audio_bitrate: format.get("audioBitrate").map(coerce_bitrate).unwrap_or(0),
        stream_url: text("url"),
    })
}

/// Parse the `formats` array of a resolution response, dropping unusable entries.
pub fn parse_variants(body: &Value) -> Vec<MediaVariant> {
    body["formats"]
        .as_array()
        .map(|formats| formats.iter().filter_map(parse_variant).collect())
        .unwrap_or_default()
}

/// Numeric coercion for bitrates: numbers and numeric strings are
/// truncated, everything else (and negatives) is 0.
fn coerce_bitrate(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(f) if f.is_finite() && f > 0.0 => f.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
