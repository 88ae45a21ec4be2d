//! Speech-markup rendering.
//!
//! Standard areas read at the baseline rate; phantom areas drop the rate and
//! pitch so the wrongness is audible before the words register.

use crate::vocabulary::{AreaKind, SeaArea};

const STANDARD_RATE: &str = "95%";
const STANDARD_PITCH: &str = "+0%";
const PHANTOM_RATE: &str = "78%";
const PHANTOM_PITCH: &str = "-15%";

/// Pause after the area name, in milliseconds.
const AREA_BREAK_MS: u32 = 800;

/// Wrap an already-rendered report body in SSML. Both the area name and the
/// body are interpolated text and must be escaped.
pub fn render(area: &SeaArea, body: &str) -> String {
    let (rate, pitch) = match area.kind {
        AreaKind::Standard => (STANDARD_RATE, STANDARD_PITCH),
        AreaKind::Phantom => (PHANTOM_RATE, PHANTOM_PITCH),
    };

    format!(
        "<speak><prosody rate=\"{}\" pitch=\"{}\">\
         <emphasis level=\"strong\">{}</emphasis>\
         <break time=\"{}ms\"/> {}</prosody></speak>",
        rate,
        pitch,
        escape_xml(area.name),
        AREA_BREAK_MS,
        escape_xml(body)
    )
}

/// Escape the five XML special characters.
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
