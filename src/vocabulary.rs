//! Fixed vocabulary tables for the broadcast generator.
//!
//! Everything here is reference data: the generator draws from these slices
//! but never mutates them. Term order matters only to seeded tests.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AreaKind {
    Standard,
    Phantom,
}

/// A sea area as read at the top of each report.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeaArea {
    pub name: &'static str,
    pub id: &'static str,
    pub kind: AreaKind,
}

const fn standard(name: &'static str, id: &'static str) -> SeaArea {
    SeaArea {
        name,
        id,
        kind: AreaKind::Standard,
    }
}

const fn phantom(name: &'static str, id: &'static str) -> SeaArea {
    SeaArea {
        name,
        id,
        kind: AreaKind::Phantom,
    }
}

/// The 31 canonical areas, in broadcast order (the cycler shuffles per lap).
pub const STANDARD_AREAS: [SeaArea; 31] = [
    standard("Viking", "viking"),
    standard("North Utsire", "north-utsire"),
    standard("South Utsire", "south-utsire"),
    standard("Forties", "forties"),
    standard("Cromarty", "cromarty"),
    standard("Forth", "forth"),
    standard("Tyne", "tyne"),
    standard("Dogger", "dogger"),
    standard("Fisher", "fisher"),
    standard("German Bight", "german-bight"),
    standard("Humber", "humber"),
    standard("Thames", "thames"),
    standard("Dover", "dover"),
    standard("Wight", "wight"),
    standard("Portland", "portland"),
    standard("Plymouth", "plymouth"),
    standard("Biscay", "biscay"),
    standard("Trafalgar", "trafalgar"),
    standard("FitzRoy", "fitzroy"),
    standard("Sole", "sole"),
    standard("Lundy", "lundy"),
    standard("Fastnet", "fastnet"),
    standard("Irish Sea", "irish-sea"),
    standard("Shannon", "shannon"),
    standard("Rockall", "rockall"),
    standard("Malin", "malin"),
    standard("Hebrides", "hebrides"),
    standard("Bailey", "bailey"),
    standard("Fair Isle", "fair-isle"),
    standard("Faeroes", "faeroes"),
    standard("South-East Iceland", "south-east-iceland"),
];

/// Fictitious areas, selected rarely and read with altered prosody.
pub const PHANTOM_AREAS: [SeaArea; 7] = [
    phantom("Farrow", "farrow"),
    phantom("Undermere", "undermere"),
    phantom("The Old Grey", "the-old-grey"),
    phantom("Nethersound", "nethersound"),
    phantom("Lachryma", "lachryma"),
    phantom("Mirrormoor", "mirrormoor"),
    phantom("The Silent Water", "the-silent-water"),
];

/// Directions open the wind clause, so they are stored capitalized.
pub const WIND_DIRECTIONS: [&str; 10] = [
    "Northerly",
    "Northeasterly",
    "Easterly",
    "Southeasterly",
    "Southerly",
    "Southwesterly",
    "Westerly",
    "Northwesterly",
    "Cyclonic",
    "Variable",
];

pub const WIND_BEHAVIORS: [&str; 2] = ["backing", "veering"];

pub const WIND_MODIFIERS: [&str; 2] = ["increasing", "decreasing"];

pub const WIND_TIMINGS: [&str; 4] = ["later", "soon", "imminent", "for a time"];

/// Joins the two halves of a compound force ("4 to 5", "7 or gale 8").
pub const FORCE_CONNECTORS: [&str; 2] = ["to", "or"];

pub const PRECIPITATION_MODIFIERS: [&str; 6] = [
    "occasional",
    "intermittent",
    "light",
    "heavy",
    "scattered",
    "thundery",
];

pub const PRECIPITATION_TYPES: [&str; 6] = [
    "rain",
    "drizzle",
    "showers",
    "sleet",
    "snow",
    "squally showers",
];

pub const ICING_SEVERITIES: [&str; 2] = ["light icing", "moderate icing"];

pub const VISIBILITIES: [&str; 6] = [
    "good",
    "moderate",
    "poor",
    "very poor",
    "moderate or good",
    "moderate or poor",
];

/// Inactivity messages spliced in at report boundaries. Uniform with
/// replacement; back-to-back repeats are allowed.
pub const WARNING_MESSAGES: [&str; 7] = [
    "Attention, listener. You have been absent from your watch for some time. The forecast continues.",
    "This is a general notice to the inattentive. The sea does not pause, and neither does this broadcast.",
    "Your attention has drifted. Conditions continue to be read whether or not anyone is listening.",
    "Notice to mariners, and to you. This broadcast has been unattended for over a minute.",
    "The forecast notes your absence. It will carry on regardless, as it always has.",
    "Wherever you have gone, the weather has continued without you.",
    "You left the forecast unattended. It has been keeping count.",
];

/// Traditional name for forces 8 through 12; forces below 8 are read as bare
/// numbers and return `None`.
pub fn beaufort_name(force: u8) -> Option<&'static str> {
    match force {
        8 => Some("gale"),
        9 => Some("severe gale"),
        10 => Some("storm"),
        11 => Some("violent storm"),
        12 => Some("hurricane force"),
        _ => None,
    }
}
