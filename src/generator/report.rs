use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::generator::{ssml, AreaCycler};
use crate::vocabulary::{
    beaufort_name, SeaArea, FORCE_CONNECTORS, ICING_SEVERITIES, PRECIPITATION_MODIFIERS,
    PRECIPITATION_TYPES, VISIBILITIES, WIND_BEHAVIORS, WIND_DIRECTIONS, WIND_MODIFIERS,
    WIND_TIMINGS,
};

pub const MIN_FORCE: u8 = 4;
pub const MAX_FORCE: u8 = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("wind force {0} outside 4-12")]
    ForceOutOfRange(u8),

    #[error("compound force must rise: {base} then {second}")]
    CompoundNotRising { base: u8, second: u8 },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WindForce {
    Single(u8),
    Compound {
        base: u8,
        second: u8,
        connector: &'static str,
    },
}

impl WindForce {
    fn validate(&self) -> Result<(), GeneratorError> {
        match *self {
            Self::Single(force) => validate_force(force),
            Self::Compound { base, second, .. } => {
                validate_force(base)?;
                validate_force(second)?;
                if second <= base {
                    return Err(GeneratorError::CompoundNotRising { base, second });
                }
                Ok(())
            }
        }
    }

    /// "5", "gale 8", "7 to severe gale 9". Every component 8 and above goes
    /// through the Beaufort lookup.
    fn phrase(&self) -> String {
        match *self {
            Self::Single(force) => force_phrase(force),
            Self::Compound {
                base,
                second,
                connector,
            } => format!(
                "{} {} {}",
                force_phrase(base),
                connector,
                force_phrase(second)
            ),
        }
    }
}

fn validate_force(force: u8) -> Result<(), GeneratorError> {
    if !(MIN_FORCE..=MAX_FORCE).contains(&force) {
        return Err(GeneratorError::ForceOutOfRange(force));
    }
    Ok(())
}

fn force_phrase(force: u8) -> String {
    match beaufort_name(force) {
        Some(name) => format!("{} {}", name, force),
        None => force.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WindCondition {
    pub direction: &'static str,
    pub force: WindForce,
    pub behavior: Option<&'static str>,
    pub modifier: Option<&'static str>,
    pub timing: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Precipitation {
    pub modifier: &'static str,
    pub kind: &'static str,
}

/// One complete report. All randomness is resolved by the time this exists;
/// the render methods are pure functions of the fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub area: SeaArea,
    pub wind: WindCondition,
    pub precipitation: Precipitation,
    pub icing: Option<&'static str>,
    pub visibility: &'static str,
    pub visibility_becoming: Option<&'static str>,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub ssml: String,
}

impl WeatherReport {
    /// Validate the parts, then render both variants. This is the only way to
    /// build a report, so a malformed one fails here instead of surfacing as
    /// broken output downstream.
    pub fn compose(
        area: SeaArea,
        wind: WindCondition,
        precipitation: Precipitation,
        icing: Option<&'static str>,
        visibility: &'static str,
        visibility_becoming: Option<&'static str>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, GeneratorError> {
        wind.force.validate()?;

        let mut report = Self {
            area,
            wind,
            precipitation,
            icing,
            visibility,
            visibility_becoming,
            timestamp,
            text: String::new(),
            ssml: String::new(),
        };
        report.text = report.render_text();
        report.ssml = report.render_ssml();
        Ok(report)
    }

    /// `Area. Wind[, behavior][, modifier][ timing]. Precipitation.
    /// Visibility[, becoming X]. [Icing.]`. Clause order and punctuation are
    /// a contract; the output-format tests pin them.
    pub fn render_text(&self) -> String {
        format!("{}. {}", self.area.name, self.render_body())
    }

    pub fn render_ssml(&self) -> String {
        ssml::render(&self.area, &self.render_body())
    }

    /// Everything after the area name.
    fn render_body(&self) -> String {
        let mut wind = format!("{} {}", self.wind.direction, self.wind.force.phrase());
        if let Some(behavior) = self.wind.behavior {
            wind.push_str(", ");
            wind.push_str(behavior);
        }
        if let Some(modifier) = self.wind.modifier {
            wind.push_str(", ");
            wind.push_str(modifier);
        }
        if let Some(timing) = self.wind.timing {
            wind.push(' ');
            wind.push_str(timing);
        }

        let precipitation = capitalize(&format!(
            "{} {}",
            self.precipitation.modifier, self.precipitation.kind
        ));

        let mut visibility = capitalize(self.visibility);
        if let Some(becoming) = self.visibility_becoming {
            visibility.push_str(", becoming ");
            visibility.push_str(becoming);
        }

        let mut clauses = vec![wind, precipitation, visibility];
        if let Some(severity) = self.icing {
            clauses.push(capitalize(severity));
        }

        let mut body = clauses.join(". ");
        body.push('.');
        body
    }
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Synthesizes complete reports from the area cycle plus vocabulary draws.
pub struct ReportGenerator {
    config: GeneratorConfig,
    cycler: AreaCycler,
    rng: StdRng,
}

impl ReportGenerator {
    pub fn new(config: GeneratorConfig, mut rng: StdRng) -> Self {
        let cycler = AreaCycler::new(config.phantom_probability, &mut rng);
        Self {
            config,
            cycler,
            rng,
        }
    }

    pub fn generate(&mut self) -> Result<WeatherReport, GeneratorError> {
        let area = self.cycler.next(&mut self.rng);
        let wind = self.draw_wind();
        let precipitation = Precipitation {
            modifier: pick(&mut self.rng, &PRECIPITATION_MODIFIERS),
            kind: pick(&mut self.rng, &PRECIPITATION_TYPES),
        };
        let icing = if self.rng.gen_bool(self.config.icing_probability) {
            Some(pick(&mut self.rng, &ICING_SEVERITIES))
        } else {
            None
        };
        let visibility = pick(&mut self.rng, &VISIBILITIES);
        let visibility_becoming = if self
            .rng
            .gen_bool(self.config.visibility_becoming_probability)
        {
            Some(pick(&mut self.rng, &VISIBILITIES))
        } else {
            None
        };

        WeatherReport::compose(
            area,
            wind,
            precipitation,
            icing,
            visibility,
            visibility_becoming,
            Utc::now(),
        )
    }

    fn draw_wind(&mut self) -> WindCondition {
        let direction = pick(&mut self.rng, &WIND_DIRECTIONS);

        let force = if self.rng.gen_bool(self.config.compound_force_probability) {
            let base = self.rng.gen_range(4..=8);
            let second = base + self.rng.gen_range(1..=2);
            WindForce::Compound {
                base,
                second,
                connector: pick(&mut self.rng, &FORCE_CONNECTORS),
            }
        } else {
            WindForce::Single(self.rng.gen_range(MIN_FORCE..=MAX_FORCE))
        };

        // Independent draws; a report can carry all three.
        let behavior = if self.rng.gen_bool(self.config.behavior_probability) {
            Some(pick(&mut self.rng, &WIND_BEHAVIORS))
        } else {
            None
        };
        let modifier = if self.rng.gen_bool(self.config.modifier_probability) {
            Some(pick(&mut self.rng, &WIND_MODIFIERS))
        } else {
            None
        };
        let timing = if self.rng.gen_bool(self.config.timing_probability) {
            Some(pick(&mut self.rng, &WIND_TIMINGS))
        } else {
            None
        };

        WindCondition {
            direction,
            force,
            behavior,
            modifier,
            timing,
        }
    }
}

fn pick<T: Copy>(rng: &mut StdRng, table: &[T]) -> T {
    table[rng.gen_range(0..table.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::STANDARD_AREAS;
    use rand::SeedableRng;

    fn base_wind(force: WindForce) -> WindCondition {
        WindCondition {
            direction: "Southwesterly",
            force,
            behavior: None,
            modifier: None,
            timing: None,
        }
    }

    fn compose(wind: WindCondition) -> WeatherReport {
        WeatherReport::compose(
            STANDARD_AREAS[7], // Dogger
            wind,
            Precipitation {
                modifier: "occasional",
                kind: "rain",
            },
            None,
            "moderate",
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn render_is_deterministic() {
        let report = compose(base_wind(WindForce::Single(5)));
        assert_eq!(report.render_text(), report.render_text());
        assert_eq!(report.text, report.render_text());
    }

    #[test]
    fn beaufort_names_apply_from_force_eight() {
        let cases = [
            (8, "gale 8"),
            (9, "severe gale 9"),
            (10, "storm 10"),
            (11, "violent storm 11"),
            (12, "hurricane force 12"),
        ];
        for (force, expected) in cases {
            let report = compose(base_wind(WindForce::Single(force)));
            assert!(
                report.text.contains(expected),
                "force {} rendered as {:?}",
                force,
                report.text
            );
        }
    }

    #[test]
    fn low_forces_render_as_bare_numbers() {
        for force in 4..=7 {
            let report = compose(base_wind(WindForce::Single(force)));
            assert!(report.text.contains(&format!("Southwesterly {}.", force)));
            assert!(!report.text.contains("gale"));
        }
    }

    #[test]
    fn severe_gale_nine_appears_verbatim() {
        let report = compose(base_wind(WindForce::Single(9)));
        assert!(report.text.contains("severe gale 9"));
    }

    #[test]
    fn compound_force_renders_each_component() {
        let report = compose(base_wind(WindForce::Compound {
            base: 7,
            second: 9,
            connector: "to",
        }));
        assert!(report.text.contains("Southwesterly 7 to severe gale 9."));
    }

    #[test]
    fn full_report_matches_template_exactly() {
        let report = WeatherReport::compose(
            STANDARD_AREAS[7],
            WindCondition {
                direction: "Southwesterly",
                force: WindForce::Single(5),
                behavior: Some("veering"),
                modifier: Some("increasing"),
                timing: Some("later"),
            },
            Precipitation {
                modifier: "occasional",
                kind: "rain",
            },
            Some("light icing"),
            "moderate",
            Some("poor"),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            report.text,
            "Dogger. Southwesterly 5, veering, increasing later. \
             Occasional rain. Moderate, becoming poor. Light icing."
        );
    }

    #[test]
    fn minimal_report_matches_template_exactly() {
        let report = compose(base_wind(WindForce::Single(4)));
        assert_eq!(
            report.text,
            "Dogger. Southwesterly 4. Occasional rain. Moderate."
        );
    }

    #[test]
    fn out_of_range_force_is_rejected() {
        let result = WeatherReport::compose(
            STANDARD_AREAS[0],
            base_wind(WindForce::Single(3)),
            Precipitation {
                modifier: "light",
                kind: "drizzle",
            },
            None,
            "good",
            None,
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), GeneratorError::ForceOutOfRange(3));
    }

    #[test]
    fn non_rising_compound_is_rejected() {
        let result = WeatherReport::compose(
            STANDARD_AREAS[0],
            base_wind(WindForce::Compound {
                base: 6,
                second: 6,
                connector: "to",
            }),
            Precipitation {
                modifier: "light",
                kind: "drizzle",
            },
            None,
            "good",
            None,
            Utc::now(),
        );
        assert_eq!(
            result.unwrap_err(),
            GeneratorError::CompoundNotRising { base: 6, second: 6 }
        );
    }

    #[test]
    fn generated_reports_are_well_formed() {
        let mut generator =
            ReportGenerator::new(GeneratorConfig::default(), StdRng::seed_from_u64(21));
        for _ in 0..200 {
            let report = generator.generate().unwrap();
            assert!(report.text.ends_with('.'));
            assert!(report.text.starts_with(report.area.name));
            assert!(!report.ssml.is_empty());
        }
    }

    #[test]
    fn icing_probability_one_always_attaches_icing() {
        let config = GeneratorConfig {
            icing_probability: 1.0,
            ..Default::default()
        };
        let mut generator = ReportGenerator::new(config, StdRng::seed_from_u64(5));
        for _ in 0..20 {
            let report = generator.generate().unwrap();
            assert!(report.icing.is_some());
            assert!(report.text.contains("icing."));
        }
    }

    #[test]
    fn becoming_clause_uses_fixed_connector() {
        let config = GeneratorConfig {
            visibility_becoming_probability: 1.0,
            ..Default::default()
        };
        let mut generator = ReportGenerator::new(config, StdRng::seed_from_u64(5));
        let report = generator.generate().unwrap();
        assert!(report.text.contains(", becoming "));
    }
}
