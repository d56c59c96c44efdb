use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};

pub const CUSTOM_PRESET_ID: &str = "custom";

pub const MAX_ROUNDS: u32 = 99;
pub const MIN_CUSTOM_ROUND_SECS: u32 = 10;
pub const MAX_CUSTOM_ROUND_SECS: u32 = 3600;
pub const MAX_CUSTOM_REST_SECS: u32 = 600;

const ROUND_STEP_SECS: u32 = 30;
const REST_STEP_SECS: u32 = 10;

/// Accent colour of a preset, as plain RGB so the engine stays free of any UI crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accent(pub u8, pub u8, pub u8);

/// Named interval scheme: how many rounds, how long each lasts, how long to rest in between
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub rounds: u32,
    pub round_duration_secs: u32,
    pub rest_duration_secs: u32,
    pub accent: Accent,
}

impl Preset {
    pub fn new(
        id: &str,
        name: &str,
        short_name: &str,
        rounds: u32,
        round_duration_secs: u32,
        rest_duration_secs: u32,
        accent: Accent,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            short_name: short_name.to_string(),
            rounds,
            round_duration_secs,
            rest_duration_secs,
            accent,
        }
    }

    /// Build the "custom" preset from user supplied values
    pub fn custom(rounds: u32, round_duration_secs: u32, rest_duration_secs: u32) -> Self {
        Self {
            rounds,
            round_duration_secs,
            rest_duration_secs,
            ..default_custom()
        }
    }

    /// Rejects presets the engine cannot run. Durations are unsigned so a
    /// negative rest cannot be represented in the first place.
    pub fn validate(&self) -> Result<()> {
        if self.rounds < 1 {
            return Err(TimerError::invalid(format!(
                "{}: rounds must be at least 1, got {}",
                self.id, self.rounds
            )));
        }
        if self.round_duration_secs < 1 {
            return Err(TimerError::invalid(format!(
                "{}: round duration must be at least 1s, got {}s",
                self.id, self.round_duration_secs
            )));
        }
        Ok(())
    }

    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_PRESET_ID
    }

    pub fn has_rest(&self) -> bool {
        self.rest_duration_secs > 0
    }

    /// Seconds an uninterrupted session lasts, rests between rounds included
    pub fn total_secs(&self) -> u64 {
        let rounds = self.rounds as u64;
        let rest = if self.has_rest() {
            rounds.saturating_sub(1) * self.rest_duration_secs as u64
        } else {
            0
        };
        rounds * self.round_duration_secs as u64 + rest
    }
}

/// The disciplines shown on the gym floor, custom last
pub fn catalog() -> Vec<Preset> {
    vec![
        Preset::new("mma", "MMA", "MMA", 3, 300, 60, Accent(0xEF, 0x44, 0x44)),
        Preset::new("boxing", "Boxing", "BOX", 12, 180, 60, Accent(0xF5, 0x9E, 0x0B)),
        Preset::new("bjj", "BJJ", "BJJ", 5, 360, 30, Accent(0x3B, 0x82, 0xF6)),
        Preset::new("muaythai", "Muay Thai", "MT", 5, 180, 120, Accent(0x10, 0xB9, 0x81)),
        Preset::new("grappling", "Grappling", "GRP", 5, 360, 30, Accent(0x8B, 0x5C, 0xF6)),
        default_custom(),
    ]
}

fn default_custom() -> Preset {
    Preset::new(CUSTOM_PRESET_ID, "Custom", "CFG", 3, 180, 60, Accent(0x6B, 0x72, 0x80))
}

pub fn find_preset(id: &str) -> Result<Preset> {
    catalog()
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| TimerError::UnknownPreset(id.to_string()))
}

/// Which knob of the custom preset is being turned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomField {
    Rounds,
    RoundDuration,
    RestDuration,
}

impl Preset {
    /// Step one field of the custom preset up or down, clamped to the ranges
    /// the gym display allows.
    pub fn adjust(&mut self, field: CustomField, up: bool) {
        match field {
            CustomField::Rounds => {
                self.rounds = if up {
                    self.rounds.saturating_add(1).min(MAX_ROUNDS)
                } else {
                    self.rounds.saturating_sub(1).max(1)
                };
            }
            CustomField::RoundDuration => {
                self.round_duration_secs = if up {
                    self.round_duration_secs
                        .saturating_add(ROUND_STEP_SECS)
                        .min(MAX_CUSTOM_ROUND_SECS)
                } else {
                    self.round_duration_secs
                        .saturating_sub(ROUND_STEP_SECS)
                        .max(MIN_CUSTOM_ROUND_SECS)
                };
            }
            CustomField::RestDuration => {
                self.rest_duration_secs = if up {
                    self.rest_duration_secs
                        .saturating_add(REST_STEP_SECS)
                        .min(MAX_CUSTOM_REST_SECS)
                } else {
                    self.rest_duration_secs.saturating_sub(REST_STEP_SECS)
                };
            }
        }
    }
}

/// `M:SS`, minutes unpadded
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Human readable duration for preset cards: `5 min`, `1m 30s`, `45s`
pub fn format_duration(secs: u32) -> String {
    let mins = secs / 60;
    let rest = secs % 60;
    match (mins, rest) {
        (0, s) => format!("{}s", s),
        (m, 0) => format!("{} min", m),
        (m, s) => format!("{}m {}s", m, s),
    }
}
