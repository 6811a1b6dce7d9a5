//! Built-in storm scenarios used when no scenario directory is configured.

use std::collections::BTreeMap;

use super::types::{
    ActionDefinition, DisplayText, ScenarioConfig, ScenarioSpec, ZoneParameters,
};

/// Hours in a built-in scenario.
const BUILTIN_HOURS: usize = 24;

/// Piecewise-linear storm profile: flat base, linear rise to the peak,
/// linear fall back towards base, then a drier tail at 60% of base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainShape {
    pub base: f64,
    pub peak: f64,
    pub rise_start: usize,
    pub rise_end: usize,
    pub fall_end: usize,
}

impl RainShape {
    /// Hourly rainfall, rounded to 0.01 mm.
    pub fn build_series(&self, hours: usize) -> Vec<f64> {
        (0..hours)
            .map(|h| {
                let value = if h < self.rise_start {
                    self.base
                } else if h <= self.rise_end {
                    let span = (self.rise_end - self.rise_start + 1) as f64;
                    self.base + (self.peak - self.base) * ((h - self.rise_start) as f64 / span)
                } else if h <= self.fall_end {
                    let span = (self.fall_end - self.rise_end + 1) as f64;
                    self.peak - (self.peak - self.base) * ((h - self.rise_end) as f64 / span)
                } else {
                    (self.base * 0.6).max(0.0)
                };
                (value * 100.0).round() / 100.0
            })
            .collect()
    }
}

fn zone(a: f64, b: f64, c: f64, threshold: f64, damage_scale: f64) -> ZoneParameters {
    ZoneParameters {
        a,
        b,
        c,
        threshold,
        damage_scale,
    }
}

fn text(en: &str, zh: &str) -> DisplayText {
    DisplayText::Localized(BTreeMap::from([
        ("en".to_string(), en.to_string()),
        ("zh".to_string(), zh.to_string()),
    ]))
}

fn city_zones() -> BTreeMap<String, ZoneParameters> {
    BTreeMap::from([
        ("industrial".to_string(), zone(0.80, 0.10, 0.50, 5.0, 6.0)),
        ("residential".to_string(), zone(0.85, 0.12, 0.60, 4.5, 10.0)),
        ("lowland".to_string(), zone(0.90, 0.15, 0.70, 3.5, 12.0)),
    ])
}

fn city_actions() -> BTreeMap<String, ActionDefinition> {
    BTreeMap::from([
        ("none".to_string(), ActionDefinition { cost: 0.0, effect: 0.0 }),
        ("pump".to_string(), ActionDefinition { cost: 8.0, effect: 4.0 }),
        ("sandbag".to_string(), ActionDefinition { cost: 4.0, effect: 1.5 }),
        ("funding".to_string(), ActionDefinition { cost: 12.0, effect: 30.0 }),
    ])
}

fn storm(
    id: &str,
    name: DisplayText,
    description: DisplayText,
    initial_budget: f64,
    shape: RainShape,
) -> ScenarioSpec {
    ScenarioSpec {
        id: id.to_string(),
        name,
        description,
        time_step_hr: 1,
        config: ScenarioConfig::new(
            initial_budget,
            city_zones(),
            city_actions(),
            shape.build_series(BUILTIN_HOURS),
        ),
    }
}

/// The `weak`, `medium` and `strong` storms.
pub fn builtin_scenarios() -> Vec<ScenarioSpec> {
    vec![
        storm(
            "weak",
            text("Passing Shower", "短暫陣雨"),
            text("Light afternoon rain. A quiet shift.", "午後短暫降雨，相對平靜的值勤。"),
            60.0,
            RainShape {
                base: 0.2,
                peak: 1.0,
                rise_start: 6,
                rise_end: 10,
                fall_end: 16,
            },
        ),
        storm(
            "medium",
            text("Plum Rain Front", "梅雨鋒面"),
            text(
                "A persistent front with a long wet peak.",
                "滯留鋒面帶來長時間降雨。",
            ),
            50.0,
            RainShape {
                base: 1.5,
                peak: 6.0,
                rise_start: 4,
                rise_end: 11,
                fall_end: 18,
            },
        ),
        storm(
            "strong",
            text("Typhoon Landfall", "颱風登陸"),
            text(
                "Extreme rainfall. Every hour counts.",
                "極端降雨，分秒必爭。",
            ),
            40.0,
            RainShape {
                base: 5.0,
                peak: 60.0,
                rise_start: 3,
                rise_end: 8,
                fall_end: 16,
            },
        ),
    ]
}
