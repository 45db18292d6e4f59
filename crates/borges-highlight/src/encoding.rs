//! Visual encoding: scores → color, size, pulse, and primary-link stroke.
//!
//! Colors are plain RGB triples internally and CSS strings on the wire
//! (`#rrggbb` out; `#rgb`, `#rrggbb`, `rgb(r, g, b)` in).

use std::fmt;

use crate::config::HighlightConfig;
use crate::model::PulseIntensity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn map_channels(self, f: impl Fn(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Parse the CSS color forms the renderer emits. Returns `None` for
    /// anything else (named colors, hsl, gradients).
    pub fn parse_css(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let inner = s
            .strip_prefix("rgb(")
            .or_else(|| s.strip_prefix("rgba("))?
            .strip_suffix(')')?;
        let mut parts = inner.split(',').map(str::trim);
        let r = parts.next()?.parse::<u8>().ok()?;
        let g = parts.next()?.parse::<u8>().ok()?;
        let b = parts.next()?.parse::<u8>().ok()?;
        Some(Self::new(r, g, b))
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Entity categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Person,
    Location,
    Event,
    Concept,
    Organization,
    Work,
    Other,
}

impl EntityCategory {
    /// Map an extractor type label (English or French, any case) to a category.
    pub fn from_type(entity_type: &str) -> Self {
        let t = entity_type.trim().trim_matches('"').to_lowercase();
        match t.as_str() {
            "person" | "persons" | "people" | "personne" | "personnes" | "character"
            | "characters" | "personnage" | "personnages" | "author" | "auteur" => Self::Person,
            "location" | "locations" | "geo" | "place" | "places" | "lieu" | "lieux" | "city"
            | "country" | "ville" | "pays" => Self::Location,
            "event" | "events" | "événement" | "événements" | "evenement" | "evenements" => {
                Self::Event
            }
            "concept" | "concepts" | "idea" | "idée" | "theme" | "thème" | "themes" | "thèmes" => {
                Self::Concept
            }
            "organization" | "organizations" | "organisation" | "organisations" | "org"
            | "institution" => Self::Organization,
            "work" | "works" | "book" | "books" | "oeuvre" | "œuvre" | "oeuvres" | "œuvres"
            | "livre" | "livres" => Self::Work,
            _ => Self::Other,
        }
    }

    pub const fn base_color(self) -> Rgb {
        match self {
            Self::Person => Rgb::new(255, 107, 107),
            Self::Location => Rgb::new(78, 205, 196),
            Self::Event => Rgb::new(255, 193, 7),
            Self::Concept => Rgb::new(155, 89, 182),
            Self::Organization => Rgb::new(52, 152, 219),
            Self::Work => Rgb::new(46, 204, 113),
            Self::Other => Rgb::new(149, 165, 166),
        }
    }
}

// ============================================================================
// Node encodings
// ============================================================================

/// Highlight color: the category base color scaled by the match quality
/// (`intelligence = score × semantic score`) and lifted by importance.
pub fn node_color(
    entity_type: &str,
    intelligence: f64,
    importance: f64,
    config: &HighlightConfig,
) -> Rgb {
    let intensity = 0.7 + intelligence * 0.6;
    let boost = importance * config.brightness_boost;
    EntityCategory::from_type(entity_type)
        .base_color()
        .map_channels(|c| clamp_channel(f64::from(c) * intensity + boost))
}

pub fn node_size(base: f64, intelligence: f64, importance: f64, config: &HighlightConfig) -> f64 {
    (base * (1.2 + intelligence * 0.8 + importance * 0.5)).max(config.min_node_size)
}

/// Fade a color toward black; more relevant nodes fade less.
pub fn dimmed_color(color: Rgb, relevance: f64) -> Rgb {
    let factor = 0.2 + relevance * 0.3;
    color.map_channels(|c| clamp_channel(f64::from(c) * factor))
}

pub fn pulse_intensity(importance: f64, config: &HighlightConfig) -> PulseIntensity {
    if importance > config.pulse_high_threshold {
        PulseIntensity::High
    } else if importance > config.pulse_medium_threshold {
        PulseIntensity::Medium
    } else {
        PulseIntensity::Low
    }
}

fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.floor().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Link encodings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LinkStyle {
    pub stroke_width: f64,
    /// `None` draws a solid line.
    pub stroke_dash_array: Option<&'static str>,
    pub animation_delay: f64,
}

/// Stroke for a link that lies on the reasoning trace.
pub fn primary_link_style(priority: f64, traversal_order: u32, config: &HighlightConfig) -> LinkStyle {
    let stroke_dash_array = if priority > 0.8 {
        None
    } else if priority > 0.5 {
        Some("5,2")
    } else {
        Some("2,3")
    };
    LinkStyle {
        stroke_width: 2.0 + priority * 3.0,
        stroke_dash_array,
        animation_delay: f64::from(traversal_order) * config.animation_step_secs,
    }
}
