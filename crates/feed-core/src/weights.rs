//! Built-in weight profiles for post scoring.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serendipity weight applied to every preset.
pub const DEFAULT_SERENDIPITY: f64 = 0.10;

/// Weights for the four score signals plus the random serendipity term.
/// Weights need not sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeightProfile {
    pub learning: f64,
    pub engagement: f64,
    pub breakthrough: f64,
    pub mood: f64,
    #[serde(default = "default_serendipity")]
    pub serendipity: f64,
}

fn default_serendipity() -> f64 {
    DEFAULT_SERENDIPITY
}

impl WeightProfile {
    /// Same weights with the random term switched off.
    pub fn without_serendipity(self) -> Self {
        Self {
            serendipity: 0.0,
            ..self
        }
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Preset::Balanced.weights()
    }
}

/// Named weight profiles offered by the profile selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Balanced,
    Scholar,
    Social,
    Creative,
    Uplifting,
}

impl Preset {
    /// All presets in selector order.
    pub const ALL: [Preset; 5] = [
        Preset::Balanced,
        Preset::Scholar,
        Preset::Social,
        Preset::Creative,
        Preset::Uplifting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Balanced => "balanced",
            Preset::Scholar => "scholar",
            Preset::Social => "social",
            Preset::Creative => "creative",
            Preset::Uplifting => "uplifting",
        }
    }

    /// Capitalized name for display ("Balanced").
    pub fn title(&self) -> &'static str {
        match self {
            Preset::Balanced => "Balanced",
            Preset::Scholar => "Scholar",
            Preset::Social => "Social",
            Preset::Creative => "Creative",
            Preset::Uplifting => "Uplifting",
        }
    }

    /// Weights for this preset. Serendipity is fixed at [`DEFAULT_SERENDIPITY`].
    pub fn weights(&self) -> WeightProfile {
        let (learning, engagement, breakthrough, mood) = match self {
            Preset::Balanced => (0.25, 0.30, 0.25, 0.20),
            Preset::Scholar => (0.40, 0.15, 0.30, 0.15),
            Preset::Social => (0.15, 0.45, 0.20, 0.20),
            Preset::Creative => (0.20, 0.20, 0.40, 0.20),
            Preset::Uplifting => (0.15, 0.25, 0.20, 0.40),
        };
        WeightProfile {
            learning,
            engagement,
            breakthrough,
            mood,
            serendipity: DEFAULT_SERENDIPITY,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}' (expected one of: balanced, scholar, social, creative, uplifting)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
