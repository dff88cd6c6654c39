//! Coarse per-stage presets.
//!
//! Knobs are applied to the advanced configuration when a recipe is
//! compiled. Every knob's default leaves the configuration untouched.

use serde::{Deserialize, Serialize};

use crate::climate::{LatitudeLapseConfig, PrecipitationStrategy, RefinePrecipitationStrategy, SwatchStrategy};
use crate::hydrology::RiverStrategy;
use crate::morphology::LandmaskStrategy;
use crate::projection::FeatureProjectionStrategy;
use crate::tectonics::{GenerationParams, PlateConfig};

macro_rules! knob {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

knob!(
    /// Number of plates.
    PlatesKnob { Few => "few", Normal => "normal", Many => "many" } default Normal
);
knob!(
    /// Plate motion and boundary reach.
    ActivityKnob { Calm => "calm", Normal => "normal", Violent => "violent" } default Normal
);
knob!(
    /// Share of the map under water.
    WaterKnob { Low => "low", Normal => "normal", High => "high" } default Normal
);
knob!(
    /// Rainfall.
    DrynessKnob { Wet => "wet", Mix => "mix", Dry => "dry" } default Mix
);
knob!(
    /// Global temperature offset.
    TemperatureKnob { Cold => "cold", Temperate => "temperate", Hot => "hot" } default Temperate
);
knob!(
    /// River density.
    RiversKnob { Sparse => "sparse", Normal => "normal", Dense => "dense" } default Normal
);
knob!(
    /// Weight of the local rainfall corrections.
    StoryKnob { Off => "off", Light => "light", Strong => "strong" } default Light
);
knob!(
    /// Whether macro rainfall belts run.
    SwatchesKnob { Off => "off", Auto => "auto" } default Auto
);
knob!(
    /// Feature density on the game map.
    FeaturesKnob { Sparse => "sparse", Normal => "normal", Lush => "lush" } default Normal
);

impl PlatesKnob {
    pub fn apply(self, plates: &mut PlateConfig) {
        let factor = match self {
            PlatesKnob::Few => 0.6,
            PlatesKnob::Normal => return,
            PlatesKnob::Many => 1.5,
        };
        plates.count = ((plates.count as f32 * factor).round() as usize).max(2);
    }
}

impl ActivityKnob {
    pub fn apply(self, plates: &mut PlateConfig, params: &mut GenerationParams) {
        match self {
            ActivityKnob::Calm => {
                plates.rotation_multiplier *= 0.5;
                params.influence_decay *= 1.2;
            }
            ActivityKnob::Normal => {}
            ActivityKnob::Violent => {
                plates.rotation_multiplier *= 1.6;
                plates.convergence_mix = (plates.convergence_mix + 0.1).min(1.0);
                params.influence_decay *= 0.8;
            }
        }
    }
}

impl WaterKnob {
    pub fn apply(self, landmask: &mut LandmaskStrategy) {
        let sign = match self {
            WaterKnob::Low => -1.0,
            WaterKnob::Normal => return,
            WaterKnob::High => 1.0,
        };
        match landmask {
            LandmaskStrategy::TargetWater(c) => {
                c.water_percent = (c.water_percent + sign * 12.0).clamp(0.0, 100.0);
            }
            LandmaskStrategy::FixedSeaLevel(c) => c.sea_level_m += sign * 300.0,
        }
    }
}

impl DrynessKnob {
    pub fn apply(self, precipitation: &mut PrecipitationStrategy) {
        let factor = match self {
            DrynessKnob::Wet => 1.25,
            DrynessKnob::Mix => return,
            DrynessKnob::Dry => 0.7,
        };
        *precipitation.rainfall_scale_mut() *= factor;
    }
}

impl TemperatureKnob {
    pub fn apply(self, temperature: &mut LatitudeLapseConfig) {
        temperature.offset_c += match self {
            TemperatureKnob::Cold => -5.0,
            TemperatureKnob::Temperate => 0.0,
            TemperatureKnob::Hot => 5.0,
        };
    }
}

impl RiversKnob {
    pub fn apply(self, rivers: &mut RiverStrategy) {
        let factor = match self {
            RiversKnob::Sparse => 1.6,
            RiversKnob::Normal => return,
            RiversKnob::Dense => 0.6,
        };
        match rivers {
            RiverStrategy::AccumulationThreshold(c) => c.scale_thresholds(factor),
        }
    }
}

impl StoryKnob {
    pub fn apply(self, refine: &mut RefinePrecipitationStrategy) {
        let factor = match self {
            StoryKnob::Off => 0.0,
            StoryKnob::Light => return,
            StoryKnob::Strong => 1.75,
        };
        if let RefinePrecipitationStrategy::Refine(c) = refine {
            c.strength *= factor;
        }
    }
}

impl SwatchesKnob {
    pub fn apply(self, swatches: &mut SwatchStrategy) {
        if self == SwatchesKnob::Off {
            *swatches = SwatchStrategy::default();
        }
    }
}

impl FeaturesKnob {
    pub fn apply(self, features: &mut FeatureProjectionStrategy) {
        let factor = match self {
            FeaturesKnob::Sparse => 0.6,
            FeaturesKnob::Normal => return,
            FeaturesKnob::Lush => 1.4,
        };
        match features {
            FeatureProjectionStrategy::Density(c) => c.density = (c.density * factor).min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::RefineConfig;
    use crate::morphology::TargetWaterConfig;

    #[test]
    fn neutral_knobs_change_nothing() {
        let mut plates = PlateConfig::default();
        let mut params = GenerationParams::default();
        PlatesKnob::default().apply(&mut plates);
        ActivityKnob::default().apply(&mut plates, &mut params);
        assert_eq!(plates, PlateConfig::default());
        assert_eq!(params, GenerationParams::default());

        let mut refine = RefinePrecipitationStrategy::default();
        StoryKnob::default().apply(&mut refine);
        assert_eq!(refine, RefinePrecipitationStrategy::default());
    }

    #[test]
    fn water_knob_moves_the_target() {
        let mut mask = LandmaskStrategy::TargetWater(TargetWaterConfig { water_percent: 95.0 });
        WaterKnob::High.apply(&mut mask);
        assert_eq!(mask, LandmaskStrategy::TargetWater(TargetWaterConfig { water_percent: 100.0 }));
        WaterKnob::Low.apply(&mut mask);
        assert_eq!(mask, LandmaskStrategy::TargetWater(TargetWaterConfig { water_percent: 88.0 }));
    }

    #[test]
    fn story_off_zeroes_refinement() {
        let mut refine = RefinePrecipitationStrategy::Refine(RefineConfig::default());
        StoryKnob::Off.apply(&mut refine);
        match refine {
            RefinePrecipitationStrategy::Refine(c) => assert_eq!(c.strength, 0.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn knob_names_are_kebab_case() {
        for k in PlatesKnob::ALL {
            assert_eq!(serde_json::to_value(k).unwrap(), serde_json::Value::from(k.name()));
        }
        assert_eq!(serde_json::to_value(SwatchesKnob::Off).unwrap(), "off");
    }
}
