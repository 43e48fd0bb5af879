//! Qualitative labels and color tokens for reliability coefficients.
//!
//! Agreement coefficients (Kappa, Krippendorff's Alpha, percent agreement)
//! use the Landis & Koch scale. Cronbach's Alpha has its own six-band scale
//! ([`ConsistencyBand`]). Both expose `label`, `color_token` and `rank` so
//! reports order and color them the same way.

use serde::{Deserialize, Serialize};

/// Color token for results that could not be computed.
pub const INSUFFICIENT_COLOR: &str = "gray";

/// Label used by every insufficient-data result.
pub const INSUFFICIENT_LABEL: &str = "Insufficient data";

/// Landis & Koch agreement bands, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    Poor,
    Slight,
    Fair,
    Moderate,
    Substantial,
    AlmostPerfect,
}

impl AgreementLevel {
    pub fn from_value(value: f64) -> Self {
        // NaN fails every comparison below; route it to the bottom band.
        if value.is_nan() || value < 0.0 {
            AgreementLevel::Poor
        } else if value < 0.2 {
            AgreementLevel::Slight
        } else if value < 0.4 {
            AgreementLevel::Fair
        } else if value < 0.6 {
            AgreementLevel::Moderate
        } else if value < 0.8 {
            AgreementLevel::Substantial
        } else {
            AgreementLevel::AlmostPerfect
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgreementLevel::Poor => "Poor",
            AgreementLevel::Slight => "Slight",
            AgreementLevel::Fair => "Fair",
            AgreementLevel::Moderate => "Moderate",
            AgreementLevel::Substantial => "Substantial",
            AgreementLevel::AlmostPerfect => "Almost Perfect",
        }
    }

    pub fn color_token(self) -> &'static str {
        match self {
            AgreementLevel::Poor => "red",
            AgreementLevel::Slight => "orange",
            AgreementLevel::Fair => "amber",
            AgreementLevel::Moderate => "yellow",
            AgreementLevel::Substantial => "lime",
            AgreementLevel::AlmostPerfect => "green",
        }
    }

    /// 1 (worst) through 6 (best). 0 is reserved for insufficient data.
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub level: AgreementLevel,
    pub label: &'static str,
    pub color_token: &'static str,
}

/// Map an agreement coefficient to its Landis & Koch band.
pub fn interpret_coefficient(value: f64) -> Interpretation {
    let level = AgreementLevel::from_value(value);
    Interpretation {
        level,
        label: level.label(),
        color_token: level.color_token(),
    }
}

/// Cronbach's Alpha bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyBand {
    Excellent,
    Good,
    Acceptable,
    Questionable,
    Poor,
    Unacceptable,
    InsufficientData,
}

impl ConsistencyBand {
    pub fn from_alpha(alpha: f64) -> Self {
        if alpha >= 0.9 {
            ConsistencyBand::Excellent
        } else if alpha >= 0.8 {
            ConsistencyBand::Good
        } else if alpha >= 0.7 {
            ConsistencyBand::Acceptable
        } else if alpha >= 0.6 {
            ConsistencyBand::Questionable
        } else if alpha >= 0.5 {
            ConsistencyBand::Poor
        } else {
            ConsistencyBand::Unacceptable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConsistencyBand::Excellent => "Excellent",
            ConsistencyBand::Good => "Good",
            ConsistencyBand::Acceptable => "Acceptable",
            ConsistencyBand::Questionable => "Questionable",
            ConsistencyBand::Poor => "Poor",
            ConsistencyBand::Unacceptable => "Unacceptable",
            ConsistencyBand::InsufficientData => INSUFFICIENT_LABEL,
        }
    }

    pub fn color_token(self) -> &'static str {
        match self {
            ConsistencyBand::Excellent => "green",
            ConsistencyBand::Good => "lime",
            ConsistencyBand::Acceptable => "yellow",
            ConsistencyBand::Questionable => "amber",
            ConsistencyBand::Poor => "orange",
            ConsistencyBand::Unacceptable => "red",
            ConsistencyBand::InsufficientData => INSUFFICIENT_COLOR,
        }
    }

    /// 6 (best) through 1 (worst); 0 for insufficient data.
    pub fn rank(self) -> u8 {
        match self {
            ConsistencyBand::Excellent => 6,
            ConsistencyBand::Good => 5,
            ConsistencyBand::Acceptable => 4,
            ConsistencyBand::Questionable => 3,
            ConsistencyBand::Poor => 2,
            ConsistencyBand::Unacceptable => 1,
            ConsistencyBand::InsufficientData => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landis_koch_boundaries() {
        let cases = [
            (-0.3, AgreementLevel::Poor),
            (0.0, AgreementLevel::Slight),
            (0.19, AgreementLevel::Slight),
            (0.2, AgreementLevel::Fair),
            (0.4, AgreementLevel::Moderate),
            (0.6, AgreementLevel::Substantial),
            (0.79, AgreementLevel::Substantial),
            (0.8, AgreementLevel::AlmostPerfect),
            (1.0, AgreementLevel::AlmostPerfect),
        ];
        for (value, expected) in cases {
            assert_eq!(interpret_coefficient(value).level, expected, "value {value}");
        }
    }

    #[test]
    fn nan_is_poor() {
        let interp = interpret_coefficient(f64::NAN);
        assert_eq!(interp.level, AgreementLevel::Poor);
        assert_eq!(interp.color_token, "red");
    }

    #[test]
    fn ranks_follow_band_order() {
        assert!(AgreementLevel::AlmostPerfect.rank() > AgreementLevel::Moderate.rank());
        assert_eq!(AgreementLevel::Poor.rank(), 1);
        assert!(ConsistencyBand::Excellent.rank() > ConsistencyBand::Acceptable.rank());
        assert_eq!(ConsistencyBand::InsufficientData.rank(), 0);
    }

    #[test]
    fn consistency_bands() {
        assert_eq!(ConsistencyBand::from_alpha(0.95), ConsistencyBand::Excellent);
        assert_eq!(ConsistencyBand::from_alpha(0.85), ConsistencyBand::Good);
        assert_eq!(ConsistencyBand::from_alpha(0.7), ConsistencyBand::Acceptable);
        assert_eq!(ConsistencyBand::from_alpha(0.65), ConsistencyBand::Questionable);
        assert_eq!(ConsistencyBand::from_alpha(0.5), ConsistencyBand::Poor);
        assert_eq!(ConsistencyBand::from_alpha(0.1), ConsistencyBand::Unacceptable);
    }
}
