//! Score bands and the advice shown for each.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    NotImmediatelyNecessary,
    MayBeBeneficial,
    Recommended,
    StronglyRecommended,
}

impl RecommendationTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::StronglyRecommended
        } else if score >= 0.6 {
            Self::Recommended
        } else if score >= 0.4 {
            Self::MayBeBeneficial
        } else {
            Self::NotImmediatelyNecessary
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::StronglyRecommended => {
                "MRI scan strongly recommended - urgent medical attention advised"
            }
            Self::Recommended => "MRI scan recommended - schedule medical consultation",
            Self::MayBeBeneficial => {
                "MRI scan may be beneficial - discuss with healthcare provider"
            }
            Self::NotImmediatelyNecessary => {
                "MRI scan may not be immediately necessary - monitor symptoms"
            }
        }
    }
}
