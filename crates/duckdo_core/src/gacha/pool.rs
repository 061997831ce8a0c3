//! Static reward catalog.

use crate::model::collectible::{CollectibleTemplate, RarityTier};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STANDARD_TEMPLATES: &[CollectibleTemplate] = &[
    CollectibleTemplate {
        name: "Rubber Ducky",
        rarity: RarityTier::Common,
        image_ref: "https://picsum.photos/seed/duck1/200",
        flavor_text: "Just a classic yellow friend.",
    },
    CollectibleTemplate {
        name: "Puddle Duck",
        rarity: RarityTier::Common,
        image_ref: "https://picsum.photos/seed/duck2/200",
        flavor_text: "Loves rainy days.",
    },
    CollectibleTemplate {
        name: "Baker Duck",
        rarity: RarityTier::Common,
        image_ref: "https://picsum.photos/seed/duck3/200",
        flavor_text: "Always smells like bread.",
    },
    CollectibleTemplate {
        name: "Pilot Duck",
        rarity: RarityTier::Rare,
        image_ref: "https://picsum.photos/seed/duck4/200",
        flavor_text: "Ready for takeoff.",
    },
    CollectibleTemplate {
        name: "Ninja Duck",
        rarity: RarityTier::Rare,
        image_ref: "https://picsum.photos/seed/duck5/200",
        flavor_text: "Silent but quacky.",
    },
    CollectibleTemplate {
        name: "Wizard Duck",
        rarity: RarityTier::Epic,
        image_ref: "https://picsum.photos/seed/duck6/200",
        flavor_text: "Casts spells of breadcrumbs.",
    },
    CollectibleTemplate {
        name: "Cyborg Duck",
        rarity: RarityTier::Epic,
        image_ref: "https://picsum.photos/seed/duck7/200",
        flavor_text: "Half machine, full quack.",
    },
    CollectibleTemplate {
        name: "King Golden Duck",
        rarity: RarityTier::Legendary,
        image_ref: "https://picsum.photos/seed/duck8/200",
        flavor_text: "The ruler of the pond.",
    },
];

/// Catalog construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A tier has no template, so a draw resolving to it could not sample.
    EmptyTier(RarityTier),
    /// Two templates share an identity name.
    DuplicateName(&'static str),
}

impl Display for PoolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTier(tier) => write!(f, "reward pool has no `{}` template", tier.as_str()),
            Self::DuplicateName(name) => write!(f, "reward pool repeats template `{name}`"),
        }
    }
}

impl Error for PoolError {}

/// Validated catalog of collectible templates.
///
/// # Invariants
/// - Every `RarityTier` has at least one template.
/// - Template names are unique.
#[derive(Debug, Clone, Copy)]
pub struct RewardPool {
    templates: &'static [CollectibleTemplate],
}

impl RewardPool {
    /// Validates and wraps a template catalog.
    pub fn new(templates: &'static [CollectibleTemplate]) -> Result<Self, PoolError> {
        for tier in RarityTier::ALL {
            if !templates.iter().any(|template| template.rarity == tier) {
                return Err(PoolError::EmptyTier(tier));
            }
        }
        for (index, template) in templates.iter().enumerate() {
            if templates[..index]
                .iter()
                .any(|earlier| earlier.name == template.name)
            {
                return Err(PoolError::DuplicateName(template.name));
            }
        }
        Ok(Self { templates })
    }

    /// The built-in duck catalog.
    pub fn standard() -> Self {
        Self {
            templates: STANDARD_TEMPLATES,
        }
    }

    pub fn templates(&self) -> &'static [CollectibleTemplate] {
        self.templates
    }

    /// Templates of one tier, in catalog order. Never empty.
    pub fn tier_templates(&self, tier: RarityTier) -> Vec<&'static CollectibleTemplate> {
        self.templates
            .iter()
            .filter(|template| template.rarity == tier)
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&'static CollectibleTemplate> {
        self.templates.iter().find(|template| template.name == name)
    }
}

impl Default for RewardPool {
    fn default() -> Self {
        Self::standard()
    }
}
