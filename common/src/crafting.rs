//! Keyword-based crafted item parser.
//!
//! Item names such as "Swift Flame Blade of Arcane Speed" are scanned for
//! known keywords; every keyword hit grants [`KEYWORD_BONUS`] points to the
//! property its group maps to.

use rand::Rng;

/// Points granted per matched keyword.
pub const KEYWORD_BONUS: u32 = 5;

/// Upper bound on the number of distinct properties an item keeps.
pub const MAX_PROPERTIES: usize = 5;

/// A group of keywords that all feed the same property.
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub keywords: &'static [&'static str],
    pub property: &'static str,
}

// Duplicates inside a group are intentional: each entry scores separately.
pub const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &[
            "strength", "strong", "power", "force", "forceful", "power", "powerful",
            "overwhelming",
        ],
        property: "strength",
    },
    KeywordGroup {
        keywords: &["sword", "blade", "damage", "cutting", "slicing", "sharp", "damaging"],
        property: "damage",
    },
    KeywordGroup {
        keywords: &[
            "fire", "firey", "flame", "flaming", "burning", "smouldering", "smoking", "ash",
            "embers", "ember", "burns", "burning",
        ],
        property: "fire damage",
    },
    KeywordGroup {
        keywords: &["ice", "icey", "frozen", "cold", "freezing", "frost", "frosty", "shivering"],
        property: "cold damage",
    },
    KeywordGroup {
        keywords: &["arcane", "magic", "enchanted", "mana"],
        property: "arcane damage",
    },
    KeywordGroup {
        keywords: &[
            "healing", "restoring", "blessed", "regenerative", "regeneration", "restoration",
            "health",
        ],
        property: "healing",
    },
    KeywordGroup {
        keywords: &["defense", "shield", "block"],
        property: "defense",
    },
    KeywordGroup {
        keywords: &["poison", "toxic", "venom"],
        property: "poison damage",
    },
    KeywordGroup {
        keywords: &["electric", "shock", "thunder"],
        property: "electric damage",
    },
    KeywordGroup {
        keywords: &["stealth", "sneak", "invisible", "stealthy", "sneaky"],
        property: "stealth",
    },
    KeywordGroup {
        keywords: &["explosive", "blast", "boom"],
        property: "explosive damage",
    },
    KeywordGroup {
        keywords: &["range", "gun", "bow", "crossbow", "pistol", "rifle", "distance", "long"],
        property: "range",
    },
    KeywordGroup {
        keywords: &["accuracy", "precise", "sharp"],
        property: "accuracy",
    },
    KeywordGroup {
        keywords: &["agility", "nimble", "quick"],
        property: "agility",
    },
    KeywordGroup {
        keywords: &["vampire", "lifesteal", "drain"],
        property: "life steal",
    },
    KeywordGroup {
        keywords: &["holy", "divine", "sacred"],
        property: "holy damage",
    },
    KeywordGroup {
        keywords: &["dark", "shadow", "evil"],
        property: "dark damage",
    },
    KeywordGroup {
        keywords: &["water", "aqua", "wet"],
        property: "water damage",
    },
    KeywordGroup {
        keywords: &["wind", "air", "gust"],
        property: "wind damage",
    },
    KeywordGroup {
        keywords: &["earth", "rock", "stone"],
        property: "earth damage",
    },
];

/// e.g. strength 10, fire damage 5
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemProperty {
    pub name: &'static str,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftedItem {
    pub name: String,
    pub properties: Vec<ItemProperty>,
}

impl CraftedItem {
    /// Parses `name` into a crafted item, trimming excess properties at random.
    pub fn from_name<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        let name = name.into();
        let properties = parse_item_properties(&name, rng);
        Self { name, properties }
    }

    pub fn property(&self, name: &str) -> Option<u32> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.value)
    }
}

impl std::fmt::Display for CraftedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.name)?;
        for property in &self.properties {
            writeln!(f, "{} {}", property.name.to_uppercase(), property.value)?;
        }
        Ok(())
    }
}

/// Scores every keyword group against `name` without trimming.
pub fn score_keywords(name: &str) -> Vec<ItemProperty> {
    let lowered = name.to_lowercase();
    let mut properties: Vec<ItemProperty> = Vec::new();

    for group in KEYWORD_GROUPS {
        for keyword in group.keywords {
            if !lowered.contains(keyword) {
                continue;
            }

            match properties
                .iter_mut()
                .find(|property| property.name == group.property)
            {
                Some(existing) => existing.value += KEYWORD_BONUS,
                None => properties.push(ItemProperty {
                    name: group.property,
                    value: KEYWORD_BONUS,
                }),
            }
        }
    }

    properties
}

/// Scores `name` and drops random properties until at most
/// [`MAX_PROPERTIES`] remain.
pub fn parse_item_properties<R: Rng + ?Sized>(name: &str, rng: &mut R) -> Vec<ItemProperty> {
    let mut properties = score_keywords(name);
    while properties.len() > MAX_PROPERTIES {
        let index = rng.gen_range(0..properties.len());
        properties.remove(index);
    }
    properties
}
