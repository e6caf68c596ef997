//! Apparel classification: domain filtering and display-metadata
//! derivation from free-text vendor names and descriptions.
//!
//! Everything here is a pure function over its inputs. Each classification
//! axis (garment type, audience, subcategory) is an ordered rule table
//! evaluated first-match-wins, so the behavior is reproducible and each
//! table is unit-testable on its own. Rule order within a table is a
//! deliberate tie-break and must not be reordered.

use sugar_plum_core::{Audience, GarmentType, Subcategory};

use crate::vendor::VendorItem;

// =============================================================================
// Rule tables
// =============================================================================

/// Words that mark an item name as apparel.
const APPAREL_KEYWORDS: &[&str] = &[
    "shirt",
    "t-shirt",
    "t shirt",
    "tee",
    "hoodie",
    "sweatshirt",
    "crew",
    "long sleeve",
    "tank",
];

/// Substrings that mark a variation name as carrying a size.
const SIZE_KEYWORDS: &[&str] = &[
    "small", "medium", "large", "x-large", "xl", "2xl", "3xl", "4xl", "5xl", "youth", "toddler",
    "adult", "xs", "s.", "m.", "l.",
];

/// Garment words that must never be mistaken for a color.
const GARMENT_WORDS: &[&str] = &["shirt", "t-shirt", "tee", "tank", "hoodie", "sweatshirt"];

/// Garment type rules, highest priority first.
const GARMENT_RULES: &[(&[&str], GarmentType)] = &[
    (&["hoodie"], GarmentType::Hoodie),
    (&["sweatshirt", "crew"], GarmentType::Sweatshirt),
    (&["long sleeve"], GarmentType::LongSleeve),
    (&["tank"], GarmentType::Tank),
];

/// Name words suggesting a design aimed at women.
const FEMININE_NAME_WORDS: &[&str] = &[
    "mama",
    "wife",
    "girly",
    "girl",
    "swiftie",
    "bow",
    "ballerina",
    "cheer",
    "dance",
];

/// Color words suggesting a design aimed at women.
const FEMININE_COLOR_WORDS: &[&str] = &[
    "pink",
    "hot pink",
    "light pink",
    "dark pink",
    "peach",
    "coral",
    "mint",
    "lavender",
    "purple",
    "rose",
];

/// Theme subcategory rules. Group order is the tie-break: an item matching
/// several groups resolves to the earliest one.
const SUBCATEGORY_RULES: &[(Subcategory, &[&str])] = &[
    (
        Subcategory::Christmas,
        &["grinch", "christmas", "xmas", "santa", "elf", "reindeer"],
    ),
    (
        Subcategory::Thanksgiving,
        &["thanksgiving", "turkey", "gobble", "thankful", "fall", "autumn"],
    ),
    (
        Subcategory::Halloween,
        &["halloween", "witch", "ghost", "pumpkin", "spooky", "boo", "skeleton"],
    ),
    (
        Subcategory::Valentine,
        &["valentine", "valentines", "love", "heart", "cupid"],
    ),
    (
        Subcategory::Easter,
        &["easter", "bunny", "egg", "resurrection"],
    ),
    (
        Subcategory::Patriotic,
        &[
            "usa",
            "american",
            "america",
            "flag",
            "patriotic",
            "freedom",
            "merica",
            "4th of july",
            "independence",
        ],
    ),
    (
        Subcategory::Faith,
        &[
            "faith", "jesus", "cross", "blessed", "bible", "pray", "prayer", "church", "god ",
        ],
    ),
    (
        Subcategory::Animals,
        &[
            "dog", "dogs", "cat", "cow", "goat", "chicken", "horse", "animal", "paw",
        ],
    ),
    (
        Subcategory::HuntingFishing,
        &[
            "hunt",
            "hunting",
            "deer",
            "buck",
            "duck",
            "antler",
            "fishing",
            "fish",
            "bass",
            "crappie",
            "rifle",
            "bowhunting",
            "bow hunting",
        ],
    ),
    (
        Subcategory::Sports,
        &[
            "football",
            "baseball",
            "softball",
            "basketball",
            "soccer",
            "sports",
            "touchdown",
            "homerun",
            "home run",
        ],
    ),
    (
        Subcategory::HumorTrendy,
        &[
            "sarcasm", "funny", "humor", "snark", "trendy", "meme", "coffee", "wine",
        ],
    ),
];

// =============================================================================
// Domain filter
// =============================================================================

/// Decide whether a vendor item belongs in the apparel domain.
///
/// True when the item name carries an apparel keyword OR any variation
/// name carries a size keyword. Items with zero variations are never in
/// domain, and the vendor's generic item template (an untitled "T-Shirt"
/// with no image, no parsed sizes, and only "regular" colors) is excluded
/// to suppress template noise.
#[must_use]
pub fn is_in_domain(item: &VendorItem) -> bool {
    if item.variations.is_empty() {
        return false;
    }

    let name = item.name.to_lowercase();
    let variation_text = item
        .variations
        .iter()
        .map(|v| v.name.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let has_apparel_word = APPAREL_KEYWORDS.iter().any(|kw| name.contains(kw));
    let has_size_word = SIZE_KEYWORDS.iter().any(|kw| variation_text.contains(kw));

    if !has_apparel_word && !has_size_word {
        return false;
    }

    !is_placeholder_template(item)
}

/// The vendor seeds new accounts with a bare "T-Shirt" template item.
fn is_placeholder_template(item: &VendorItem) -> bool {
    if item.name != "T-Shirt" || item.image_url.is_some() || !item.image_ids.is_empty() {
        return false;
    }

    let parsed: Vec<ParsedVariation> = item
        .variations
        .iter()
        .map(|v| parse_variation(&v.name))
        .collect();

    let all_sizes_null = parsed.iter().all(|p| p.size.is_none());
    let all_colors_regular = parsed.iter().all(|p| {
        p.color
            .as_deref()
            .unwrap_or_default()
            .eq_ignore_ascii_case("regular")
    });

    all_sizes_null && all_colors_regular
}

// =============================================================================
// Garment type
// =============================================================================

/// Infer the garment type from an item name. First matching rule wins;
/// anything unmatched is a T-shirt.
#[must_use]
pub fn garment_type(name: &str) -> GarmentType {
    let name = name.to_lowercase();

    GARMENT_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| name.contains(kw)))
        .map_or(GarmentType::TShirt, |(_, garment)| *garment)
}

// =============================================================================
// Variation parsing
// =============================================================================

/// Size and color extracted from a variation name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedVariation {
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Parse a variation name ("Hot Pink, Large") into size + color.
///
/// The name is split on comma/slash separators; each part is classified as
/// a size token or, when it is neither a size nor a garment word, as the
/// color. At most one size and one color are kept (first wins); unmatched
/// parts are dropped. The single-part form "<color> Youth X-Small" is
/// recognized so the color is not swallowed by the multi-word size phrase.
#[must_use]
pub fn parse_variation(name: &str) -> ParsedVariation {
    let mut parsed = ParsedVariation::default();

    for part in name.split([',', '/']).map(str::trim).filter(|p| !p.is_empty()) {
        // "<color> Youth X-Small" packs both into one part.
        if parsed.size.is_none()
            && parsed.color.is_none()
            && let Some((color, size)) = split_color_youth_xsmall(part)
        {
            parsed.color = Some(color);
            parsed.size = Some(size);
            continue;
        }

        let lower = part.to_lowercase();

        if is_size_token(&lower) {
            if parsed.size.is_none() {
                parsed.size = Some(normalize_size(part, &lower));
            }
        } else if !is_garment_word(&lower) && parsed.color.is_none() {
            parsed.color = Some(part.to_string());
        }
    }

    parsed
}

/// Recognize "<color> Youth X-Small" and return the recovered parts.
fn split_color_youth_xsmall(part: &str) -> Option<(String, String)> {
    const SUFFIX: &str = "youth x-small";

    let lower = part.to_lowercase();
    let prefix_len = lower.strip_suffix(SUFFIX)?.trim_end().len();
    if prefix_len == 0 {
        return None;
    }

    let color = part.get(..prefix_len)?.trim().to_string();
    let size = part.get(part.len() - SUFFIX.len()..)?.to_string();
    Some((color, size))
}

/// Whether a lowercased name part is a size token.
fn is_size_token(lower: &str) -> bool {
    const SIZE_SUBSTRINGS: &[&str] = &[
        "small", "medium", "large", "xl", "xs", "youth", "toddler", "2t", "3t", "4t", "5t",
    ];

    if SIZE_SUBSTRINGS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }

    // Numeric sizes ("6", "8") and age codes ("6t").
    let trimmed = lower.trim();
    !trimmed.is_empty()
        && (trimmed.chars().all(|c| c.is_ascii_digit())
            || (trimmed.ends_with('t')
                && trimmed.len() > 1
                && trimmed
                    .chars()
                    .take(trimmed.len() - 1)
                    .all(|c| c.is_ascii_digit())))
}

/// Whether a lowercased name part is a garment descriptor, not a color.
fn is_garment_word(lower: &str) -> bool {
    GARMENT_WORDS.iter().any(|kw| lower.contains(kw))
}

/// Canonicalize the whole words small/medium/large; keep every other size
/// token raw ("Youth X-Small", "2XL", "4T").
fn normalize_size(raw: &str, lower: &str) -> String {
    match lower.trim() {
        "small" => "S".to_string(),
        "medium" => "M".to_string(),
        "large" => "L".to_string(),
        _ => raw.to_string(),
    }
}

// =============================================================================
// Audience
// =============================================================================

/// Infer the audience set for an item.
///
/// Description tags/words are a manual override: when any audience tag is
/// present in the description, only tag-derived audiences are returned.
/// Otherwise youth-coded sizes imply Kids, and adult sizes plus feminine
/// cues imply Women. An empty result means "unclassified"; presenting that
/// as Men/Unisex is a client-side default, not enforced here.
#[must_use]
pub fn audience(name: &str, variation_names: &[String], description: &str) -> Vec<Audience> {
    let name = name.to_lowercase();
    let description = description.to_lowercase();

    let mut audiences = Vec::new();

    // 1) Manual override via description tags/words
    if has_word_or_tag(&description, "women") || has_word_or_tag(&description, "womens") {
        audiences.push(Audience::Women);
    }
    if has_word_or_tag(&description, "men/unisex")
        || has_word_or_tag(&description, "men")
        || has_word_or_tag(&description, "unisex")
    {
        audiences.push(Audience::MenUnisex);
    }
    if has_word_or_tag(&description, "kids") || has_word_or_tag(&description, "youth") {
        audiences.push(Audience::Kids);
    }

    if !audiences.is_empty() {
        return audiences;
    }

    // 2) Automatic detection from sizes and naming cues
    let size_names: Vec<String> = variation_names.iter().map(|n| n.to_lowercase()).collect();

    let mut has_youth = size_names.iter().any(|s| is_youth_size(s));
    let has_adult = size_names
        .iter()
        .any(|s| !is_youth_size(s) && !s.trim().is_empty());

    if ["youth", "toddler", "kid", "4t", "3t", "2t"]
        .iter()
        .any(|kw| name.contains(kw))
    {
        has_youth = true;
    }

    if has_youth {
        audiences.push(Audience::Kids);
    }

    let looks_feminine_name = FEMININE_NAME_WORDS.iter().any(|kw| name.contains(kw));
    let variation_text = size_names.join(" ");
    let looks_feminine_color = FEMININE_COLOR_WORDS
        .iter()
        .any(|kw| variation_text.contains(kw));
    let explicitly_women = ["women", "ladies", "female"].iter().any(|kw| name.contains(kw));

    if has_adult && (looks_feminine_name || looks_feminine_color || explicitly_women) {
        audiences.push(Audience::Women);
    }

    audiences
}

/// Word match in a description, bounded by spaces or brackets, so "women"
/// in running text matches but "women" inside another word does not.
fn has_word_or_tag(description_lower: &str, word: &str) -> bool {
    let padded = format!(" {description_lower} ");
    padded.contains(&format!(" {word} ")) || padded.contains(&format!("[{word}]"))
}

/// Whether a lowercased variation name is youth/toddler/age-coded.
fn is_youth_size(lower: &str) -> bool {
    if ["youth", "toddler", "4t", "3t", "2t"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return true;
    }

    let trimmed = lower.trim();
    trimmed.ends_with('t')
        && trimmed.len() > 1
        && trimmed
            .chars()
            .take(trimmed.len() - 1)
            .all(|c| c.is_ascii_digit())
}

// =============================================================================
// Subcategory
// =============================================================================

/// Infer the theme subcategory from name + description. First matching
/// group in [`SUBCATEGORY_RULES`] wins; no match means no subcategory.
#[must_use]
pub fn subcategory(name: &str, description: &str) -> Option<Subcategory> {
    let text = format!("{name} {description}").to_lowercase();

    SUBCATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(subcategory, _)| *subcategory)
}
