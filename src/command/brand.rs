//! Brand alias normalization.

use serde::{Deserialize, Serialize};

/// The restaurant brands the dashboard manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Brand {
    Bww,
    Arbys,
    Sonic,
}

impl Brand {
    pub const ALL: [Brand; 3] = [Brand::Bww, Brand::Arbys, Brand::Sonic];

    /// Canonical brand code used in endpoint paths.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bww => "BWW",
            Self::Arbys => "ARBYS",
            Self::Sonic => "SONIC",
        }
    }

    /// Name spoken back to the operator.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bww => "Buffalo Wild Wings",
            Self::Arbys => "Arby's",
            Self::Sonic => "Sonic Drive-In",
        }
    }

    /// Look up a free-text alias. Case-insensitive.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let key = alias.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, brand)| *brand)
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Alias table. Every canonical code is also an alias of itself so that
/// normalization is idempotent.
const ALIASES: &[(&str, Brand)] = &[
    ("bww", Brand::Bww),
    ("buffalo wild wings", Brand::Bww),
    ("buffalo", Brand::Bww),
    ("wings", Brand::Bww),
    ("bdubs", Brand::Bww),
    ("arbys", Brand::Arbys),
    ("arby's", Brand::Arbys),
    ("arby", Brand::Arbys),
    ("sonic", Brand::Sonic),
    ("sonic drive-in", Brand::Sonic),
    ("sonic drive in", Brand::Sonic),
];

/// A normalized brand reference.
///
/// Unknown names are carried through upper-cased so a request can still be
/// attempted against the data service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrandCode {
    Known(Brand),
    Other(String),
}

impl BrandCode {
    /// Normalize free text to a brand code.
    pub fn normalize(input: &str) -> Self {
        match Brand::from_alias(input) {
            Some(brand) => Self::Known(brand),
            None => Self::Other(input.trim().to_uppercase()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Known(brand) => brand.code(),
            Self::Other(code) => code,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Known(brand) => brand.display_name(),
            Self::Other(code) => code,
        }
    }

    pub fn known(&self) -> Option<Brand> {
        match self {
            Self::Known(brand) => Some(*brand),
            Self::Other(_) => None,
        }
    }
}

impl From<Brand> for BrandCode {
    fn from(brand: Brand) -> Self {
        Self::Known(brand)
    }
}

impl std::fmt::Display for BrandCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Find the first known brand alias mentioned anywhere in normalized text.
pub fn find_brand(text: &str) -> Option<Brand> {
    let words: Vec<&str> = text.split_whitespace().collect();
    for window in [3usize, 2, 1] {
        for chunk in words.windows(window) {
            if let Some(brand) = Brand::from_alias(&chunk.join(" ")) {
                return Some(brand);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(BrandCode::normalize("bww"), BrandCode::Known(Brand::Bww));
        assert_eq!(
            BrandCode::normalize("Buffalo Wild Wings"),
            BrandCode::Known(Brand::Bww)
        );
        assert_eq!(BrandCode::normalize("Arby's"), BrandCode::Known(Brand::Arbys));
        assert_eq!(BrandCode::normalize("SONIC"), BrandCode::Known(Brand::Sonic));
    }

    #[test]
    fn test_alias_table_case_invariant_and_idempotent() {
        for (alias, brand) in ALIASES {
            let variants = [
                alias.to_string(),
                alias.to_uppercase(),
                format!("  {}  ", alias),
            ];
            for variant in variants {
                let once = BrandCode::normalize(&variant);
                assert_eq!(once, BrandCode::Known(*brand), "alias {:?}", variant);
                let twice = BrandCode::normalize(once.code());
                assert_eq!(once, twice, "alias {:?} not idempotent", variant);
            }
        }
    }

    #[test]
    fn test_unknown_passes_through() {
        let code = BrandCode::normalize(" Wendys ");
        assert_eq!(code, BrandCode::Other("WENDYS".to_string()));
        assert_eq!(BrandCode::normalize(code.code()), code);
        assert_eq!(code.display_name(), "WENDYS");
    }

    #[test]
    fn test_find_brand() {
        assert_eq!(find_brand("pull up bww location 155"), Some(Brand::Bww));
        assert_eq!(find_brand("anything at sonic drive in 22"), Some(Brand::Sonic));
        assert_eq!(find_brand("store 155"), None);
    }
}
