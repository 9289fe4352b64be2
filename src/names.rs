use crate::error::{ChoroplethError, Result};
use rapidfuzz::distance::indel;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// Telangana not included
pub const STATES: &[&str] = &[
    "Andaman and Nicobar Islands",
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chandigarh",
    "Chhattisgarh",
    "Dadra and Nagar Haveli",
    "Daman and Diu",
    "Delhi",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jammu and Kashmir",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Lakshadweep",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Puducherry",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

// Palghar not included
pub const DISTRICTS: &[&str] = &[
    "Ahmednagar",
    "Akola",
    "Amravati",
    "Aurangabad",
    "Beed",
    "Bhandara",
    "Buldhana",
    "Chandrapur",
    "Dhule",
    "Gadchiroli",
    "Gondia",
    "Hingoli",
    "Jalgaon",
    "Jalna",
    "Kolhapur",
    "Latur",
    "Mumbai City",
    "Mumbai Suburban",
    "Nagpur",
    "Nanded",
    "Nandurbar",
    "Nashik",
    "Osmanabad",
    "Parbhani",
    "Pune",
    "Raigad",
    "Ratnagiri",
    "Sangli",
    "Satara",
    "Sindhudurg",
    "Solapur",
    "Thane",
    "Wardha",
    "Washim",
    "Yavatmal",
];

/// Which reference set a label is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Domain {
    /// States of India.
    Country,
    /// Districts of Maharashtra.
    Region,
}

impl Domain {
    pub fn reference_names(self) -> &'static [&'static str] {
        match self {
            Domain::Country => STATES,
            Domain::Region => DISTRICTS,
        }
    }

    /// Attribute holding the feature name in the shapefile's dBase table.
    pub fn label_key(self) -> &'static str {
        match self {
            Domain::Country => "ST_NM",
            Domain::Region => "DISTRICT",
        }
    }

    pub fn hover_key(self) -> &'static str {
        match self {
            Domain::Country => "State",
            Domain::Region => "District",
        }
    }

    pub fn map_name(self) -> &'static str {
        match self {
            Domain::Country => "india",
            Domain::Region => "maharashtra",
        }
    }
}

impl FromStr for Domain {
    type Err = ChoroplethError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "country" | "india" => Ok(Domain::Country),
            "region" | "maharashtra" => Ok(Domain::Region),
            _ => Err(ChoroplethError::InvalidArgument(format!(
                "unknown domain '{}', expected one of 'country' (india) or 'region' (maharashtra)",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Domain {
    type Error = ChoroplethError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.map_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameMatch {
    pub name: &'static str,
    pub score: f64,
}

/// Similarity in `[0, 1]` where substitutions cost two edits.
///
/// Equals `2 * lcs / (len(a) + len(b))` over Unicode scalar values.
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

/// Highest scoring reference name for `label`, with its score.
pub fn best_match(label: &str, domain: Domain) -> NameMatch {
    if domain == Domain::Country && label == "Telangana" {
        return NameMatch {
            name: "Andhra Pradesh",
            score: 1.0,
        };
    }

    let needle = label.to_lowercase();
    let mut best = NameMatch {
        name: domain.reference_names()[0],
        score: f64::NEG_INFINITY,
    };
    for &candidate in domain.reference_names() {
        let score = levenshtein_ratio(&needle, &candidate.to_lowercase());
        // strict comparison keeps the earliest name on ties
        if score > best.score {
            best = NameMatch {
                name: candidate,
                score,
            };
        }
    }
    best
}

/// Canonical spelling of `label` within `domain`.
pub fn closest_match(label: &str, domain: Domain) -> &'static str {
    let found = best_match(label, domain);
    if found.score < 1.0 {
        debug!(label, matched = found.name, score = found.score, "approximate name match");
    }
    found.name
}

/// String-keyed entry point used by the CLI.
pub fn closest_match_kind(label: &str, kind: &str) -> Result<&'static str> {
    let domain: Domain = kind.parse()?;
    Ok(closest_match(label, domain))
}
