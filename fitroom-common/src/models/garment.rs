use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque locator for a garment image already stored by the backend.
///
/// Issued by the inventory endpoint; never constructed by guessing on the
/// client side. Ordering of locators is whatever the server declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GarmentRef(String);

impl GarmentRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GarmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GarmentRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Body region the synthesis backend should fit the garment to.
/// Exactly one category is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    UpperBody,
    LowerBody,
}

impl Category {
    /// Wire form used in the multipart `category` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::UpperBody => "upper_body",
            Category::LowerBody => "lower_body",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_defaults_to_upper_body() {
        assert_eq!(Category::default(), Category::UpperBody);
    }

    #[test]
    fn category_wire_form_is_snake_case() {
        assert_eq!(Category::UpperBody.as_str(), "upper_body");
        assert_eq!(Category::LowerBody.as_str(), "lower_body");
        let json = serde_json::to_string(&Category::LowerBody).unwrap();
        assert_eq!(json, "\"lower_body\"");
    }

    #[test]
    fn garment_ref_round_trips_as_plain_string() {
        let g: GarmentRef = serde_json::from_str("\"http://x/static/a.png\"").unwrap();
        assert_eq!(g.as_str(), "http://x/static/a.png");
    }
}
