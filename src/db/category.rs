use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fixed set of article categories.
#[derive(sqlx::Type, Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Works,
    Review,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::News, Category::Works, Category::Review];

    /// URL segment and database representation.
    pub fn slug(self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Works => "works",
            Category::Review => "review",
        }
    }

    /// Human-readable name for page templates.
    pub fn label(self) -> &'static str {
        match self {
            Category::News => "News",
            Category::Works => "Your works",
            Category::Review => "Reviews",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(Category::News),
            "works" => Ok(Category::Works),
            "review" => Ok(Category::Review),
            other => Err(AppError::InvalidQuery(format!("unknown category {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_round_trips() {
        for category in Category::ALL {
            assert_eq!(category.slug().parse::<Category>().unwrap(), category);
        }
        assert!("sports".parse::<Category>().is_err());
    }
}
