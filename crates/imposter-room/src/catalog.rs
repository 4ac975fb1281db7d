//! Word catalog: which secret words a category can produce.

use serde::{Deserialize, Serialize};

use crate::{Invalid, RoomError};

/// One category and its candidate words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWords {
    pub name: String,
    pub words: Vec<String>,
}

/// Ordered mapping of category name to candidate secret words.
///
/// The first category is the default for new lobbies. Every category has
/// at least one non-blank word, so a draw always yields a usable secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CategoryWords>", into = "Vec<CategoryWords>")]
pub struct Catalog {
    categories: Vec<CategoryWords>,
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Tiere",
        &["Löwe", "Elefant", "Giraffe", "Pinguin", "Adler", "Hai", "Känguru", "Koala", "Panda"],
    ),
    (
        "Essen",
        &["Pizza", "Sushi", "Burger", "Spaghetti", "Eiscreme", "Döner", "Salat", "Pfannkuchen"],
    ),
    (
        "Orte",
        &["Schule", "Krankenhaus", "Flughafen", "Bibliothek", "Kino", "Schwimmbad", "Supermarkt"],
    ),
    (
        "Technik",
        &["iPhone", "Laptop", "Fernseher", "Kopfhörer", "Drohne", "Roboter", "Smartwatch"],
    ),
    (
        "Berufe",
        &["Arzt", "Lehrer", "Polizist", "Feuerwehrmann", "Astronaut", "Koch", "Pilot"],
    ),
];

impl Catalog {
    /// Builds a catalog from categories in display order.
    ///
    /// # Errors
    /// [`RoomError::Validation`] if there are no categories, a category
    /// has no words or a blank word, or a name repeats.
    pub fn new(categories: Vec<CategoryWords>) -> Result<Self, RoomError> {
        if categories.is_empty() {
            return Err(RoomError::Validation(Invalid::Catalog("no categories".into())));
        }
        for (i, c) in categories.iter().enumerate() {
            if c.words.is_empty() {
                return Err(RoomError::Validation(Invalid::Catalog(format!(
                    "category {:?} has no words",
                    c.name
                ))));
            }
            if c.words.iter().any(|w| w.trim().is_empty()) {
                return Err(RoomError::Validation(Invalid::Catalog(format!(
                    "category {:?} has a blank word",
                    c.name
                ))));
            }
            if categories[..i].iter().any(|other| other.name == c.name) {
                return Err(RoomError::Validation(Invalid::Catalog(format!(
                    "category {:?} listed twice",
                    c.name
                ))));
            }
        }
        Ok(Self { categories })
    }

    /// The word lists the game ships with.
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN
                .iter()
                .map(|(name, words)| CategoryWords {
                    name: (*name).to_string(),
                    words: words.iter().map(|w| (*w).to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Category new lobbies start with.
    pub fn default_category(&self) -> &str {
        // `new` and `builtin` both guarantee at least one category.
        self.categories.first().map_or("", |c| c.name.as_str())
    }

    /// Category names in display order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.name == category)
    }

    /// Candidate words for `category`, or `None` for an unknown key.
    pub fn words(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.words.as_slice())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<CategoryWords>> for Catalog {
    type Error = RoomError;

    fn try_from(categories: Vec<CategoryWords>) -> Result<Self, Self::Error> {
        Self::new(categories)
    }
}

impl From<Catalog> for Vec<CategoryWords> {
    fn from(catalog: Catalog) -> Self {
        catalog.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(name: &str, words: &[&str]) -> CategoryWords {
        CategoryWords {
            name: name.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_default_is_tiere_starting_with_loewe() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.default_category(), "Tiere");
        assert_eq!(catalog.words("Tiere").unwrap()[0], "Löwe");
    }

    #[test]
    fn test_builtin_categories_in_order() {
        let catalog = Catalog::builtin();
        let names: Vec<_> = catalog.categories().collect();
        assert_eq!(names, ["Tiere", "Essen", "Orte", "Technik", "Berufe"]);
    }

    #[test]
    fn test_unknown_category() {
        let catalog = Catalog::builtin();
        assert!(!catalog.contains("Sport"));
        assert!(catalog.words("Sport").is_none());
    }

    #[test]
    fn test_new_rejects_empty_catalog_and_empty_category() {
        assert!(Catalog::new(vec![]).is_err());
        assert!(Catalog::new(vec![words("Leer", &[])]).is_err());
        assert!(matches!(
            Catalog::new(vec![words("Leer", &[""])]),
            Err(RoomError::Validation(Invalid::Catalog(_)))
        ));
        assert!(Catalog::new(vec![words("Farben", &["Rot", "  "])]).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let result = Catalog::new(vec![words("A", &["x"]), words("A", &["y"])]);
        assert!(matches!(result, Err(RoomError::Validation(_))));
    }

    #[test]
    fn test_catalog_deserialization_validates() {
        let ok: Catalog = serde_json::from_str(r#"[{"name":"Farben","words":["Rot"]}]"#).unwrap();
        assert_eq!(ok.default_category(), "Farben");
        assert!(serde_json::from_str::<Catalog>(r#"[{"name":"Farben","words":[]}]"#).is_err());
        assert!(serde_json::from_str::<Catalog>(r#"[{"name":"Farben","words":[""]}]"#).is_err());
    }
}
