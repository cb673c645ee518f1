//! Color class to candidate species mapping.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::DEFAULT_COLOR_SPECIES;
use crate::constants::fusion::DRONE_CLASS_SUFFIX;
use crate::error::{Error, Result};

/// Plumage color category the drone model emits instead of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// `white_birds`
    White,
    /// `black_birds`
    Black,
    /// `brown_birds`
    Brown,
    /// `grey_birds`
    Grey,
}

impl Color {
    /// Every color, in the order the drone model lists them.
    pub const ALL: [Self; 4] = [Self::White, Self::Black, Self::Brown, Self::Grey];

    /// Lowercase token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Brown => "brown",
            Self::Grey => "grey",
        }
    }

    /// Drone class label for this color, e.g. `white_birds`.
    pub fn drone_class(self) -> String {
        format!("{}{DRONE_CLASS_SUFFIX}", self.as_str())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            "brown" => Ok(Self::Brown),
            "grey" | "gray" => Ok(Self::Grey),
            other => Err(Error::UnknownColor {
                value: other.to_string(),
            }),
        }
    }
}

/// Ordered mapping from color to an ordered set of species names.
///
/// Iteration follows insertion order. A color without an entry maps to an
/// empty species list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSpeciesMapping {
    entries: Vec<(Color, Vec<String>)>,
}

impl ColorSpeciesMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The colony's default egret/cormorant/heron mapping.
    pub fn colony_default() -> Self {
        Self {
            entries: DEFAULT_COLOR_SPECIES
                .iter()
                .filter_map(|(token, species)| {
                    token.parse::<Color>().ok().map(|color| {
                        (color, species.iter().map(ToString::to_string).collect())
                    })
                })
                .collect(),
        }
    }

    /// Build a mapping from entries, validating it.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Color, Vec<S>)>,
        S: Into<String>,
    {
        let mapping = Self {
            entries: entries
                .into_iter()
                .map(|(color, species)| (color, species.into_iter().map(Into::into).collect()))
                .collect(),
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Check for duplicate colors and blank or duplicate species names.
    pub fn validate(&self) -> Result<()> {
        for (idx, (color, species)) in self.entries.iter().enumerate() {
            if self.entries[..idx].iter().any(|(c, _)| c == color) {
                return Err(Error::ConfigValidation {
                    message: format!("color '{color}' is mapped more than once"),
                });
            }
            validate_species(*color, species)?;
        }
        Ok(())
    }

    /// Candidate species for a color, empty if the color is unmapped.
    pub fn species_for(&self, color: Color) -> &[String] {
        self.entries
            .iter()
            .find(|(c, _)| *c == color)
            .map(|(_, species)| species.as_slice())
            .unwrap_or(&[])
    }

    /// Colors in insertion order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &[String])> {
        self.entries.iter().map(|(c, s)| (*c, s.as_slice()))
    }

    /// Color a species is mapped to, if any.
    pub fn color_for_species(&self, species: &str) -> Option<Color> {
        self.entries
            .iter()
            .find(|(_, list)| list.iter().any(|s| s == species))
            .map(|(c, _)| *c)
    }

    /// Replace a color's species list, keeping its position, or append it.
    pub fn set(&mut self, color: Color, species: Vec<String>) -> Result<()> {
        validate_species(color, &species)?;
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == color) {
            entry.1 = species;
        } else {
            self.entries.push((color, species));
        }
        Ok(())
    }

    /// Remove a color. Returns `false` if it was not mapped.
    pub fn remove(&mut self, color: Color) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(c, _)| *c != color);
        self.entries.len() != before
    }

    /// Number of mapped colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no color is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_species(color: Color, species: &[String]) -> Result<()> {
    for (idx, name) in species.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: format!("color '{color}' has a blank species name"),
            });
        }
        if species[..idx].contains(name) {
            return Err(Error::ConfigValidation {
                message: format!("species '{name}' is listed twice under '{color}'"),
            });
        }
    }
    Ok(())
}

impl Serialize for ColorSpeciesMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (color, species) in &self.entries {
            map.serialize_entry(color.as_str(), species)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColorSpeciesMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(MappingVisitor)
    }
}

struct MappingVisitor;

impl<'de> Visitor<'de> for MappingVisitor {
    type Value = ColorSpeciesMapping;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of color names to species lists")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some((key, species)) = access.next_entry::<String, Vec<String>>()? {
            let color = key.parse::<Color>().map_err(de::Error::custom)?;
            entries.push((color, species));
        }

        let mapping = ColorSpeciesMapping { entries };
        mapping.validate().map_err(de::Error::custom)?;
        Ok(mapping)
    }
}
