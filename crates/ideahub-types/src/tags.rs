use crate::NonEmptyText;

/// Ordered tags parsed from free text.
///
/// Parsing splits on `,`, trims every entry and drops the ones left empty. Order follows the
/// input and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<NonEmptyText>);

impl TagList {
    pub const SEPARATOR: char = ',';

    pub fn parse(input: &str) -> Self {
        Self(
            input
                .split(Self::SEPARATOR)
                .filter_map(|tag| NonEmptyText::new(tag).ok())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(NonEmptyText::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Renders tags back into the editable form, e.g. `"eco, travel"`.
    pub fn join<S: AsRef<str>>(tags: &[S]) -> String {
        tags.iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for TagList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for TagList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Self::join(&self.to_strings()))
    }
}
