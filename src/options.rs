use serde::{Deserialize, Serialize};

/// Sort criteria for directory children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Alphabetical (case-insensitive), default.
    Name,
    /// By file size (largest first).
    Size,
    /// By modification time (newest first).
    Date,
}

impl SortMode {
    /// Parse a sort mode from a config string.
    pub fn from_config(s: &str) -> Self {
        match s {
            "size" => SortMode::Size,
            "date" | "modified" => SortMode::Date,
            _ => SortMode::Name,
        }
    }

    /// Display label for status bars.
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Name => "Name",
            SortMode::Size => "Size",
            SortMode::Date => "Date",
        }
    }

    /// Cycle to the next sort option.
    pub fn next(&self) -> Self {
        match self {
            SortMode::Name => SortMode::Size,
            SortMode::Size => SortMode::Date,
            SortMode::Date => SortMode::Name,
        }
    }
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::Name
    }
}

/// Immutable configuration for one display-list build.
///
/// The settings collaborator persists these (hence the serde derives); the
/// engine only reads them. `is_searching` is the caller's intent flag: a
/// blank `search_query` with `is_searching` set means "search UI open, no
/// text yet", which builds like an inactive search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    pub is_searching: bool,
    pub search_query: String,
    pub compact_packages: bool,
    pub show_hidden: bool,
    pub folders_on_top: bool,
    pub sort_mode: SortMode,
}

impl BuildOptions {
    pub fn searching(query: impl Into<String>) -> Self {
        Self {
            is_searching: true,
            search_query: query.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_recognizes_modes() {
        assert_eq!(SortMode::from_config("size"), SortMode::Size);
        assert_eq!(SortMode::from_config("modified"), SortMode::Date);
        assert_eq!(SortMode::from_config("date"), SortMode::Date);
        assert_eq!(SortMode::from_config("anything"), SortMode::Name);
    }

    #[test]
    fn cycle_covers_all_modes() {
        assert_eq!(SortMode::Name.next(), SortMode::Size);
        assert_eq!(SortMode::Size.next(), SortMode::Date);
        assert_eq!(SortMode::Date.next(), SortMode::Name);
    }

    #[test]
    fn options_round_trip_through_toml() {
        let opts = BuildOptions {
            show_hidden: true,
            sort_mode: SortMode::Size,
            folders_on_top: true,
            ..BuildOptions::default()
        };
        let text = toml::to_string(&opts).unwrap();
        let back: BuildOptions = toml::from_str(&text).unwrap();
        assert_eq!(back, opts);
    }
}
