//! Row types

/// Row-level formatting carried over from the template.
///
/// Templates pre-format their reserved regions row by row, so these travel
/// with the row when rows below a deletion shift up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowProps {
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    /// Row is hidden
    pub hidden: bool,
    /// Row-level style index (None = no row style)
    pub style_index: Option<u32>,
}

impl RowProps {
    /// Check if this row has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some() || self.hidden || self.style_index.is_some()
    }
}
