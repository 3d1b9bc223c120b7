//! Tag query model

use crate::todos::TAG_SEPARATOR;

/// Raw tags requested by a caller, in request order.
///
/// Duplicates and blank entries are kept: every entry becomes one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    pub tags: Vec<String>,
}

impl TagQuery {
    /// Build from explicit tags
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a comma separated parameter such as `work, Home,errands`.
    ///
    /// An empty parameter yields a single empty tag, which is searched for literally.
    pub fn from_param(param: &str) -> Self {
        Self::new(param.split(TAG_SEPARATOR))
    }
}
