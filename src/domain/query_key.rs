// src/domain/query_key.rs
use crate::constants::NOTES_NAMESPACE;
use std::fmt;

/// Identifies one cached listing: `(page, page_size, search)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

impl QueryKey {
    /// Pages are 1-based; a page of 0 is treated as 1.
    pub fn new(page: u32, page_size: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            page_size,
            search: search.into(),
        }
    }

    pub fn namespace(&self) -> &'static str {
        NOTES_NAMESPACE
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {:?}]",
            self.namespace(),
            self.page,
            self.page_size,
            self.search
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_page_zero_when_creating_key_then_clamps_to_first_page() {
        let key = QueryKey::new(0, 12, "");
        assert_eq!(key.page, 1);
    }

    #[test]
    fn given_key_when_formatting_then_shows_namespace_and_parts() {
        let key = QueryKey::new(2, 12, "abc");
        assert_eq!(key.to_string(), r#"[notes, 2, 12, "abc"]"#);
    }
}
