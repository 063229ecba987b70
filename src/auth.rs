//! Student allow-list
//!
//! Access to the assistant is gated by a flat membership check over known
//! student ids. This is a gate, not a security mechanism.

/// Fixed set of student ids allowed to open sessions
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: Vec<String>,
}

impl AllowList {
    /// Parse a comma-separated id list, tolerating whitespace and empties.
    pub fn parse(raw: &str) -> Self {
        Self {
            ids: raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_skips_empties() {
        let list = AllowList::parse(" Thunder , , jane.doe,");
        assert_eq!(list.len(), 2);
        assert!(list.contains("Thunder"));
        assert!(list.contains("jane.doe"));
        assert!(!list.contains("thunder")); // exact match only
    }

    #[test]
    fn empty_list_rejects_everyone() {
        let list = AllowList::parse("");
        assert!(list.is_empty());
        assert!(!list.contains("Thunder"));
    }
}
