use std::collections::HashMap;

/// Occurrence counts for one categorical column (or one group of it).
#[derive(Debug, Clone, Default)]
pub struct ValueCounts {
    counts: HashMap<String, usize>,
    total: usize,
}

impl ValueCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, value: &str) {
        self.total += 1;
        *self.counts.entry(value.to_string()).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Values ordered by descending count, ties broken by ascending value.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut items = self
            .counts
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
            .collect::<Vec<_>>();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Most frequent value; the smallest one when several share the top count.
    pub fn mode(&self) -> Option<&str> {
        self.sorted().first().map(|(value, _)| *value)
    }
}

impl<'a> FromIterator<&'a str> for ValueCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = ValueCounts::new();
        for value in iter {
            counts.ingest(value);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefers_highest_count() {
        let counts = ["Cash", "Cash", "Card"].into_iter().collect::<ValueCounts>();
        assert_eq!(counts.mode(), Some("Cash"));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn mode_ties_resolve_to_smallest_value() {
        let counts = ["Takeaway", "In-store", "Takeaway", "In-store"]
            .into_iter()
            .collect::<ValueCounts>();
        assert_eq!(counts.mode(), Some("In-store"));
        assert_eq!(counts.sorted(), vec![("In-store", 2), ("Takeaway", 2)]);
    }

    #[test]
    fn empty_counts_have_no_mode() {
        assert_eq!(ValueCounts::new().mode(), None);
    }
}
