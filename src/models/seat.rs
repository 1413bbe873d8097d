use indexmap::IndexSet;

/// Ordered set of seat labels for one booking request.
///
/// Seat lists arrive over the wire as comma-separated text; all parsing and
/// normalization happens here so the rest of the crate only ever sees a
/// deduplicated, non-blank set of labels in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSet {
    labels: IndexSet<String>,
}

impl SeatSet {
    /// Parse a comma-separated seat list. Labels are trimmed, blank entries
    /// dropped, uppercased, and deduplicated; first occurrence wins the
    /// position.
    pub fn parse(raw: &str) -> Self {
        let labels = raw
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_uppercase)
            .collect();

        SeatSet { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    /// Split the requested labels into (claimable, rejected) against the
    /// currently occupied set, preserving request order in both halves.
    pub fn partition(&self, occupied: &IndexSet<String>) -> (Vec<String>, Vec<String>) {
        let mut claimable = Vec::new();
        let mut rejected = Vec::new();

        for label in &self.labels {
            if occupied.contains(label) {
                rejected.push(label.clone());
            } else {
                claimable.push(label.clone());
            }
        }

        (claimable, rejected)
    }
}
