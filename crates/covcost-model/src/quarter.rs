//! Quarter labels and their integer time index.

use std::collections::BTreeSet;

/// Maps quarter labels to integer time codes.
///
/// Codes are category codes: the distinct labels are sorted as strings and
/// numbered from zero. For `YYYYQn` labels the string order is also the
/// chronological order; other label shapes are coded all the same, see
/// [`is_canonical_quarter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterIndex {
    labels: Vec<String>,
}

impl QuarterIndex {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<&str> = labels.into_iter().collect();
        Self {
            labels: unique.into_iter().map(str::to_string).collect(),
        }
    }

    /// Time code of a label, if the label was seen when building the index.
    pub fn code(&self, label: &str) -> Option<i64> {
        self.labels
            .binary_search_by(|entry| entry.as_str().cmp(label))
            .ok()
            .map(|pos| pos as i64)
    }

    /// Labels in code order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels whose lexical position may not match their chronological one.
    pub fn non_canonical_labels(&self) -> Vec<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|label| !is_canonical_quarter(label))
            .collect()
    }
}

/// Returns true for labels of the form `YYYYQn` with `n` in 1..=4.
pub fn is_canonical_quarter(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() == 6
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'Q'
        && (b'1'..=b'4').contains(&bytes[5])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_lexical_order() {
        let index = QuarterIndex::from_labels(["2021Q1", "2020Q2", "2020Q1", "2020Q2"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.code("2020Q1"), Some(0));
        assert_eq!(index.code("2020Q2"), Some(1));
        assert_eq!(index.code("2021Q1"), Some(2));
        assert_eq!(index.code("2019Q4"), None);
    }

    #[test]
    fn flags_labels_that_do_not_sort_chronologically() {
        let index = QuarterIndex::from_labels(["2020Q1", "2020Q10", "2020 Q3"]);
        assert_eq!(index.non_canonical_labels(), vec!["2020 Q3", "2020Q10"]);
        assert!(is_canonical_quarter("2022Q4"));
        assert!(!is_canonical_quarter("2022Q5"));
    }
}
