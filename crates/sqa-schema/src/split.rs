//! Train/validation/test disjointness check.
//!
//! The published splits partition screenshots: a screenshot and all of its
//! questions live in exactly one split. This is a property of the distributed
//! files as a set, so it is checked here rather than when loading one file.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use sqa_core::{Dataset, ValidationError, ValidationIssue};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verify that no screenshot appears in more than one split.
///
/// Each overlapping `image_id` produces one issue per offending pair of
/// splits, indexed at the id's first entry in the later split.
///
/// # Errors
///
/// Returns a `ValidationError` naming every shared `image_id`.
pub fn check_split_partition(
    train: &Dataset,
    validation: &Dataset,
    test: &Dataset,
) -> Result<(), ValidationError> {
    let splits = [
        (Split::Train, first_positions(train)),
        (Split::Validation, first_positions(validation)),
        (Split::Test, first_positions(test)),
    ];

    let mut issues = Vec::new();
    for (later_idx, (later, later_ids)) in splits.iter().enumerate() {
        for (earlier, earlier_ids) in &splits[..later_idx] {
            let mut shared: Vec<(&String, usize, usize)> = later_ids
                .iter()
                .filter_map(|(id, later_pos)| {
                    earlier_ids
                        .get(id)
                        .map(|earlier_pos| (id, *earlier_pos, *later_pos))
                })
                .collect();
            shared.sort_by_key(|(_, _, later_pos)| *later_pos);

            for (id, earlier_pos, later_pos) in shared {
                issues.push(ValidationIssue::at_entry(
                    later_pos,
                    "/image_id",
                    format!(
                        "image_id '{id}' appears in both {earlier} (entry {earlier_pos}) and {later} (entry {later_pos})"
                    ),
                ));
            }
        }
    }

    debug!(
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        overlaps = issues.len(),
        "checked split partition"
    );

    ValidationError::check("split partition", issues, ())
}

/// Map each screenshot id to the index of its first entry.
fn first_positions(dataset: &Dataset) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (index, key) in dataset.keys().into_iter().enumerate() {
        positions.entry(key.image_id).or_insert(index);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqa_core::ShortAnswerEntry;

    fn split_of(ids: &[&str]) -> Dataset {
        Dataset::Short(
            ids.iter()
                .map(|id| ShortAnswerEntry {
                    image_id: (*id).to_string(),
                    image_width: None,
                    image_height: None,
                    question: format!("question about {id}"),
                    ground_truth: vec!["a".into()],
                })
                .collect(),
        )
    }

    #[test]
    fn disjoint_splits_pass() {
        let result = check_split_partition(
            &split_of(&["1", "1", "2"]),
            &split_of(&["3"]),
            &split_of(&["4", "5"]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn shared_id_between_train_and_test_is_named() {
        let err = check_split_partition(
            &split_of(&["1", "2"]),
            &split_of(&["3"]),
            &split_of(&["4", "2"]),
        )
        .unwrap_err();

        assert_eq!(err.document, "split partition");
        assert_eq!(err.issues.len(), 1);
        let issue = &err.issues[0];
        assert_eq!(issue.index, Some(1));
        assert_eq!(issue.path, "/image_id");
        assert!(issue.message.contains("'2'"), "{}", issue.message);
        assert!(issue.message.contains("train (entry 1)"));
        assert!(issue.message.contains("test (entry 1)"));
    }

    #[test]
    fn id_in_all_three_splits_reports_every_pair() {
        let err = check_split_partition(
            &split_of(&["9"]),
            &split_of(&["9"]),
            &split_of(&["9"]),
        )
        .unwrap_err();
        assert_eq!(err.issues.len(), 3);
    }

    #[test]
    fn empty_splits_are_disjoint() {
        let empty = split_of(&[]);
        assert!(check_split_partition(&empty, &empty, &empty).is_ok());
    }
}
