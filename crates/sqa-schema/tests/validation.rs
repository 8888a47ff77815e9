//! Integration tests for dataset validation over fixture files.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::rstest;
use sqa_core::{Dataset, Variant};
use sqa_schema::{
    LoadError, check_split_partition, load_dataset, read_document, validate_dataset,
    validate_full_qa,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[rstest]
#[case("full_qa.json", Variant::Full, 3, 2)]
#[case("short_qa.json", Variant::Short, 3, 2)]
#[case("complex_qa.json", Variant::Complex, 2, 2)]
fn fixtures_load(
    #[case] file: &str,
    #[case] variant: Variant,
    #[case] entries: usize,
    #[case] screenshots: usize,
) {
    let dataset = load_dataset(&fixture(file), variant).expect("fixture should validate");
    assert_eq!(dataset.variant(), variant);
    assert_eq!(dataset.len(), entries);
    assert_eq!(dataset.screenshots().len(), screenshots);
}

#[rstest]
#[case("full_qa.json", Variant::Full)]
#[case("short_qa.json", Variant::Short)]
#[case("complex_qa.json", Variant::Complex)]
fn revalidating_serialized_output_succeeds(#[case] file: &str, #[case] variant: Variant) {
    let first = load_dataset(&fixture(file), variant).unwrap();
    let reserialized = first.to_value().unwrap();
    let second = validate_dataset(variant, &reserialized).expect("output should revalidate");
    assert_eq!(first, second);
}

#[test]
fn validated_bounds_are_ordered() {
    let Dataset::Full(entries) = load_dataset(&fixture("full_qa.json"), Variant::Full).unwrap()
    else {
        panic!("expected full dataset");
    };
    for entry in &entries {
        for annotation in &entry.ground_truth {
            for element in &annotation.ui_elements {
                let b = element.bounds;
                assert!(b.left() <= b.right(), "{b:?}");
                assert!(b.top() <= b.bottom(), "{b:?}");
            }
        }
    }
}

#[test]
fn invalid_fixture_reports_every_bad_entry() {
    let document = read_document(&fixture("invalid_full_qa.json")).unwrap();
    let err = validate_full_qa(&document).unwrap_err();

    assert_eq!(err.entry_indices(), vec![1, 2, 3]);

    let missing = err.issues.iter().find(|i| i.index == Some(1)).unwrap();
    assert_eq!(missing.path, "/question");

    let inverted = err.issues.iter().find(|i| i.index == Some(2)).unwrap();
    assert_eq!(inverted.path, "/ground_truth/0/ui_elements/0/bounds");

    let short_box: Vec<_> = err.issues.iter().filter(|i| i.index == Some(3)).collect();
    assert_eq!(short_box.len(), 2, "{short_box:?}");
}

#[test]
fn short_fixture_is_not_a_full_dataset() {
    let err = load_dataset(&fixture("short_qa.json"), Variant::Full).unwrap_err();
    let LoadError::Validation(validation) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(validation.entry_indices(), vec![0, 1, 2]);
}

#[test]
fn split_check_over_fixture_files() {
    let full = load_dataset(&fixture("full_qa.json"), Variant::Short);
    assert!(full.is_err());

    let short = load_dataset(&fixture("short_qa.json"), Variant::Short).unwrap();
    let complex = load_dataset(&fixture("complex_qa.json"), Variant::Complex).unwrap();
    let empty = Dataset::Short(Vec::new());

    assert!(check_split_partition(&short, &complex, &empty).is_ok());

    let err = check_split_partition(&short, &empty, &short).unwrap_err();
    let ids: Vec<_> = err.issues.iter().map(|i| i.message.clone()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids[0].contains("'10072'"));
    assert!(ids[1].contains("'2390'"));
}
