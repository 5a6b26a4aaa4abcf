//! End-to-end scenarios for the key-pattern filter, driven from policy
//! documents the way a caller would load them.

use bucketsweep_core::{Error, StorageObject};
use bucketsweep_filters::prelude::*;
use bucketsweep_policy::Policy;

const POLICY: &str = r#"
apiVersion: v1alpha1
kind: DeleteConfig
selectors:
  - matchExpression: "\\.pdf$"
  - matchExpression: "^tmp"
  - matchExpression: "my-file"
"#;

fn bucket() -> Vec<StorageObject> {
    [
        "/storage/my-file",
        "/storage/file.pdf",
        "/storage/tmp-file.txt",
        "/storage/important-secret.txt",
        "tmp-file.txt",
        "/etc/resolv.conf",
    ]
    .into_iter()
    .map(StorageObject::new)
    .collect()
}

fn keys(selected: &[&StorageObject]) -> Vec<String> {
    selected.iter().map(|o| o.key.clone()).collect()
}

#[test]
fn selects_matching_keys_in_input_order() {
    let policy = Policy::from_yaml(POLICY).unwrap();
    let objects = bucket();

    let selected = ObjectKeyFilter::new().filter_all(&objects, &policy).unwrap();

    assert_eq!(
        keys(&selected),
        vec!["/storage/my-file", "/storage/file.pdf", "tmp-file.txt"]
    );
}

#[test]
fn empty_selector_list_selects_nothing() {
    let policy = Policy::from_yaml("apiVersion: v1alpha1\nkind: DeleteConfig\nselectors: []\n").unwrap();
    let objects = bucket();

    let selected = ObjectKeyFilter::new().filter_all(&objects, &policy).unwrap();
    assert!(selected.is_empty());
}

#[test]
fn unsupported_lookahead_fails_the_invocation() {
    let policy = Policy::from_yaml(
        "apiVersion: v1alpha1\nkind: DeleteConfig\nselectors:\n  - matchExpression: \"(?!)\"\n",
    )
    .unwrap();
    let objects = bucket();

    let err = ObjectKeyFilter::new().filter_all(&objects, &policy).unwrap_err();
    match err {
        Error::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(?!)"),
        other => panic!("Wrong error type: {other:?}"),
    }
}

#[test]
fn input_collection_is_left_untouched() {
    let policy = Policy::from_yaml(POLICY).unwrap();
    let objects: Vec<StorageObject> = bucket()
        .into_iter()
        .map(|o| o.with_tag("owner", "ops"))
        .collect();
    let before = objects.clone();

    let selected = ObjectKeyFilter::new().filter_all(&objects, &policy).unwrap();

    assert_eq!(selected.len(), 3);
    assert_eq!(objects.len(), before.len());
    for (after, before) in objects.iter().zip(&before) {
        assert_eq!(after.key, before.key);
        assert_eq!(after.tags, before.tags);
    }
}

#[test]
fn kinds_referenced_by_the_policy_build_a_working_pipeline() {
    let policy = Policy::from_yaml(POLICY).unwrap();
    let objects = bucket();

    let kinds = FilterKind::referenced_by(&policy);
    assert_eq!(kinds, vec![FilterKind::ObjectKey]);

    let outcome = FilterPipeline::from_kinds(&kinds, Composition::All)
        .execute(&objects, &policy)
        .unwrap();
    assert_eq!(outcome.selected.len(), 3);
}
