//! Recursive key sorting.
//!
//! Mapping keys are ordered byte-wise at every depth while sequence order is
//! left exactly as decoded. Values the sorter cannot look into (custom tagged
//! values, sequences nested directly in sequences) are kept as they are and
//! reported as [`Warning`]s instead of failing the whole document.

use std::fmt;

use crate::document::{Document, Scalar};
use crate::error::SortError;

/// Location of a node inside a document, rendered like `spec.ports[0].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn key(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.to_string()));
        KeyPath { segments }
    }

    fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(idx));
        KeyPath { segments }
    }

    /// The innermost mapping key on this path, if any.
    pub fn last_key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Index(_) => None,
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// A value that was left untouched because the sorter cannot order it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub path: KeyPath,
    pub kind: String,
}

impl Warning {
    fn new(path: &KeyPath, node: &Document) -> Self {
        Warning {
            path: path.clone(),
            kind: node.kind(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} left unsorted", self.path, self.kind)
    }
}

/// Output of [`sort`]: the sorted tree plus everything that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Sorted {
    pub document: Document,
    /// In output order.
    pub warnings: Vec<Warning>,
}

/// Sorts every mapping in `document` by key.
///
/// # Errors
/// Returns [`SortError::InvariantViolation`] if any mapping has a key that is
/// not a string.
pub fn sort(document: Document) -> Result<Sorted, SortError> {
    let mut warnings = Vec::new();
    let document = sort_node(document, &KeyPath::root(), &mut warnings)?;
    Ok(Sorted { document, warnings })
}

/// Like [`sort`] but discards the warnings.
///
/// # Errors
/// Same as [`sort`].
pub fn sort_document(document: Document) -> Result<Document, SortError> {
    sort(document).map(|sorted| sorted.document)
}

fn sort_node(
    node: Document,
    path: &KeyPath,
    warnings: &mut Vec<Warning>,
) -> Result<Document, SortError> {
    match node {
        Document::Mapping(pairs) => sort_mapping(pairs, path, warnings),
        Document::Sequence(items) => sort_sequence(items, path, warnings),
        Document::Tagged(_) => {
            warnings.push(Warning::new(path, &node));
            Ok(node)
        }
        Document::Null | Document::Scalar(_) => Ok(node),
    }
}

fn sort_mapping(
    pairs: Vec<(Document, Document)>,
    path: &KeyPath,
    warnings: &mut Vec<Warning>,
) -> Result<Document, SortError> {
    let mut entries = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match key {
            Document::Scalar(Scalar::String(name)) => entries.push((name, value)),
            other => {
                return Err(SortError::InvariantViolation {
                    path: path.to_string(),
                    kind: other.kind(),
                });
            }
        }
    }

    // sort_by is stable, so equal keys keep their relative order
    entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    let mut sorted = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        let value = sort_node(value, &path.key(&name), warnings)?;
        sorted.push((Document::Scalar(Scalar::String(name)), value));
    }
    Ok(Document::Mapping(sorted))
}

fn sort_sequence(
    items: Vec<Document>,
    path: &KeyPath,
    warnings: &mut Vec<Warning>,
) -> Result<Document, SortError> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let item = match item {
            Document::Mapping(pairs) => sort_mapping(pairs, &path.index(idx), warnings)?,
            Document::Null | Document::Scalar(_) => item,
            Document::Sequence(_) | Document::Tagged(_) => {
                warnings.push(Warning::new(&path.index(idx), &item));
                item
            }
        };
        out.push(item);
    }
    Ok(Document::Sequence(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(s: &str) -> Document {
        serde_yaml::from_str(s).unwrap()
    }

    fn key(s: &str) -> Document {
        Document::Scalar(Scalar::String(s.to_string()))
    }

    fn int(i: i64) -> Document {
        Document::Scalar(Scalar::Int(i))
    }

    fn assert_keys_sorted(node: &Document) {
        match node {
            Document::Mapping(pairs) => {
                let keys: Vec<&str> = pairs.iter().filter_map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys.len(), pairs.len(), "non-string key in output");
                for w in keys.windows(2) {
                    assert!(w[0] <= w[1], "{:?} sorted after {:?}", w[1], w[0]);
                }
                for (_, v) in pairs {
                    assert_keys_sorted(v);
                }
            }
            Document::Sequence(items) => {
                for item in items {
                    if let Document::Mapping(_) = item {
                        assert_keys_sorted(item);
                    }
                }
            }
            _ => {}
        }
    }

    // Every output pair must come from an input pair with the same key whose
    // value sorts to the output value.
    fn assert_same_entries(input: &Document, output: &Document) {
        let (Document::Mapping(before), Document::Mapping(after)) = (input, output) else {
            panic!("expected mappings");
        };
        assert_eq!(before.len(), after.len());
        let mut unused: Vec<&(Document, Document)> = before.iter().collect();
        for (k, v) in after {
            let pos = unused
                .iter()
                .position(|(bk, bv)| bk == k && &sort_document(bv.clone()).unwrap() == v)
                .unwrap_or_else(|| panic!("no input entry for key {k:?}"));
            unused.remove(pos);
        }
    }

    const RICH: &str = r"
zeta:
  inner: {y: 2, x: 1}
  list:
    - {b: 1, a: 2}
    - scalar
    - [3, 2, 1]
alpha: null
mid: !Custom {q: 1, p: 2}
beta:
  - 10
  - {d: {f: 1, e: 2}, c: 3}
";

    #[test]
    fn flat_mapping_is_sorted() {
        let sorted = sort_document(doc("b: 1\na: 2\n")).unwrap();
        assert_eq!(sorted, doc("a: 2\nb: 1\n"));
    }

    #[test]
    fn nested_mapping_is_sorted() {
        let sorted = sort_document(doc("b: {z: 1, y: 2}\na: 3\n")).unwrap();
        assert_eq!(sorted, doc("a: 3\nb: {y: 2, z: 1}\n"));
    }

    #[test]
    fn mappings_inside_lists_are_sorted_in_place() {
        let sorted = sort_document(doc("list: [{b: 1, a: 2}, {d: 1, c: 2}]\n")).unwrap();
        assert_eq!(sorted, doc("list: [{a: 2, b: 1}, {c: 2, d: 1}]\n"));
    }

    #[test]
    fn null_values_are_untouched() {
        let out = sort(doc("a: null\nb: 1\n")).unwrap();
        assert_eq!(out.document, doc("a: null\nb: 1\n"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn tagged_value_is_kept_and_reported() {
        let input = doc("b: !Ref {z: 1, y: 2}\na: 1\n");
        let out = sort(input).unwrap();
        assert_eq!(out.document, doc("a: 1\nb: !Ref {z: 1, y: 2}\n"));
        assert_eq!(out.warnings.len(), 1);
        let w = &out.warnings[0];
        assert_eq!(w.path.last_key(), Some("b"));
        assert_eq!(w.kind, "tagged value !Ref");
        assert_eq!(w.to_string(), "b: tagged value !Ref left unsorted");
    }

    #[test]
    fn odd_list_elements_are_warned_and_skipped() {
        let out = sort(doc("items:\n  - !Sub foo\n  - [{b: 1, a: 2}]\n  - {b: 1, a: 2}\n  - 7\n"))
            .unwrap();
        assert_eq!(
            out.document,
            doc("items:\n  - !Sub foo\n  - [{b: 1, a: 2}]\n  - {a: 2, b: 1}\n  - 7\n")
        );
        let rendered: Vec<String> = out.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "items[0]: tagged value !Sub left unsorted",
                "items[1]: sequence left unsorted",
            ]
        );
    }

    #[test]
    fn top_level_sequence_and_scalars() {
        let sorted = sort_document(doc("- {b: 1, a: 2}\n- plain\n- ~\n")).unwrap();
        assert_eq!(sorted, doc("- {a: 2, b: 1}\n- plain\n- ~\n"));

        assert_eq!(sort_document(doc("42")).unwrap(), int(42));
        assert_eq!(sort_document(Document::Null).unwrap(), Document::Null);

        let out = sort(doc("!Thing x")).unwrap();
        assert!(out.warnings[0].path.is_root());
        assert_eq!(out.warnings[0].path.last_key(), None);
        assert_eq!(out.warnings[0].to_string(), ".: tagged value !Thing left unsorted");
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let input = Document::Mapping(vec![
            (key("b"), int(1)),
            (key("a"), int(1)),
            (key("b"), int(2)),
            (key("a"), int(2)),
        ]);
        let sorted = sort_document(input).unwrap();
        assert_eq!(
            sorted,
            Document::Mapping(vec![
                (key("a"), int(1)),
                (key("a"), int(2)),
                (key("b"), int(1)),
                (key("b"), int(2)),
            ])
        );
    }

    #[test]
    fn comparison_is_bytewise() {
        let sorted = sort_document(doc("b: 1\nB: 2\n_: 3\n\"10\": 4\n\"9\": 5\né: 6\n")).unwrap();
        let Document::Mapping(pairs) = sorted else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = pairs.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["10", "9", "B", "_", "b", "é"]);
    }

    #[test]
    fn non_string_keys_are_invariant_violations() {
        let err = sort(doc("1: one\n")).unwrap_err();
        assert_eq!(
            err,
            SortError::InvariantViolation {
                path: ".".into(),
                kind: "int".into()
            }
        );

        let err = sort(doc("outer:\n  ? [a, b]\n  : x\n")).unwrap_err();
        assert_eq!(
            err,
            SortError::InvariantViolation {
                path: "outer".into(),
                kind: "sequence".into()
            }
        );

        let err = sort(doc("list:\n  - {true: yes}\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invariant violation at list[0]: mapping key of kind bool, expected a string"
        );
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sort_document(doc(RICH)).unwrap();
        let twice = sort_document(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn output_keys_are_ordered_at_every_level() {
        let out = sort_document(doc(RICH)).unwrap();
        assert_keys_sorted(&out);
    }

    #[test]
    fn entries_are_preserved() {
        let input = doc(RICH);
        let output = sort_document(input.clone()).unwrap();
        assert_same_entries(&input, &output);
    }

    #[test]
    fn sequences_keep_length_and_order() {
        let input = doc(RICH);
        let out = sort(input.clone()).unwrap();
        let lookup = |d: &Document, name: &str| -> Document {
            let Document::Mapping(pairs) = d else {
                panic!("expected mapping");
            };
            pairs
                .iter()
                .find(|(k, _)| k.as_str() == Some(name))
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        let Document::Sequence(before) = lookup(&lookup(&input, "zeta"), "list") else {
            panic!("expected sequence");
        };
        let Document::Sequence(after) = lookup(&lookup(&out.document, "zeta"), "list") else {
            panic!("expected sequence");
        };
        assert_eq!(before.len(), after.len());
        assert_eq!(after[0], doc("{a: 2, b: 1}"));
        assert_eq!(before[1], after[1]);
        assert_eq!(before[2], after[2]);

        let rendered: Vec<String> = out.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "mid: tagged value !Custom left unsorted",
                "zeta.list[2]: sequence left unsorted",
            ]
        );
    }
}
