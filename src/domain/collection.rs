// ============================================================
// Layer 3 - Collection Kind and Dataset Location
// ============================================================
// A collection is a named dataset. Its name decides which file
// layout and which record shape we read:
//
//   name contains "mb"  → ShortSequence
//       <root>/<collection>/<split>/a.toks
//       <root>/<collection>/<split>/b.toks
//       <root>/<collection>/<split>/sim.txt
//       <root>/<collection>/<split>/id.txt
//
//   name contains "qa"  → QuestionAnswer
//       <root>/<collection>/<split>.csv
//
//   anything else       → Delimited (split is ignored)
//       <root>/datasets/<collection>.csv
//
// Detection happens once, here. Everything downstream matches
// on the CollectionKind enum instead of on the name.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FeedError, FeedResult};

/// Which file layout and record shape a collection uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Four line-aligned files: a.toks, b.toks, sim.txt, id.txt
    ShortSequence,
    /// One tab-separated file per split, 5 fields per row
    QuestionAnswer,
    /// One tab-separated file per collection, 8 fields per row
    Delimited,
}

impl CollectionKind {
    /// Pick the kind from the collection name.
    /// "mb" is checked before "qa", so a name containing both is ShortSequence.
    ///
    /// Never fails: a name matching neither is Delimited, so an unknown
    /// collection shows up later as `FeedError::Io` on
    /// `<root>/datasets/<collection>.csv` when the reader opens it.
    pub fn detect(collection: &str) -> Self {
        if collection.contains("mb") {
            CollectionKind::ShortSequence
        } else if collection.contains("qa") {
            CollectionKind::QuestionAnswer
        } else {
            CollectionKind::Delimited
        }
    }
}

/// File names of the ShortSequence layout, in the order the
/// reader zips them together.
pub const TEXT_A_FILE: &str = "a.toks";
pub const TEXT_B_FILE: &str = "b.toks";
pub const LABEL_FILE:  &str = "sim.txt";
pub const ID_FILE:     &str = "id.txt";

/// A validated (root, collection, split, kind) tuple.
/// Only paths are computed here, no file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    root:       PathBuf,
    collection: String,
    split:      String,
    kind:       CollectionKind,
}

impl DatasetLocation {
    /// Validate the collection name and settle the kind.
    ///
    /// `kind` overrides name-based detection when given.
    ///
    /// # Errors
    /// `FeedError::Configuration` if the collection or split name is
    /// empty, or either contains a path separator or `..`.
    pub fn resolve(
        root:       impl AsRef<Path>,
        collection: &str,
        split:      &str,
        kind:       Option<CollectionKind>,
    ) -> FeedResult<Self> {
        validate_name("collection", collection)?;
        validate_name("split", split)?;

        let kind = kind.unwrap_or_else(|| CollectionKind::detect(collection));

        Ok(Self {
            root:       root.as_ref().to_path_buf(),
            collection: collection.to_string(),
            split:      split.to_string(),
            kind,
        })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    /// The four parallel files of a ShortSequence collection:
    /// [text_a, text_b, labels, composite ids].
    pub fn paired_paths(&self) -> [PathBuf; 4] {
        let dir = self.root.join(&self.collection).join(&self.split);
        [
            dir.join(TEXT_A_FILE),
            dir.join(TEXT_B_FILE),
            dir.join(LABEL_FILE),
            dir.join(ID_FILE),
        ]
    }

    /// The single tab-separated file of a QuestionAnswer or Delimited
    /// collection. For ShortSequence this still returns the QA-style path,
    /// callers should use `paired_paths()` instead.
    pub fn delimited_path(&self) -> PathBuf {
        match self.kind {
            CollectionKind::Delimited => self
                .root
                .join("datasets")
                .join(format!("{}.csv", self.collection)),
            _ => self
                .root
                .join(&self.collection)
                .join(format!("{}.csv", self.split)),
        }
    }
}

fn validate_name(what: &str, name: &str) -> FeedResult<()> {
    if name.trim().is_empty() {
        return Err(FeedError::configuration(format!("{what} name is empty")));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(FeedError::configuration(format!(
            "{what} name '{name}' must not contain path components"
        )));
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_kind_from_name() {
        assert_eq!(CollectionKind::detect("mb"),        CollectionKind::ShortSequence);
        assert_eq!(CollectionKind::detect("trec_mb_13"), CollectionKind::ShortSequence);
        assert_eq!(CollectionKind::detect("wikiqa"),    CollectionKind::QuestionAnswer);
        assert_eq!(CollectionKind::detect("robust04"),  CollectionKind::Delimited);
    }

    #[test]
    fn test_override_beats_detection() {
        let loc = DatasetLocation::resolve(
            "/data", "robust04", "train", Some(CollectionKind::QuestionAnswer),
        ).unwrap();
        assert_eq!(loc.kind(), CollectionKind::QuestionAnswer);
    }

    #[test]
    fn test_layout_paths() {
        let mb = DatasetLocation::resolve("/data", "mb", "dev", None).unwrap();
        let [a, b, sim, id] = mb.paired_paths();
        assert_eq!(a,   PathBuf::from("/data/mb/dev/a.toks"));
        assert_eq!(b,   PathBuf::from("/data/mb/dev/b.toks"));
        assert_eq!(sim, PathBuf::from("/data/mb/dev/sim.txt"));
        assert_eq!(id,  PathBuf::from("/data/mb/dev/id.txt"));

        let qa = DatasetLocation::resolve("/data", "qa", "test", None).unwrap();
        assert_eq!(qa.delimited_path(), PathBuf::from("/data/qa/test.csv"));

        // Delimited ignores the split
        let core = DatasetLocation::resolve("/data", "core17", "test", None).unwrap();
        assert_eq!(core.delimited_path(), PathBuf::from("/data/datasets/core17.csv"));
    }

    #[test]
    fn test_rejects_unusable_names() {
        for bad in ["", "   ", "../etc", "a/b", "a\\b"] {
            let err = DatasetLocation::resolve("/data", bad, "train", None).unwrap_err();
            assert!(matches!(err, FeedError::Configuration(_)), "{bad:?}");
        }
        let err = DatasetLocation::resolve("/data", "mb", "", None).unwrap_err();
        assert!(matches!(err, FeedError::Configuration(_)));
    }
}
