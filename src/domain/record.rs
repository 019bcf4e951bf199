// ============================================================
// Layer 3 - PairRecord Domain Type
// ============================================================
// One labelled text pair as it comes off disk, before any
// tokenisation. There are three shapes, one per CollectionKind,
// and each has its own decoder:
//
//   ShortSequence   4 parallel lines: a, b, label, composite id
//                   composite id = "qid Q0 docid rank score run"
//
//   QuestionAnswer  label \t qid \t docid \t text_a \t text_b
//
//   Delimited       label \t sim \t text_a \t text_b \t qno \t docno
//                         \t qidx \t didx
//
// Decoders never guess: a row with the wrong number of fields
// or a non-integer id is an error, and the pass stops there.
//
// Reference: Rust Book §6 (Enums), §9 (Recoverable Errors)

use serde::{Deserialize, Serialize};

use crate::domain::collection::CollectionKind;
use crate::error::{FeedError, FeedResult};

/// Query and document ids pulled out of a composite id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeId {
    pub query_id: i64,
    pub doc_id:   i64,
}

impl CompositeId {
    /// Fields in a composite id: qid, Q0, docid, rank, score, run
    pub const FIELDS: usize = 6;

    /// Parse "qid _ docid _ _ _" (whitespace separated, exactly six fields).
    pub fn parse(line: usize, raw: &str) -> FeedResult<Self> {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.len() != Self::FIELDS {
            return Err(FeedError::MalformedCompositeId {
                line,
                value: raw.to_string(),
            });
        }
        Ok(Self {
            query_id: parse_int(line, "query_id", fields[0])?,
            doc_id:   parse_int(line, "doc_id",   fields[2])?,
        })
    }
}

/// A raw labelled text pair, tagged by collection kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PairRecord {
    ShortSequence {
        label:  i64,
        text_a: String,
        text_b: String,
        id:     CompositeId,
    },
    QuestionAnswer {
        label:    i64,
        query_id: i64,
        doc_id:   i64,
        text_a:   String,
        text_b:   String,
    },
    Delimited {
        label:      i64,
        similarity: String,
        text_a:     String,
        text_b:     String,
        query_no:   String,
        doc_no:     String,
        query_idx:  i64,
        doc_idx:    i64,
    },
}

impl PairRecord {
    /// Decode one lockstep step of the four ShortSequence files.
    pub fn from_paired_lines(
        line:     usize,
        text_a:   &str,
        text_b:   &str,
        label:    &str,
        composite: &str,
    ) -> FeedResult<Self> {
        Ok(PairRecord::ShortSequence {
            label:  parse_int(line, "label", label)?,
            text_a: text_a.to_string(),
            text_b: text_b.to_string(),
            id:     CompositeId::parse(line, composite)?,
        })
    }

    /// Decode a tab-separated row for a delimited collection kind.
    ///
    /// # Errors
    /// `Configuration` if `kind` is ShortSequence (it has no rows),
    /// `MalformedRow` on wrong arity, `InvalidInteger` on bad ids.
    pub fn from_row(kind: CollectionKind, line: usize, row: &str) -> FeedResult<Self> {
        match kind {
            CollectionKind::QuestionAnswer => Self::from_qa_row(line, row),
            CollectionKind::Delimited      => Self::from_delimited_row(line, row),
            CollectionKind::ShortSequence  => Err(FeedError::configuration(
                "short-sequence collections are read from parallel files, not rows",
            )),
        }
    }

    fn from_qa_row(line: usize, row: &str) -> FeedResult<Self> {
        let f = split_row(line, row, 5)?;
        Ok(PairRecord::QuestionAnswer {
            label:    parse_int(line, "label",    f[0])?,
            query_id: parse_int(line, "query_id", f[1])?,
            doc_id:   parse_int(line, "doc_id",   f[2])?,
            text_a:   f[3].to_string(),
            text_b:   f[4].to_string(),
        })
    }

    fn from_delimited_row(line: usize, row: &str) -> FeedResult<Self> {
        let f = split_row(line, row, 8)?;
        Ok(PairRecord::Delimited {
            label:      parse_int(line, "label", f[0])?,
            similarity: f[1].to_string(),
            text_a:     f[2].to_string(),
            text_b:     f[3].to_string(),
            query_no:   f[4].to_string(),
            doc_no:     f[5].to_string(),
            query_idx:  parse_int(line, "query_idx", f[6])?,
            doc_idx:    parse_int(line, "doc_idx",   f[7])?,
        })
    }

    pub fn label(&self) -> i64 {
        match self {
            PairRecord::ShortSequence  { label, .. }
            | PairRecord::QuestionAnswer { label, .. }
            | PairRecord::Delimited      { label, .. } => *label,
        }
    }

    pub fn text_a(&self) -> &str {
        match self {
            PairRecord::ShortSequence  { text_a, .. }
            | PairRecord::QuestionAnswer { text_a, .. }
            | PairRecord::Delimited      { text_a, .. } => text_a,
        }
    }

    pub fn text_b(&self) -> &str {
        match self {
            PairRecord::ShortSequence  { text_b, .. }
            | PairRecord::QuestionAnswer { text_b, .. }
            | PairRecord::Delimited      { text_b, .. } => text_b,
        }
    }

    pub fn query_id(&self) -> i64 {
        match self {
            PairRecord::ShortSequence  { id, .. }        => id.query_id,
            PairRecord::QuestionAnswer { query_id, .. }  => *query_id,
            PairRecord::Delimited      { query_idx, .. } => *query_idx,
        }
    }

    pub fn doc_id(&self) -> i64 {
        match self {
            PairRecord::ShortSequence  { id, .. }      => id.doc_id,
            PairRecord::QuestionAnswer { doc_id, .. }  => *doc_id,
            PairRecord::Delimited      { doc_idx, .. } => *doc_idx,
        }
    }
}

fn split_row(line: usize, row: &str, expected: usize) -> FeedResult<Vec<&str>> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() != expected {
        return Err(FeedError::MalformedRow {
            line,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_int(line: usize, field: &'static str, value: &str) -> FeedResult<i64> {
    value.trim().parse::<i64>().map_err(|_| FeedError::InvalidInteger {
        line,
        field,
        value: value.to_string(),
    })
}
