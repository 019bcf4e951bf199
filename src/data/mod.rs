// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from dataset files on disk to padded batches.
//
//   dataset files (.toks / .txt / .csv)
//       │
//       ▼
//   RecordReader     → one PairRecord per pull
//       │
//       ▼
//   PairEncoder      → [CLS] a [SEP] b [SEP] ids + segment ids
//       │
//       ▼
//   BatchAssembler   → groups batch_size examples, marks pass ends
//       │
//       ▼
//   PaddedBatch      → right-padded matrices + attention mask
//       │
//       ▼
//   PairBatcher      → burn tensors (Layer 5)
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Opens dataset files and decodes records
pub mod reader;

/// Tokenises record text into id and segment sequences
pub mod encoder;

/// Pads encoded examples into rectangular batches
pub mod collate;

/// Pull-based batching with optional repeat
pub mod assembler;

#[cfg(test)]
pub(crate) mod test_support {
    use std::{collections::HashMap, fs, path::Path};

    use crate::domain::traits::TextTokenizer;
    use crate::error::FeedResult;

    /// Whitespace tokenizer with BERT ids for the markers and a
    /// deterministic id for every other word.
    pub struct VocabTokenizer {
        specials: HashMap<&'static str, u32>,
    }

    impl Default for VocabTokenizer {
        fn default() -> Self {
            let specials = HashMap::from([("[PAD]", 0), ("[CLS]", 101), ("[SEP]", 102)]);
            Self { specials }
        }
    }

    impl TextTokenizer for VocabTokenizer {
        fn token_ids(&self, text: &str) -> FeedResult<Vec<u32>> {
            Ok(text
                .split_whitespace()
                .map(|w| match self.specials.get(w) {
                    Some(&id) => id,
                    None      => 1000 + w.bytes().map(u32::from).sum::<u32>(),
                })
                .collect())
        }
    }

    pub fn write_rows(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn write_paired(dir: &Path, a: &[&str], b: &[&str], sim: &[&str], id: &[&str]) {
        for (name, lines) in [("a.toks", a), ("b.toks", b), ("sim.txt", sim), ("id.txt", id)] {
            let mut body = lines.join("\n");
            body.push('\n');
            write_rows(&dir.join(name), &body);
        }
    }
}
