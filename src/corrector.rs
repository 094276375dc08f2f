use crate::models::Mapping;

/// Ordered table of corrupted-substring to correct-substring pairs.
///
/// Order is significant: each pair is applied over the whole buffer before the
/// next one is considered, so a later `correct` value that equals an earlier
/// `corrupted` value is never re-corrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptionMap {
    entries: Vec<Mapping>,
}

impl CorruptionMap {
    pub fn new(mut entries: Vec<Mapping>) -> Self {
        entries.retain(|m| !m.corrupted.is_empty());
        Self { entries }
    }

    /// The known corrupted emoji forms, most-corrupted generation first.
    ///
    /// The first three entries are the double-round forms (UTF-8 bytes put
    /// through two wrong 8-bit decodes), the last three the single-round
    /// forms. The stray ASCII quote characters inside the sequences are part
    /// of the corruption as it appears in real files.
    pub fn default_emoji_map() -> Self {
        Self::new(vec![
            Mapping {
                corrupted: "\u{c3}\u{b0}\u{c5}\u{b8}\"\u{c2}\u{a7}".to_string(),
                correct: "🔧".to_string(), // Wrench
            },
            Mapping {
                corrupted: "\u{c3}\u{a2}\u{c5}\u{2019}".to_string(),
                correct: "❌".to_string(), // Cross mark
            },
            Mapping {
                corrupted: "\u{c3}\u{b0}\u{c5}\u{b8}'\u{c2}\u{a1}".to_string(),
                correct: "💡".to_string(), // Light bulb
            },
            Mapping {
                corrupted: "\u{f0}\u{178}\"\u{a7}".to_string(),
                correct: "🔧".to_string(),
            },
            Mapping {
                corrupted: "\u{e2}\u{152}".to_string(),
                correct: "❌".to_string(),
            },
            Mapping {
                corrupted: "\u{f0}\u{178}'\u{a1}".to_string(),
                correct: "💡".to_string(),
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the table as a sequential fold: for each pair in order, replace
    /// all non-overlapping occurrences left to right, then move to the next
    /// pair using the updated buffer. Returns the new buffer and the total
    /// number of replacements made.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut current = text.to_string();
        let mut total = 0;
        for mapping in &self.entries {
            let hits = current.matches(mapping.corrupted.as_str()).count();
            if hits > 0 {
                current = current.replace(mapping.corrupted.as_str(), &mapping.correct);
                total += hits;
            }
        }
        (current, total)
    }
}
