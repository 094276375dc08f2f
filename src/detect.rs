//! Round-trip mojibake repair.
//!
//! Mojibake is UTF-8 text whose bytes were decoded under a wrong 8-bit
//! encoding, sometimes more than once. Repair re-encodes the text under a
//! suspected intermediate encoding and re-decodes those bytes as UTF-8. A
//! candidate is accepted only when it differs from the input, introduces no
//! replacement characters, and looks strictly less suspicious than the input.

use crate::error::RepairError;
use encoding_rs::{MACINTOSH, WINDOWS_1252};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hypothesis {
    Latin1,
    Windows1252,
    MacRoman,
}

pub const ALL_HYPOTHESES: [Hypothesis; 3] = [
    Hypothesis::Latin1,
    Hypothesis::Windows1252,
    Hypothesis::MacRoman,
];

/// How many decode/encode rounds a single `detect` call will unwind.
/// Corruption compounds one round per bad decode; three covers every chain
/// seen in practice.
pub const MAX_PASSES: usize = 3;

impl Hypothesis {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "latin-1" | "latin1" | "iso-8859-1" => Some(Hypothesis::Latin1),
            "windows-1252" | "cp1252" => Some(Hypothesis::Windows1252),
            "mac-roman" | "macintosh" => Some(Hypothesis::MacRoman),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hypothesis::Latin1 => "latin-1",
            Hypothesis::Windows1252 => "windows-1252",
            Hypothesis::MacRoman => "mac-roman",
        }
    }

    /// Encode the text as this encoding's byte sequence, or `None` if any
    /// character falls outside its repertoire.
    fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            // encoding_rs resolves the latin1 label to windows-1252, so pure
            // ISO-8859-1 keeps the direct code-point narrowing.
            Hypothesis::Latin1 => text
                .chars()
                .map(|c| {
                    let code = c as u32;
                    if code <= 0xFF { Some(code as u8) } else { None }
                })
                .collect(),
            Hypothesis::Windows1252 => {
                let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
                if had_errors { None } else { Some(bytes.into_owned()) }
            }
            Hypothesis::MacRoman => {
                let (bytes, _, had_errors) = MACINTOSH.encode(text);
                if had_errors { None } else { Some(bytes.into_owned()) }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// No hypothesis produced a valid repair; the buffer is taken as-is.
    Clean,
    /// The buffer was repaired; `via` lists every hypothesis that produced it.
    Repaired {
        text: String,
        via: Vec<Hypothesis>,
    },
}

/// Weighted count of classic UTF-8-as-8-bit artifacts.
pub fn suspicion_score(text: &str) -> usize {
    let mut score = 0;
    for marker in ["Ã", "Â", "Å"] {
        score += text.matches(marker).count();
    }
    for marker in ["â€", "ðŸ"] {
        score += text.matches(marker).count() * 4;
    }
    score += text.matches('\u{fffd}').count() * 10;
    score
}

fn roundtrip(text: &str, hypothesis: Hypothesis) -> Option<String> {
    let bytes = hypothesis.encode(text)?;
    let fixed = String::from_utf8(bytes).ok()?;
    let improved = fixed != text
        && !fixed.contains('\u{fffd}')
        && suspicion_score(&fixed) < suspicion_score(text);
    if improved { Some(fixed) } else { None }
}

fn detect_once(text: &str) -> Result<Option<(String, Vec<Hypothesis>)>, RepairError> {
    let mut candidates: Vec<(String, Vec<Hypothesis>)> = Vec::new();
    for hypothesis in ALL_HYPOTHESES {
        if let Some(fixed) = roundtrip(text, hypothesis) {
            // Hypotheses that agree on the output are one candidate.
            if let Some((_, via)) = candidates.iter_mut().find(|(t, _)| *t == fixed) {
                via.push(hypothesis);
            } else {
                candidates.push((fixed, vec![hypothesis]));
            }
        }
    }
    if candidates.len() > 1 {
        return Err(RepairError::Ambiguous {
            candidates: candidates
                .iter()
                .flat_map(|(_, via)| via.iter().map(|h| h.name().to_string()))
                .collect(),
        });
    }
    Ok(candidates.pop())
}

/// Try all hypotheses against the buffer, unwinding up to [`MAX_PASSES`]
/// rounds of compounded corruption. Exactly one surviving candidate per pass
/// is required; several distinct candidates is ambiguous and surfaced to the
/// caller rather than resolved silently.
pub fn detect(text: &str) -> Result<Detection, RepairError> {
    let mut current = text.to_string();
    let mut via: Vec<Hypothesis> = Vec::new();
    for _ in 0..MAX_PASSES {
        match detect_once(&current)? {
            Some((fixed, hypotheses)) => {
                current = fixed;
                for hypothesis in hypotheses {
                    if !via.contains(&hypothesis) {
                        via.push(hypothesis);
                    }
                }
            }
            None => break,
        }
    }
    if via.is_empty() {
        Ok(Detection::Clean)
    } else {
        Ok(Detection::Repaired { text: current, via })
    }
}

/// Force a single hypothesis. Unlike [`detect`], a buffer that cannot make
/// the round trip is an error here, because the caller asserted the encoding.
pub fn repair_with(text: &str, hypothesis: Hypothesis) -> Result<String, RepairError> {
    let bytes = hypothesis.encode(text).ok_or_else(|| RepairError::Encoding {
        encoding: hypothesis.name(),
        detail: "text contains characters outside the encoding's repertoire".to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| RepairError::Encoding {
        encoding: hypothesis.name(),
        detail: format!("re-decoded bytes are not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // UTF-8 bytes of `text` decoded under the wrong encoding, as a corrupting
    // counterpart to the repair direction.
    fn corrupt_via_latin1(text: &str) -> String {
        text.bytes().map(|b| b as char).collect()
    }

    fn corrupt_via_windows1252(text: &str) -> String {
        let (decoded, _, _) = WINDOWS_1252.decode(text.as_bytes());
        decoded.into_owned()
    }

    #[test]
    fn latin1_round_trip_recovers_original_text() {
        let original = "Käse ist über";
        let corrupted = corrupt_via_latin1(original);
        assert_eq!(corrupted, "KÃ¤se ist Ã¼ber");
        match detect(&corrupted).unwrap() {
            Detection::Repaired { text, via } => {
                assert_eq!(text, original);
                assert!(via.contains(&Hypothesis::Latin1));
            }
            Detection::Clean => panic!("corruption not detected"),
        }
    }

    #[test]
    fn windows1252_round_trip_recovers_emoji() {
        let original = "Step 1 🔧 done";
        let corrupted = corrupt_via_windows1252(original);
        match detect(&corrupted).unwrap() {
            Detection::Repaired { text, via } => {
                assert_eq!(text, original);
                assert_eq!(via, vec![Hypothesis::Windows1252]);
            }
            Detection::Clean => panic!("corruption not detected"),
        }
    }

    #[test]
    fn double_round_corruption_is_unwound_in_two_passes() {
        let original = "🔧";
        let corrupted = corrupt_via_windows1252(&corrupt_via_windows1252(original));
        match detect(&corrupted).unwrap() {
            Detection::Repaired { text, .. } => assert_eq!(text, original),
            Detection::Clean => panic!("corruption not detected"),
        }
    }

    #[test]
    fn clean_ascii_is_reported_clean() {
        assert_eq!(detect("plain ascii text").unwrap(), Detection::Clean);
    }

    #[test]
    fn clean_accented_text_is_reported_clean() {
        // Legitimate Latin-1-range text whose bytes are not valid UTF-8, so
        // no hypothesis can complete the round trip.
        assert_eq!(detect("Käse ist über").unwrap(), Detection::Clean);
    }

    #[test]
    fn detection_is_idempotent() {
        let corrupted = corrupt_via_latin1("Käse");
        let Detection::Repaired { text: once, .. } = detect(&corrupted).unwrap() else {
            panic!("corruption not detected");
        };
        assert_eq!(detect(&once).unwrap(), Detection::Clean);
    }

    #[test]
    fn competing_hypotheses_are_surfaced_not_resolved() {
        // "Ã©" round-trips under latin-1 (to "é") and under mac-roman (to a
        // different valid string), so no single repair may be picked.
        let err = detect("\u{c3}\u{a9}").unwrap_err();
        match err {
            RepairError::Ambiguous { candidates } => {
                assert!(candidates.contains(&"latin-1".to_string()));
                assert!(candidates.contains(&"mac-roman".to_string()));
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn forced_hypothesis_rejects_unrepresentable_text() {
        let err = repair_with("🔧", Hypothesis::Latin1).unwrap_err();
        assert!(matches!(err, RepairError::Encoding { encoding: "latin-1", .. }));
    }

    #[test]
    fn forced_hypothesis_reports_failed_round_trip() {
        // Valid Latin-1 repertoire, but the bytes are not UTF-8.
        let err = repair_with("Käse", Hypothesis::Latin1).unwrap_err();
        assert!(matches!(err, RepairError::Encoding { .. }));
    }

    #[test]
    fn suspicion_score_orders_corrupted_above_clean() {
        assert!(suspicion_score("KÃ¤se ist Ã¼ber") > suspicion_score("Käse ist über"));
        assert!(suspicion_score("ðŸ\u{201d}§") > suspicion_score("🔧"));
        assert_eq!(suspicion_score("plain"), 0);
    }
}
