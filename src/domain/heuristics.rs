//! Textual Heuristics
//!
//! Best-effort scrapers kept behind narrow interfaces so a structured decoder
//! can replace either one without touching the pipeline:
//! - `display_name_from_bytes`: raw metadata account bytes -> token name
//! - `mint_from_logs`: program log lines -> burned mint
//!
//! Both depend on upstream layouts that are not guaranteed. Expect wrong or
//! truncated results when those layouts drift.

/// Minimum length of a printable run to be considered a name candidate
pub const MIN_NAME_RUN: usize = 3;
/// Candidates at or above this length are skipped
pub const MAX_NAME_LEN: usize = 30;

/// Result of scanning log lines for a burn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintScan {
    /// No line carries the burn marker
    NoMarker,
    /// Marker present, but no usable mint field follows it
    MarkerWithoutMint,
    Found(String),
}

/// Pick a display name out of raw metadata account bytes.
///
/// Splits the bytes into runs of printable ASCII, keeps runs of at least
/// `MIN_NAME_RUN` characters, and returns the first one shorter than
/// `MAX_NAME_LEN`.
///
/// Runs are trimmed before the length bounds apply, so space padding never
/// counts: `"  WIF" + 40 spaces` yields `WIF`, and `"   ab  "` yields nothing.
pub fn display_name_from_bytes(data: &[u8]) -> Option<String> {
    data.split(|b| !is_printable(*b))
        .filter(|run| run.len() >= MIN_NAME_RUN)
        .filter_map(|run| std::str::from_utf8(run).ok())
        .map(str::trim)
        .find(|candidate| candidate.len() >= MIN_NAME_RUN && candidate.len() < MAX_NAME_LEN)
        .map(str::to_string)
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// Find the burned mint in program logs.
///
/// Locates the first line containing `marker`, then scans for `label` and
/// takes the last whitespace-delimited token after it. Two choices are
/// deliberate:
/// - the marker line itself is scanned too, since some programs log the
///   burn and its mint on one line;
/// - a trailing token that doesn't decode to a 32-byte base58 key is passed
///   over and the scan continues, so a garbled field never becomes the mint.
pub fn mint_from_logs(logs: &[String], marker: &str, label: &str) -> MintScan {
    let Some(start) = logs.iter().position(|line| line.contains(marker)) else {
        return MintScan::NoMarker;
    };

    logs[start..]
        .iter()
        .filter_map(|line| {
            let at = line.find(label)?;
            line[at + label.len()..].split_whitespace().last()
        })
        .find(|token| looks_like_address(token))
        .map(|token| MintScan::Found(token.to_string()))
        .unwrap_or(MintScan::MarkerWithoutMint)
}

/// True when the string decodes as a 32-byte base58 public key
pub fn looks_like_address(candidate: &str) -> bool {
    bs58::decode(candidate)
        .into_vec()
        .map(|bytes| bytes.len() == 32)
        .unwrap_or(false)
}
