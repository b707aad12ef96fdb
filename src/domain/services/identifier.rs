use rand::Rng;

/// Uppercase alphanumerics minus the OCR traps (I, O, 0, 1). Codes are
/// rendered as linear barcodes and sometimes typed back in by hand.
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 6;

/// Generates a fresh scan code. Never consults storage; the unique
/// constraint on the guests table catches the (negligible) collision case
/// and the create path regenerates on conflict.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Canonical form used for every lookup and every stored code: trimmed and
/// uppercased, so scanner noise (case, incidental whitespace) cannot cause
/// false negatives.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}
