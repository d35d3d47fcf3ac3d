use rand::RngExt;

/// Characters allowed in room codes. Ambiguous glyphs (0/O, 1/I) are
/// excluded so codes survive being read aloud.
const CLEAN_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Room codes are short enough to type on a phone.
pub const ROOM_CODE_LENGTH: usize = 4;

/// Generate a fresh 4-character room code over the clean alphabet.
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CLEAN_CHARS.len());
            // SAFETY: `idx` is produced by `random_range(0..len)`, so it is
            // always within [0, len).
            #[allow(clippy::indexing_slicing)]
            let ch = CLEAN_CHARS[idx] as char;
            ch
        })
        .collect()
}

/// Uppercase a client-supplied code so lookups are case-insensitive.
pub fn normalize_room_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Whether a (normalized) code could have been produced by
/// [`generate_room_code`].
pub fn is_valid_room_code(code: &str) -> bool {
    code.len() == ROOM_CODE_LENGTH && code.bytes().all(|b| CLEAN_CHARS.contains(&b))
}
