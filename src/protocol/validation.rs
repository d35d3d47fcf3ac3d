/// Maximum accepted length for a player name, in characters.
pub const MAX_PLAYER_NAME_LENGTH: usize = 32;

/// Validate a client-supplied player name before it enters the roster.
///
/// Duplicate resolution (suffixing " 2", " 3", …) happens after validation
/// and is the room's job; this only rejects names that should never be
/// stored in any form.
pub fn validate_player_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Player name cannot be blank".to_string());
    }
    if name.chars().count() > MAX_PLAYER_NAME_LENGTH {
        return Err(format!(
            "Player name too long (max {MAX_PLAYER_NAME_LENGTH} characters)"
        ));
    }
    if trimmed.len() != name.len() {
        return Err("Player name cannot have leading or trailing whitespace".to_string());
    }

    for ch in name.chars() {
        if ch == ' ' {
            continue;
        }
        if ch.is_whitespace() || ch.is_control() {
            return Err("Player name cannot contain whitespace or control characters".to_string());
        }
        if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | '\'') {
            continue;
        }
        return Err("Player name contains invalid characters".to_string());
    }

    Ok(())
}
