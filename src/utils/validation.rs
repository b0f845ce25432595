use regex::Regex;
use std::sync::OnceLock;

/// Validates a username at registration.
///
/// Rules:
/// 1. Lowercase alphanumeric and underscores only (a-z, 0-9, _)
/// 2. Must start with a letter
/// 3. Length between 2 and 32 characters
/// 4. Not a reserved name
pub fn validate_username(name: &str) -> Result<(), String> {
    if name.len() < 2 {
        return Err("Username must be at least 2 characters long".to_string());
    }
    if name.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    // We use OnceLock because compiling regexes is expensive and this runs on
    // every registration.
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

    if !re.is_match(name) {
        return Err(
            "Username must be lowercase alphanumeric with underscores, starting with a letter"
                .to_string(),
        );
    }

    // System reserved. Nobody gets to be "admin".
    let reserved = ["admin", "root", "me", "system", "support", "api", "health"];
    if reserved.contains(&name) {
        return Err("Username is reserved".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_usernames() {
        for name in ["alice", "bob_99", "jm", "a_very_long_but_legal_name"] {
            assert!(validate_username(name).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn rejects_bad_usernames() {
        for name in [
            "",
            "a",
            "Alice",       // uppercase
            "9lives",      // starts with digit
            "_under",      // starts with underscore
            "has space",
            "has-hyphen",
            "admin",       // reserved
            "me",          // reserved, would collide with /users/me
            "waaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaay_too_long",
        ] {
            assert!(validate_username(name).is_err(), "accepted {name}");
        }
    }
}
