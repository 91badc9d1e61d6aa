//! Shared helpers for the server

use url::form_urlencoded::byte_serialize;

const AVATAR_PLACEHOLDER_BASE: &str = "https://i.pravatar.cc/150?u=";

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Generated avatar URL seeded by `seed` (percent-encoded)
pub fn placeholder_avatar(seed: &str) -> String {
    // form encoding turns spaces into '+'; a literal '+' is already %2B
    let encoded: String = byte_serialize(seed.as_bytes()).collect::<String>().replace('+', "%20");
    format!("{AVATAR_PLACEHOLDER_BASE}{encoded}")
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn test_placeholder_avatar_encoding() {
        assert_eq!(
            placeholder_avatar("Asha Rao"),
            "https://i.pravatar.cc/150?u=Asha%20Rao"
        );
        assert_eq!(
            placeholder_avatar("a+b&c"),
            "https://i.pravatar.cc/150?u=a%2Bb%26c"
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("asha@college.edu"));
        assert!(is_valid_email("a.b@cs.college.ac.in"));
        assert!(!is_valid_email("asha@college"));
        assert!(!is_valid_email("asha college@x.edu"));
        assert!(!is_valid_email("@college.edu"));
        assert!(!is_valid_email("asha@@college.edu"));
        assert!(!is_valid_email("asha@.edu"));
        assert!(!is_valid_email("asha@college."));
    }
}
