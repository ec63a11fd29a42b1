use rand::Rng;

/// Generate a lowercase alphanumeric join code of a given length.
///
/// The alphabet matches what fits comfortably in a QR deep link and is easy
/// to read out loud, so no uppercase and no symbols.
#[must_use]
pub fn nice_id(length: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::nice_id;

    #[test]
    fn nice_id_has_requested_length() {
        assert_eq!(nice_id(6).len(), 6);
        assert_eq!(nice_id(12).len(), 12);
        assert!(nice_id(0).is_empty());
    }

    #[test]
    fn nice_id_stays_in_alphabet() {
        let id = nice_id(64);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }
}
