use super::ItemError;

/// Longest accepted item name, in characters.
pub const MAX_NAME_LEN: usize = 120;

/// Trim a user-supplied name and check it is usable.
///
/// # Errors
///
/// [`ItemError::NameRequired`] when nothing is left after trimming,
/// [`ItemError::NameTooLong`] past [`MAX_NAME_LEN`] characters.
pub fn normalize_name(raw: &str) -> Result<String, ItemError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ItemError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ItemError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(name.to_string())
}

/// Key used for duplicate detection; names compare case-insensitively.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_name("  Pizza \n").unwrap(), "Pizza");
    }

    #[test]
    fn test_normalize_rejects_blank() {
        assert!(matches!(normalize_name(""), Err(ItemError::NameRequired)));
        assert!(matches!(normalize_name(" \t "), Err(ItemError::NameRequired)));
    }

    #[test]
    fn test_normalize_counts_chars_not_bytes() {
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(normalize_name(&name).is_ok());
        let too_long = "é".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            normalize_name(&too_long),
            Err(ItemError::NameTooLong { max: MAX_NAME_LEN })
        ));
    }

    #[test]
    fn test_name_key_is_case_insensitive() {
        assert_eq!(name_key("Tacos"), name_key(" tACOS "));
    }
}
