//! Ordered unique string lists.
//!
//! Shared by catalog categories, the IMEI staging buffer and stored item
//! IMEI lists, which all follow the same add/remove rules.

use crate::error::{StoreError, StoreResult};

/// Trims `raw` and rejects blank input.
pub fn normalize_value(raw: &str, what: &str) -> StoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Appends the trimmed value unless an exact match is already present.
///
/// Returns the stored (trimmed) value.
pub fn push_unique(list: &mut Vec<String>, raw: &str, scope: &str) -> StoreResult<String> {
    let value = normalize_value(raw, scope)?;
    if list.iter().any(|existing| existing == &value) {
        return Err(StoreError::Duplicate {
            scope: scope.to_string(),
            value,
        });
    }
    list.push(value.clone());
    Ok(value)
}

/// Removes and returns the entry at `index`.
pub fn remove_at(list: &mut Vec<String>, index: usize) -> StoreResult<String> {
    if index >= list.len() {
        return Err(StoreError::Index {
            index,
            len: list.len(),
        });
    }
    Ok(list.remove(index))
}

/// Checks a list loaded from elsewhere against the add rules.
pub fn ensure_unique(list: &[String], scope: &str) -> StoreResult<()> {
    for (position, value) in list.iter().enumerate() {
        if value.trim().is_empty() {
            return Err(StoreError::validation(format!("{scope} cannot be empty")));
        }
        if list[..position].contains(value) {
            return Err(StoreError::Duplicate {
                scope: scope.to_string(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_unique, push_unique, remove_at};
    use crate::error::ErrorKind;

    #[test]
    fn push_trims_and_rejects_exact_duplicates() {
        let mut list = Vec::new();
        assert_eq!(push_unique(&mut list, "  Acme ", "brands").unwrap(), "Acme");
        let err = push_unique(&mut list, "Acme", "brands").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
        push_unique(&mut list, "acme", "brands").unwrap();
        assert_eq!(list, vec!["Acme", "acme"]);
    }

    #[test]
    fn push_rejects_blank() {
        let mut list = Vec::new();
        let err = push_unique(&mut list, " \t", "imei").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_out_of_range_leaves_list_intact() {
        let mut list = vec!["a".to_string()];
        let err = remove_at(&mut list, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn ensure_unique_flags_repeats() {
        let list = vec!["1".to_string(), "2".to_string(), "1".to_string()];
        assert_eq!(
            ensure_unique(&list, "imei").unwrap_err().kind(),
            ErrorKind::Duplicate
        );
    }
}
