//! Name-shape classification used by the unused-symbol and access rules.

/// Class-private names start with a double underscore and do not end with
/// one.
pub fn is_private_name(name: &str) -> bool {
    name.len() > 2 && name.starts_with("__") && !name.ends_with("__")
}

/// Protected names start with a single underscore.
pub fn is_protected_name(name: &str) -> bool {
    name.len() > 1 && name.starts_with('_') && !name.starts_with("__")
}

pub fn is_private_or_protected_name(name: &str) -> bool {
    name.len() > 1 && name.starts_with('_')
}

/// "Dunder" names start and end with two underscores.
pub fn is_dunder_name(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Constants are all-caps with possible digits and underscores.
pub fn is_constant_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
        && !name.chars().all(|ch| ch == '_')
}
