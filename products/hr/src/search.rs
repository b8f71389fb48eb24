use entity::employee;

/// Normalized search term; `None` means "match everything".
pub fn normalize(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match over name, email, department and position.
/// `needle` must already be lowercased.
pub fn matches(employee: &employee::Model, needle: &str) -> bool {
    [
        employee.first_name.as_str(),
        employee.last_name.as_str(),
        employee.email.as_str(),
        employee.department.as_str(),
        employee.position.as_str(),
    ]
    .into_iter()
    .any(|haystack| haystack.to_lowercase().contains(needle))
}

/// Fresh copy of the records matching `term`, in collection order.
pub fn filter(collection: &[employee::Model], term: &str) -> Vec<employee::Model> {
    match normalize(term) {
        None => collection.to_vec(),
        Some(needle) => collection
            .iter()
            .filter(|employee| matches(employee, &needle))
            .cloned()
            .collect(),
    }
}
