/// Build the namespace of a property from the namespace of its parent.
///
/// `parent_id` is re-inserted ahead of `property` when the parent took its ID
/// from the tail of its own namespace (`chopped`), so that segment is not lost.
pub fn prepare_namespace(
    current: &[String],
    parent_id: &str,
    property: &str,
    chopped: bool,
) -> Vec<String> {
    let mut fqns = current.to_vec();
    if chopped && !parent_id.is_empty() {
        fqns.push(parent_id.to_string());
    }
    fqns.push(property.to_string());
    fqns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_appends_property() {
        assert_eq!(prepare_namespace(&[], "pet", "name", false), ns(&["name"]));
        assert_eq!(
            prepare_namespace(&ns(&["owner"]), "user", "email", false),
            ns(&["owner", "email"])
        );
    }

    #[test]
    fn test_reinserts_chopped_parent() {
        assert_eq!(
            prepare_namespace(&ns(&["order"]), "lines[]", "sku", true),
            ns(&["order", "lines[]", "sku"])
        );
    }

    #[test]
    fn test_chopped_without_id_only_appends() {
        assert_eq!(prepare_namespace(&ns(&["a"]), "", "b", true), ns(&["a", "b"]));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let current = ns(&["a"]);
        let _ = prepare_namespace(&current, "x", "b", true);
        assert_eq!(current, ns(&["a"]));
    }
}
