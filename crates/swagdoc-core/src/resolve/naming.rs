use heck::ToKebabCase;

/// Slug a human title: lowercase, with each run of whitespace turned into `-`.
///
/// Word boundaries inside a word are kept as-is, so `UserAccount` becomes
/// `useraccount` while `User Account` becomes `user-account`.
pub fn title_to_kebab(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Kebab-case an identifier written in camel, pascal or snake case.
pub fn camel_to_kebab(name: &str) -> String {
    name.to_kebab_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_to_kebab() {
        assert_eq!(title_to_kebab("Widget"), "widget");
        assert_eq!(title_to_kebab("Widget Detail"), "widget-detail");
        assert_eq!(title_to_kebab("  Order   Line Item "), "order-line-item");
        assert_eq!(title_to_kebab("UserAccount"), "useraccount");
        assert_eq!(title_to_kebab(""), "");
    }

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("listPets"), "list-pets");
        assert_eq!(camel_to_kebab("GetUserByName"), "get-user-by-name");
        assert_eq!(camel_to_kebab("find_pets_by_tag"), "find-pets-by-tag");
        assert_eq!(camel_to_kebab("list-users"), "list-users");
        assert_eq!(camel_to_kebab("get"), "get");
    }
}
