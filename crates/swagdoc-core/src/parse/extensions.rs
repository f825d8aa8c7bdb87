use indexmap::IndexMap;
use serde_json::Value;

/// Vendor extensions (`x-*` keys) captured from any document object.
pub type Extensions = IndexMap<String, Value>;

pub const X_OPERATION_NAME: &str = "x-operationName";
pub const X_PATH_NAME: &str = "x-pathName";
pub const X_VERSION: &str = "x-version";
pub const X_NAVIGATE_METHODS_BY_NAME: &str = "x-navigateMethodsByName";
pub const X_EXCLUDE_FROM_OPERATIONS: &str = "x-excludeFromOperations";

/// Typed accessors over an extension map. Values of the wrong JSON type read as absent.
pub trait VendorExtensions {
    fn ext_str(&self, key: &str) -> Option<&str>;
    fn ext_bool(&self, key: &str) -> Option<bool>;
    /// String members of an array extension; non-string members are dropped.
    fn ext_str_list(&self, key: &str) -> Vec<String>;
}

impl VendorExtensions for Extensions {
    fn ext_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn ext_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn ext_str_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_accessors() {
        let mut ext = Extensions::new();
        ext.insert(X_VERSION.to_string(), json!("v2"));
        ext.insert(X_NAVIGATE_METHODS_BY_NAME.to_string(), json!(true));
        ext.insert(
            X_EXCLUDE_FROM_OPERATIONS.to_string(),
            json!(["create", 3, "update"]),
        );

        assert_eq!(ext.ext_str(X_VERSION), Some("v2"));
        assert_eq!(ext.ext_bool(X_NAVIGATE_METHODS_BY_NAME), Some(true));
        assert_eq!(
            ext.ext_str_list(X_EXCLUDE_FROM_OPERATIONS),
            vec!["create".to_string(), "update".to_string()]
        );
    }

    #[test]
    fn test_wrong_type_reads_as_absent() {
        let mut ext = Extensions::new();
        ext.insert(X_VERSION.to_string(), json!(2));
        ext.insert(X_PATH_NAME.to_string(), json!(["a"]));

        assert_eq!(ext.ext_str(X_VERSION), None);
        assert_eq!(ext.ext_bool(X_VERSION), None);
        assert!(ext.ext_str_list(X_OPERATION_NAME).is_empty());
        assert_eq!(ext.ext_str(X_PATH_NAME), None);
    }
}
