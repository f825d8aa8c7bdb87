use indexmap::IndexMap;
use log::warn;

use crate::markdown::DescriptionRenderer;
use crate::model::{OAuth2Scheme, Security, SecurityScheme};
use crate::parse::security::{
    SecurityRequirement, SecurityScheme as SchemeDefinition, SecuritySchemeType,
};

/// Convert the document's `securityDefinitions`.
pub fn security_definitions(
    definitions: &IndexMap<String, SchemeDefinition>,
    renderer: &dyn DescriptionRenderer,
) -> IndexMap<String, SecurityScheme> {
    definitions
        .iter()
        .map(|(name, def)| (name.clone(), convert_scheme(def, renderer)))
        .collect()
}

fn convert_scheme(def: &SchemeDefinition, renderer: &dyn DescriptionRenderer) -> SecurityScheme {
    let oauth2 = (def.scheme_type == SecuritySchemeType::OAuth2).then(|| OAuth2Scheme {
        flow: def.flow.map(|f| f.as_str().to_string()),
        authorization_url: def.authorization_url.clone(),
        token_url: def.token_url.clone(),
        scopes: def.scopes.clone(),
    });
    SecurityScheme {
        scheme_type: def.scheme_type,
        description: def
            .description
            .as_deref()
            .map(|d| renderer.render(d))
            .unwrap_or_default(),
        param_name: def.name.clone(),
        param_location: def.location.map(|l| l.as_str().to_string()),
        oauth2,
    }
}

/// Map security requirements onto the declared schemes. Requested scopes are kept
/// only when the scheme declares them, together with their description.
pub fn process_security(
    requirements: &[SecurityRequirement],
    definitions: &IndexMap<String, SecurityScheme>,
) -> IndexMap<String, Security> {
    let mut applied = IndexMap::new();
    for requirement in requirements {
        for (name, requested) in requirement {
            let Some(scheme) = definitions.get(name) else {
                warn!("security requirement {name} has no matching security definition");
                continue;
            };
            let scopes = match scheme.declared_scopes() {
                Some(declared) => requested
                    .iter()
                    .filter_map(|scope| {
                        declared
                            .get(scope)
                            .map(|description| (scope.clone(), description.clone()))
                    })
                    .collect(),
                None => IndexMap::new(),
            };
            applied.insert(
                name.clone(),
                Security {
                    scheme: scheme.clone(),
                    scopes,
                },
            );
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::PlainText;

    fn definitions() -> IndexMap<String, SecurityScheme> {
        let yaml = r#"
api_key:
  type: apiKey
  name: X-API-Key
  in: header
petstore_auth:
  type: oauth2
  flow: implicit
  authorizationUrl: https://auth.example.com/authorize
  scopes:
    "read:pets": read your pets
    "write:pets": modify pets in your account
"#;
        let raw: IndexMap<String, SchemeDefinition> = serde_yaml_ng::from_str(yaml).unwrap();
        security_definitions(&raw, &PlainText)
    }

    #[test]
    fn test_convert_definitions() {
        let defs = definitions();
        let api_key = &defs["api_key"];
        assert!(api_key.is_api_key());
        assert_eq!(api_key.param_name.as_deref(), Some("X-API-Key"));
        assert_eq!(api_key.param_location.as_deref(), Some("header"));
        assert!(api_key.oauth2.is_none());

        let oauth = &defs["petstore_auth"];
        assert!(oauth.is_oauth2());
        let settings = oauth.oauth2.as_ref().unwrap();
        assert_eq!(settings.flow.as_deref(), Some("implicit"));
        assert_eq!(settings.scopes.len(), 2);
    }

    #[test]
    fn test_scopes_cross_referenced() {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(
            "petstore_auth".to_string(),
            vec!["write:pets".to_string(), "admin:everything".to_string()],
        );
        let applied = process_security(&[requirement], &definitions());
        let security = &applied["petstore_auth"];
        assert_eq!(security.scopes.len(), 1);
        assert_eq!(security.scopes["write:pets"], "modify pets in your account");
    }

    #[test]
    fn test_unknown_scheme_skipped() {
        let mut requirement = SecurityRequirement::new();
        requirement.insert("missing".to_string(), Vec::new());
        requirement.insert("api_key".to_string(), Vec::new());
        let applied = process_security(&[requirement], &definitions());
        assert_eq!(applied.keys().collect::<Vec<_>>(), vec!["api_key"]);
        assert!(applied["api_key"].scopes.is_empty());
    }
}
