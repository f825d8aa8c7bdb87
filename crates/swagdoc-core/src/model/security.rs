use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::security::SecuritySchemeType;

/// OAuth2 settings of a security scheme.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OAuth2Scheme {
    /// implicit, password, application or accessCode
    pub flow: Option<String>,
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub scopes: IndexMap<String, String>,
}

/// A security scheme declared in `securityDefinitions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,
    pub description: String,
    /// Header or query parameter carrying an API key.
    pub param_name: Option<String>,
    pub param_location: Option<String>,
    pub oauth2: Option<OAuth2Scheme>,
}

impl SecurityScheme {
    pub fn is_api_key(&self) -> bool {
        self.scheme_type == SecuritySchemeType::ApiKey
    }

    pub fn is_basic(&self) -> bool {
        self.scheme_type == SecuritySchemeType::Basic
    }

    pub fn is_oauth2(&self) -> bool {
        self.scheme_type == SecuritySchemeType::OAuth2
    }

    /// Scopes the scheme declares, empty for non-OAuth2 schemes.
    pub fn declared_scopes(&self) -> Option<&IndexMap<String, String>> {
        self.oauth2.as_ref().map(|o| &o.scopes)
    }
}

/// A security requirement applied to a method: the scheme plus the requested
/// scopes that the scheme actually declares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Security {
    pub scheme: SecurityScheme,
    pub scopes: IndexMap<String, String>,
}
