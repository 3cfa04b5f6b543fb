use serde::{Deserialize, Serialize};

/// A participant, keyed by `platform_id` within its session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(
        rename = "platformId",
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub platform_id: String,
    #[serde(
        rename = "accountName",
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub account_name: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_string"
    )]
    pub role: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_string"
    )]
    pub avatar: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_string"
    )]
    pub remark: Option<String>,
}

impl Member {
    pub fn new(platform_id: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            platform_id: platform_id.into(),
            account_name: account_name.into(),
            ..Default::default()
        }
    }
}
