pub type Result<T> = std::result::Result<T, Error>;

#[derive(PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error {
    #[error("Type resolution failed: {0}")]
    TypeResolution(#[from] ResolveError),

    #[error("Unknown property '{property}' on {type_name}")]
    UnknownProperty {
        type_name: String,
        property: String,
    },

    #[error("Property '{property}' of {type_name} has no {capability}")]
    MissingCapability {
        type_name: String,
        property: String,
        capability: &'static str,
    },

    #[error("Property '{property}' declared twice by {type_name}")]
    DuplicateProperty {
        type_name: String,
        property: String,
    },

    #[error("Property table cache holds a foreign entry for {0}")]
    TableCache(String),

    #[error("EncodeError: {0}")]
    Encode(String),

    #[error("DecodeError: {0}")]
    Decode(String),
}

#[derive(PartialEq, Eq, Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("type {name} not found in namespace {namespace}")]
    TypeNotFound {
        namespace: String,
        name: String,
    },
}

impl Error {

    pub(crate) fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Error::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

}
