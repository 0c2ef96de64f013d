//! Error taxonomy for the mapping layer.
//!
//! Every failure is surfaced as an explicit [`OgmError`] result. The core
//! never logs-and-swallows an error; callers can pattern-match on the
//! variant plus its identifying payload (property name, id, type).

use thiserror::Error;

use crate::schema::PropertyType;

/// Errors produced by schema registration, validation, query generation,
/// and query execution.
#[derive(Error, Debug)]
pub enum OgmError {
    /// Entity type or relationship name has no catalog entry.
    #[error("schema not registered: {0}")]
    SchemaNotRegistered(String),

    /// Metadata rejected at registration (duplicate identity property,
    /// duplicate property names, unsafe label/type/field identifier).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// An identifier destined for direct query-text interpolation failed
    /// the allow-list check (alphanumeric + underscore, no leading digit).
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A required property is absent or null in the supplied value bag.
    #[error("required property '{0}' is missing")]
    MissingRequiredProperty(String),

    /// A supplied property value has the wrong semantic type.
    #[error("property '{name}' must be {expected}, got {actual}")]
    PropertyTypeMismatch {
        name: String,
        expected: PropertyType,
        actual: String,
    },

    /// A value violated a declared min/max or length constraint.
    #[error("property '{name}' violates constraint: {detail}")]
    ConstraintViolation { name: String, detail: String },

    /// A descriptor declares a type the validator cannot check in this
    /// position (e.g. an identity property inside a writable bag).
    #[error("unsupported property type: {0}")]
    UnsupportedPropertyType(String),

    /// Caller attempted to set an identity or otherwise read-only field.
    #[error("cannot set read-only property: {0}")]
    ReadOnlyPropertyViolation(String),

    /// Update targeted a node that does not exist. Deletes never raise
    /// this; non-existence on delete is a no-op by contract.
    #[error("not found: {0}")]
    NotFound(String),

    /// The connection boundary reported no active session. Propagated
    /// unchanged, never retried here.
    #[error("no active session: {0}")]
    ConnectionUnavailable(String),

    /// The session's `run` call itself failed. The original cause is
    /// attached; the session is still released before this is observed.
    #[error("store operation failed: {message}")]
    StoreOperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A result row from the session boundary was missing an expected
    /// column or held a value of an unexpected shape.
    #[error("malformed result row: {0}")]
    ResultMapping(String),

    /// Connection configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl OgmError {
    /// Wraps a driver/store failure, attaching the original cause.
    pub fn store<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreOperationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
