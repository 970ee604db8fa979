//! Probe errors.

use meshweave_mesh::{MeshBaseIdentifier, MeshError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("data source `{data_source}` contained no recognizable data")]
    EmptyDataSource { data_source: String },
    #[error("syntax error in `{data_source}`: {message}")]
    Syntax {
        data_source: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    #[error("cannot resolve variable `{variable}` in `{data_source}`")]
    UnresolvedVariable {
        data_source: String,
        variable: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Lifecycle conditions the probe neither swallows nor reinterprets;
    /// hitting one of these indicates a probe programming error.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl ProbeError {
    pub fn empty_data_source(data_source: &MeshBaseIdentifier) -> Self {
        Self::EmptyDataSource {
            data_source: data_source.external_form().to_string(),
        }
    }

    pub fn syntax(data_source: &MeshBaseIdentifier, message: impl Into<String>) -> Self {
        Self::Syntax {
            data_source: data_source.external_form().to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn syntax_with(
        data_source: &MeshBaseIdentifier,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Syntax {
            data_source: data_source.external_form().to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unresolved_variable(data_source: &MeshBaseIdentifier, variable: &str) -> Self {
        Self::UnresolvedVariable {
            data_source: data_source.external_form().to_string(),
            variable: variable.to_string(),
        }
    }
}
