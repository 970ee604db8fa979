//! Application bootstrap: the wiring a Meshweave application needs before
//! it can touch a mesh (a model registry with the built-in subject areas and
//! a probe directory).

use anyhow::{anyhow, Context, Result};
use meshweave_library::register_builtin_model;
use meshweave_mesh::{MeshBase, MeshBaseIdentifier};
use meshweave_model::ModelRegistry;
use meshweave_probe::{document_root_tag, Probe, ProbeDirectory};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub struct App {
    pub model: Arc<ModelRegistry>,
    pub directory: ProbeDirectory,
}

impl App {
    pub fn bootstrap() -> Result<Self> {
        let mut registry = ModelRegistry::new();
        register_builtin_model(&mut registry).context("registering built-in subject areas")?;
        Ok(Self {
            model: Arc::new(registry),
            directory: ProbeDirectory::with_defaults(),
        })
    }

    /// Route `document` to a probe by its root element and run it against a
    /// fresh staging base for `data_source`.
    pub fn import_document(
        &self,
        data_source: &MeshBaseIdentifier,
        document: &str,
    ) -> Result<MeshBase> {
        let root = document_root_tag(document)
            .ok_or_else(|| anyhow!("document has no XML root element"))?;
        let probe = self
            .directory
            .probe_for_root_tag(&root)
            .ok_or_else(|| anyhow!("no probe registered for root element <{root}>"))?;
        let mut staging = MeshBase::staging(data_source, self.model.clone());
        probe.parse_document(data_source, document, &mut staging)?;
        Ok(staging)
    }
}

/// The data-source identifier for a local input file, unless one was given
/// explicitly.
pub fn data_source_for(input: &Path, explicit: Option<&str>) -> Result<MeshBaseIdentifier> {
    if let Some(text) = explicit {
        return Ok(MeshBaseIdentifier::parse(text)?);
    }
    let absolute = input
        .canonicalize()
        .with_context(|| format!("resolving {}", input.display()))?;
    let url = url::Url::from_file_path(&absolute)
        .map_err(|()| anyhow!("cannot express {} as a file URL", absolute.display()))?;
    Ok(MeshBaseIdentifier::new(url))
}

pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
