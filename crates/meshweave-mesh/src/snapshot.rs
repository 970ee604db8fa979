//! Binary mesh-base snapshots.
//!
//! File layout: 8-byte magic, u16 format version (little endian), a
//! bincode-encoded header (snapshot id, creation time, payload length and
//! SHA-256), then the bincode payload. Writes go to a sibling temp file and
//! rename into place so a crash never leaves a half-written snapshot behind.

use crate::base::MeshBase;
use crate::identifier::MeshBaseIdentifier;
use crate::object::MeshObject;
use chrono::{DateTime, Utc};
use meshweave_model::ModelRegistry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const SNAPSHOT_MAGIC: &[u8; 8] = b"MWSNAP\0\0";
const SNAPSHOT_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),
    #[error("not a meshweave snapshot")]
    BadMagic,
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u16),
    #[error("snapshot payload checksum mismatch")]
    ChecksumMismatch,
    #[error("snapshot has no home object")]
    MissingHome,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotHeader {
    snapshot_id: Uuid,
    created_at: DateTime<Utc>,
    payload_len: u64,
    payload_sha256: [u8; 32],
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotBody {
    base_identifier: MeshBaseIdentifier,
    objects: Vec<MeshObject>,
}

/// Write a snapshot of `base` to `path`, atomically.
pub fn save_snapshot(base: &MeshBase, path: &Path) -> Result<(), SnapshotError> {
    let body = SnapshotBody {
        base_identifier: base.identifier().clone(),
        objects: base.objects().to_vec(),
    };
    let payload = bincode::serialize(&body)?;

    let header = SnapshotHeader {
        snapshot_id: Uuid::new_v4(),
        created_at: Utc::now(),
        payload_len: payload.len() as u64,
        payload_sha256: Sha256::digest(&payload).into(),
    };

    let mut bytes = Vec::with_capacity(payload.len() + 128);
    bytes.extend_from_slice(SNAPSHOT_MAGIC);
    bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    bincode::serialize_into(&mut bytes, &header)?;
    bytes.extend_from_slice(&payload);

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), objects = body.objects.len(), "wrote snapshot");
    Ok(())
}

/// Load a snapshot, verify its checksum and rebuild the base's indexes.
pub fn load_snapshot(path: &Path, model: Arc<ModelRegistry>) -> Result<MeshBase, SnapshotError> {
    let bytes = fs::read(path)?;
    let mut cursor = std::io::Cursor::new(&bytes[..]);

    let mut magic = [0u8; 8];
    cursor.read_exact(&mut magic)?;
    if &magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let mut version = [0u8; 2];
    cursor.read_exact(&mut version)?;
    let version = u16::from_le_bytes(version);
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let header: SnapshotHeader = bincode::deserialize_from(&mut cursor)?;
    let offset = cursor.position() as usize;
    let end = offset
        .checked_add(header.payload_len as usize)
        .ok_or(SnapshotError::ChecksumMismatch)?;
    let payload = bytes.get(offset..end).ok_or(SnapshotError::ChecksumMismatch)?;
    let digest: [u8; 32] = Sha256::digest(payload).into();
    if digest != header.payload_sha256 {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let body: SnapshotBody = bincode::deserialize(payload)?;
    MeshBase::from_parts(body.base_identifier, model, body.objects)
        .ok_or(SnapshotError::MissingHome)
}
