use thiserror::Error;

use super::simulation::CharacterSimulation;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode fighter state: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode fighter state: {0}")]
    Decode(#[source] bincode::Error),
    #[error("snapshot digest mismatch (expected {expected}, found {found})")]
    Corrupt { expected: String, found: String },
}

/// Serialized character state plus its content digest.
///
/// The encoding is bincode's fixed-width little-endian layout, so two machines in
/// the same state produce the same bytes and therefore the same digest. Comparing
/// digests is how replays and peers detect a desync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FighterSnapshot {
    pub bytes: Vec<u8>,
    pub digest: blake3::Hash,
}

impl FighterSnapshot {
    pub fn capture(simulation: &CharacterSimulation) -> Result<Self, SnapshotError> {
        let bytes = bincode::serialize(simulation).map_err(SnapshotError::Encode)?;
        let digest = blake3::hash(&bytes);
        Ok(Self { bytes, digest })
    }

    /// Decodes the state after checking the bytes still match the digest.
    pub fn restore(&self) -> Result<CharacterSimulation, SnapshotError> {
        let found = blake3::hash(&self.bytes);
        if found != self.digest {
            return Err(SnapshotError::Corrupt {
                expected: self.digest.to_hex().to_string(),
                found: found.to_hex().to_string(),
            });
        }
        bincode::deserialize(&self.bytes).map_err(SnapshotError::Decode)
    }

    pub fn digest_hex(&self) -> String {
        self.digest.to_hex().to_string()
    }
}

impl CharacterSimulation {
    pub fn snapshot(&self) -> Result<FighterSnapshot, SnapshotError> {
        FighterSnapshot::capture(self)
    }
}
