//! Moddable creature and weapon definitions.
//!
//! Definitions are plain JSON documents in the same shape the engine
//! serializes, so a modded creature is whatever `save_creature` writes,
//! edited by hand.

use crate::attacks::Weapon;
use crate::creatures::Creature;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors from loading or saving definition files.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("definition file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid definition data: {0}")]
    Invalid(#[from] serde_json::Error),
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, DefinitionError> {
    let data = fs::read_to_string(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            DefinitionError::NotFound(path.display().to_string())
        } else {
            DefinitionError::Io(error)
        }
    })?;
    Ok(serde_json::from_str(&data)?)
}

fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), DefinitionError> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data)?;
    Ok(())
}

/// Load a creature definition from a JSON file.
pub fn load_creature(path: impl AsRef<Path>) -> Result<Creature, DefinitionError> {
    load(path.as_ref())
}

/// Load a weapon definition from a JSON file.
pub fn load_weapon(path: impl AsRef<Path>) -> Result<Weapon, DefinitionError> {
    load(path.as_ref())
}

/// Write a creature definition as pretty-printed JSON.
pub fn save_creature(path: impl AsRef<Path>, creature: &Creature) -> Result<(), DefinitionError> {
    save(path.as_ref(), creature)
}

/// Write a weapon definition as pretty-printed JSON.
pub fn save_weapon(path: impl AsRef<Path>, weapon: &Weapon) -> Result<(), DefinitionError> {
    save(path.as_ref(), weapon)
}
