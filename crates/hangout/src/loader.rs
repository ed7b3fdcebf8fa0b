//! JSON scene-setup parsing. Wraps serde_json with serde_path_to_error so a
//! malformed setup reports the exact field that failed, and validates the
//! tile array before handing the setup to the session.

use engine::{validate_tiles, GridError, SceneSetup};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("scene setup JSON invalid at {}: {source}", .source.path())]
    Parse {
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("scene setup tiles invalid: {0}")]
    InvalidTiles(#[from] GridError),
}

pub fn parse_scene_setup(json: &str) -> Result<SceneSetup, SetupError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let setup: SceneSetup = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|source| SetupError::Parse { source })?;
    validate_tiles(&setup.grid, &setup.tiles)?;
    Ok(setup)
}
