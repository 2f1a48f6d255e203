//! Asset loaders and the startup preload.
//!
//! The simulation never waits on assets. Startup loads the manifest through
//! an `AssetLoader`, and the result becomes either `AssetsLoaded` or
//! `AssetLoadFailed` for the engine; a failed load leaves the game running
//! on defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use arena_core::commands::PlayerCommand;
use arena_core::error::LoadError;

use crate::collaborators::AssetLoader;

/// Loaded model handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    pub name: String,
    pub byte_len: usize,
}

/// Loaded texture handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub byte_len: usize,
}

/// Names to load at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    pub models: Vec<String>,
    pub textures: Vec<String>,
}

impl AssetManifest {
    /// Every model the simulation can activate, plus the arena textures.
    pub fn standard() -> Self {
        let models = [
            "enemy_basic",
            "enemy_fast",
            "enemy_tank",
            "bullet_player",
            "bullet_enemy",
            "powerup_heal",
            "powerup_speed",
            "powerup_shield",
            "powerup_default",
        ];
        Self {
            models: models.iter().map(|m| m.to_string()).collect(),
            textures: vec!["arena_floor".into(), "arena_wall".into()],
        }
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.textures.is_empty()
    }
}

/// Everything the preload got, and what it did not.
#[derive(Debug, Default)]
pub struct Preload {
    pub meshes: HashMap<String, Mesh>,
    pub textures: HashMap<String, Texture>,
    pub failures: Vec<LoadError>,
}

impl Preload {
    /// Command that tells the engine how loading went.
    pub fn command(&self) -> PlayerCommand {
        match self.failures.first() {
            None => PlayerCommand::AssetsLoaded,
            Some(first) => PlayerCommand::AssetLoadFailed {
                reason: format!("{} of {} failed, first: {first}", self.failures.len(), self.total()),
            },
        }
    }

    fn total(&self) -> usize {
        self.meshes.len() + self.textures.len() + self.failures.len()
    }
}

/// Load every manifest entry once. Failures are collected, not retried.
pub fn preload(loader: &mut dyn AssetLoader, manifest: &AssetManifest) -> Preload {
    let mut result = Preload::default();
    let total = manifest.len();

    for name in &manifest.models {
        match loader.load_model(name) {
            Ok(mesh) => {
                result.meshes.insert(name.clone(), mesh);
            }
            Err(e) => {
                warn!(model = %name, error = %e, "model failed to load");
                result.failures.push(e);
            }
        }
        debug!(done = result.total(), total, "loading");
    }
    for name in &manifest.textures {
        match loader.load_texture(name) {
            Ok(texture) => {
                result.textures.insert(name.clone(), texture);
            }
            Err(e) => {
                warn!(texture = %name, error = %e, "texture failed to load");
                result.failures.push(e);
            }
        }
        debug!(done = result.total(), total, "loading");
    }

    info!(
        loaded = result.meshes.len() + result.textures.len(),
        failed = result.failures.len(),
        "asset preload finished"
    );
    result
}

/// Reads `models/<name>.glb` and `textures/<name>.png` under a root
/// directory.
#[derive(Debug, Clone)]
pub struct DirAssetLoader {
    root: PathBuf,
}

impl DirAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: PathBuf) -> Result<Vec<u8>, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        Ok(std::fs::read(path)?)
    }
}

impl AssetLoader for DirAssetLoader {
    fn load_model(&mut self, name: &str) -> Result<Mesh, LoadError> {
        let bytes = self.read(self.root.join("models").join(format!("{name}.glb")))?;
        Ok(Mesh {
            name: name.to_string(),
            byte_len: bytes.len(),
        })
    }

    fn load_texture(&mut self, name: &str) -> Result<Texture, LoadError> {
        let bytes = self.read(self.root.join("textures").join(format!("{name}.png")))?;
        Ok(Texture {
            name: name.to_string(),
            byte_len: bytes.len(),
        })
    }
}

/// Stands primitive shapes in for every model of the standard manifest.
/// Used by the headless runner, which has no art on disk.
#[derive(Debug, Clone)]
pub struct PrimitiveAssets {
    known: AssetManifest,
}

impl PrimitiveAssets {
    pub fn new() -> Self {
        Self {
            known: AssetManifest::standard(),
        }
    }
}

impl Default for PrimitiveAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader for PrimitiveAssets {
    fn load_model(&mut self, name: &str) -> Result<Mesh, LoadError> {
        if !self.known.models.iter().any(|m| m == name) {
            return Err(LoadError::NotFound(format!("primitive model {name}")));
        }
        Ok(Mesh {
            name: name.to_string(),
            byte_len: 0,
        })
    }

    fn load_texture(&mut self, name: &str) -> Result<Texture, LoadError> {
        if !self.known.textures.iter().any(|t| t == name) {
            return Err(LoadError::NotFound(format!("primitive texture {name}")));
        }
        Ok(Texture {
            name: name.to_string(),
            byte_len: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("arena-assets-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("models")).unwrap();
        std::fs::create_dir_all(root.join("textures")).unwrap();
        root
    }

    #[test]
    fn test_primitives_cover_the_standard_manifest() {
        let mut loader = PrimitiveAssets::new();
        let result = preload(&mut loader, &AssetManifest::standard());
        assert!(result.failures.is_empty());
        assert_eq!(result.meshes.len(), 9);
        assert!(matches!(result.command(), PlayerCommand::AssetsLoaded));
    }

    #[test]
    fn test_missing_file_becomes_load_failure() {
        let root = scratch_root("partial");
        std::fs::write(root.join("models/enemy_basic.glb"), [1u8, 2, 3]).unwrap();
        let manifest = AssetManifest {
            models: vec!["enemy_basic".into(), "enemy_tank".into()],
            textures: vec![],
        };

        let mut loader = DirAssetLoader::new(&root);
        let result = preload(&mut loader, &manifest);

        assert_eq!(result.meshes["enemy_basic"].byte_len, 3);
        assert_eq!(result.failures.len(), 1);
        match result.command() {
            PlayerCommand::AssetLoadFailed { reason } => {
                assert!(reason.starts_with("1 of 2 failed"), "{reason}");
                assert!(reason.contains("enemy_tank.glb"), "{reason}");
            }
            other => panic!("expected a failure command, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_textures_load_from_their_own_directory() {
        let root = scratch_root("textures");
        std::fs::write(root.join("textures/arena_floor.png"), [0u8; 16]).unwrap();

        let mut loader = DirAssetLoader::new(&root);
        assert_eq!(loader.load_texture("arena_floor").unwrap().byte_len, 16);
        assert!(matches!(
            loader.load_texture("arena_wall"),
            Err(LoadError::NotFound(_))
        ));
        let _ = std::fs::remove_dir_all(root);
    }
}
