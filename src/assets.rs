//! Shared asset cache
//!
//! Sprites are loaded once per session and handed to entities as [`AssetId`]
//! handles. The cache owns the bytes; entities never do.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load asset `{name}`: {source}")]
    Load {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Handle to an asset owned by an [`AssetCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(u32);

#[derive(Debug)]
struct Asset {
    name: String,
    bytes: Vec<u8>,
}

/// Name-keyed asset store rooted at a data directory
#[derive(Debug, Default)]
pub struct AssetCache {
    root: PathBuf,
    assets: Vec<Asset>,
    by_name: HashMap<String, AssetId>,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            assets: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Load `name` relative to the root, reusing an earlier load
    pub fn load(&mut self, name: &str) -> Result<AssetId, AssetError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        let bytes = fs::read(self.root.join(name)).map_err(|source| AssetError::Load {
            name: name.to_string(),
            source,
        })?;
        log::info!("Loaded asset {} ({} bytes)", name, bytes.len());
        Ok(self.insert(name, bytes))
    }

    /// Register in-memory bytes under `name` (replaces nothing if already present)
    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) -> AssetId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = AssetId(self.assets.len() as u32);
        self.assets.push(Asset {
            name: name.to_string(),
            bytes,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn bytes(&self, id: AssetId) -> Option<&[u8]> {
        self.assets.get(id.0 as usize).map(|a| a.bytes.as_slice())
    }

    pub fn name(&self, id: AssetId) -> Option<&str> {
        self.assets.get(id.0 as usize).map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Sprites every ball draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallSprites {
    pub body: AssetId,
    /// Contact/aim marker
    pub marker: AssetId,
}

impl BallSprites {
    pub const BODY: &'static str = "ball.png";
    pub const MARKER: &'static str = "point.png";

    pub fn load(cache: &mut AssetCache) -> Result<Self, AssetError> {
        Ok(Self {
            body: cache.load(Self::BODY)?,
            marker: cache.load(Self::MARKER)?,
        })
    }

    /// Empty stand-ins for headless runs
    pub fn placeholder(cache: &mut AssetCache) -> Self {
        Self {
            body: cache.insert(Self::BODY, Vec::new()),
            marker: cache.insert(Self::MARKER, Vec::new()),
        }
    }
}
