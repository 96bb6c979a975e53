use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use noise_identification_core::{Category, TextureId, TextureTable, TEXTURE_VARIANTS_PER_CATEGORY};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Texture assets resolved from a manifest together with the lookup table
/// pointing into them.
///
/// Each distinct asset path receives one identifier, so a file listed under
/// several categories is loaded once and shares its [`TextureId`].
#[derive(Debug)]
pub(crate) struct TextureManifest {
    assets: Vec<PathBuf>,
    table: TextureTable,
}

impl TextureManifest {
    /// Loads and validates the manifest stored at `path`.
    ///
    /// Asset paths are resolved relative to the manifest's directory.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read texture manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    fn parse(contents: &str, base_path: &Path) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse texture manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported texture manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut pools = HashMap::new();
        for (name, variants) in manifest.textures {
            let category = Category::from_name(&name)
                .with_context(|| format!("unknown category `{name}` in texture manifest"))?;
            let variants: [String; TEXTURE_VARIANTS_PER_CATEGORY] =
                variants.try_into().map_err(|variants: Vec<String>| {
                    anyhow::anyhow!(
                        "texture manifest lists {} variants for {category}; expected {}",
                        variants.len(),
                        TEXTURE_VARIANTS_PER_CATEGORY
                    )
                })?;
            let _ = pools.insert(category, variants);
        }

        let mut assets = Vec::new();
        let mut identifiers: HashMap<PathBuf, TextureId> = HashMap::new();
        let mut table = [[TextureId::new(0); TEXTURE_VARIANTS_PER_CATEGORY]; Category::COUNT];
        for category in Category::ALL {
            let Some(variants) = pools.remove(&category) else {
                bail!("texture manifest missing entry for {category}");
            };
            for (slot, relative) in table[category.ordinal()].iter_mut().zip(variants) {
                let path = base_path.join(relative);
                *slot = match identifiers.get(&path) {
                    Some(texture) => *texture,
                    None => {
                        let texture = TextureId::new(u32::try_from(assets.len())?);
                        let _ = identifiers.insert(path.clone(), texture);
                        assets.push(path);
                        texture
                    }
                };
            }
        }

        Ok(Self {
            assets,
            table: TextureTable::new(table),
        })
    }

    /// Lookup table mapping every category onto the manifest's assets.
    pub(crate) fn table(&self) -> TextureTable {
        self.table.clone()
    }

    /// Asset path backing the provided texture identifier.
    pub(crate) fn asset(&self, texture: TextureId) -> Option<&Path> {
        let index = usize::try_from(texture.get()).ok()?;
        self.assets.get(index).map(PathBuf::as_path)
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    textures: HashMap<String, Vec<String>>,
}
