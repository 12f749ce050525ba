use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::{Rect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, Texture2D},
};
use ninja_defense_rendering::SpriteFrame;

/// Cache of sprite sheets keyed by the path used in the level catalog.
#[derive(Debug, Default)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<String, Texture2D>,
}

impl SpriteAtlas {
    /// Loads every sheet in `sources` relative to `root`.
    ///
    /// Sheets that fail to load are logged and left out; their entities fall
    /// back to primitive shapes.
    pub(crate) fn load(root: &Path, sources: Vec<String>) -> Self {
        Self::from_sources(root, sources, &mut default_loader)
    }

    /// Draws `frame` centred on `centre` as a square of `size` pixels.
    ///
    /// Returns `false` when the sheet is not loaded.
    pub(crate) fn draw_frame(&self, frame: &SpriteFrame, centre: Vec2, size: f32) -> bool {
        let Some(texture) = self.textures.get(&frame.source).copied() else {
            return false;
        };
        if size <= f32::EPSILON {
            return true;
        }

        let (origin, extent) = frame.source_rect();
        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(size, size)),
            source: Some(Rect::new(origin.x, origin.y, extent.x, extent.y)),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(
            texture,
            centre.x - size * 0.5,
            centre.y - size * 0.5,
            WHITE,
            params,
        );
        true
    }

    fn from_sources(
        root: &Path,
        sources: Vec<String>,
        loader: &mut impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Self {
        let mut textures = HashMap::with_capacity(sources.len());
        for source in sources {
            if textures.contains_key(&source) {
                continue;
            }
            let path = resolve(root, &source);
            match loader(&path) {
                Ok(texture) => {
                    let _ = textures.insert(source, texture);
                }
                Err(error) => {
                    tracing::warn!(sheet = %source, "sprite sheet unavailable: {error:#}");
                }
            }
        }
        Self { textures }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.textures.len()
    }
}

/// Catalog paths may carry a leading slash; they are always relative to the
/// asset root.
fn resolve(root: &Path, source: &str) -> PathBuf {
    root.join(source.trim_start_matches('/'))
}

fn default_loader(path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite sheet at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::cell::RefCell;

    #[test]
    fn sources_resolve_against_the_asset_root() {
        assert_eq!(
            resolve(Path::new("assets"), "/sprites/ninja.png"),
            PathBuf::from("assets/sprites/ninja.png")
        );
        assert_eq!(
            resolve(Path::new("assets"), "enemy.png"),
            PathBuf::from("assets/enemy.png")
        );
    }

    #[test]
    fn failed_sheets_are_skipped_and_duplicates_load_once() {
        let loaded = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_sources(
            Path::new("root"),
            vec![
                String::from("a.png"),
                String::from("missing.png"),
                String::from("a.png"),
            ],
            &mut |path| {
                loaded.borrow_mut().push(path.to_path_buf());
                if path.ends_with("missing.png") {
                    bail!("not found");
                }
                Ok(Texture2D::empty())
            },
        );

        assert_eq!(atlas.len(), 1);
        assert_eq!(
            loaded.into_inner(),
            vec![PathBuf::from("root/a.png"), PathBuf::from("root/missing.png")]
        );
    }
}
