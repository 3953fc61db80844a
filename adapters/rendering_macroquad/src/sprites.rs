use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use tilebreaker_core::SpriteKey;
use tilebreaker_rendering::Color;

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Screen-space placement of a sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) flip_x: bool,
    pub(crate) tint: Color,
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Draws `key` if the atlas holds it, returning whether anything was drawn.
    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> bool {
        let Some(texture) = self.textures.get(&key).copied() else {
            return false;
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            to_macroquad_color(params.tint),
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
                flip_x: params.flip_x,
                ..DrawTextureParams::default()
            },
        );
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite `{}` from {}", key.name(), path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for `{}`", key.name());
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

/// Resolves manifest entries in [`SpriteKey::ALL`] order. Keys the manifest
/// omits fall back to primitive shapes when drawn.
fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)?;
        let _ = resolved.insert(key, base_path.join(relative_path));
    }

    Ok(SpriteKey::ALL
        .into_iter()
        .filter_map(|key| resolved.remove(&key).map(|path| (key, path)))
        .collect())
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    SpriteKey::ALL
        .into_iter()
        .find(|key| key.name() == name)
        .with_context(|| format!("unknown sprite key `{name}` in manifest"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            player = "player.png"
            tower = "tower.png"
        "#;

        let error = parse_manifest(manifest, Path::new("assets")).expect_err("unknown key");
        assert!(error.to_string().contains("tower"));
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = r#"
            version = 2

            [sprites]
        "#;

        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory_in_key_order() {
        let manifest = r#"
            version = 1

            [sprites]
            explosion = "fx/explosion.png"
            enemy = "actors/enemy.png"
            player = "actors/player.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        assert_eq!(
            parsed,
            vec![
                (SpriteKey::Player, PathBuf::from("root/actors/player.png")),
                (SpriteKey::Enemy, PathBuf::from("root/actors/enemy.png")),
                (SpriteKey::Explosion, PathBuf::from("root/fx/explosion.png")),
            ]
        );
    }

    #[test]
    fn atlas_loads_each_texture_once() {
        let entries = vec![
            (SpriteKey::Player, PathBuf::from("player.png")),
            (SpriteKey::Bullet, PathBuf::from("bullet.png")),
        ];
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(
            load_order.borrow().as_slice(),
            &[SpriteKey::Player, SpriteKey::Bullet]
        );
        assert_eq!(atlas.len(), 2);
    }

    #[test]
    fn loader_failures_name_the_sprite() {
        let entries = vec![(SpriteKey::Enemy, PathBuf::from("enemy.png"))];
        let error = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("missing file"))
            .expect_err("loader failure propagates");
        assert!(error.to_string().contains("`enemy`"));
    }
}
