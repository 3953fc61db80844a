//! Content collaborator that binds sprite masks to entity variants.

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;
use tilebreaker_core::{BoxShape, CollisionFidelity, EntityKind, SpriteKey, SpriteMask};

/// Errors raised while binding sprites at level load.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    /// The content source has no sprite registered for the key.
    #[error("sprite `{key}` is not available")]
    MissingSprite {
        /// Asset name of the missing sprite.
        key: &'static str,
    },
    /// The sprite exists but covers no pixels.
    #[error("sprite `{key}` has no pixels")]
    EmptySprite {
        /// Asset name of the empty sprite.
        key: &'static str,
    },
}

/// Source of sprite masks consulted once per entity variant at level load.
pub trait Content {
    /// Loads the opacity mask registered for `key`.
    fn load_sprite(&self, key: SpriteKey) -> Result<SpriteMask, ContentError>;
}

/// In-memory sprite registry.
#[derive(Clone, Debug, Default)]
pub struct SpriteCatalog {
    sprites: BTreeMap<SpriteKey, SpriteMask>,
}

impl SpriteCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of procedurally generated sprites covering every key.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with_sprite(SpriteKey::Player, SpriteMask::opaque(64, 64))
            .with_sprite(SpriteKey::Enemy, SpriteMask::opaque(64, 64))
            .with_sprite(SpriteKey::Bullet, SpriteMask::opaque(8, 4))
            .with_sprite(SpriteKey::TileBomb, disc(24, 24))
            .with_sprite(SpriteKey::Obstacle, disc(40, 32))
            .with_sprite(SpriteKey::BreakableTile, SpriteMask::opaque(40, 32))
            .with_sprite(SpriteKey::TileDebris, SpriteMask::opaque(8, 8))
            .with_sprite(SpriteKey::Explosion, disc(16, 16))
    }

    /// Registers `mask` under `key`, replacing any previous sprite.
    #[must_use]
    pub fn with_sprite(mut self, key: SpriteKey, mask: SpriteMask) -> Self {
        let _ = self.sprites.insert(key, mask);
        self
    }

    /// Removes the sprite registered under `key`.
    #[must_use]
    pub fn without_sprite(mut self, key: SpriteKey) -> Self {
        let _ = self.sprites.remove(&key);
        self
    }

    /// Sprite registered under `key`, if any.
    #[must_use]
    pub fn get(&self, key: SpriteKey) -> Option<&SpriteMask> {
        self.sprites.get(&key)
    }
}

impl Content for SpriteCatalog {
    fn load_sprite(&self, key: SpriteKey) -> Result<SpriteMask, ContentError> {
        self.sprites
            .get(&key)
            .cloned()
            .ok_or(ContentError::MissingSprite { key: key.name() })
    }
}

/// Elliptical mask filling the frame.
fn disc(width: u32, height: u32) -> SpriteMask {
    let radius_x = width as f32 / 2.0;
    let radius_y = height as f32 / 2.0;
    SpriteMask::from_fn(width, height, |x, y| {
        let dx = (x as f32 + 0.5 - radius_x) / radius_x;
        let dy = (y as f32 + 0.5 - radius_y) / radius_y;
        if dx * dx + dy * dy <= 1.0 {
            u8::MAX
        } else {
            0
        }
    })
}

/// Sprite bound to an entity variant.
#[derive(Clone, Debug)]
pub(crate) struct Sprite {
    pub(crate) mask: Arc<SpriteMask>,
    pub(crate) shape: BoxShape,
    pub(crate) fidelity: CollisionFidelity,
}

/// Every sprite the world needs to construct entities at runtime.
#[derive(Clone, Debug)]
pub(crate) struct SpriteBook {
    player: Sprite,
    enemy: Sprite,
    bullet: Sprite,
    tile_bomb: Sprite,
    obstacle: Sprite,
    breakable_tile: Sprite,
}

impl SpriteBook {
    pub(crate) fn load(content: &dyn Content) -> Result<Self, ContentError> {
        Ok(Self {
            player: bind(content, SpriteKey::Player, |w, h| {
                BoxShape::character(w, h, 0.4, 0.8)
            })?,
            enemy: bind(content, SpriteKey::Enemy, |w, h| {
                BoxShape::character(w, h, 0.35, 0.7)
            })?,
            bullet: bind(content, SpriteKey::Bullet, BoxShape::bottom_anchored)?,
            tile_bomb: bind(content, SpriteKey::TileBomb, BoxShape::bottom_anchored)?,
            obstacle: Sprite {
                fidelity: CollisionFidelity::PerPixel,
                ..bind(content, SpriteKey::Obstacle, BoxShape::top_left_anchored)?
            },
            breakable_tile: bind(
                content,
                SpriteKey::BreakableTile,
                BoxShape::top_left_anchored,
            )?,
        })
    }

    pub(crate) fn sprite(&self, kind: EntityKind) -> &Sprite {
        match kind {
            EntityKind::Player => &self.player,
            EntityKind::Enemy => &self.enemy,
            EntityKind::Bullet => &self.bullet,
            EntityKind::TileBomb => &self.tile_bomb,
            EntityKind::Obstacle => &self.obstacle,
            EntityKind::BreakableTile => &self.breakable_tile,
        }
    }
}

fn bind(
    content: &dyn Content,
    key: SpriteKey,
    shape: impl Fn(u32, u32) -> BoxShape,
) -> Result<Sprite, ContentError> {
    let mask = content.load_sprite(key)?;
    if mask.is_empty() {
        return Err(ContentError::EmptySprite { key: key.name() });
    }
    Ok(Sprite {
        shape: shape(mask.width(), mask.height()),
        mask: Arc::new(mask),
        fidelity: CollisionFidelity::Rectangle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_binds_every_variant() {
        let book = SpriteBook::load(&SpriteCatalog::builtin()).expect("builtin sprites load");
        assert_eq!(
            book.sprite(EntityKind::Obstacle).fidelity,
            CollisionFidelity::PerPixel
        );
        assert_eq!(
            book.sprite(EntityKind::Bullet).fidelity,
            CollisionFidelity::Rectangle
        );
        assert_eq!(book.sprite(EntityKind::Player).mask.width(), 64);
    }

    #[test]
    fn missing_sprite_is_reported_by_name() {
        let catalog = SpriteCatalog::builtin().without_sprite(SpriteKey::TileBomb);
        let error = SpriteBook::load(&catalog).expect_err("tile bomb sprite missing");
        assert_eq!(error, ContentError::MissingSprite { key: "tile_bomb" });
    }

    #[test]
    fn empty_sprite_is_rejected() {
        let catalog = SpriteCatalog::builtin().with_sprite(SpriteKey::Enemy, SpriteMask::opaque(0, 0));
        let error = SpriteBook::load(&catalog).expect_err("empty enemy sprite");
        assert_eq!(error, ContentError::EmptySprite { key: "enemy" });
    }

    #[test]
    fn disc_mask_is_transparent_in_corners() {
        let mask = disc(24, 24);
        assert_eq!(mask.alpha_at(0, 0), 0);
        assert_eq!(mask.alpha_at(12, 12), u8::MAX);
    }
}
