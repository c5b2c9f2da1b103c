//! Conversion between live entities and their tagged save payloads

use super::types::*;
use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::entity::EntityIdAllocator;
use crate::weapon::Catalog;
use rand::rngs::StdRng;

/// World resources a loaded entity is rebuilt against
///
/// Entities hold clock handles, fresh ids and catalog-built items, none of
/// which live in the save file itself.
pub struct LoadContext<'a> {
    pub clock: &'a GameClock,
    pub catalog: &'a Catalog,
    pub config: &'a GameConfig,
    pub ids: &'a mut EntityIdAllocator,
    pub rng: &'a mut StdRng,
}

/// An entity that knows its own save payload
///
/// Each kind picks its payload struct and tag; the world only sees
/// [`SaveData`].
///
/// # Example
///
/// ```ignore
/// impl Saveable for ExperienceGem {
///     fn to_save_data(&self) -> Result<SaveData, SaveError> {
///         SaveData::encode(tags::EXPERIENCE_GEM, &GemData { .. })
///     }
///
///     fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError> {
///         let gem: GemData = data.decode(tags::EXPERIENCE_GEM)?;
///         Ok(ExperienceGem::new(ctx.ids.allocate(), gem.pos_x, gem.pos_y, gem.amount))
///     }
/// }
/// ```
pub trait Saveable {
    fn to_save_data(&self) -> Result<SaveData, SaveError>;

    /// Rebuilds the entity from its payload
    ///
    /// Missing fields fall back to defaults instead of failing. The entity
    /// gets a fresh id from `ctx.ids`.
    fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError>
    where
        Self: Sized;
}
