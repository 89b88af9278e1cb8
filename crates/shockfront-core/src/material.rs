//! The voxel material palette and its destruction categories.
//!
//! Categories drive classification: walls, slabs, stairs, logs, leaves,
//! glass, and soil each map to a dedicated replacement pool, while the
//! blacklist (`is_indestructible`) and liquids are excluded from
//! destruction entirely. The predicates here are the single source of
//! truth for category membership; the classifier never matches on
//! individual variants.

use std::fmt;

/// A voxel material.
///
/// The palette is intentionally small: enough variety to exercise every
/// destruction category plus the replacement materials the classifier
/// produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // variant names are self-describing
pub enum Material {
    Air,

    // Liquids
    Water,
    Lava,

    // Indestructible
    Bedrock,
    Barrier,

    // Bulk solids
    Stone,
    Granite,
    Basalt,
    Brick,
    Concrete,
    Planks,

    // Rubble (generic replacement pool)
    Cobblestone,
    CrackedStone,
    Scoria,

    // Walls
    StoneWall,
    BrickWall,
    CobblestoneWall,
    CrackedStoneWall,

    // Slabs
    StoneSlab,
    BrickSlab,
    WoodSlab,
    CobblestoneSlab,
    CrackedStoneSlab,

    // Stairs
    StoneStairs,
    BrickStairs,
    WoodStairs,
    CobblestoneStairs,
    CrackedStoneStairs,

    // Logs and leaves
    OakLog,
    PineLog,
    CharredLog,
    OakLeaves,
    PineLeaves,

    // Glass
    Glass,
    GlassPane,

    // Soil
    Dirt,
    GrassBlock,
    Podzol,
    Sand,
    Gravel,
    CoarseDirt,
    ScorchedSoil,

    // Plants
    TallGrass,
    Fern,
    Flower,
    DeadBush,

    // Frozen covers
    Snow,
    Ice,
}

impl Material {
    /// True for the empty voxel.
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Liquids are never destroyed or transformed.
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }

    /// The fixed destruction blacklist.
    pub const fn is_indestructible(self) -> bool {
        matches!(self, Self::Bedrock | Self::Barrier)
    }

    /// Wall category.
    pub const fn is_wall(self) -> bool {
        matches!(
            self,
            Self::StoneWall | Self::BrickWall | Self::CobblestoneWall | Self::CrackedStoneWall
        )
    }

    /// Slab category.
    pub const fn is_slab(self) -> bool {
        matches!(
            self,
            Self::StoneSlab
                | Self::BrickSlab
                | Self::WoodSlab
                | Self::CobblestoneSlab
                | Self::CrackedStoneSlab
        )
    }

    /// Stairs category.
    pub const fn is_stairs(self) -> bool {
        matches!(
            self,
            Self::StoneStairs
                | Self::BrickStairs
                | Self::WoodStairs
                | Self::CobblestoneStairs
                | Self::CrackedStoneStairs
        )
    }

    /// Log category.
    pub const fn is_log(self) -> bool {
        matches!(self, Self::OakLog | Self::PineLog | Self::CharredLog)
    }

    /// Leaf category.
    pub const fn is_leaves(self) -> bool {
        matches!(self, Self::OakLeaves | Self::PineLeaves)
    }

    /// Glass category.
    pub const fn is_glass(self) -> bool {
        matches!(self, Self::Glass | Self::GlassPane)
    }

    /// Soil category: ground-cover solids that scorch rather than
    /// crumble.
    pub const fn is_soil(self) -> bool {
        matches!(
            self,
            Self::Dirt
                | Self::GrassBlock
                | Self::Podzol
                | Self::Sand
                | Self::Gravel
                | Self::CoarseDirt
                | Self::ScorchedSoil
        )
    }

    /// Plant category: non-solid vegetation.
    pub const fn is_plant(self) -> bool {
        matches!(self, Self::TallGrass | Self::Fern | Self::Flower | Self::DeadBush)
    }

    /// Frozen covers vaporize outright.
    pub const fn is_frozen(self) -> bool {
        matches!(self, Self::Snow | Self::Ice)
    }

    /// Whether this material counts toward the terrain surface.
    ///
    /// Air, liquids, and plants do not carry a surface; everything else
    /// does. This is the predicate behind `highest_solid_y`.
    pub const fn is_solid(self) -> bool {
        !self.is_air() && !self.is_liquid() && !self.is_plant()
    }

    /// Stable lowercase name, for logs and command output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Water => "water",
            Self::Lava => "lava",
            Self::Bedrock => "bedrock",
            Self::Barrier => "barrier",
            Self::Stone => "stone",
            Self::Granite => "granite",
            Self::Basalt => "basalt",
            Self::Brick => "brick",
            Self::Concrete => "concrete",
            Self::Planks => "planks",
            Self::Cobblestone => "cobblestone",
            Self::CrackedStone => "cracked_stone",
            Self::Scoria => "scoria",
            Self::StoneWall => "stone_wall",
            Self::BrickWall => "brick_wall",
            Self::CobblestoneWall => "cobblestone_wall",
            Self::CrackedStoneWall => "cracked_stone_wall",
            Self::StoneSlab => "stone_slab",
            Self::BrickSlab => "brick_slab",
            Self::WoodSlab => "wood_slab",
            Self::CobblestoneSlab => "cobblestone_slab",
            Self::CrackedStoneSlab => "cracked_stone_slab",
            Self::StoneStairs => "stone_stairs",
            Self::BrickStairs => "brick_stairs",
            Self::WoodStairs => "wood_stairs",
            Self::CobblestoneStairs => "cobblestone_stairs",
            Self::CrackedStoneStairs => "cracked_stone_stairs",
            Self::OakLog => "oak_log",
            Self::PineLog => "pine_log",
            Self::CharredLog => "charred_log",
            Self::OakLeaves => "oak_leaves",
            Self::PineLeaves => "pine_leaves",
            Self::Glass => "glass",
            Self::GlassPane => "glass_pane",
            Self::Dirt => "dirt",
            Self::GrassBlock => "grass_block",
            Self::Podzol => "podzol",
            Self::Sand => "sand",
            Self::Gravel => "gravel",
            Self::CoarseDirt => "coarse_dirt",
            Self::ScorchedSoil => "scorched_soil",
            Self::TallGrass => "tall_grass",
            Self::Fern => "fern",
            Self::Flower => "flower",
            Self::DeadBush => "dead_bush",
            Self::Snow => "snow",
            Self::Ice => "ice",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
