//! The command surface: explosion kinds and the `explode` command.
//!
//! The registry is an explicit value owned by the host's startup
//! lifecycle and passed by reference to consumers; there is no global
//! state and no runtime discovery. Hosts extend it with
//! [`ExplosionRegistry::register`] before wiring up their command
//! dispatcher.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use shockfront_core::{BlockPos, ExplosionParameters, PowerCurve};

/// Radii, height, and falloff defaults for one named explosion kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionPreset {
    /// First ring radius.
    pub start_radius: u32,
    /// Last ring radius.
    pub end_radius: u32,
    /// Vertical reach above the center.
    pub max_height: u32,
    /// Blast-power falloff.
    pub power_curve: PowerCurve,
}

impl ExplosionPreset {
    /// Build the parameters for an explosion of this kind at `center`.
    pub fn parameters(&self, center: BlockPos) -> ExplosionParameters {
        ExplosionParameters {
            center,
            start_radius: self.start_radius,
            end_radius: self.end_radius,
            max_height: self.max_height,
            power_curve: self.power_curve,
        }
    }
}

/// Name → preset table, iterated in registration order.
#[derive(Clone, Debug, Default)]
pub struct ExplosionRegistry {
    kinds: IndexMap<String, ExplosionPreset>,
}

impl ExplosionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in kinds: `breach`, `blast`, and `warhead`, smallest
    /// to largest, all with the canonical linear falloff.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            "breach",
            ExplosionPreset {
                start_radius: 0,
                end_radius: 10,
                max_height: 50,
                power_curve: PowerCurve::Linear {
                    start: 4.0,
                    end: 2.0,
                },
            },
        );
        registry.register(
            "blast",
            ExplosionPreset {
                start_radius: 0,
                end_radius: 50,
                max_height: 100,
                power_curve: PowerCurve::Linear {
                    start: 5.0,
                    end: 2.0,
                },
            },
        );
        registry.register(
            "warhead",
            ExplosionPreset {
                start_radius: 0,
                end_radius: 200,
                max_height: 150,
                power_curve: PowerCurve::Linear {
                    start: 6.0,
                    end: 2.0,
                },
            },
        );
        registry
    }

    /// Add or replace a kind.
    pub fn register(&mut self, name: &str, preset: ExplosionPreset) {
        self.kinds.insert(name.to_string(), preset);
    }

    /// Look up a kind by name.
    pub fn get(&self, name: &str) -> Option<&ExplosionPreset> {
        self.kinds.get(name)
    }

    /// Registered kind names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}

/// Where an explosion command is aimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Explicit world coordinates.
    At(BlockPos),
    /// Wherever the issuing player is looking; the host resolves the
    /// raycast and substitutes the hit coordinate.
    LineOfSight,
}

/// A parsed `explode` command.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplodeCommand {
    /// The explosion kind name, to be resolved against a registry.
    pub kind: String,
    /// The aim.
    pub target: Target,
}

/// Why a command string or lookup was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// The command had no kind name.
    MissingKind,
    /// A coordinate token did not parse as an integer.
    BadCoordinate {
        /// The offending token.
        token: String,
    },
    /// The command had a number of arguments other than 0 or 3
    /// coordinates.
    WrongCoordinateCount {
        /// How many coordinate tokens were given.
        given: usize,
    },
    /// No kind with this name is registered.
    UnknownKind {
        /// The requested name.
        name: String,
        /// The registered names, for the error message.
        available: Vec<String>,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKind => write!(f, "usage: explode <kind> [x y z]"),
            Self::BadCoordinate { token } => {
                write!(f, "'{token}' is not a valid integer coordinate")
            }
            Self::WrongCoordinateCount { given } => {
                write!(f, "expected 0 or 3 coordinates, got {given}")
            }
            Self::UnknownKind { name, available } => {
                write!(f, "unknown explosion kind '{name}'; available: ")?;
                for (i, n) in available.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{n}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for CommandError {}

impl ExplodeCommand {
    /// Parse `"<kind> [x y z]"`.
    ///
    /// No coordinates means the host resolves the target by raycast.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let mut tokens = input.split_whitespace();
        let kind = tokens.next().ok_or(CommandError::MissingKind)?.to_string();
        let coords: Vec<&str> = tokens.collect();
        let target = match coords.len() {
            0 => Target::LineOfSight,
            3 => {
                let mut parsed = [0i32; 3];
                for (slot, token) in parsed.iter_mut().zip(&coords) {
                    *slot = token.parse().map_err(|_| CommandError::BadCoordinate {
                        token: (*token).to_string(),
                    })?;
                }
                Target::At(BlockPos::new(parsed[0], parsed[1], parsed[2]))
            }
            given => return Err(CommandError::WrongCoordinateCount { given }),
        };
        Ok(Self { kind, target })
    }

    /// Resolve this command against a registry, with the raycast result
    /// (if any) substituted by the host.
    ///
    /// Parameter validation itself happens at
    /// [`Shockwave::ignite`](shockfront_engine::Shockwave::ignite);
    /// this only resolves the kind and the target coordinate.
    pub fn resolve(
        &self,
        registry: &ExplosionRegistry,
        raycast_hit: Option<BlockPos>,
    ) -> Result<ExplosionParameters, CommandError> {
        let preset = registry
            .get(&self.kind)
            .ok_or_else(|| CommandError::UnknownKind {
                name: self.kind.clone(),
                available: registry.names().map(str::to_string).collect(),
            })?;
        let center = match self.target {
            Target::At(pos) => pos,
            Target::LineOfSight => raycast_hit.unwrap_or(BlockPos::new(0, 0, 0)),
        };
        Ok(preset.parameters(center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind_with_coordinates() {
        let cmd = ExplodeCommand::parse("blast 10 64 -20").unwrap();
        assert_eq!(cmd.kind, "blast");
        assert_eq!(cmd.target, Target::At(BlockPos::new(10, 64, -20)));
    }

    #[test]
    fn parse_kind_alone_targets_line_of_sight() {
        let cmd = ExplodeCommand::parse("breach").unwrap();
        assert_eq!(cmd.target, Target::LineOfSight);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(ExplodeCommand::parse("  "), Err(CommandError::MissingKind));
        assert!(matches!(
            ExplodeCommand::parse("blast 1 2"),
            Err(CommandError::WrongCoordinateCount { given: 2 })
        ));
        assert!(matches!(
            ExplodeCommand::parse("blast 1 2 up"),
            Err(CommandError::BadCoordinate { .. })
        ));
    }

    #[test]
    fn resolve_builds_parameters_from_the_preset() {
        let registry = ExplosionRegistry::with_defaults();
        let cmd = ExplodeCommand::parse("blast 5 64 5").unwrap();
        let params = cmd.resolve(&registry, None).unwrap();
        assert_eq!(params.center, BlockPos::new(5, 64, 5));
        assert_eq!(params.end_radius, 50);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn resolve_substitutes_the_raycast_hit() {
        let registry = ExplosionRegistry::with_defaults();
        let cmd = ExplodeCommand::parse("breach").unwrap();
        let hit = BlockPos::new(-3, 70, 12);
        let params = cmd.resolve(&registry, Some(hit)).unwrap();
        assert_eq!(params.center, hit);
    }

    #[test]
    fn unknown_kind_lists_the_alternatives() {
        let registry = ExplosionRegistry::with_defaults();
        let cmd = ExplodeCommand::parse("firecracker 0 0 0").unwrap();
        let err = cmd.resolve(&registry, None).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("firecracker"));
        assert!(msg.contains("breach") && msg.contains("blast") && msg.contains("warhead"));
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = ExplosionRegistry::with_defaults();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["breach", "blast", "warhead"]);
    }

    #[test]
    fn default_presets_validate() {
        let registry = ExplosionRegistry::with_defaults();
        for name in ["breach", "blast", "warhead"] {
            let preset = registry.get(name).unwrap();
            assert!(
                preset.parameters(BlockPos::new(0, 64, 0)).validate().is_ok(),
                "preset {name}"
            );
        }
    }
}
