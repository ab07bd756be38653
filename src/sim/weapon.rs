//! Weapon modes and firing patterns

use glam::Vec2;

use super::state::{Color, Owner, Projectile, ProjectileKind, palette};
use crate::consts::{PLAYER_SHOT_OFFSET, PLAYFIELD_HEIGHT};

/// Cool-down for the standard cannon (ms)
pub const STANDARD_COOLDOWN_MS: f64 = 350.0;

/// Weapons granted by pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Spread,
    Rapid,
    Beam,
    Plasma,
    Nuke,
}

impl WeaponKind {
    /// Charge granted by one pickup
    pub fn base_charge(&self) -> u32 {
        match self {
            WeaponKind::Rapid => 150,
            WeaponKind::Beam => 100,
            WeaponKind::Spread => 40,
            WeaponKind::Plasma => 20,
            WeaponKind::Nuke => 1,
        }
    }

    pub fn cooldown_ms(&self) -> f64 {
        match self {
            WeaponKind::Beam => 60.0,
            WeaponKind::Rapid => 90.0,
            WeaponKind::Plasma => 700.0,
            WeaponKind::Spread | WeaponKind::Nuke => STANDARD_COOLDOWN_MS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Spread => "SPREAD",
            WeaponKind::Rapid => "RAPID",
            WeaponKind::Beam => "BEAM",
            WeaponKind::Plasma => "PLASMA",
            WeaponKind::Nuke => "NUKE",
        }
    }

    /// HUD bar color
    pub fn hud_color(&self) -> Color {
        match self {
            WeaponKind::Beam => palette::MAGENTA,
            WeaponKind::Plasma => palette::YELLOW,
            WeaponKind::Nuke => palette::WHITE,
            WeaponKind::Spread | WeaponKind::Rapid => palette::CYAN,
        }
    }
}

/// Active weapon. A charged weapon always has at least one shot left;
/// spending the last one drops back to `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponMode {
    #[default]
    Standard,
    Charged {
        kind: WeaponKind,
        remaining: u32,
        /// Charge at the time the weapon was picked up (HUD full-bar mark)
        cap: u32,
    },
}

impl WeaponMode {
    pub fn kind(&self) -> Option<WeaponKind> {
        match self {
            WeaponMode::Standard => None,
            WeaponMode::Charged { kind, .. } => Some(*kind),
        }
    }

    pub fn remaining(&self) -> u32 {
        match self {
            WeaponMode::Standard => 0,
            WeaponMode::Charged { remaining, .. } => *remaining,
        }
    }

    pub fn cooldown_ms(&self) -> f64 {
        self.kind()
            .map_or(STANDARD_COOLDOWN_MS, |kind| kind.cooldown_ms())
    }

    /// Charge stacked above the pickup cap
    pub fn is_overdrive(&self) -> bool {
        matches!(self, WeaponMode::Charged { remaining, cap, .. } if remaining > cap)
    }

    /// Apply a weapon pickup: top up the same weapon, otherwise switch
    pub fn collect(&mut self, picked: WeaponKind) {
        let charge = picked.base_charge();
        *self = match *self {
            WeaponMode::Charged {
                kind,
                remaining,
                cap,
            } if kind == picked => WeaponMode::Charged {
                kind,
                remaining: remaining + charge,
                cap,
            },
            _ => WeaponMode::Charged {
                kind: picked,
                remaining: charge,
                cap: charge,
            },
        };
    }

    /// Spend one shot of charge
    pub fn consume_shot(&mut self) {
        if let WeaponMode::Charged {
            kind,
            remaining,
            cap,
        } = *self
        {
            *self = if remaining <= 1 {
                WeaponMode::Standard
            } else {
                WeaponMode::Charged {
                    kind,
                    remaining: remaining - 1,
                    cap,
                }
            };
        }
    }
}

fn player_shot(player_x: f32, offset: f32, spread: f32, kind: ProjectileKind, color: Color) -> Projectile {
    let size = match kind {
        ProjectileKind::Plasma => Vec2::splat(35.0),
        _ => Vec2::new(6.0, 30.0),
    };
    let velocity = match kind {
        ProjectileKind::Beam => -32.0,
        _ => -18.0,
    };
    Projectile {
        pos: Vec2::new(player_x + offset, PLAYFIELD_HEIGHT - PLAYER_SHOT_OFFSET),
        size,
        velocity,
        spread,
        color,
        owner: Owner::Player,
        kind,
    }
}

/// Projectiles produced by one trigger pull with the given weapon
pub fn fire_pattern(weapon: &WeaponMode, player_x: f32) -> Vec<Projectile> {
    let color = match weapon.kind() {
        Some(WeaponKind::Beam) => palette::MAGENTA,
        Some(WeaponKind::Plasma) => palette::YELLOW,
        _ => palette::CYAN,
    };

    match weapon.kind() {
        Some(WeaponKind::Spread) => [(-25.0, -2.5), (0.0, 0.0), (25.0, 2.5)]
            .into_iter()
            .map(|(offset, spread)| {
                player_shot(player_x, offset, spread, ProjectileKind::Standard, color)
            })
            .collect(),
        Some(WeaponKind::Nuke) => (-4..=4)
            .map(|i| {
                let i = i as f32;
                player_shot(player_x, i * 8.0, i * 1.2, ProjectileKind::Standard, color)
            })
            .collect(),
        Some(WeaponKind::Plasma) => {
            vec![player_shot(player_x, 0.0, 0.0, ProjectileKind::Plasma, color)]
        }
        Some(WeaponKind::Beam) => {
            vec![player_shot(player_x, 0.0, 0.0, ProjectileKind::Beam, color)]
        }
        Some(WeaponKind::Rapid) | None => {
            vec![player_shot(player_x, 0.0, 0.0, ProjectileKind::Standard, color)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_reverts_on_last_shot() {
        let mut weapon = WeaponMode::Standard;
        weapon.collect(WeaponKind::Nuke);
        assert_eq!(weapon.remaining(), 1);
        weapon.consume_shot();
        assert_eq!(weapon, WeaponMode::Standard);

        weapon.collect(WeaponKind::Plasma);
        for expected in (1..20).rev() {
            weapon.consume_shot();
            assert_eq!(weapon.remaining(), expected);
            assert_eq!(weapon.kind(), Some(WeaponKind::Plasma));
        }
        weapon.consume_shot();
        assert_eq!(weapon, WeaponMode::Standard);
    }

    #[test]
    fn test_same_weapon_stacks_into_overdrive() {
        let mut weapon = WeaponMode::Standard;
        weapon.collect(WeaponKind::Spread);
        assert!(!weapon.is_overdrive());
        weapon.collect(WeaponKind::Spread);
        assert_eq!(
            weapon,
            WeaponMode::Charged {
                kind: WeaponKind::Spread,
                remaining: 80,
                cap: 40
            }
        );
        assert!(weapon.is_overdrive());
    }

    #[test]
    fn test_different_weapon_replaces_charge() {
        let mut weapon = WeaponMode::Standard;
        weapon.collect(WeaponKind::Rapid);
        weapon.consume_shot();
        weapon.collect(WeaponKind::Beam);
        assert_eq!(
            weapon,
            WeaponMode::Charged {
                kind: WeaponKind::Beam,
                remaining: 100,
                cap: 100
            }
        );
    }

    #[test]
    fn test_standard_consume_is_noop() {
        let mut weapon = WeaponMode::Standard;
        weapon.consume_shot();
        assert_eq!(weapon, WeaponMode::Standard);
    }

    #[test]
    fn test_cooldown_ordering() {
        let beam = WeaponKind::Beam.cooldown_ms();
        let plasma = WeaponKind::Plasma.cooldown_ms();
        assert!(beam < WeaponKind::Rapid.cooldown_ms());
        assert!(beam < STANDARD_COOLDOWN_MS);
        assert!(plasma > STANDARD_COOLDOWN_MS);
        assert_eq!(WeaponMode::Standard.cooldown_ms(), STANDARD_COOLDOWN_MS);
    }

    #[test]
    fn test_fire_patterns() {
        let standard = fire_pattern(&WeaponMode::Standard, 400.0);
        assert_eq!(standard.len(), 1);
        assert_eq!(standard[0].kind, ProjectileKind::Standard);
        assert_eq!(standard[0].pos, Vec2::new(400.0, 890.0));
        assert_eq!(standard[0].velocity, -18.0);

        let mut spread = WeaponMode::Standard;
        spread.collect(WeaponKind::Spread);
        let shots = fire_pattern(&spread, 400.0);
        let spreads: Vec<f32> = shots.iter().map(|p| p.spread).collect();
        assert_eq!(spreads, vec![-2.5, 0.0, 2.5]);

        let mut nuke = WeaponMode::Standard;
        nuke.collect(WeaponKind::Nuke);
        assert_eq!(fire_pattern(&nuke, 400.0).len(), 9);

        let mut plasma = WeaponMode::Standard;
        plasma.collect(WeaponKind::Plasma);
        let shots = fire_pattern(&plasma, 400.0);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].kind, ProjectileKind::Plasma);
        assert_eq!(shots[0].size, Vec2::splat(35.0));

        let mut beam = WeaponMode::Standard;
        beam.collect(WeaponKind::Beam);
        let shots = fire_pattern(&beam, 400.0);
        assert_eq!(shots[0].kind, ProjectileKind::Beam);
        assert_eq!(shots[0].velocity, -32.0);
    }
}
