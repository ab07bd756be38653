//! Per-frame simulation tick
//!
//! Advances a session by exactly one discrete step. Velocities are per tick;
//! the only wall-clock input is the snapshot timestamp used for weapon
//! cool-downs.

use glam::Vec2;
use rand::Rng;

use super::collision::{power_up_collected, projectile_hits_invader, projectile_hits_player};
use super::formation::{generate_formation, step_formation};
use super::state::{
    Color, GameEvent, Owner, Particle, PowerUp, PowerUpKind, Projectile, ProjectileKind,
    SessionState, SoundCue, palette,
};
use super::weapon::fire_pattern;
use crate::consts::*;
use crate::input::InputSnapshot;

/// Particles spawned per kill
pub const BURST_SIZE: usize = 18;
const BURST_SPEED: f32 = 15.0;
const PARTICLE_DECAY: f32 = 0.015;
/// Chance that a kill drops a pickup
pub const POWER_UP_DROP_CHANCE: f64 = 0.15;
/// An invader whose top passes this line ends the game
pub const LOSS_LINE: f32 = PLAYFIELD_HEIGHT - 180.0;

/// Everything a tick reports to the outside world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub events: Vec<GameEvent>,
    pub sounds: Vec<SoundCue>,
}

impl TickOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sounds.is_empty()
    }
}

/// Ticks between enemy shots at a given level
pub fn enemy_fire_interval(level: u32) -> u64 {
    110_i64.saturating_sub(level as i64 * 9).max(15) as u64
}

/// Downward speed of enemy shots at a given level
pub fn enemy_shot_speed(level: u32) -> f32 {
    5.5 + level as f32 * 0.5
}

/// Advance the session by one tick.
///
/// A paused snapshot or a finished session leaves the state untouched.
pub fn tick(state: &mut SessionState, input: &InputSnapshot) -> TickOutput {
    let mut out = TickOutput::default();
    if input.paused || state.game_over {
        return out;
    }

    state.frame_count += 1;

    move_player(state, input);
    scroll_stars(state);
    fire_player_weapon(state, input, &mut out);
    integrate_projectiles(state);
    step_formation(&mut state.invaders, &mut state.invader_dir, state.level);
    update_power_ups(state, &mut out);
    state.shield.decay();
    resolve_player_hits(state, &mut out);
    resolve_enemy_hits(state, &mut out);
    enemy_fire(state);
    update_particles(state);
    check_level_clear(state, &mut out);
    check_invasion(state, &mut out);

    out
}

fn move_player(state: &mut SessionState, input: &InputSnapshot) {
    // Without tracking the ship holds position
    if input.hand.is_active {
        let step = (input.hand.x - state.prev_hand_x) * input.sensitivity * MOVEMENT_SCALE;
        // A corrupt sample is dropped whole; the next good one moves from
        // the last good hand position.
        if step.is_finite() {
            state.player_x += step;
            state.prev_hand_x = input.hand.x;
        }
    }
    state.player_x = crate::clamp_player_x(state.player_x);
}

fn scroll_stars(state: &mut SessionState) {
    for star in &mut state.stars {
        star.pos.y += star.speed;
        if star.pos.y > PLAYFIELD_HEIGHT {
            star.pos.y = 0.0;
        }
    }
}

fn fire_player_weapon(state: &mut SessionState, input: &InputSnapshot, out: &mut TickOutput) {
    if !input.hand.is_fist {
        return;
    }

    let ready = state
        .last_shot_ms
        .is_none_or(|last| input.now_ms - last > state.weapon.cooldown_ms());
    if !ready {
        return;
    }

    state
        .projectiles
        .extend(fire_pattern(&state.weapon, state.player_x));
    state.weapon.consume_shot();
    state.last_shot_ms = Some(input.now_ms);
    out.sounds.push(SoundCue::Shoot);
}

fn integrate_projectiles(state: &mut SessionState) {
    for p in &mut state.projectiles {
        p.pos.y += p.velocity;
        p.pos.x += p.spread;
    }
    state.projectiles.retain(|p| {
        p.pos.y > -PROJECTILE_CULL_MARGIN && p.pos.y < PLAYFIELD_HEIGHT + PROJECTILE_CULL_MARGIN
    });
}

fn update_power_ups(state: &mut SessionState, out: &mut TickOutput) {
    let player_x = state.player_x;
    let mut collected = Vec::new();

    for pu in &mut state.power_ups {
        pu.pos.y += pu.velocity;
    }
    state.power_ups.retain(|pu| {
        if power_up_collected(pu, player_x) {
            collected.push(pu.kind);
            return false;
        }
        pu.pos.y < PLAYFIELD_HEIGHT
    });

    for kind in collected {
        out.sounds.push(SoundCue::PowerUp);
        match kind {
            PowerUpKind::Health => out.events.push(GameEvent::LifeGained),
            PowerUpKind::Shield => state.shield.activate(),
            other => {
                if let Some(weapon) = other.weapon() {
                    state.weapon.collect(weapon);
                }
            }
        }
    }
}

/// Player shots against the formation. Both lists are scanned newest-first;
/// each shot resolves against at most one invader per tick.
fn resolve_player_hits(state: &mut SessionState, out: &mut TickOutput) {
    let mut i = state.projectiles.len();
    while i > 0 {
        i -= 1;
        if state.projectiles[i].owner != Owner::Player {
            continue;
        }

        let Some(j) = state
            .invaders
            .iter()
            .rposition(|inv| projectile_hits_invader(&state.projectiles[i], inv))
        else {
            continue;
        };

        let invader = &mut state.invaders[j];
        invader.health = invader.health.saturating_sub(1);
        if invader.health == 0 {
            let invader = state.invaders.remove(j);
            state.score += invader.points as u64;
            out.events.push(GameEvent::ScoreDelta(invader.points));
            out.sounds.push(SoundCue::Explosion);
            spawn_burst(state, invader.center(), invader.color);
            maybe_drop_power_up(state, Vec2::new(invader.center().x, invader.pos.y));
        }

        if !state.projectiles[i].kind.pierces() {
            state.projectiles.remove(i);
        }
    }
}

fn spawn_burst(state: &mut SessionState, center: Vec2, color: Color) {
    for _ in 0..BURST_SIZE {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * BURST_SPEED,
            (state.rng.random::<f32>() - 0.5) * BURST_SPEED,
        );
        let size = state.rng.random::<f32>() * 5.0 + 2.0;
        state.particles.push(Particle {
            pos: center,
            vel,
            life: 1.0,
            color,
            size,
        });
    }
}

fn maybe_drop_power_up(state: &mut SessionState, pos: Vec2) {
    if !state.rng.random_bool(POWER_UP_DROP_CHANCE) {
        return;
    }
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    log::debug!("Power-up dropped: {:?}", kind);
    state.power_ups.push(PowerUp::new(kind, pos));
}

fn resolve_enemy_hits(state: &mut SessionState, out: &mut TickOutput) {
    let player_x = state.player_x;
    let mut hits = 0;
    state.projectiles.retain(|p| {
        let hit = p.owner == Owner::Enemy && projectile_hits_player(p, player_x);
        if hit {
            hits += 1;
        }
        !hit
    });

    for _ in 0..hits {
        if state.shield.is_active() {
            state.shield.consume();
        } else {
            out.events.push(GameEvent::LifeLost);
            out.sounds.push(SoundCue::Explosion);
        }
    }
}

fn enemy_fire(state: &mut SessionState) {
    if state.invaders.is_empty() || state.frame_count % enemy_fire_interval(state.level) != 0 {
        return;
    }

    let idx = state.rng.random_range(0..state.invaders.len());
    let shooter = &state.invaders[idx];
    let pos = Vec2::new(shooter.center().x, shooter.pos.y + shooter.size.y);
    state.projectiles.push(Projectile {
        pos,
        size: Vec2::new(5.0, 20.0),
        velocity: enemy_shot_speed(state.level),
        spread: 0.0,
        color: palette::HOT_PINK,
        owner: Owner::Enemy,
        kind: ProjectileKind::Shard,
    });
}

fn update_particles(state: &mut SessionState) {
    for p in &mut state.particles {
        p.pos += p.vel;
        p.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn check_level_clear(state: &mut SessionState, out: &mut TickOutput) {
    if !state.invaders.is_empty() {
        return;
    }
    state.level += 1;
    out.events.push(GameEvent::LevelUp);
    state.invaders = generate_formation(state.level, &mut state.rng);
    log::info!(
        "Wave cleared, entering level {} ({} invaders)",
        state.level,
        state.invaders.len()
    );
}

fn check_invasion(state: &mut SessionState, out: &mut TickOutput) {
    if state.invaders.iter().any(|inv| inv.pos.y > LOSS_LINE) {
        state.game_over = true;
        out.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Formation reached the player line, final score {}", state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HandState;
    use crate::sim::state::{Invader, InvaderId, InvaderKind};
    use crate::sim::weapon::{WeaponKind, WeaponMode};
    use proptest::prelude::*;

    fn idle(now_ms: f64) -> InputSnapshot {
        InputSnapshot::with_hand(HandState::tracking(0.5, false), now_ms)
    }

    fn firing(now_ms: f64) -> InputSnapshot {
        InputSnapshot::with_hand(HandState::tracking(0.5, true), now_ms)
    }

    fn session() -> SessionState {
        let mut state = SessionState::new(42);
        state.ensure_formation();
        state
    }

    fn invader_at(pos: Vec2, kind: InvaderKind) -> Invader {
        Invader {
            id: InvaderId {
                level: 1,
                row: 9,
                col: 0,
            },
            pos,
            size: kind.size(),
            color: kind.color(),
            kind,
            health: kind.health(),
            points: kind.points(),
            anim_phase: 0.0,
        }
    }

    fn player_shot_at(pos: Vec2, kind: ProjectileKind) -> Projectile {
        Projectile {
            pos,
            size: Vec2::new(6.0, 30.0),
            velocity: 0.0,
            spread: 0.0,
            color: palette::CYAN,
            owner: Owner::Player,
            kind,
        }
    }

    fn enemy_shot_at(pos: Vec2) -> Projectile {
        Projectile {
            pos,
            size: Vec2::new(5.0, 20.0),
            velocity: 0.0,
            spread: 0.0,
            color: palette::HOT_PINK,
            owner: Owner::Enemy,
            kind: ProjectileKind::Shard,
        }
    }

    /// Session with a single stationary target far from the walls and the loss line
    fn lone_target(kind: InvaderKind) -> SessionState {
        let mut state = SessionState::new(42);
        state.invaders = vec![invader_at(Vec2::new(400.0, 300.0), kind)];
        state
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut state = session();
        let mut input = firing(1000.0);
        input.paused = true;
        let out = tick(&mut state, &input);
        assert!(out.is_empty());
        assert_eq!(state.frame_count, 0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_constant_hand_means_no_movement() {
        let mut state = session();
        let input = InputSnapshot::with_hand(HandState::tracking(0.5, false), 0.0);
        tick(&mut state, &input);
        let x = state.player_x;
        tick(&mut state, &input);
        assert_eq!(state.player_x, x);
        assert_eq!(x, PLAYER_START_X);
    }

    #[test]
    fn test_hand_delta_moves_ship() {
        let mut state = session();
        let mut input = InputSnapshot::with_hand(HandState::tracking(0.52, false), 0.0);
        input.sensitivity = 1.0;
        tick(&mut state, &input);
        assert!((state.player_x - (PLAYER_START_X + 0.02 * MOVEMENT_SCALE)).abs() < 0.01);
        assert_eq!(state.prev_hand_x, 0.52);
    }

    #[test]
    fn test_inactive_hand_freezes_ship() {
        let mut state = session();
        state.player_x = 300.0;
        let input = InputSnapshot::with_hand(
            HandState {
                x: 0.9,
                is_fist: false,
                is_active: false,
            },
            0.0,
        );
        tick(&mut state, &input);
        assert_eq!(state.player_x, 300.0);
        assert_eq!(state.prev_hand_x, 0.5);
    }

    #[test]
    fn test_player_clamped_to_playfield() {
        let mut state = session();
        let mut input = InputSnapshot::with_hand(HandState::tracking(1.0, false), 0.0);
        input.sensitivity = SENSITIVITY_MAX;
        tick(&mut state, &input);
        assert_eq!(state.player_x, PLAYFIELD_WIDTH - SHIP_HALF_WIDTH);

        let mut input = InputSnapshot::with_hand(HandState::tracking(0.0, false), 0.0);
        input.sensitivity = SENSITIVITY_MAX;
        tick(&mut state, &input);
        assert_eq!(state.player_x, SHIP_HALF_WIDTH);
    }

    #[test]
    fn test_nan_hand_sample_is_dropped() {
        let mut state = session();
        tick(&mut state, &idle(0.0));
        tick(
            &mut state,
            &InputSnapshot::with_hand(HandState::tracking(f32::NAN, false), 16.0),
        );
        assert_eq!(state.player_x, PLAYER_START_X);
        assert_eq!(state.prev_hand_x, 0.5);

        let mut input = InputSnapshot::with_hand(HandState::tracking(0.6, false), 32.0);
        input.sensitivity = 1.0;
        tick(&mut state, &input);
        assert!((state.player_x - (PLAYER_START_X + 0.1 * MOVEMENT_SCALE).min(PLAYFIELD_WIDTH - SHIP_HALF_WIDTH)).abs() < 0.01);
    }

    #[test]
    fn test_nan_sensitivity_does_not_poison_position() {
        let mut state = session();
        let mut input = InputSnapshot::with_hand(HandState::tracking(0.6, false), 0.0);
        input.sensitivity = f32::NAN;
        tick(&mut state, &input);
        assert_eq!(state.player_x, PLAYER_START_X);

        for i in 1..=5 {
            let x = 0.5 + i as f32 * 0.01;
            tick(
                &mut state,
                &InputSnapshot::with_hand(HandState::tracking(x, false), i as f64 * 16.0),
            );
            assert!(state.player_x.is_finite());
        }
        assert!(state.player_x > PLAYER_START_X);
    }

    #[test]
    fn test_clamp_player_x_recentres_non_finite() {
        assert_eq!(crate::clamp_player_x(f32::NAN), PLAYER_START_X);
        assert_eq!(crate::clamp_player_x(f32::INFINITY), PLAYER_START_X);
        assert_eq!(crate::clamp_player_x(-1.0e9), SHIP_HALF_WIDTH);
    }

    fn any_hand_x() -> impl Strategy<Value = f32> {
        prop_oneof![
            8 => -0.5f32..1.5,
            1 => Just(f32::NAN),
            1 => Just(f32::INFINITY),
            1 => Just(f32::NEG_INFINITY),
        ]
    }

    fn any_sensitivity() -> impl Strategy<Value = f32> {
        prop_oneof![
            8 => SENSITIVITY_MIN..=SENSITIVITY_MAX,
            1 => Just(f32::NAN),
            1 => 10.0f32..1000.0,
        ]
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_playfield(
            samples in prop::collection::vec((any_hand_x(), any::<bool>(), any_sensitivity()), 1..60)
        ) {
            let mut state = session();
            for (i, (x, active, sensitivity)) in samples.into_iter().enumerate() {
                let input = InputSnapshot {
                    hand: HandState { x, is_fist: false, is_active: active },
                    sensitivity,
                    paused: false,
                    now_ms: i as f64 * 16.0,
                };
                tick(&mut state, &input);
                prop_assert!(state.player_x >= SHIP_HALF_WIDTH);
                prop_assert!(state.player_x <= PLAYFIELD_WIDTH - SHIP_HALF_WIDTH);
                prop_assert!(state.prev_hand_x.is_finite());
            }
        }
    }

    #[test]
    fn test_standard_shot_when_cooled_down() {
        let mut state = session();
        state.last_shot_ms = Some(1000.0);
        let out = tick(&mut state, &firing(1400.0));

        let shots: Vec<_> = state
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Player)
            .collect();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].kind, ProjectileKind::Standard);
        assert_eq!(state.last_shot_ms, Some(1400.0));
        assert!(out.sounds.contains(&SoundCue::Shoot));
    }

    #[test]
    fn test_cooldown_blocks_second_shot() {
        let mut state = session();
        tick(&mut state, &firing(1000.0));
        tick(&mut state, &firing(1100.0));
        let count = state
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Player)
            .count();
        assert_eq!(count, 1);
        assert_eq!(state.last_shot_ms, Some(1000.0));
    }

    #[test]
    fn test_weapon_reverts_on_tick_charge_hits_zero() {
        let mut state = session();
        state.weapon.collect(WeaponKind::Spread);
        state.weapon.consume_shot();
        // one pickup of 40, 39 left; burn through them
        let mut now = 0.0;
        let mut previous = state.weapon.remaining();
        while state.weapon != WeaponMode::Standard {
            now += 400.0;
            tick(&mut state, &firing(now));
            let remaining = state.weapon.remaining();
            if state.weapon != WeaponMode::Standard {
                assert_eq!(remaining, previous - 1);
            } else {
                assert_eq!(previous, 1);
            }
            previous = remaining;
        }
    }

    #[test]
    fn test_kill_emits_one_score_event() {
        let mut state = lone_target(InvaderKind::Basic);
        state.invaders.push(invader_at(Vec2::new(100.0, 300.0), InvaderKind::Basic));
        state
            .projectiles
            .push(player_shot_at(Vec2::new(430.0, 320.0), ProjectileKind::Standard));

        let out = tick(&mut state, &idle(0.0));

        let scores: Vec<_> = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreDelta(_)))
            .collect();
        assert_eq!(scores, vec![&GameEvent::ScoreDelta(25)]);
        assert_eq!(state.invaders.len(), 1);
        assert_eq!(state.score, 25);
        assert_eq!(state.particles.len(), BURST_SIZE);
        assert!(state.projectiles.iter().all(|p| p.owner != Owner::Player));
    }

    #[test]
    fn test_tough_invader_takes_multiple_hits() {
        let mut state = lone_target(InvaderKind::Heavy);
        state.invaders.push(invader_at(Vec2::new(100.0, 300.0), InvaderKind::Basic));
        state
            .projectiles
            .push(player_shot_at(Vec2::new(440.0, 320.0), ProjectileKind::Standard));

        let out = tick(&mut state, &idle(0.0));
        assert!(out.events.is_empty());
        assert_eq!(state.invaders[0].health, 1);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_plasma_survives_hit() {
        let mut state = lone_target(InvaderKind::Commander);
        state
            .projectiles
            .push(player_shot_at(Vec2::new(440.0, 320.0), ProjectileKind::Plasma));

        tick(&mut state, &idle(0.0));
        assert_eq!(state.invaders[0].health, 3);
        assert_eq!(
            state
                .projectiles
                .iter()
                .filter(|p| p.kind == ProjectileKind::Plasma)
                .count(),
            1
        );
    }

    #[test]
    fn test_plasma_pierces_stacked_invaders() {
        let mut state = SessionState::new(42);
        let front = invader_at(Vec2::new(400.0, 300.0), InvaderKind::Basic);
        let behind = invader_at(Vec2::new(400.0, 200.0), InvaderKind::Basic);
        // Keeps the wave alive so clearing the column does not level up
        let bystander = invader_at(Vec2::new(100.0, 100.0), InvaderKind::Basic);
        state.invaders = vec![bystander, behind, front];
        let mut shot = player_shot_at(Vec2::new(430.0, 358.0), ProjectileKind::Plasma);
        shot.velocity = -18.0;
        state.projectiles.push(shot);

        let mut kills = Vec::new();
        for i in 0..8 {
            let out = tick(&mut state, &idle(i as f64 * 16.0));
            for event in out.events {
                if let GameEvent::ScoreDelta(points) = event {
                    kills.push((i, points));
                }
            }
        }

        assert_eq!(kills.len(), 2, "{kills:?}");
        assert!(kills[0].0 < kills[1].0);
        assert_eq!(state.invaders.len(), 1);
        assert_eq!(state.level, 1);
        assert!(state
            .projectiles
            .iter()
            .any(|p| p.kind == ProjectileKind::Plasma));
    }

    #[test]
    fn test_shield_absorbs_one_hit() {
        let mut state = session();
        state.shield.activate();
        state
            .projectiles
            .push(enemy_shot_at(Vec2::new(PLAYER_START_X, 900.0)));
        state
            .projectiles
            .push(enemy_shot_at(Vec2::new(PLAYER_START_X, 1500.0)));

        let out = tick(&mut state, &idle(0.0));
        assert!(!out.events.contains(&GameEvent::LifeLost));
        assert!(!state.shield.is_active());

        state
            .projectiles
            .push(enemy_shot_at(Vec2::new(PLAYER_START_X, 900.0)));
        let out = tick(&mut state, &idle(0.0));
        assert_eq!(
            out.events
                .iter()
                .filter(|e| **e == GameEvent::LifeLost)
                .count(),
            1
        );
    }

    #[test]
    fn test_enemy_hit_without_shield() {
        let mut state = session();
        state
            .projectiles
            .push(enemy_shot_at(Vec2::new(PLAYER_START_X, 900.0)));

        let out = tick(&mut state, &idle(0.0));
        assert_eq!(
            out.events
                .iter()
                .filter(|e| **e == GameEvent::LifeLost)
                .count(),
            1
        );
        assert!(
            !state
                .projectiles
                .iter()
                .any(|p| p.owner == Owner::Enemy && p.pos.y >= 900.0)
        );
    }

    #[test]
    fn test_health_pickup_emits_life_gained() {
        let mut state = session();
        state
            .power_ups
            .push(PowerUp::new(PowerUpKind::Health, Vec2::new(PLAYER_START_X, 870.0)));
        let out = tick(&mut state, &idle(0.0));
        assert!(out.events.contains(&GameEvent::LifeGained));
        assert!(out.sounds.contains(&SoundCue::PowerUp));
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_weapon_pickup_switches_weapon() {
        let mut state = session();
        state
            .power_ups
            .push(PowerUp::new(PowerUpKind::Beam, Vec2::new(PLAYER_START_X, 870.0)));
        tick(&mut state, &idle(0.0));
        assert_eq!(state.weapon.kind(), Some(WeaponKind::Beam));
        assert_eq!(state.weapon.remaining(), 100);
    }

    #[test]
    fn test_missed_pickup_falls_away() {
        let mut state = session();
        state
            .power_ups
            .push(PowerUp::new(PowerUpKind::Shield, Vec2::new(100.0, 999.0)));
        tick(&mut state, &idle(0.0));
        assert!(state.power_ups.is_empty());
        assert!(!state.shield.is_active());
    }

    #[test]
    fn test_wave_clear_levels_up_once() {
        let mut state = lone_target(InvaderKind::Basic);
        state
            .projectiles
            .push(player_shot_at(Vec2::new(430.0, 320.0), ProjectileKind::Standard));

        let out = tick(&mut state, &idle(0.0));
        assert_eq!(state.level, 2);
        assert_eq!(
            out.events
                .iter()
                .filter(|e| **e == GameEvent::LevelUp)
                .count(),
            1
        );
        assert_eq!(state.invaders.len(), 35);

        let out = tick(&mut state, &idle(0.0));
        assert!(!out.events.contains(&GameEvent::LevelUp));
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = session();
        for inv in &mut state.invaders {
            inv.pos.y = LOSS_LINE + 10.0;
        }

        let out = tick(&mut state, &idle(0.0));
        let overs = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(state.game_over);

        for _ in 0..10 {
            let out = tick(&mut state, &idle(0.0));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_enemy_fire_cadence() {
        assert_eq!(enemy_fire_interval(1), 101);
        assert_eq!(enemy_fire_interval(10), 20);
        assert_eq!(enemy_fire_interval(11), 15);
        assert_eq!(enemy_fire_interval(100), 15);

        let mut state = session();
        state.frame_count = enemy_fire_interval(1) - 1;
        tick(&mut state, &idle(0.0));
        let shards = state
            .projectiles
            .iter()
            .filter(|p| p.kind == ProjectileKind::Shard)
            .count();
        assert_eq!(shards, 1);
    }

    #[test]
    fn test_particles_expire() {
        let mut state = session();
        state.particles.push(Particle {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(1.0, 0.0),
            life: 0.02,
            color: palette::WHITE,
            size: 3.0,
        });
        tick(&mut state, &idle(0.0));
        assert_eq!(state.particles.len(), 1);
        tick(&mut state, &idle(0.0));
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = session();
        let mut b = session();
        for i in 0..300 {
            let x = 0.5 + (i as f32 * 0.05).sin() * 0.2;
            let input = InputSnapshot::with_hand(HandState::tracking(x, i % 3 == 0), i as f64 * 16.0);
            let out_a = tick(&mut a, &input);
            let out_b = tick(&mut b, &input);
            assert_eq!(out_a, out_b);
        }
        assert_eq!(a.player_x, b.player_x);
        assert_eq!(a.invaders.len(), b.invaders.len());
        assert_eq!(a.score, b.score);
    }
}
