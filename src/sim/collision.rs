//! Collision detection and combat resolution
//!
//! Runs once per tick in fixed phases, each finishing before the next:
//! bullets, missiles, AoE rings, enemies, explosions.
//!
//! Removal during iteration uses index-based `Vec::remove` walking from the
//! highest index down. Only the enemy currently being visited is ever removed
//! in the enemy pass, so lower indices stay valid and the survivors keep their
//! spawn order (which decides tie-breaks in later passes).

use glam::Vec2;

use super::state::{Enemy, GamePhase, SimulationState};
use crate::platform::DisplaySink;
use crate::{distance, unit_toward};

/// True when two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    distance(a, b) < a_radius + b_radius
}

/// Run every collision phase for one tick
pub fn resolve(state: &mut SimulationState, display: &mut dyn DisplaySink) {
    state.bullets.retain_mut(|bullet| bullet.advance());
    advance_missiles(state, display);

    let (growth, fade) = (state.tuning.aoe_ring_growth, state.tuning.aoe_ring_fade);
    state.aoe_rings.retain_mut(|ring| ring.advance(growth, fade));

    resolve_enemies(state, display);
    state.explosions.retain_mut(|explosion| explosion.advance());
}

/// Steer each missile at its target and detonate on contact
fn advance_missiles(state: &mut SimulationState, display: &mut dyn DisplaySink) {
    for i in (0..state.missiles.len()).rev() {
        let target_id = state.missiles[i].target;
        let Some(target) = state.director.enemies.iter().find(|e| e.id == target_id) else {
            // Target destroyed by something else
            state.missiles.remove(i);
            continue;
        };
        let (target_pos, target_radius) = (target.pos, target.radius);

        let missile = &mut state.missiles[i];
        if let Some(dir) = unit_toward(missile.pos, target_pos) {
            missile.vel = dir * missile.speed;
        }
        missile.pos += missile.vel;

        if circles_overlap(missile.pos, missile.radius, target_pos, target_radius) {
            let impact = missile.pos;
            state.missiles.remove(i);
            state.spawn_explosion(impact);
            detonate(state, impact, display);
        }
    }
}

/// Destroy every enemy within the missile blast radius of `impact`
fn detonate(state: &mut SimulationState, impact: Vec2, display: &mut dyn DisplaySink) {
    let radius = state.tuning.missile_explosion_radius;
    for i in (0..state.director.enemies.len()).rev() {
        if distance(impact, state.director.enemies[i].pos) < radius {
            state.destroy_enemy(i, display);
        }
    }
    state.check_round_clear(display);
}

/// Pursuit, ship and bullet hits, then overlap separation for each enemy
fn resolve_enemies(state: &mut SimulationState, display: &mut dyn DisplaySink) {
    for i in (0..state.director.enemies.len()).rev() {
        // A ship destroyed earlier in this pass is already out of the fight
        let pursuing = state.phase() == GamePhase::Playing && !state.ship.is_destroyed();
        let ship_pos = state.ship.pos;
        if pursuing {
            state.director.enemies[i].pursue(ship_pos);
        }

        let (pos, radius) = {
            let enemy = &state.director.enemies[i];
            (enemy.pos, enemy.radius)
        };

        if circles_overlap(ship_pos, state.ship.radius, pos, radius) {
            state.ship.take_damage(1);
            state.destroy_enemy(i, display);
            state.check_round_clear(display);
            continue;
        }

        // One bullet per enemy per tick
        let hit = (0..state.bullets.len())
            .rev()
            .find(|&b| circles_overlap(state.bullets[b].pos, state.bullets[b].radius, pos, radius));
        if let Some(b) = hit {
            state.bullets.remove(b);
            let enemy = &mut state.director.enemies[i];
            enemy.health -= 1;
            if enemy.health <= 0 {
                state.destroy_enemy(i, display);
                state.check_round_clear(display);
                continue;
            }
        }

        separate(&mut state.director.enemies, i);
    }
}

/// Push enemy `i` and every enemy overlapping it apart, half the overlap each
fn separate(enemies: &mut [Enemy], i: usize) {
    for j in 0..enemies.len() {
        if j == i {
            continue;
        }
        let (a, b) = (enemies[i].pos, enemies[j].pos);
        let min_dist = enemies[i].radius + enemies[j].radius;
        let dist = distance(a, b);
        if dist < min_dist {
            let overlap = min_dist - dist;
            // Coincident centers resolve along +x
            let push = Vec2::from_angle((a.y - b.y).atan2(a.x - b.x)) * (overlap / 2.0);
            enemies[i].pos += push;
            enemies[j].pos -= push;
        }
    }
}
