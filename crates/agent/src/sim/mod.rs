//! Deterministic tick engine.
//!
//! A [`Simulator`] is a plain value: cloning it is a memcpy, rollouts mutate
//! the clone and throw it away. `tick` never allocates and never fails.

mod consume;

use crate::collision::{hurt_distance, repulsion};
use crate::entity::{BoundedList, Ejection, Food, NEAREST, PlayerFragments, Virus};
use crate::rules::{CHECKPOINT_REACH_FACTOR, Rules, SHRINK_EVERY_TICK};
use glam::DVec2;
use tracing::trace;

/// Player slots in a snapshot. Slot 0 is always the agent itself.
pub const MAX_PLAYERS: usize = 4;

/// What one player asks for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intent {
    pub target: DVec2,
    pub split: bool,
    pub eject: bool,
}

impl Intent {
    pub fn toward(target: DVec2) -> Self {
        Self {
            target,
            split: false,
            eject: false,
        }
    }
}

pub type Intents = [Option<Intent>; MAX_PLAYERS];

/// Search-oriented copy of the world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Simulator {
    pub foods: BoundedList<Food, NEAREST>,
    pub ejections: BoundedList<Ejection, NEAREST>,
    pub viruses: BoundedList<Virus, NEAREST>,
    pub players: [PlayerFragments; MAX_PLAYERS],
    /// Index of the checkpoint player 0 is heading for.
    pub next_checkpoint: usize,
    pub checkpoints_taken: u32,
    pub tick: u32,
}

impl Simulator {
    /// Advance one tick.
    ///
    /// Player 0 progresses through `checkpoints` when the slice is non-empty.
    pub fn tick(&mut self, rules: &Rules, checkpoints: &[DVec2], intents: &Intents) {
        self.steer(rules, intents);
        self.advance(rules);
        self.eject(intents);
        self.split(rules, intents);
        if self.tick % SHRINK_EVERY_TICK == 0 {
            self.shrink();
        }
        self.eat_foods(rules);
        self.eat_ejections();
        self.eat_fragments();
        self.fuse(rules);
        self.burst(rules);
        self.refresh(rules);
        self.collect_scores();
        self.split_viruses(rules);
        self.advance_checkpoint(checkpoints);
        self.tick += 1;
    }

    fn steer(&mut self, rules: &Rules, intents: &Intents) {
        for (player, intent) in self.players.iter_mut().zip(intents) {
            let Some(intent) = intent else { continue };
            if intent.target.is_nan() {
                trace!("skipping NaN steering target");
                continue;
            }
            for frag in player.fragments.iter_mut() {
                frag.steer(intent.target, rules);
            }
        }
    }

    /// Drift blobs, push apart same-owner overlaps, then move fragments.
    fn advance(&mut self, rules: &Rules) {
        for ejection in self.ejections.iter_mut() {
            ejection.advance(rules);
        }
        for virus in self.viruses.iter_mut() {
            virus.advance(rules);
        }
        for player in self.players.iter_mut() {
            let frags = &mut player.fragments;
            for i in 0..frags.len() {
                for k in i + 1..frags.len() {
                    let (a, b) = (frags[i], frags[k]);
                    if a.fast || b.fast {
                        continue;
                    }
                    if let Some((da, db)) =
                        repulsion(a.position, a.radius, a.mass, b.position, b.radius, b.mass)
                    {
                        frags[i].nudge(da);
                        frags[k].nudge(db);
                    }
                }
            }
            for frag in frags.iter_mut() {
                frag.advance(rules);
            }
        }
    }

    fn eject(&mut self, intents: &Intents) {
        for (slot, intent) in intents.iter().enumerate() {
            let Some(intent) = intent else { continue };
            if intent.eject && !intent.split && !intent.target.is_nan() {
                self.players[slot].eject(slot, &mut self.ejections);
            }
        }
    }

    fn split(&mut self, rules: &Rules, intents: &Intents) {
        for (player, intent) in self.players.iter_mut().zip(intents) {
            if intent.is_some_and(|i| i.split && !i.target.is_nan()) {
                player.split(rules);
            }
        }
    }

    fn shrink(&mut self) {
        for player in self.players.iter_mut() {
            player.shrink();
        }
    }

    fn fuse(&mut self, rules: &Rules) {
        for player in self.players.iter_mut() {
            player.fuse(rules);
        }
    }

    /// Each virus bursts the nearest fragment it can hurt, then vanishes.
    fn burst(&mut self, rules: &Rules) {
        let mut v = 0;
        while v < self.viruses.len() {
            let virus = self.viruses[v];
            let mut victim = None;
            let mut nearest = f64::INFINITY;
            for (p, player) in self.players.iter().enumerate() {
                let headroom = player.headroom(rules);
                for (i, frag) in player.fragments.iter().enumerate() {
                    let Some(qdist) =
                        hurt_distance(virus.position, virus.radius, frag.position, frag.radius)
                    else {
                        continue;
                    };
                    if qdist < nearest && frag.can_burst(headroom) {
                        nearest = qdist;
                        victim = Some((p, i));
                    }
                }
            }
            match victim {
                Some((p, i)) => {
                    trace!(player = p, fragment = i, "virus burst");
                    self.players[p].burst(i, virus.position, rules);
                    self.viruses.remove(v);
                }
                None => v += 1,
            }
        }
    }

    fn refresh(&mut self, rules: &Rules) {
        for player in self.players.iter_mut() {
            player.refresh(rules);
        }
    }

    fn collect_scores(&mut self) {
        for player in self.players.iter_mut() {
            player.collect_score();
        }
    }

    fn split_viruses(&mut self, rules: &Rules) {
        let count = self.viruses.len();
        for v in 0..count {
            if self.viruses[v].should_split(rules) {
                let child = self.viruses[v].split();
                self.viruses.push(child);
            }
        }
    }

    /// Move player 0 to its next checkpoint if any fragment reached it.
    pub fn advance_checkpoint(&mut self, checkpoints: &[DVec2]) -> bool {
        if checkpoints.is_empty() {
            return false;
        }
        let mut advanced = false;
        for frag in self.players[0].fragments.iter() {
            let target = checkpoints[self.next_checkpoint % checkpoints.len()];
            let reach = frag.radius * CHECKPOINT_REACH_FACTOR;
            if frag.position.distance_squared(target) < reach * reach {
                self.next_checkpoint = (self.next_checkpoint + 1) % checkpoints.len();
                self.checkpoints_taken += 1;
                advanced = true;
            }
        }
        advanced
    }

    /// Sum of every mass in the world, food counted at `food_mass`.
    pub fn total_mass(&self, rules: &Rules) -> f64 {
        let players: f64 = self.players.iter().map(PlayerFragments::total_mass).sum();
        let viruses: f64 = self.viruses.iter().map(|v| v.mass).sum();
        players
            + viruses
            + self.ejections.len() as f64 * Ejection::MASS
            + self.foods.len() as f64 * rules.food_mass
    }
}
