//! Consumption resolution: food, then ejections, then fragments.
//!
//! Every prey goes to the eligible predator with the deepest overlap.
//! Predators are scanned player by player, heaviest fragment first, and a
//! later candidate must be strictly deeper to win, so ties go to the first.

use super::Simulator;
use crate::collision::{eat_depth, outweighs};
use crate::entity::{Ejection, Food};
use crate::rules::{Rules, SCORE_FOR_FOOD, SCORE_FOR_LAST, SCORE_FOR_PLAYER};
use glam::DVec2;

impl Simulator {
    /// Deepest fragment able to eat a prey at `position`.
    ///
    /// Fragments of `skip_player` are not considered.
    fn deepest_fragment(
        &self,
        position: DVec2,
        radius: f64,
        mass: f64,
        skip_player: Option<usize>,
    ) -> Option<(usize, usize)> {
        let mut best = None;
        let mut deepest = f64::NEG_INFINITY;
        for (p, player) in self.players.iter().enumerate() {
            if Some(p) == skip_player {
                continue;
            }
            for (i, frag) in player.fragments.iter().enumerate() {
                if !outweighs(frag.mass, mass) {
                    continue;
                }
                if let Some(depth) = eat_depth(frag.position, frag.radius, position, radius) {
                    if depth > deepest {
                        deepest = depth;
                        best = Some((p, i));
                    }
                }
            }
        }
        best
    }

    pub(super) fn eat_foods(&mut self, rules: &Rules) {
        let mut f = 0;
        while f < self.foods.len() {
            let food = self.foods[f];
            match self.deepest_fragment(food.position, Food::RADIUS, rules.food_mass, None) {
                Some((p, i)) => {
                    let eater = &mut self.players[p].fragments[i];
                    eater.mass += rules.food_mass;
                    eater.score += SCORE_FOR_FOOD;
                    self.foods.remove(f);
                }
                None => f += 1,
            }
        }
    }

    /// Viruses get the first chance at an ejection, fragments the second.
    pub(super) fn eat_ejections(&mut self) {
        let mut e = 0;
        while e < self.ejections.len() {
            let ejection = self.ejections[e];

            let mut virus = None;
            let mut deepest = f64::NEG_INFINITY;
            for (v, candidate) in self.viruses.iter().enumerate() {
                if !outweighs(candidate.mass, Ejection::MASS) {
                    continue;
                }
                let depth = eat_depth(
                    candidate.position,
                    candidate.radius,
                    ejection.position,
                    Ejection::RADIUS,
                );
                if let Some(depth) = depth {
                    if depth > deepest {
                        deepest = depth;
                        virus = Some(v);
                    }
                }
            }
            if let Some(v) = virus {
                self.viruses[v].absorb(Ejection::MASS, ejection.direction);
                self.ejections.remove(e);
                continue;
            }

            match self.deepest_fragment(ejection.position, Ejection::RADIUS, Ejection::MASS, None) {
                Some((p, i)) => {
                    let eater = &mut self.players[p].fragments[i];
                    eater.mass += Ejection::MASS;
                    if ejection.owner != Some(p) {
                        eater.score += SCORE_FOR_FOOD;
                    }
                    self.ejections.remove(e);
                }
                None => e += 1,
            }
        }
    }

    /// Fragments are only eaten by other players.
    pub(super) fn eat_fragments(&mut self) {
        for p in 0..self.players.len() {
            let mut i = 0;
            let mut kept = 0;
            while i < self.players[p].fragments.len() {
                let prey = self.players[p].fragments[i];
                let is_last = kept == 0 && i + 1 == self.players[p].fragments.len();
                match self.deepest_fragment(prey.position, prey.radius, prey.mass, Some(p)) {
                    Some((q, j)) => {
                        let eater = &mut self.players[q].fragments[j];
                        eater.mass += prey.mass;
                        eater.score += if is_last { SCORE_FOR_LAST } else { SCORE_FOR_PLAYER };
                        self.players[p].fragments.remove(i);
                    }
                    None => {
                        kept += 1;
                        i += 1;
                    }
                }
            }
        }
    }
}
