//! Single-tick greedy agent.
//!
//! Used on its own, as the opponent model inside rollouts, and as the
//! fallback when there is no time to search.

use super::{Decision, compensate};
use crate::collision::outweighs;
use crate::rules::Rules;
use crate::sim::{Intents, MAX_PLAYERS, Simulator};
use glam::DVec2;

/// Nearest food, nearest prey or nearest predator, whichever is closest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heuristic;

#[derive(Debug, Clone, Copy)]
enum Goal {
    Reach(DVec2),
    Flee(DVec2),
}

impl Heuristic {
    pub fn decide(
        &self,
        sim: &Simulator,
        player: usize,
        rules: &Rules,
        checkpoints: &[DVec2],
    ) -> Decision {
        let me = &sim.players[player];
        let Some(largest) = me.fragments.first() else {
            return Decision::toward(DVec2::ZERO);
        };

        // (squared distance, goal, index of the fragment that saw it)
        let mut best: Option<(f64, Goal, usize)> = None;
        let mut offer = |qdist: f64, goal: Goal, source: usize| {
            if best.is_none_or(|(d, _, _)| qdist < d) {
                best = Some((qdist, goal, source));
            }
        };
        for (i, frag) in me.fragments.iter().enumerate() {
            for food in sim.foods.iter() {
                if !rules.is_shadowed(food.position, frag.radius) {
                    let qdist = frag.position.distance_squared(food.position);
                    offer(qdist, Goal::Reach(food.position), i);
                }
            }
            for (p, other) in sim.players.iter().enumerate() {
                if p == player {
                    continue;
                }
                for enemy in other.fragments.iter() {
                    let qdist = frag.position.distance_squared(enemy.position);
                    if outweighs(frag.mass, enemy.mass) {
                        offer(qdist, Goal::Reach(enemy.position), i);
                    } else if outweighs(enemy.mass, frag.mass) {
                        offer(qdist, Goal::Flee(enemy.position), i);
                    }
                }
            }
        }

        let target = match best {
            Some((_, Goal::Reach(point), i)) => compensate(point, &me.fragments[i], rules),
            Some((_, Goal::Flee(enemy), i)) => {
                let source = &me.fragments[i];
                compensate(source.position * 2.0 - enemy, source, rules)
            }
            None if player == 0 && !checkpoints.is_empty() => {
                let point = checkpoints[sim.next_checkpoint % checkpoints.len()];
                compensate(point, largest, rules)
            }
            None => largest.position,
        };
        Decision::toward(rules.limit(target))
    }

    /// Intents for every live player except `skip`.
    pub fn intents(
        &self,
        sim: &Simulator,
        skip: usize,
        rules: &Rules,
        checkpoints: &[DVec2],
    ) -> Intents {
        let mut intents = [None; MAX_PLAYERS];
        for (p, intent) in intents.iter_mut().enumerate() {
            if p != skip && sim.players[p].is_alive() {
                *intent = Some(self.decide(sim, p, rules, checkpoints).intent());
            }
        }
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Food, Fragment};

    fn me_at(sim: &mut Simulator, x: f64, y: f64, mass: f64) {
        sim.players[0]
            .fragments
            .push(Fragment::new(1, 0, DVec2::new(x, y), mass));
    }

    fn enemy_at(sim: &mut Simulator, x: f64, y: f64, mass: f64) {
        sim.players[1]
            .fragments
            .push(Fragment::new(2, 0, DVec2::new(x, y), mass));
    }

    #[test]
    fn test_heads_for_nearest_food() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        me_at(&mut sim, 300.0, 300.0, 40.0);
        sim.foods.push(Food::new(DVec2::new(400.0, 300.0)));
        sim.foods.push(Food::new(DVec2::new(300.0, 330.0)));
        let decision = Heuristic.decide(&sim, 0, &rules, &[]);
        // Resting fragment: no momentum to compensate.
        assert_eq!(decision.target, DVec2::new(300.0, 330.0));
        assert!(!decision.split && !decision.eject);
    }

    #[test]
    fn test_flees_from_predator() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        me_at(&mut sim, 300.0, 300.0, 40.0);
        enemy_at(&mut sim, 330.0, 300.0, 200.0);
        sim.foods.push(Food::new(DVec2::new(400.0, 300.0)));
        let decision = Heuristic.decide(&sim, 0, &rules, &[]);
        assert_eq!(decision.target, DVec2::new(270.0, 300.0));
    }

    #[test]
    fn test_chases_prey() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        me_at(&mut sim, 300.0, 300.0, 200.0);
        enemy_at(&mut sim, 340.0, 320.0, 40.0);
        let decision = Heuristic.decide(&sim, 0, &rules, &[]);
        assert_eq!(decision.target, DVec2::new(340.0, 320.0));
    }

    #[test]
    fn test_checkpoint_fallback_only_for_me() {
        let rules = Rules::default();
        let checkpoints = [DVec2::new(100.0, 500.0)];
        let mut sim = Simulator::default();
        me_at(&mut sim, 300.0, 300.0, 40.0);
        assert_eq!(
            Heuristic.decide(&sim, 0, &rules, &checkpoints).target,
            checkpoints[0]
        );

        let mut sim = Simulator::default();
        enemy_at(&mut sim, 300.0, 300.0, 40.0);
        assert_eq!(
            Heuristic.decide(&sim, 1, &rules, &checkpoints).target,
            DVec2::new(300.0, 300.0)
        );
    }

    #[test]
    fn test_momentum_is_compensated() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        me_at(&mut sim, 300.0, 300.0, 40.0);
        sim.players[0].fragments[0].set_velocity(DVec2::new(2.0, 0.0));
        sim.foods.push(Food::new(DVec2::new(300.0, 400.0)));
        let decision = Heuristic.decide(&sim, 0, &rules, &[]);
        // inertia 10 / mass 40 - 1 = -0.75
        assert_eq!(decision.target, DVec2::new(298.5, 400.0));
    }

    #[test]
    fn test_target_is_limited_to_arena() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        me_at(&mut sim, 20.0, 300.0, 40.0);
        enemy_at(&mut sim, 60.0, 300.0, 200.0);
        let decision = Heuristic.decide(&sim, 0, &rules, &[]);
        assert_eq!(decision.target, DVec2::new(0.0, 300.0));
    }

    #[test]
    fn test_intents_skip_self_and_dead() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        me_at(&mut sim, 300.0, 300.0, 40.0);
        enemy_at(&mut sim, 100.0, 100.0, 40.0);
        let intents = Heuristic.intents(&sim, 0, &rules, &[]);
        assert!(intents[0].is_none());
        assert!(intents[1].is_some());
        assert!(intents[2].is_none() && intents[3].is_none());
    }
}
