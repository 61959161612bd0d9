//! Observed world state.
//!
//! Rebuilt from each turn's observation. Anything not reported this turn is
//! pruned, except food and enemy fragments that are out of sight: those are
//! remembered for a few ticks to ride out vision gaps.

use crate::collision::radius_to_mass;
use crate::config::MemoryConfig;
use crate::entity::{DEFAULT_DIRECTION, Ejection, Food, Fragment, NEAREST, PlayerFragments, Virus};
use crate::rules::{Rules, VIRUS_MASS, VIS_FACTOR, VIS_FACTOR_FR, VIS_SHIFT};
use crate::sim::{MAX_PLAYERS, Simulator};
use glam::DVec2;
use protocol::{FragmentId, MineData, ObjectData, ObjectKind, TurnInput};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Relative drift of the summed distance that still counts as "stuck".
const FOOD_STUCK_TOLERANCE: f64 = 0.2;

/// An entity plus the tick it was last reported.
#[derive(Debug, Clone, Copy)]
struct Seen<T> {
    item: T,
    tick: u32,
    banned: bool,
}

impl<T> Seen<T> {
    fn new(item: T, tick: u32) -> Self {
        Self {
            item,
            tick,
            banned: false,
        }
    }
}

/// An ejection as reported: no heading or speed is given.
#[derive(Debug, Clone, Copy)]
struct SpottedEjection {
    position: DVec2,
    owner: Option<u32>,
}

/// Progress of the "circling the same two foods" detector.
#[derive(Debug, Clone, Copy, Default)]
struct FoodStuck {
    pair: i64,
    ticks: u32,
    distance: f64,
    banning: bool,
}

/// The agent's view of the arena.
#[derive(Debug, Clone)]
pub struct World {
    rules: Rules,
    memory: MemoryConfig,
    food_stuck_escape: bool,
    /// Turns ingested so far.
    pub tick: u32,
    /// Our player id, known after the first turn with a live fragment.
    pub my_id: Option<u32>,
    foods: BTreeMap<i64, Seen<Food>>,
    ejections: BTreeMap<i64, Seen<SpottedEjection>>,
    viruses: BTreeMap<i64, Seen<Virus>>,
    /// Fragments by owner, then by sub id.
    players: BTreeMap<u32, BTreeMap<u32, Seen<Fragment>>>,
    stuck: FoodStuck,
}

impl World {
    pub fn new(rules: Rules, memory: MemoryConfig, food_stuck_escape: bool) -> Self {
        Self {
            rules,
            memory,
            food_stuck_escape,
            tick: 0,
            my_id: None,
            foods: BTreeMap::new(),
            ejections: BTreeMap::new(),
            viruses: BTreeMap::new(),
            players: BTreeMap::new(),
            stuck: FoodStuck::default(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Ingest one turn.
    pub fn apply(&mut self, turn: &TurnInput) {
        self.tick += 1;
        for mine in &turn.mine {
            self.observe_mine(mine);
        }
        for object in &turn.objects {
            match object.kind {
                ObjectKind::Food => self.observe_food(object),
                ObjectKind::Ejection => self.observe_ejection(object),
                ObjectKind::Virus => self.observe_virus(object),
                ObjectKind::Player => self.observe_enemy(object),
                ObjectKind::Unknown => warn!(?object, "ignoring object of unknown kind"),
            }
        }
        self.forget();
        if self.food_stuck_escape {
            self.detect_food_stuck();
        }
    }

    /// Our live fragments, in no particular order.
    pub fn my_fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.my_id
            .and_then(|id| self.players.get(&id))
            .into_iter()
            .flat_map(|frags| frags.values().map(|seen| &seen.item))
    }

    pub fn is_alive(&self) -> bool {
        self.my_fragments().next().is_some()
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.players
            .iter()
            .filter(|&(id, _)| Some(*id) != self.my_id)
            .map(|(_, frags)| frags.len())
            .sum()
    }

    fn observe_mine(&mut self, mine: &MineData) {
        let id: FragmentId = match mine.id.parse() {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "skipping own fragment");
                return;
            }
        };
        self.my_id = Some(id.owner);

        let mut frag = Fragment::new(id.owner, id.sub, DVec2::new(mine.x, mine.y), mine.m);
        frag.radius = mine.r;
        frag.set_velocity(DVec2::new(mine.sx, mine.sy));
        frag.fast = frag.speed > self.rules.max_speed(mine.m);
        frag.fuse_timer = mine.ttf.unwrap_or(0);
        self.players
            .entry(id.owner)
            .or_default()
            .insert(id.sub, Seen::new(frag, self.tick));
    }

    fn observe_enemy(&mut self, object: &ObjectData) {
        let Some(id) = self.parse_id(object) else {
            return;
        };
        // Older runners omit `M`; the radius still pins it down.
        let mass = object.m.or(object.r.map(radius_to_mass)).unwrap_or_default();
        if !(mass > 0.0 && mass.is_finite()) {
            warn!(?object, "skipping enemy fragment without a usable mass");
            return;
        }
        let mut frag = Fragment::new(id.owner, id.sub, DVec2::new(object.x, object.y), mass);
        if let Some(r) = object.r {
            frag.radius = r;
        }
        frag.fuse_timer = self.rules.ticks_til_fusion;

        let fragments = self.players.entry(id.owner).or_default();
        if let Some(prev) = fragments.get(&id.sub) {
            // Velocity is only known from the last sighting.
            frag.set_velocity(frag.position - prev.item.position);
            let max_speed = self.rules.max_speed(mass);
            if frag.speed > max_speed {
                frag.fast = true;
                if frag.speed - self.rules.viscosity > max_speed {
                    frag.speed -= self.rules.viscosity;
                } else {
                    frag.speed = max_speed;
                    frag.fast = false;
                }
            }
            frag.fuse_timer = prev.item.fuse_timer.saturating_sub(1);
        }
        fragments.insert(id.sub, Seen::new(frag, self.tick));
    }

    fn observe_food(&mut self, object: &ObjectData) {
        let key = self.grid_key(object.x, object.y);
        let food = Food::new(DVec2::new(object.x, object.y));
        let banned = self.foods.get(&key).is_some_and(|seen| seen.banned);
        self.foods.insert(
            key,
            Seen {
                banned,
                ..Seen::new(food, self.tick)
            },
        );
    }

    fn observe_ejection(&mut self, object: &ObjectData) {
        let key = self.object_key(object);
        let owner = object
            .owner
            .as_deref()
            .and_then(|owner| owner.parse::<FragmentId>().ok())
            .map(|id| id.owner);
        let spotted = SpottedEjection {
            position: DVec2::new(object.x, object.y),
            owner,
        };
        self.ejections.insert(key, Seen::new(spotted, self.tick));
    }

    fn observe_virus(&mut self, object: &ObjectData) {
        let key = self.object_key(object);
        let virus = Virus::new(
            DVec2::new(object.x, object.y),
            object.m.unwrap_or(VIRUS_MASS),
            self.rules.virus_radius,
        );
        self.viruses.insert(key, Seen::new(virus, self.tick));
    }

    fn parse_id(&self, object: &ObjectData) -> Option<FragmentId> {
        let raw = object.id.as_deref()?;
        match raw.parse() {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%err, "skipping enemy fragment");
                None
            }
        }
    }

    /// Runner id when it parses, position otherwise.
    fn object_key(&self, object: &ObjectData) -> i64 {
        object
            .id
            .as_deref()
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| -self.grid_key(object.x, object.y) - 1)
    }

    fn grid_key(&self, x: f64, y: f64) -> i64 {
        (y as i64) * (self.rules.width as i64) + x as i64
    }

    fn forget(&mut self) {
        let tick = self.tick;
        if let Some(mine) = self.my_id.and_then(|id| self.players.get_mut(&id)) {
            mine.retain(|_, seen| seen.tick == tick);
        }

        let count = self.my_fragments().count();
        let visions: Vec<(DVec2, f64)> = self.my_fragments().map(|f| vision(f, count)).collect();
        let sees = |point: DVec2, radius: f64| {
            visions.iter().any(|&(center, sight)| {
                let reach = sight + radius;
                center.distance_squared(point) < reach * reach
            })
        };

        let food_ticks = self.memory.food_forget_ticks;
        self.foods.retain(|_, seen| {
            seen.tick == tick
                || (!sees(seen.item.position, Food::RADIUS) && seen.tick + food_ticks >= tick)
        });
        self.viruses.retain(|_, seen| seen.tick == tick);
        self.ejections.retain(|_, seen| seen.tick == tick);

        let enemy_ticks = self.memory.enemy_forget_ticks;
        let my_id = self.my_id;
        for (_, frags) in self.players.iter_mut().filter(|(id, _)| Some(**id) != my_id) {
            frags.retain(|_, seen| {
                if seen.tick == tick {
                    return true;
                }
                if !sees(seen.item.position, seen.item.radius) && seen.tick + enemy_ticks >= tick {
                    seen.item.fuse_timer = seen.item.fuse_timer.saturating_sub(1);
                    return true;
                }
                false
            });
        }
        self.players
            .retain(|id, frags| Some(*id) == my_id || !frags.is_empty());
    }

    /// Ban the nearest food when the same two foods stay closest, at a
    /// roughly constant distance, for too long.
    fn detect_food_stuck(&mut self) {
        let mine: Vec<DVec2> = self.my_fragments().map(|f| f.position).collect();
        if mine.is_empty() || self.foods.len() < 2 {
            self.stuck = FoodStuck::default();
            self.clear_bans();
            return;
        }

        let mut nearest: Vec<(i64, f64)> = self
            .foods
            .iter()
            .map(|(&key, seen)| (key, nearest_qdist(&mine, seen.item.position)))
            .collect();
        nearest.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (closest, runner_up) = (nearest[0], nearest[1]);
        let pair = closest
            .0
            .min(runner_up.0)
            .wrapping_mul(31)
            .wrapping_add(closest.0.max(runner_up.0));

        if pair != self.stuck.pair {
            self.stuck = FoodStuck {
                pair,
                ..FoodStuck::default()
            };
        } else if !self.stuck.banning {
            let distance = closest.1.sqrt() + runner_up.1.sqrt();
            self.stuck.ticks += 1;
            if self.stuck.ticks == 1 {
                self.stuck.distance = distance;
            } else if (distance - self.stuck.distance).abs()
                > self.stuck.distance * FOOD_STUCK_TOLERANCE
            {
                self.stuck.ticks = 0;
                self.stuck.distance = 0.0;
            } else if self.stuck.ticks >= self.memory.food_stuck_ticks {
                self.stuck.ticks = 0;
                self.stuck.distance = 0.0;
                self.stuck.banning = true;
                if let Some(seen) = self.foods.get_mut(&closest.0) {
                    seen.banned = true;
                    info!(food = ?seen.item.position, "banned food we keep circling");
                }
            }
        }
        if !self.stuck.banning {
            self.clear_bans();
        }
    }

    fn clear_bans(&mut self) {
        for seen in self.foods.values_mut() {
            seen.banned = false;
        }
    }

    /// Search copy of the world: us in slot 0, up to three opponents after.
    ///
    /// Every container keeps the entries nearest to any of our fragments.
    pub fn snapshot(&self, next_checkpoint: usize, checkpoints_taken: u32) -> Simulator {
        let mut sim = Simulator {
            tick: self.tick,
            next_checkpoint,
            checkpoints_taken,
            ..Simulator::default()
        };

        let mut mine: Vec<Fragment> = self.my_fragments().copied().collect();
        sort_heaviest_first(&mut mine);
        mine.truncate(NEAREST);
        if mine.is_empty() {
            return sim;
        }
        let anchors: Vec<DVec2> = mine.iter().map(|f| f.position).collect();
        sim.players[0] = PlayerFragments {
            fragments: mine.into_iter().collect(),
            score: 0,
        };

        let opponents: Vec<u32> = self
            .players
            .iter()
            .filter(|&(id, frags)| Some(*id) != self.my_id && !frags.is_empty())
            .map(|(&id, _)| id)
            .take(MAX_PLAYERS - 1)
            .collect();
        let slot_of = |owner: u32| {
            if Some(owner) == self.my_id {
                Some(0)
            } else {
                opponents.iter().position(|&id| id == owner).map(|i| i + 1)
            }
        };

        sim.foods = nearest_first(&anchors, self.foods.values().filter(|s| !s.banned), |s| {
            s.item.position
        })
        .map(|s| s.item)
        .collect();
        sim.viruses = nearest_first(&anchors, self.viruses.values(), |s| s.item.position)
            .map(|s| s.item)
            .collect();
        sim.ejections = nearest_first(&anchors, self.ejections.values(), |s| s.item.position)
            .map(|s| {
                let owner = s.item.owner.and_then(slot_of);
                Ejection::new(s.item.position, DEFAULT_DIRECTION, 0.0, owner)
            })
            .collect();

        for (i, owner) in opponents.iter().enumerate() {
            let Some(frags) = self.players.get(owner) else {
                continue;
            };
            let mut player = PlayerFragments {
                fragments: nearest_first(&anchors, frags.values(), |s| s.item.position)
                    .map(|s| s.item)
                    .collect(),
                score: 0,
            };
            player.sort();
            sim.players[i + 1] = player;
        }
        sim
    }
}

/// Where and how far a fragment sees.
fn vision(frag: &Fragment, count: usize) -> (DVec2, f64) {
    let radius = if count <= 1 {
        frag.radius * VIS_FACTOR
    } else {
        frag.radius * VIS_FACTOR_FR * (count as f64).sqrt()
    };
    (frag.position + frag.direction * VIS_SHIFT, radius)
}

fn nearest_qdist(anchors: &[DVec2], point: DVec2) -> f64 {
    anchors
        .iter()
        .map(|a| a.distance_squared(point))
        .fold(f64::INFINITY, f64::min)
}

/// Items sorted by distance to the closest anchor, stable on ties.
fn nearest_first<'a, T: 'a>(
    anchors: &[DVec2],
    items: impl Iterator<Item = &'a T>,
    position: impl Fn(&T) -> DVec2,
) -> impl Iterator<Item = &'a T> {
    let mut ranked: Vec<(f64, &'a T)> = items
        .map(|item| (nearest_qdist(anchors, position(item)), item))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, item)| item)
}

fn sort_heaviest_first(frags: &mut [Fragment]) {
    frags.sort_by(|a, b| {
        b.mass
            .total_cmp(&a.mass)
            .then_with(|| b.sub_id.cmp(&a.sub_id))
    });
}
