//! Per-player fragment container.

use super::{BoundedList, Ejection, Fragment, NEAREST};
use crate::rules::{BURST_ANGLE_SPECTRUM, BURST_START_SPEED, MIN_BURST_MASS, Rules};
use glam::DVec2;

pub type FragmentList = BoundedList<Fragment, NEAREST>;

/// The fragments of one player, heaviest first, plus the running score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerFragments {
    pub fragments: FragmentList,
    pub score: i32,
}

impl PlayerFragments {
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.fragments.is_empty()
    }

    /// How many more fragments this player may own.
    pub fn headroom(&self, rules: &Rules) -> usize {
        rules
            .max_fragments
            .min(self.fragments.capacity())
            .saturating_sub(self.fragments.len())
    }

    pub fn next_sub_id(&self) -> u32 {
        self.fragments
            .iter()
            .map(|f| f.sub_id + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn total_mass(&self) -> f64 {
        self.fragments.iter().map(|f| f.mass).sum()
    }

    /// Mass descending, ties by sub id descending.
    pub fn sort(&mut self) {
        self.fragments.sort_by(|a, b| {
            b.mass
                .total_cmp(&a.mass)
                .then_with(|| b.sub_id.cmp(&a.sub_id))
        });
    }

    pub fn find(&self, sub_id: u32) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.sub_id == sub_id)
    }

    /// Split every fragment that is heavy enough while headroom lasts.
    pub fn split(&mut self, rules: &Rules) {
        let count = self.fragments.len();
        for i in 0..count {
            if self.headroom(rules) == 0 {
                break;
            }
            if self.fragments[i].can_split() {
                let sub_id = self.next_sub_id();
                let child = self.fragments[i].split_off(sub_id, rules);
                self.fragments.push(child);
            }
        }
        self.sort();
    }

    /// Eject from every fragment that can afford it.
    pub fn eject(&mut self, slot: usize, ejections: &mut BoundedList<Ejection, NEAREST>) {
        for frag in self.fragments.iter_mut() {
            // A blob with nowhere to go would take its mass with it.
            if ejections.is_full() {
                break;
            }
            if frag.can_eject() {
                ejections.push(frag.eject(slot));
            }
        }
    }

    pub fn shrink(&mut self) {
        for frag in self.fragments.iter_mut() {
            frag.shrink();
        }
    }

    /// Merge touching fragments whose fuse timers ran out.
    ///
    /// Passes repeat until one merges nothing, so chains fuse in one tick.
    pub fn fuse(&mut self, rules: &Rules) {
        let mut merged_any = false;
        loop {
            let mut merged = false;
            let mut i = 0;
            while i < self.fragments.len() {
                let mut k = i + 1;
                while k < self.fragments.len() {
                    if self.fragments[i].can_fuse(&self.fragments[k]) {
                        let other = self.fragments.remove(k);
                        self.fragments[i].absorb(&other);
                        merged = true;
                    } else {
                        k += 1;
                    }
                }
                i += 1;
            }
            if !merged {
                break;
            }
            merged_any = true;
            for frag in self.fragments.iter_mut() {
                frag.refresh(rules);
            }
        }
        if merged_any {
            self.sort();
        }
    }

    /// Burst the fragment at `index` on a virus at `virus`.
    ///
    /// The fragment recoils, then is cut into equal pieces fanned across
    /// `BURST_ANGLE_SPECTRUM` around its new heading.
    pub fn burst(&mut self, index: usize, virus: DVec2, rules: &Rules) {
        let headroom = self.headroom(rules);
        let mut frag = self.fragments[index];
        frag.burst_on(virus, rules);

        let pieces = ((frag.mass / MIN_BURST_MASS).floor() as usize)
            .saturating_sub(1)
            .min(headroom);
        if pieces > 0 {
            let heading = frag.direction.y.atan2(frag.direction.x);
            let piece_mass = frag.mass / (pieces + 1) as f64;
            let step = BURST_ANGLE_SPECTRUM / pieces as f64;
            let mut sub_id = self.next_sub_id();
            for i in 0..pieces {
                let angle = heading - BURST_ANGLE_SPECTRUM / 2.0 + i as f64 * step;
                let mut piece = Fragment {
                    direction: DVec2::new(angle.cos(), angle.sin()),
                    speed: BURST_START_SPEED,
                    fast: true,
                    fuse_timer: rules.ticks_til_fusion,
                    sub_id,
                    score: 0,
                    ..frag
                };
                piece.set_mass(piece_mass);
                self.fragments.push(piece);
                sub_id += 1;
            }
            let angle = heading + BURST_ANGLE_SPECTRUM / 2.0;
            frag.direction = DVec2::new(angle.cos(), angle.sin());
            frag.speed = BURST_START_SPEED;
            frag.fast = true;
            frag.fuse_timer = rules.ticks_til_fusion;
            frag.set_mass(piece_mass);
        }
        self.fragments[index] = frag;
    }

    /// Recompute radii, restore caps and re-sort.
    pub fn refresh(&mut self, rules: &Rules) {
        for frag in self.fragments.iter_mut() {
            frag.refresh(rules);
        }
        self.sort();
    }

    /// Move per-fragment score earned this tick into the player total.
    pub fn collect_score(&mut self) {
        for frag in self.fragments.iter_mut() {
            self.score += frag.score;
            frag.score = 0;
        }
    }
}
