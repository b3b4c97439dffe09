//! Game state and core simulation types
//!
//! Object kinds are a static table shared by reference; everything a host
//! needs to display a run lives in `RunState` and `Screen`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_LIVES;
use crate::{Rgba, rgb};

/// Which screen the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Waiting for the first play command
    #[default]
    Menu,
    /// Run in progress
    Playing,
    /// Run ended, waiting for play-again
    GameOver,
}

impl Screen {
    /// Whether `self -> next` is one of the three legal transitions
    pub fn can_transition_to(self, next: Screen) -> bool {
        matches!(
            (self, next),
            (Screen::Menu, Screen::Playing)
                | (Screen::Playing, Screen::GameOver)
                | (Screen::GameOver, Screen::Playing)
        )
    }
}

/// Object categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Apple,
    Orange,
    Banana,
    Strawberry,
    Watermelon,
    Pineapple,
    Bomb,
}

/// Immutable descriptor shared by every object of one category
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectKind {
    pub category: Category,
    /// Score for slicing (negative for hazards)
    pub points: i64,
    pub radius: f32,
    /// Body fill
    pub color: Rgba,
    /// Flesh ring drawn inside the body, also used for juice
    pub inner_color: Option<Rgba>,
    /// Hazards cost a life when sliced and nothing when missed
    pub hazard: bool,
}

impl ObjectKind {
    /// Color used for juice particles and the cut face
    pub fn juice_color(&self) -> Rgba {
        self.inner_color.unwrap_or(self.color)
    }

    /// Apples and strawberries get a leaf
    pub fn has_leaf(&self) -> bool {
        matches!(self.category, Category::Apple | Category::Strawberry)
    }
}

/// Ordinary (non-hazard) kinds, drawn uniformly
pub static FRUIT_KINDS: [ObjectKind; 6] = [
    ObjectKind {
        category: Category::Apple,
        points: 1,
        radius: 44.0,
        color: rgb(0xe74c3c),
        inner_color: None,
        hazard: false,
    },
    ObjectKind {
        category: Category::Orange,
        points: 1,
        radius: 44.0,
        color: rgb(0xf39c12),
        inner_color: None,
        hazard: false,
    },
    ObjectKind {
        category: Category::Banana,
        points: 2,
        radius: 38.0,
        color: rgb(0xf1c40f),
        inner_color: None,
        hazard: false,
    },
    ObjectKind {
        category: Category::Strawberry,
        points: 2,
        radius: 36.0,
        color: rgb(0xe91e8a),
        inner_color: None,
        hazard: false,
    },
    ObjectKind {
        category: Category::Watermelon,
        points: 3,
        radius: 56.0,
        color: rgb(0x2ecc71),
        inner_color: Some(rgb(0xe74c3c)),
        hazard: false,
    },
    ObjectKind {
        category: Category::Pineapple,
        points: 4,
        radius: 50.0,
        color: rgb(0xf0b90b),
        inner_color: None,
        hazard: false,
    },
];

/// The single hazard kind
pub static HAZARD_KIND: ObjectKind = ObjectKind {
    category: Category::Bomb,
    points: -10,
    radius: 42.0,
    color: rgb(0x2c3e50),
    inner_color: None,
    hazard: true,
};

/// A falling object owned by the spawner
#[derive(Debug, Clone)]
pub struct FallingObject {
    pub id: u32,
    pub kind: &'static ObjectKind,
    pub pos: Vec2,
    /// Pixels per second, +y is down
    pub vel: Vec2,
    pub rotation: f32,
    /// Radians per second
    pub spin: f32,
    cut: bool,
    missed: bool,
}

impl FallingObject {
    pub fn new(id: u32, kind: &'static ObjectKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            rotation: 0.0,
            spin: 0.0,
            cut: false,
            missed: false,
        }
    }

    #[inline]
    pub fn is_cut(&self) -> bool {
        self.cut
    }

    #[inline]
    pub fn is_missed(&self) -> bool {
        self.missed
    }

    /// Flag as cut. Returns false if it already was.
    pub fn mark_cut(&mut self) -> bool {
        if self.cut {
            return false;
        }
        self.cut = true;
        true
    }

    /// Flag as missed. Returns false if it already was.
    pub fn mark_missed(&mut self) -> bool {
        if self.missed {
            return false;
        }
        self.missed = true;
        true
    }

    /// Radius used by the intersection test
    #[inline]
    pub fn hit_radius(&self, bonus: f32) -> f32 {
        self.kind.radius + bonus
    }
}

/// Score/lives/combo view of the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub lives: u32,
    pub combo_count: u32,
    pub combo_multiplier: u32,
    pub elapsed_secs: f64,
    pub running: bool,
    pub game_over: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: MAX_LIVES,
            combo_count: 0,
            combo_multiplier: 1,
            elapsed_secs: 0.0,
            running: false,
            game_over: false,
        }
    }
}

impl RunState {
    /// Fresh state for a run that is starting now
    pub fn started() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    /// Add a signed point delta, clamping the score at zero
    pub fn apply_points(&mut self, delta: i64) {
        self.score = if delta >= 0 {
            self.score.saturating_add(delta as u64)
        } else {
            self.score.saturating_sub(delta.unsigned_abs())
        };
    }

    /// Take one life. Returns true if that was the last one.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Freeze the run as terminal
    pub fn finish(&mut self) {
        self.running = false;
        self.game_over = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_transitions() {
        assert!(Screen::Menu.can_transition_to(Screen::Playing));
        assert!(Screen::Playing.can_transition_to(Screen::GameOver));
        assert!(Screen::GameOver.can_transition_to(Screen::Playing));

        assert!(!Screen::Menu.can_transition_to(Screen::GameOver));
        assert!(!Screen::Playing.can_transition_to(Screen::Menu));
        assert!(!Screen::GameOver.can_transition_to(Screen::Menu));
        assert!(!Screen::Playing.can_transition_to(Screen::Playing));
    }

    #[test]
    fn test_flags_set_once() {
        let mut obj = FallingObject::new(1, &FRUIT_KINDS[0], Vec2::ZERO, Vec2::ZERO);
        assert!(obj.mark_cut());
        assert!(!obj.mark_cut());
        assert!(obj.mark_missed());
        assert!(!obj.mark_missed());
        assert!(obj.is_cut() && obj.is_missed());
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let mut run = RunState::started();
        run.apply_points(3);
        run.apply_points(HAZARD_KIND.points);
        assert_eq!(run.score, 0);
        run.apply_points(7);
        assert_eq!(run.score, 7);
    }

    #[test]
    fn test_lose_life_saturates() {
        let mut run = RunState::started();
        assert!(!run.lose_life());
        assert!(!run.lose_life());
        assert!(run.lose_life());
        assert!(run.lose_life());
        assert_eq!(run.lives, 0);
    }

    #[test]
    fn test_kind_table() {
        assert!(FRUIT_KINDS.iter().all(|k| !k.hazard && k.points > 0));
        assert!(HAZARD_KIND.hazard && HAZARD_KIND.points < 0);
        let melon = FRUIT_KINDS
            .iter()
            .find(|k| k.category == Category::Watermelon)
            .unwrap();
        assert_eq!(melon.juice_color(), rgb(0xe74c3c));
        assert!(FRUIT_KINDS[0].has_leaf());
        assert!(!HAZARD_KIND.has_leaf());
    }

    #[test]
    fn test_run_state_serializes() {
        let json = serde_json::to_string(&RunState::started()).unwrap();
        let back: RunState = serde_json::from_str(&json).unwrap();
        assert!(back.running);
        assert_eq!(back.lives, MAX_LIVES);
        assert_eq!(serde_json::to_string(&Screen::GameOver).unwrap(), "\"game_over\"");
    }
}
