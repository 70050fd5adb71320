//! The garden session: owns every subsystem and applies user actions.

use crate::config::{
    GameConfig, MESSAGE_DURATION_MS, NEW_GAME_WATER, WARP_DAYS, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::growth::GrowthState;
use crate::input::{InputEvent, PointerKind, Tool};
use crate::particles::PetalSystem;
use crate::render::Scene;
use crate::store::{SaveStore, SavedState};
use crate::tree::Canopy;
use crate::weather::{WeatherCycle, Wind};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MSG_WELCOME: &str = "Welcome! Plant a seed to start.";
const MSG_WATERED: &str = "Watered!";
const MSG_TRIMMED: &str = "Trimmed!";
const MSG_SKIPPED: &str = "Skipped 1 Day";
const MSG_WARPED: &str = "Warped 2 Years!";
const MSG_RESET: &str = "Game Reset!";
const MSG_PLANTED: &str = "Seed Planted!";

/// A status line that disappears on its own
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
    expires_at: i64,
}

pub struct Game {
    config: GameConfig,
    growth: GrowthState,
    canopy: Canopy,
    weather: WeatherCycle,
    wind: Wind,
    petals: PetalSystem,
    shielded: bool,
    message: Option<Message>,
    rng: StdRng,
    store: Box<dyn SaveStore>,
}

impl Game {
    /// A fresh session; call [`Game::load`] before the first frame
    pub fn new(config: GameConfig, store: Box<dyn SaveStore>, now: i64) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let weather = WeatherCycle::new(now, &mut rng);
        Self {
            canopy: Canopy::new(config.shape),
            growth: GrowthState::new(NEW_GAME_WATER, 0, now),
            config,
            weather,
            wind: Wind::default(),
            petals: PetalSystem::new(),
            shielded: false,
            message: None,
            rng,
            store,
        }
    }

    /// Restore the saved garden and catch up on time spent away
    pub fn load(&mut self, now: i64) {
        let saved = match self.store.load() {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable save");
                None
            }
        };

        match saved {
            Some(saved) => {
                self.growth = GrowthState::new(
                    saved.water_level,
                    saved.tree_age,
                    saved.last_checkpoint_time.unwrap_or(now),
                );
                let days = self.growth.advance(now, self.config.ms_per_day);
                tracing::info!(
                    water = self.growth.water_level,
                    age = self.growth.tree_age,
                    days_away = days,
                    "loaded garden"
                );
            }
            None => {
                self.growth = GrowthState::new(NEW_GAME_WATER, 0, now);
                tracing::info!("starting a new garden");
                self.show(MSG_WELCOME, now);
            }
        }

        self.canopy.invalidate();
        self.persist(now);
    }

    /// Advance one frame
    pub fn update(&mut self, dt_ms: f64, now: i64) {
        // Days first, so the canopy drawn this frame matches the age shown
        self.check_growth(now);

        let mode = self.weather.tick(now, &mut self.rng);
        self.wind.update(dt_ms, mode.wind_multiplier(), self.shielded);

        self.canopy.refresh(self.growth.tree_age, &mut self.rng);
        self.weather
            .update_particles(&mut self.rng, WORLD_WIDTH, WORLD_HEIGHT);
        self.petals.update(
            &mut self.rng,
            self.growth.tree_age,
            self.wind.force(),
            WORLD_HEIGHT,
        );

        if self.message.as_ref().is_some_and(|m| now >= m.expires_at) {
            self.message = None;
        }
    }

    fn check_growth(&mut self, now: i64) {
        let days = self.growth.advance(now, self.config.ms_per_day);
        if days > 0 {
            tracing::debug!(
                days,
                water = self.growth.water_level,
                age = self.growth.tree_age,
                "days passed"
            );
            self.persist(now);
        }
    }

    /// Route a pointer gesture to the selected tool
    pub fn handle(&mut self, event: InputEvent, now: i64) {
        match (event.kind, event.tool) {
            (PointerKind::Start, Tool::Water) => self.water(now),
            (PointerKind::Start | PointerKind::Move, Tool::Trim) => {
                if let Some((x, y)) = event.position {
                    self.trim(x, y, now);
                }
            }
            (PointerKind::Start, Tool::Shield) => self.shielded = true,
            (PointerKind::End, Tool::Shield) => self.shielded = false,
            _ => {}
        }
    }

    pub fn water(&mut self, now: i64) {
        if self.growth.water() {
            self.show(MSG_WATERED, now);
            self.persist(now);
        }
    }

    /// Cuts are not saved; the tree grows back when it regenerates
    pub fn trim(&mut self, x: f32, y: f32, now: i64) {
        if self.canopy.try_trim(x, y) {
            self.show(MSG_TRIMMED, now);
        }
    }

    pub fn skip_day(&mut self, now: i64) {
        self.growth.skip_day();
        self.show(MSG_SKIPPED, now);
        self.persist(now);
    }

    pub fn warp_two_years(&mut self, now: i64) {
        self.growth.warp(WARP_DAYS);
        self.show(MSG_WARPED, now);
        self.persist(now);
    }

    pub fn hard_reset(&mut self, now: i64) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear save");
        }
        self.growth.reset(now);
        self.petals.clear();
        self.show(MSG_RESET, now);
        self.persist(now);
        self.canopy.invalidate();
        self.canopy.refresh(self.growth.tree_age, &mut self.rng);
        tracing::info!("garden reset");
    }

    pub fn plant_seed(&mut self, now: i64) {
        self.hard_reset(now);
        self.show(MSG_PLANTED, now);
    }

    pub fn growth(&self) -> &GrowthState {
        &self.growth
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            weather: self.weather.current(),
            water_level: self.growth.water_level,
            tree_age: self.growth.tree_age,
            tree: self.canopy.geometry(),
            petals: &self.petals.petals,
            raindrops: &self.weather.raindrops,
            snowflakes: &self.weather.snowflakes,
            shielded: self.shielded,
            message: self.message.as_ref(),
        }
    }

    fn show(&mut self, text: &str, now: i64) {
        self.message = Some(Message {
            text: text.to_string(),
            is_error: false,
            expires_at: now + MESSAGE_DURATION_MS,
        });
    }

    fn show_error(&mut self, text: String, now: i64) {
        self.message = Some(Message {
            text,
            is_error: true,
            expires_at: now + MESSAGE_DURATION_MS,
        });
    }

    /// Save after a mutation. Failure is reported, never fatal.
    fn persist(&mut self, now: i64) {
        let state = SavedState {
            water_level: self.growth.water_level,
            tree_age: self.growth.tree_age,
            last_checkpoint_time: Some(self.growth.last_checkpoint),
        };
        if let Err(e) = self.store.save(&state) {
            tracing::warn!(error = %e, "save failed");
            self.show_error(format!("Error: {}", e), now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use crate::tree::max_gen_depth;
    use std::cell::RefCell;
    use std::rc::Rc;

    const D: i64 = 1_000;
    const NOW: i64 = 1_700_000_000_000;

    fn config() -> GameConfig {
        GameConfig {
            ms_per_day: D,
            seed: 7,
            ..GameConfig::default()
        }
    }

    /// Memory slot shared with the test so saves can be inspected
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl SaveStore for SharedStore {
        fn load(&self) -> Result<Option<SavedState>, StoreError> {
            self.0.borrow().load()
        }
        fn save(&mut self, state: &SavedState) -> Result<(), StoreError> {
            self.0.borrow_mut().save(state)
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            self.0.borrow_mut().clear()
        }
    }

    struct BrokenStore;

    impl SaveStore for BrokenStore {
        fn load(&self) -> Result<Option<SavedState>, StoreError> {
            Err(serde_json::from_str::<SavedState>("{").unwrap_err().into())
        }
        fn save(&mut self, _state: &SavedState) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "save.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn new_game(store: SharedStore) -> Game {
        let mut game = Game::new(config(), Box::new(store), NOW);
        game.load(NOW);
        game
    }

    fn saved(store: &SharedStore) -> SavedState {
        store.load().unwrap().expect("slot should be written")
    }

    #[test]
    fn new_session_starts_as_seed() {
        let store = SharedStore::default();
        let mut game = new_game(store.clone());

        assert_eq!(game.growth().water_level, 50.0);
        assert_eq!(game.growth().tree_age, 0);
        assert_eq!(game.message.as_ref().unwrap().text, MSG_WELCOME);
        assert_eq!(saved(&store).tree_age, 0);

        game.update(16.0, NOW + 16);
        assert!(game.scene().tree.branches.is_empty());
        assert_eq!(game.scene().tree_age, 0);
    }

    #[test]
    fn load_catches_up_offline_days() {
        let store = SharedStore::default();
        store
            .clone()
            .save(&SavedState {
                water_level: 40.0,
                tree_age: 5,
                last_checkpoint_time: Some(NOW - 3 * D),
            })
            .unwrap();

        let game = new_game(store.clone());
        assert!((game.growth().water_level - 39.7).abs() < 1e-9);
        assert_eq!(game.growth().tree_age, 8);
        assert!(game.message.as_ref().is_none());
        assert_eq!(saved(&store).tree_age, 8);
        assert_eq!(saved(&store).last_checkpoint_time, Some(NOW));
    }

    #[test]
    fn load_without_timestamp_starts_now() {
        let store = SharedStore::default();
        store
            .clone()
            .save(&SavedState {
                water_level: 40.0,
                tree_age: 5,
                last_checkpoint_time: None,
            })
            .unwrap();

        let game = new_game(store);
        assert_eq!(game.growth().tree_age, 5);
        assert_eq!(game.growth().last_checkpoint, NOW);
    }

    #[test]
    fn update_applies_day_boundaries_and_saves() {
        let store = SharedStore::default();
        let mut game = new_game(store.clone());
        game.warp_two_years(NOW);

        game.update(16.0, NOW + D / 2);
        assert_eq!(game.growth().tree_age, 730);

        game.update(16.0, NOW + 2 * D + 10);
        assert_eq!(game.growth().tree_age, 732);
        assert_eq!(saved(&store).tree_age, 732);
        assert_eq!(saved(&store).last_checkpoint_time, Some(NOW + 2 * D));
    }

    #[test]
    fn warp_refills_water() {
        let mut game = new_game(SharedStore::default());
        game.growth = GrowthState::new(20.0, 100, NOW);
        game.warp_two_years(NOW);
        assert_eq!(game.growth().tree_age, 830);
        assert_eq!(game.growth().water_level, 100.0);
        assert_eq!(game.message.as_ref().unwrap().text, MSG_WARPED);
    }

    #[test]
    fn skip_days_until_dry() {
        let mut game = new_game(SharedStore::default());
        game.growth = GrowthState::new(5.0, 0, NOW);
        for _ in 0..10 {
            game.skip_day(NOW);
        }
        assert_eq!(game.growth().water_level, 0.0);
        assert_eq!(game.growth().tree_age, 0);
    }

    #[test]
    fn watering_tool_fills_until_full() {
        let store = SharedStore::default();
        let mut game = new_game(store.clone());
        let pour = InputEvent {
            kind: PointerKind::Start,
            position: Some((10.0, 10.0)),
            tool: Tool::Water,
        };

        game.handle(pour, NOW);
        assert_eq!(game.growth().water_level, 60.0);
        assert_eq!(game.message.as_ref().unwrap().text, MSG_WATERED);
        assert_eq!(saved(&store).water_level, 60.0);

        for _ in 0..10 {
            game.handle(pour, NOW);
        }
        assert_eq!(game.growth().water_level, 100.0);

        // Dragging with the can does nothing
        game.growth = GrowthState::new(50.0, 0, NOW);
        game.handle(InputEvent { kind: PointerKind::Move, ..pour }, NOW);
        assert_eq!(game.growth().water_level, 50.0);
    }

    #[test]
    fn shield_held_between_start_and_end() {
        let mut game = new_game(SharedStore::default());
        let press = InputEvent {
            kind: PointerKind::Start,
            position: Some((10.0, 10.0)),
            tool: Tool::Shield,
        };
        game.handle(press, NOW);
        assert!(game.shielded);
        assert!(game.scene().shielded);

        game.handle(
            InputEvent {
                kind: PointerKind::End,
                position: None,
                tool: Tool::Shield,
            },
            NOW,
        );
        assert!(!game.shielded);
    }

    #[test]
    fn trimming_snips_a_blossom() {
        let mut game = Game::new(
            GameConfig {
                shape: crate::config::ShapeMode::Stable,
                ..config()
            },
            Box::new(SharedStore::default()),
            NOW,
        );
        game.load(NOW);
        game.warp_two_years(NOW);
        game.update(16.0, NOW + 1);

        let leaves = game.canopy.geometry().leaves.len();
        let target = game.canopy.geometry().leaves[0];
        game.handle(
            InputEvent {
                kind: PointerKind::Move,
                position: Some((target.x, target.y)),
                tool: Tool::Trim,
            },
            NOW + 2,
        );
        assert_eq!(game.canopy.geometry().leaves.len(), leaves - 1);
        assert_eq!(game.message.as_ref().unwrap().text, MSG_TRIMMED);
    }

    #[test]
    fn messages_expire() {
        let mut game = new_game(SharedStore::default());
        assert!(game.message.as_ref().is_some());
        game.update(16.0, NOW + MESSAGE_DURATION_MS - 1);
        assert!(game.message.as_ref().is_some());
        game.update(16.0, NOW + MESSAGE_DURATION_MS);
        assert!(game.message.as_ref().is_none());
    }

    #[test]
    fn plant_seed_resets_and_announces() {
        let store = SharedStore::default();
        let mut game = new_game(store.clone());
        game.warp_two_years(NOW);
        game.update(16.0, NOW + 1);
        assert!(!game.scene().tree.branches.is_empty());

        game.plant_seed(NOW + 5);
        assert_eq!(game.growth().tree_age, 0);
        assert_eq!(game.growth().water_level, 100.0);
        assert_eq!(game.message.as_ref().unwrap().text, MSG_PLANTED);
        assert!(game.scene().tree.branches.is_empty());
        assert_eq!(saved(&store).water_level, 100.0);
    }

    #[test]
    fn hard_reset_restores_defaults_and_saves_them() {
        let store = SharedStore::default();
        let mut game = new_game(store.clone());
        game.warp_two_years(NOW);
        game.skip_day(NOW);
        assert_eq!(game.growth().tree_age, 731);

        game.hard_reset(NOW + 50);
        assert_eq!(*game.growth(), GrowthState::new(100.0, 0, NOW + 50));
        assert_eq!(game.message.as_ref().unwrap().text, MSG_RESET);
        assert_eq!(
            saved(&store),
            SavedState {
                water_level: 100.0,
                tree_age: 0,
                last_checkpoint_time: Some(NOW + 50),
            }
        );
        assert!(game.scene().tree.branches.is_empty());

        // With the slot gone a new session starts from the seed defaults
        let mut empty = MemoryStore::new();
        empty.clear().unwrap();
        let mut fresh = Game::new(config(), Box::new(empty), NOW + 60);
        fresh.load(NOW + 60);
        assert_eq!(*fresh.growth(), GrowthState::new(50.0, 0, NOW + 60));
        assert_eq!(fresh.message.as_ref().unwrap().text, MSG_WELCOME);
    }

    #[test]
    fn canopy_deepens_on_the_frame_the_age_crosses_a_step() {
        let mut game = Game::new(
            GameConfig {
                shape: crate::config::ShapeMode::Stable,
                ..config()
            },
            Box::new(SharedStore::default()),
            NOW,
        );
        game.load(NOW);
        game.growth = GrowthState::new(100.0, 119, NOW);

        game.update(16.0, NOW + 10);
        let deepest = |game: &Game| game.scene().tree.branches.iter().map(|b| b.depth).max();
        assert_eq!(deepest(&game), Some(max_gen_depth(119)));

        game.update(16.0, NOW + D);
        assert_eq!(game.growth().tree_age, 120);
        assert_eq!(deepest(&game), Some(max_gen_depth(120)));
        assert_eq!(max_gen_depth(120), 3);
    }

    #[test]
    fn broken_store_never_stops_the_game() {
        let mut game = Game::new(config(), Box::new(BrokenStore), NOW);
        game.load(NOW);
        assert_eq!(game.growth().water_level, 50.0);
        assert!(game.message.as_ref().unwrap().is_error);

        game.water(NOW + 10);
        assert_eq!(game.growth().water_level, 60.0);
        assert!(game.message.as_ref().unwrap().text.starts_with("Error:"));

        game.update(16.0, NOW + 5 * D);
        assert_eq!(game.growth().tree_age, 5);
        assert!((game.growth().water_level - 59.5).abs() < 1e-9);
    }
}
