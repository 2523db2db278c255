pub mod events;
pub mod game_trait;
pub mod intent;
pub mod player;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::RallyEvent;
    use crate::game_trait::{RallyGame, TickInputs};
    use crate::intent::PlayerIntent;
    use crate::player::Side;

    /// Inputs where nobody acts.
    pub fn idle_inputs() -> TickInputs {
        TickInputs::default()
    }

    /// Inputs where `side` presses swing and the other player idles.
    pub fn swing_inputs(side: Side) -> TickInputs {
        TickInputs::only(side, PlayerIntent::swing())
    }

    /// Run N game ticks with idle inputs, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn RallyGame, n: usize) -> Vec<RallyEvent> {
        let idle = idle_inputs();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(&idle));
        }
        all_events
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every RallyGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// A fresh game must serialize to non-empty bytes.
    pub fn contract_state_is_serializable(game: &dyn RallyGame) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// An input that starts play followed by ticks must change state.
    pub fn contract_input_changes_state(game: &mut dyn RallyGame, inputs: &TickInputs) {
        let before = game.serialize_state();
        game.update(inputs);
        game.update(&idle_inputs());
        let after = game.serialize_state();
        assert_ne!(before, after, "State must change after input + update");
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn RallyGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn RallyGame, inputs: &TickInputs) {
        game.pause();
        let before = game.serialize_state();
        game.update(inputs);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(inputs);
        game.update(&idle_inputs());
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Malformed state bytes must be ignored rather than corrupting state.
    pub fn contract_malformed_state_ignored(game: &mut dyn RallyGame) {
        let before = game.serialize_state();
        game.apply_state(&[0xc1, 0xff, 0x00]);
        assert_eq!(before, game.serialize_state());
    }
}
