//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use codenames_core::{
    rng_from_seed, AgentFactory, BoardSetup, EngineError, GameEngine, GameResult, Team, TeamConfig, TurnEvent,
};

use crate::config::MatchConfig;
use crate::match_play::MatchError;
use crate::recorder::{GameRecorder, LogSink};

/// Plays games between two team configs, one at a time
pub struct GameRunner<'a, F: AgentFactory + ?Sized> {
    factory: &'a F,
    config: &'a MatchConfig,
}

impl<'a, F: AgentFactory + ?Sized> GameRunner<'a, F> {
    pub fn new(factory: &'a F, config: &'a MatchConfig) -> Self {
        Self { factory, config }
    }

    /// Play one game with fresh board and agents, recording every turn.
    ///
    /// On error the open recorder session is abandoned.
    pub fn play_game<S: LogSink>(
        &self,
        game_id: u64,
        team_a: &TeamConfig,
        team_b: &TeamConfig,
        recorder: &mut GameRecorder<S>,
    ) -> Result<GameResult, MatchError> {
        let setup = self.prepare_board(game_id)?;
        let mut engine = self.create_engine(&setup, team_a, team_b)?;

        recorder.start_game(game_id, &team_a.model_name, &team_b.model_name, &setup)?;
        match drive_game(game_id, &mut engine, [team_a, team_b], recorder) {
            Ok(result) => Ok(result),
            Err(err) => {
                recorder.abandon_game();
                Err(err)
            }
        }
    }

    /// Board for one game, seeded from the match seed and the game id
    fn prepare_board(&self, game_id: u64) -> Result<BoardSetup, MatchError> {
        let mut rng = rng_from_seed(self.config.game_seed(game_id));
        Ok(BoardSetup::generate(&self.config.words, &mut rng)?)
    }

    fn create_engine(
        &self,
        setup: &BoardSetup,
        team_a: &TeamConfig,
        team_b: &TeamConfig,
    ) -> Result<GameEngine, MatchError> {
        let create = |team: Team, config: &TeamConfig| {
            self.factory
                .create_team(config)
                .map_err(|source| MatchError::AgentSetup { team, source })
        };
        let agents_a = create(Team::A, team_a)?;
        let agents_b = create(Team::B, team_b)?;
        Ok(GameEngine::new(setup, agents_a, agents_b, self.config.engine_config()))
    }
}

/// Step the engine to the end, feeding each turn to the recorder
fn drive_game<S: LogSink>(
    game_id: u64,
    engine: &mut GameEngine,
    teams: [&TeamConfig; 2],
    recorder: &mut GameRecorder<S>,
) -> Result<GameResult, MatchError> {
    let model = |team: Team| teams[team.index()].model_name.as_str();

    while !engine.is_over() {
        let event = engine
            .play_turn()
            .map_err(|source| MatchError::Engine { game_id, source })?;

        match event {
            TurnEvent::Played(record) => {
                let remaining = engine.state().team_words(record.team);
                recorder.log_turn(&record, model(record.team), remaining)?;
            }
            TurnEvent::Forfeited {
                turn_number,
                team,
                reason,
            } => recorder.log_forfeit(turn_number, team, model(team), &reason)?,
            TurnEvent::Ended { .. } => {}
        }
    }

    let result = engine.result().ok_or(MatchError::Engine {
        game_id,
        source: EngineError::GameOver,
    })?;
    recorder.end_game(result.winner, result.reason)?;
    Ok(result)
}
