//! The turn state machine.
//!
//! The controller owns the table and sequences roll, choice and move
//! application. Every stimulus runs to completion, events included,
//! before the call returns.

use super::action::{Move, MoveResult};
use super::contracts::{Contract, LegalMove, MoveContract};
use super::dice::{Dice, RandomDice, ScriptedDice};
use super::events::{EventChannel, GameEvent, Observer, ObserverId};
use super::invariants::{InvariantSet, TableInvariants};
use super::phases::{EngineFault, Phase, Rejection, Transition};
use super::player::StrategyError;
use super::strategy::Strategy;
use super::table::Table;
use super::types::{Color, DieValue, PieceId, PIECES_PER_PLAYER};
use crate::match_config::{ConfigError, ConfigErrorKind, MatchConfig};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, error, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Setup
// ─────────────────────────────────────────────────────────────

/// Assembles a match from configuration, dice and presenters.
pub struct MatchBuilder {
    config: MatchConfig,
    dice: Option<Box<dyn Dice>>,
    channel: Rc<EventChannel>,
    first_player: Option<Color>,
    positions: Vec<(PieceId, i8)>,
}

impl std::fmt::Debug for MatchBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchBuilder")
            .field("config", &self.config)
            .field("dice", &self.dice.is_some())
            .field("first_player", &self.first_player)
            .field("positions", &self.positions)
            .finish()
    }
}

impl MatchBuilder {
    /// Starts a builder for the configuration. No dice are set yet.
    #[instrument]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            dice: None,
            channel: Rc::new(EventChannel::new()),
            first_player: None,
            positions: Vec::new(),
        }
    }

    /// Uses the given dice.
    pub fn dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    /// Uses a random die, seeded from the configuration when it has a seed.
    pub fn random_dice(self) -> Self {
        let dice = match self.config.seed() {
            Some(seed) => RandomDice::seeded(*seed),
            None => RandomDice::new(),
        };
        self.dice(dice)
    }

    /// Shares an existing event channel.
    pub fn channel(mut self, channel: Rc<EventChannel>) -> Self {
        self.channel = channel;
        self
    }

    /// Registers an observer before the first event fires.
    pub fn observer(self, observer: Rc<dyn Observer>) -> Self {
        self.channel.subscribe(observer);
        self
    }

    /// Chooses who rolls first. Defaults to the first seated color.
    pub fn first_player(mut self, color: Color) -> Self {
        self.first_player = Some(color);
        self
    }

    /// Starts a piece at a relative position instead of in its start area.
    pub fn position(mut self, piece: PieceId, relative: i8) -> Self {
        self.positions.push((piece, relative));
        self
    }

    /// Validates everything and opens the match.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid, no dice
    /// were supplied, the first player has no seat, or the starting
    /// positions break a table invariant. The match never
    /// reaches [`Phase::AwaitingRoll`] in that case.
    #[instrument(skip(self))]
    pub fn build(self) -> Result<TurnController, ConfigError> {
        let seats = self.config.validate()?;
        let Some(dice) = self.dice else {
            return Err(ConfigError::new(ConfigErrorKind::MissingDice));
        };
        let current = match self.first_player {
            Some(color) if !seats.contains(&color) => {
                return Err(ConfigError::new(ConfigErrorKind::EmptySeat(color)));
            }
            Some(color) => color,
            None => seats[0],
        };

        let mut table = Table::new(|color| self.config.seat(&seats, color));
        for (piece, relative) in self.positions {
            table.set_position(piece, relative);
        }
        if let Err(violations) = TableInvariants::check_all(&table) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ConfigError::new(ConfigErrorKind::InvalidLayout(descriptions)));
        }

        info!(?seats, first = %current, "Match opened");
        let controller = TurnController {
            table,
            phase: Phase::AwaitingRoll,
            current,
            last_roll: None,
            winner: None,
            dice,
            channel: self.channel,
        };
        controller.emit(GameEvent::TurnChanged(current));
        Ok(controller)
    }
}

// ─────────────────────────────────────────────────────────────
//  Controller
// ─────────────────────────────────────────────────────────────

/// The match: table, turn phase and event channel.
pub struct TurnController {
    table: Table,
    phase: Phase,
    current: Color,
    last_roll: Option<DieValue>,
    winner: Option<Color>,
    dice: Box<dyn Dice>,
    channel: Rc<EventChannel>,
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("last_roll", &self.last_roll)
            .field("winner", &self.winner)
            .field("channel", &self.channel)
            .finish()
    }
}

impl TurnController {
    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the color whose turn it is.
    pub fn current_player(&self) -> Color {
        self.current
    }

    /// Returns the roll being played, if any.
    pub fn last_roll(&self) -> Option<DieValue> {
        self.last_roll
    }

    /// Returns the winner once the match is concluded.
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Read-only view of pieces and board.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The event channel presenters subscribe to.
    pub fn channel(&self) -> &Rc<EventChannel> {
        &self.channel
    }

    /// Registers an observer.
    pub fn subscribe(&self, observer: Rc<dyn Observer>) -> ObserverId {
        self.channel.subscribe(observer)
    }

    /// Pieces that may be chosen right now.
    ///
    /// Empty outside [`Phase::AwaitingMoveChoice`].
    #[instrument(skip(self))]
    pub fn movable_pieces(&self) -> Vec<PieceId> {
        match (self.phase, self.last_roll) {
            (Phase::AwaitingMoveChoice, Some(roll)) => {
                self.table.player(self.current).movable_pieces(roll)
            }
            _ => Vec::new(),
        }
    }

    /// Rolls the owned dice for the current player.
    ///
    /// Out of phase the dice are not touched.
    #[instrument(skip(self), fields(color = %self.current, phase = %self.phase))]
    pub fn roll_dice(&mut self) -> Result<Transition, EngineFault> {
        if let Some(rejection) = self.roll_gate() {
            debug!(%rejection, "Roll ignored");
            return Ok(Transition::Ignored(rejection));
        }
        let roll = self.dice.roll();
        self.dice_rolled(self.current, roll.get())
    }

    /// Accepts a roll reported by an external die.
    #[instrument(skip(self), fields(current = %self.current, phase = %self.phase))]
    pub fn dice_rolled(&mut self, color: Color, value: u8) -> Result<Transition, EngineFault> {
        if let Some(rejection) = self.roll_gate() {
            debug!(%rejection, "Roll ignored");
            return Ok(Transition::Ignored(rejection));
        }
        if color != self.current {
            debug!("Roll from wrong player ignored");
            return Ok(Transition::Ignored(Rejection::NotYourTurn(color)));
        }
        let Some(roll) = DieValue::new(value) else {
            debug!("Invalid die value ignored");
            return Ok(Transition::Ignored(Rejection::InvalidDie(value)));
        };

        self.last_roll = Some(roll);
        self.emit(GameEvent::DiceRolled { color, value: roll });

        let player = self.table.player(color);
        if !player.has_movable_pieces(roll) {
            info!(%roll, "No movable piece, passing");
            let to = self.advance_turn()?;
            return Ok(Transition::TurnPassed { from: color, to });
        }

        match player.strategy() {
            Strategy::Automated => match player.best_piece_to_move(self.table.board(), roll) {
                Some(piece) => self.apply_move(piece, roll),
                None => {
                    warn!("Strategy found no move despite movable pieces");
                    let to = self.advance_turn()?;
                    Ok(Transition::TurnPassed { from: color, to })
                }
            },
            Strategy::Manual => {
                let pieces = player.movable_pieces(roll);
                self.phase = Phase::AwaitingMoveChoice;
                debug!(count = pieces.len(), "Awaiting choice");
                self.emit(GameEvent::MoveCandidates {
                    color,
                    pieces: pieces.clone(),
                });
                Ok(Transition::AwaitingChoice(pieces))
            }
        }
    }

    /// Accepts a piece picked by a person.
    #[instrument(skip(self), fields(current = %self.current, phase = %self.phase))]
    pub fn piece_chosen(&mut self, piece: PieceId) -> Result<Transition, EngineFault> {
        if self.phase.is_terminal() {
            return Ok(Transition::Ignored(Rejection::Concluded));
        }
        let (Phase::AwaitingMoveChoice, Some(roll)) = (self.phase, self.last_roll) else {
            debug!("Choice ignored");
            return Ok(Transition::Ignored(Rejection::OutOfPhase(self.phase)));
        };
        if piece.color != self.current {
            debug!("Foreign piece ignored");
            return Ok(Transition::Ignored(Rejection::ForeignPiece(piece)));
        }
        if !self.table.piece(piece).is_some_and(|p| p.can_move(roll)) {
            debug!("Immovable piece ignored");
            return Ok(Transition::Ignored(Rejection::IllegalPiece(piece, roll)));
        }

        self.emit(GameEvent::CandidatesCleared);
        self.apply_move(piece, roll)
    }

    /// Swaps a player's strategy. Takes effect from that player's next roll.
    #[instrument(skip(self))]
    pub fn set_strategy(&mut self, color: Color, strategy: Strategy) -> Result<(), StrategyError> {
        self.table.player_mut(color).set_strategy(strategy)
    }

    /// Removes a player from the rotation.
    ///
    /// If it was their turn, play passes to the next active player. When
    /// nobody else is active the fault is returned and nothing changes.
    #[instrument(skip(self), fields(current = %self.current, phase = %self.phase))]
    pub fn deactivate(&mut self, color: Color) -> Result<(), EngineFault> {
        if !self.table.player(color).is_active() || self.phase.is_terminal() {
            return Ok(());
        }
        if color == self.current && self.next_active().is_none() {
            error!(%color, "Deactivation would leave nobody to play");
            return Err(EngineFault::NoActivePlayer(color));
        }
        self.table.player_mut(color).deactivate();
        info!(%color, "Player deactivated");
        self.emit(GameEvent::PlayerDeactivated(color));

        if color == self.current {
            if self.phase == Phase::AwaitingMoveChoice {
                self.emit(GameEvent::CandidatesCleared);
            }
            self.advance_turn()?;
        }
        Ok(())
    }

    /// Rolls for automated players until a person must act, the match ends,
    /// or `max_rolls` rolls have been made. Returns the phase reached.
    #[instrument(skip(self))]
    pub fn play_automated(&mut self, max_rolls: usize) -> Result<Phase, EngineFault> {
        for _ in 0..max_rolls {
            let automated = self.table.player(self.current).strategy() == Strategy::Automated;
            if self.phase != Phase::AwaitingRoll || !automated {
                break;
            }
            self.roll_dice()?;
        }
        Ok(self.phase)
    }

    /// Serializable picture of the match.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            current: self.current,
            last_roll: self.last_roll,
            winner: self.winner,
            players: self
                .table
                .players()
                .iter()
                .map(|p| PlayerSnapshot {
                    color: p.color(),
                    active: p.is_active(),
                    human: p.is_human(),
                    strategy: p.strategy(),
                    positions: p.pieces().map(|piece| piece.relative()),
                })
                .collect(),
        }
    }

    /// Replays a scripted sequence of rolls on an all-automated configuration.
    ///
    /// Stops early when the match concludes. A configuration with human
    /// seats is refused.
    #[instrument(skip(config))]
    pub fn replay(config: MatchConfig, faces: &[u8]) -> Result<TurnController, MatchError> {
        if let Some(&color) = config.humans().first() {
            return Err(ConfigError::new(ConfigErrorKind::HumanInReplay(color)).into());
        }
        let dice = ScriptedDice::new(faces)
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingDice))?;
        let mut controller = MatchBuilder::new(config).dice(dice).build()?;
        controller.play_automated(faces.len())?;
        Ok(controller)
    }

    // ─────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────

    fn roll_gate(&self) -> Option<Rejection> {
        match self.phase {
            Phase::AwaitingRoll => None,
            phase if phase.is_terminal() => Some(Rejection::Concluded),
            phase => Some(Rejection::OutOfPhase(phase)),
        }
    }

    fn emit(&self, event: GameEvent) {
        self.channel.notify(&event);
    }

    /// Applies a move the caller has already checked, then decides who rolls next.
    #[instrument(skip(self))]
    fn apply_move(&mut self, piece: PieceId, roll: DieValue) -> Result<Transition, EngineFault> {
        let color = self.current;
        let action = Move::new(piece, roll);
        self.phase = Phase::ApplyingMove;

        if let Err(e) = LegalMove::check(&action, &self.table, color) {
            error!(error = %e, "Pre-checked move failed its contract");
            self.phase = Phase::AwaitingRoll;
            return Err(EngineFault::RejectedLegalMove { piece, roll });
        }

        #[cfg(debug_assertions)]
        let before = self.table.clone();

        let outcome = self.table.move_piece(action);
        if !outcome.result().is_applied() {
            error!("Piece refused a pre-checked move");
            self.phase = Phase::AwaitingRoll;
            return Err(EngineFault::RejectedLegalMove { piece, roll });
        }

        #[cfg(debug_assertions)]
        if let Err(e) = MoveContract::post(&before, &self.table) {
            error!(error = %e, "Move broke a table invariant");
            self.table = before;
            self.phase = Phase::AwaitingRoll;
            return Err(EngineFault::InvariantViolation(e.to_string()));
        }

        self.emit(GameEvent::PieceMoved {
            piece,
            steps: roll,
            to: *outcome.destination(),
        });
        for &knocked in outcome.captured() {
            self.emit(GameEvent::PieceKnockedOut {
                knocked,
                attacker: piece,
            });
        }

        let result = *outcome.result();
        if result == MoveResult::GameWon {
            info!(winner = %color, "Match concluded");
            self.phase = Phase::Concluded;
            self.winner = Some(color);
            self.emit(GameEvent::GameWon(color));
            return Ok(Transition::Won {
                outcome,
                winner: color,
            });
        }

        let continue_turn = roll.is_six() || result == MoveResult::KnockedOutOpponent;
        let next = if continue_turn {
            debug!(%result, "Extra turn");
            self.phase = Phase::AwaitingRoll;
            self.emit(GameEvent::ExtraTurn(color));
            color
        } else {
            self.advance_turn()?
        };
        Ok(Transition::Moved { outcome, next })
    }

    /// The next active player after the current one, in seat order.
    fn next_active(&self) -> Option<Color> {
        let start = self.current.seat();
        let seats = Color::ALL.len();
        (1..seats)
            .map(|step| Color::ALL[(start + step) % seats])
            .find(|&color| self.table.player(color).is_active())
    }

    /// Hands the turn to the next active player in seat order.
    fn advance_turn(&mut self) -> Result<Color, EngineFault> {
        let next = self.next_active();

        self.phase = Phase::AwaitingRoll;
        let Some(next) = next else {
            error!(current = %self.current, "Turn advancement wrapped around");
            return Err(EngineFault::NoActivePlayer(self.current));
        };

        self.current = next;
        self.last_roll = None;
        info!(next = %next, "Turn changed");
        self.emit(GameEvent::TurnChanged(next));
        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────
//  Snapshot
// ─────────────────────────────────────────────────────────────

/// One player's part of a [`MatchSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Color.
    pub color: Color,
    /// Still taking turns.
    pub active: bool,
    /// Played by a person.
    pub human: bool,
    /// Move strategy.
    pub strategy: Strategy,
    /// Relative position of each piece, by slot.
    pub positions: [i8; PIECES_PER_PLAYER],
}

/// Serializable state of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Turn phase.
    pub phase: Phase,
    /// Player to act.
    pub current: Color,
    /// Roll being played.
    pub last_roll: Option<DieValue>,
    /// Winner, once concluded.
    pub winner: Option<Color>,
    /// Every color in seat order, seated or not.
    pub players: Vec<PlayerSnapshot>,
}

/// Error from running a whole match.
#[derive(Debug, Clone, Display, Error, From)]
pub enum MatchError {
    /// The match could not be set up.
    #[display("{}", _0)]
    Config(ConfigError),
    /// The engine hit an internal-consistency fault.
    #[display("{}", _0)]
    Fault(EngineFault),
}
