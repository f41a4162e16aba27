#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine that drives a battle round by round until one faction remains.
//!
//! A round snapshots the reading order of every living unit, then gives each
//! of them one turn: move toward the nearest enemy unless already engaged, then
//! strike the weakest adjacent enemy. The battle turns decisive the moment a
//! unit starts its turn without any enemy left; that interrupted round is not
//! counted.

use skirmish_core::{BattleState, CellCoord, Command, Event};
use skirmish_system_movement::Movement;
use skirmish_system_targeting::Targeting;
use skirmish_world::{self as world, query, Battle, InvariantViolation};
use tracing::{debug, trace};

/// Reason [`CombatResolver::run_until`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The battle reached its decisive state.
    Decisive,
    /// The stop predicate accepted an event before the battle ended.
    Stopped,
}

/// Outcome of a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoundOutcome {
    Completed,
    Decisive,
    Stopped,
}

/// Combat resolver that reuses the movement and targeting systems across turns.
#[derive(Debug, Default)]
pub struct CombatResolver {
    movement: Movement,
    targeting: Targeting,
    commands: Vec<Command>,
    acted: Vec<CellCoord>,
}

impl CombatResolver {
    /// Creates a resolver with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays one round and reports the battle state afterwards.
    pub fn play_round(
        &mut self,
        battle: &mut Battle,
        out: &mut Vec<Event>,
    ) -> Result<BattleState, InvariantViolation> {
        let _ = self.round(battle, out, &mut |_: &Event| false)?;
        Ok(query::state(battle))
    }

    /// Plays rounds until the battle turns decisive.
    pub fn run(&mut self, battle: &mut Battle, out: &mut Vec<Event>) -> Result<(), InvariantViolation> {
        let _ = self.run_until(battle, out, |_: &Event| false)?;
        Ok(())
    }

    /// Plays rounds until the battle turns decisive or `stop` accepts an event.
    ///
    /// `stop` sees every event right after the turn that produced it, so a
    /// caller can abandon a battle mid-round.
    pub fn run_until<F>(
        &mut self,
        battle: &mut Battle,
        out: &mut Vec<Event>,
        mut stop: F,
    ) -> Result<Termination, InvariantViolation>
    where
        F: FnMut(&Event) -> bool,
    {
        loop {
            match self.round(battle, out, &mut stop)? {
                RoundOutcome::Completed => continue,
                RoundOutcome::Decisive => return Ok(Termination::Decisive),
                RoundOutcome::Stopped => return Ok(Termination::Stopped),
            }
        }
    }

    fn round<F>(
        &mut self,
        battle: &mut Battle,
        out: &mut Vec<Event>,
        stop: &mut F,
    ) -> Result<RoundOutcome, InvariantViolation>
    where
        F: FnMut(&Event) -> bool,
    {
        if query::state(battle) == BattleState::Decisive {
            return Ok(RoundOutcome::Decisive);
        }

        let order = query::units_in_reading_order(battle);
        self.acted.clear();

        for cell in order {
            // A unit that already acted may have stepped onto a cell that is
            // still ahead in this round's order.
            if self.acted.contains(&cell) || query::unit_at(battle, cell).is_none() {
                continue;
            }

            if query::factions_alive(battle).len() < 2 {
                world::apply(battle, Command::Conclude, out)?;
                debug!(
                    completed_rounds = query::completed_rounds(battle),
                    survivors = query::population(battle),
                    "combat ended"
                );
                return Ok(RoundOutcome::Decisive);
            }

            let first_event = out.len();
            let position = self.take_turn(battle, cell, out)?;
            self.acted.push(position);

            if out[first_event..].iter().any(|event| stop(event)) {
                return Ok(RoundOutcome::Stopped);
            }
        }

        world::apply(battle, Command::CompleteRound, out)?;
        debug!(
            completed_rounds = query::completed_rounds(battle),
            survivors = query::population(battle),
            "round completed"
        );
        Ok(RoundOutcome::Completed)
    }

    /// Moves and attacks with the unit on `cell`, returning where it ended up.
    fn take_turn(
        &mut self,
        battle: &mut Battle,
        cell: CellCoord,
        out: &mut Vec<Event>,
    ) -> Result<CellCoord, InvariantViolation> {
        let mut position = cell;

        self.commands.clear();
        let units = query::unit_view(battle);
        if let Some(planned) =
            self.movement
                .handle(query::grid(battle), &units, cell, &mut self.commands)
        {
            trace!(
                from = %cell,
                to = %planned.step,
                destination = %planned.destination,
                distance = planned.distance,
                "unit moves"
            );
            position = planned.step;
        }
        for command in self.commands.drain(..) {
            world::apply(battle, command, out)?;
        }

        let units = query::unit_view(battle);
        if let Some(target) = self.targeting.handle(&units, position, &mut self.commands) {
            trace!(attacker = %position, target = %target, "unit attacks");
        }
        for command in self.commands.drain(..) {
            world::apply(battle, command, out)?;
        }

        Ok(position)
    }
}
