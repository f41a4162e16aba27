#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scores finished battles and searches for the smallest winning attack boost.

use skirmish_core::{AttackPower, Command, Event, Faction, UnitSnapshot};
use skirmish_system_combat::{CombatResolver, Termination};
use skirmish_world::{self as world, query, Battle, InvariantViolation};
use thiserror::Error;
use tracing::info;

/// Failure raised while evaluating a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OutcomeError {
    /// The simulation broke one of its own invariants.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    /// The boosted faction has no units, so it can never win flawlessly.
    #[error("no {0:?} units are present")]
    NoMembers(Faction),
    /// Every boost up to the ceiling lost at least one unit.
    #[error("no boost up to {ceiling} wins without casualties")]
    SearchExhausted {
        /// Largest boost that was tried.
        ceiling: u32,
    },
}

/// Final state of a battle played to the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleReport {
    /// Rounds that ran to completion.
    pub completed_rounds: u32,
    /// Sum of the hit points of every surviving unit.
    pub surviving_hit_points: u64,
    /// Faction left standing, if any unit survived.
    pub victor: Option<Faction>,
    /// Surviving units in reading order.
    pub survivors: Vec<UnitSnapshot>,
    /// Completed rounds multiplied by the surviving hit points.
    pub score: u64,
}

impl BattleReport {
    fn from_battle(battle: &Battle) -> Self {
        let completed_rounds = query::completed_rounds(battle);
        let surviving_hit_points = query::total_hit_points(battle);
        let victor = match query::factions_alive(battle).as_slice() {
            [faction] => Some(*faction),
            _ => None,
        };

        Self {
            completed_rounds,
            surviving_hit_points,
            victor,
            survivors: query::unit_view(battle).into_vec(),
            score: u64::from(completed_rounds) * surviving_hit_points,
        }
    }
}

/// Result of the minimal-boost search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoostReport {
    /// Faction that received the boost.
    pub faction: Faction,
    /// Smallest boost that won without casualties.
    pub boost: u32,
    /// Attack power of the boosted faction during the winning trial.
    pub attack_power: AttackPower,
    /// Final state of the winning trial.
    pub report: BattleReport,
}

/// Parameters of the minimal-boost search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostSearch {
    /// Faction whose attack power is raised.
    pub faction: Faction,
    /// Largest boost to try before giving up; unbounded when `None`.
    pub ceiling: Option<u32>,
}

impl Default for BoostSearch {
    fn default() -> Self {
        Self {
            faction: Faction::Elf,
            ceiling: None,
        }
    }
}

/// Runs trials on clones of an untouched battle.
#[derive(Debug, Default)]
pub struct OutcomeEvaluator {
    resolver: CombatResolver,
    events: Vec<Event>,
}

impl OutcomeEvaluator {
    /// Creates an evaluator with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays the battle with unmodified attack power and scores it.
    pub fn fixed_power(&mut self, initial: &Battle) -> Result<BattleReport, OutcomeError> {
        let mut battle = initial.clone();
        self.events.clear();
        self.resolver.run(&mut battle, &mut self.events)?;

        let report = BattleReport::from_battle(&battle);
        info!(
            completed_rounds = report.completed_rounds,
            surviving_hit_points = report.surviving_hit_points,
            victor = ?report.victor,
            score = report.score,
            "fixed-power battle finished"
        );
        Ok(report)
    }

    /// Finds the smallest boost letting `search.faction` win without losing a unit.
    ///
    /// Boosts are tried in increasing order starting at zero, each on a fresh
    /// clone of `initial`. A trial is abandoned as soon as the boosted faction
    /// loses a unit.
    pub fn minimal_boost(
        &mut self,
        initial: &Battle,
        search: BoostSearch,
    ) -> Result<BoostReport, OutcomeError> {
        let faction = search.faction;
        let members = query::count(initial, faction);
        if members == 0 {
            return Err(OutcomeError::NoMembers(faction));
        }

        let mut boost = 0_u32;
        loop {
            if let Some(report) = self.trial(initial, faction, members, boost)? {
                info!(
                    faction = ?faction,
                    boost,
                    attack_power = report.attack_power.get(),
                    score = report.report.score,
                    "minimal boost found"
                );
                return Ok(report);
            }

            if search.ceiling.is_some_and(|ceiling| boost >= ceiling) {
                return Err(OutcomeError::SearchExhausted { ceiling: boost });
            }
            boost = boost
                .checked_add(1)
                .ok_or(OutcomeError::SearchExhausted { ceiling: boost })?;
        }
    }

    /// Plays one boosted trial; `None` means the faction lost a unit or the battle.
    fn trial(
        &mut self,
        initial: &Battle,
        faction: Faction,
        members: usize,
        boost: u32,
    ) -> Result<Option<BoostReport>, OutcomeError> {
        let mut battle = initial.clone();
        self.events.clear();
        world::apply(
            &mut battle,
            Command::BoostAttack {
                faction,
                amount: boost,
            },
            &mut self.events,
        )?;
        let attack_power = query::unit_view(&battle)
            .members(faction)
            .map(|unit| unit.attack_power)
            .max()
            .ok_or(OutcomeError::NoMembers(faction))?;

        let termination = self.resolver.run_until(&mut battle, &mut self.events, |event| {
            matches!(event, Event::UnitDied { faction: fallen, .. } if *fallen == faction)
        })?;

        let flawless = termination == Termination::Decisive
            && query::factions_alive(&battle) == [faction]
            && query::count(&battle, faction) == members;
        if !flawless {
            info!(
                faction = ?faction,
                boost,
                attack_power = attack_power.get(),
                completed_rounds = query::completed_rounds(&battle),
                "boosted trial lost a unit"
            );
            return Ok(None);
        }

        Ok(Some(BoostReport {
            faction,
            boost,
            attack_power,
            report: BattleReport::from_battle(&battle),
        }))
    }
}
