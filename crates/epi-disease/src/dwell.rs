//! Dwell-time compartmental reaction.
//!
//! # Progression
//!
//! ```text
//! Uninfected ──infection──▶ Latent ──▶ Incubating ──▶ Infectious ──▶ Recovered
//!                              └─────▶ Asymptomatic ─────────────────▶ Recovered
//! ```
//!
//! - **Infection.**  The location's force of infection is the sum of the
//!   per-stage infectivities of all residents, taken before any transition
//!   of this update.  An uninfected resident with susceptibility `s` becomes
//!   latent when `rand_factor < 1 - exp(-transmissibility * s * force)`.
//!   Vaccination scales `s` by `1 - vaccine_efficacy`.
//! - **Progression.**  A resident leaves a stage once it has spent at least
//!   that stage's dwell time in it (counted from `last_state_change`).  A
//!   latent resident turns asymptomatic when
//!   `rand_factor < asymptomatic_fraction`, otherwise incubating.
//! - `Recovered` is absorbing.
//!
//! Each resident moves at most one stage per update.

use epi_core::Tick;
use epi_population::{InfectionState, Person, Population};

use crate::{DiseaseError, DiseaseReaction, DiseaseResult};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Dwell time and infectivity of one infected stage.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageParams {
    /// Ticks a resident stays in the stage.
    pub dwell_time: u64,
    /// Contribution of one resident in this stage to the force of infection.
    pub infectivity: f64,
}

impl StageParams {
    pub const fn new(dwell_time: u64, infectivity: f64) -> Self {
        Self { dwell_time, infectivity }
    }
}

/// Parameters of [`DwellTimeReaction`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DwellTimeParams {
    pub transmissibility:      f64,
    pub latent:                StageParams,
    pub incubating:            StageParams,
    pub infectious:            StageParams,
    pub asymptomatic:          StageParams,
    /// Share of latent residents that progress to `Asymptomatic`.
    pub asymptomatic_fraction: f64,
    /// Relative reduction of susceptibility for vaccinated residents.
    pub vaccine_efficacy:      f64,
}

impl Default for DwellTimeParams {
    fn default() -> Self {
        Self {
            transmissibility:      0.2,
            latent:                StageParams::new(2, 0.0),
            incubating:            StageParams::new(2, 0.3),
            infectious:            StageParams::new(5, 1.0),
            asymptomatic:          StageParams::new(5, 0.5),
            asymptomatic_fraction: 0.3,
            vaccine_efficacy:      0.8,
        }
    }
}

impl DwellTimeParams {
    /// Check that every rate is finite and non-negative and every fraction
    /// lies in `[0, 1]`.
    pub fn validate(&self) -> DiseaseResult<()> {
        fn non_negative(name: &str, v: f64) -> DiseaseResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(DiseaseError::Config(format!("{name} must be finite and >= 0, got {v}")))
            }
        }
        fn fraction(name: &str, v: f64) -> DiseaseResult<()> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(DiseaseError::Config(format!("{name} must lie in [0, 1], got {v}")))
            }
        }

        non_negative("transmissibility", self.transmissibility)?;
        non_negative("latent infectivity", self.latent.infectivity)?;
        non_negative("incubating infectivity", self.incubating.infectivity)?;
        non_negative("infectious infectivity", self.infectious.infectivity)?;
        non_negative("asymptomatic infectivity", self.asymptomatic.infectivity)?;
        fraction("asymptomatic_fraction", self.asymptomatic_fraction)?;
        fraction("vaccine_efficacy", self.vaccine_efficacy)?;
        Ok(())
    }
}

// ── DwellTimeReaction ─────────────────────────────────────────────────────────

/// Stage progression driven by dwell times, infection driven by the
/// location-wide force of infection.
#[derive(Clone, Debug)]
pub struct DwellTimeReaction {
    params: DwellTimeParams,
}

impl DwellTimeReaction {
    pub fn new(params: DwellTimeParams) -> DiseaseResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &DwellTimeParams {
        &self.params
    }

    /// Contribution of one resident in `state` to the force of infection.
    pub fn infectivity(&self, state: InfectionState) -> f64 {
        match state {
            InfectionState::Latent       => self.params.latent.infectivity,
            InfectionState::Incubating   => self.params.incubating.infectivity,
            InfectionState::Infectious   => self.params.infectious.infectivity,
            InfectionState::Asymptomatic => self.params.asymptomatic.infectivity,
            InfectionState::Uninfected | InfectionState::Recovered => 0.0,
        }
    }

    /// Probability that an uninfected `person` is infected under `force`.
    pub fn infection_probability(&self, person: &Person, force: f64) -> f64 {
        let mut susceptibility = person.susceptibility.max(0.0);
        if person.vaccinated {
            susceptibility *= 1.0 - self.params.vaccine_efficacy;
        }
        1.0 - (-self.params.transmissibility * susceptibility * force).exp()
    }

    fn next_state(&self, person: &Person, force: f64, now: Tick, rand_factor: f64) -> Option<InfectionState> {
        let p = &self.params;
        let dwelt = |stage: &StageParams| person.time_in_state(now) >= stage.dwell_time;

        match person.infection_state {
            InfectionState::Uninfected => {
                (force > 0.0 && rand_factor < self.infection_probability(person, force))
                    .then_some(InfectionState::Latent)
            }
            InfectionState::Latent => dwelt(&p.latent).then(|| {
                if rand_factor < p.asymptomatic_fraction {
                    InfectionState::Asymptomatic
                } else {
                    InfectionState::Incubating
                }
            }),
            InfectionState::Incubating => {
                dwelt(&p.incubating).then_some(InfectionState::Infectious)
            }
            InfectionState::Infectious => {
                dwelt(&p.infectious).then_some(InfectionState::Recovered)
            }
            InfectionState::Asymptomatic => {
                dwelt(&p.asymptomatic).then_some(InfectionState::Recovered)
            }
            InfectionState::Recovered => None,
        }
    }
}

impl DiseaseReaction for DwellTimeReaction {
    fn reaction(&self, population: &mut Population, now: Tick, rand_factor: f64) {
        let force: f64 = population
            .iter()
            .map(|person| self.infectivity(person.infection_state))
            .sum();

        for person in population.iter_mut() {
            if let Some(state) = self.next_state(person, force, now, rand_factor) {
                person.set_state(state, now);
            }
        }
    }
}
