//! Synthetic ticket history with a seasonal demand bump.
//!
//! Tickets are spread over the two years before `now`. Each base timestamp
//! may be pulled forward by 10, 20 or 30 days (weights 50/30/20); the pull is
//! kept only when it lands inside a configured high-demand month and not
//! after `now`. Events therefore pile up in the high-demand months, drawn
//! from the weeks just before them, which is the seasonal signal the
//! forecaster is expected to pick up.

use chrono::{Datelike, Duration, NaiveDateTime};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::{Category, NewTicket, Priority};
use crate::store::{StoreError, TicketStore};

/// Length of the generated history window, in days.
pub const WINDOW_DAYS: i64 = 730;

/// Size of one seasonal pull step, in days.
pub const SHIFT_STEP_DAYS: i64 = 10;

/// Pull multipliers and their relative weights.
const SHIFT_MULTIPLIERS: [i64; 3] = [1, 2, 3];
const SHIFT_WEIGHTS: [u32; 3] = [50, 30, 20];

const REQUESTERS: [&str; 20] = [
    "Carlos Silva",
    "Maria Oliveira",
    "Pedro Santos",
    "Ana Costa",
    "Juliana Pereira",
    "Roberto Alves",
    "Lucas Martins",
    "Fernanda Rocha",
    "Marcos Souza",
    "Raquel Lima",
    "José Silva",
    "Patricia Pereira",
    "João Souza",
    "Vera Costa",
    "Gustavo Ferreira",
    "Tatiane Martins",
    "Fabio Oliveira",
    "Cláudia Rocha",
    "Leandro Santos",
    "Simone Lima",
];

const DESCRIPTIONS: [&str; 20] = [
    "Internet connection problem",
    "Error opening the sales program",
    "Computer is slow",
    "Cannot reach the internal network",
    "System update never finishes",
    "Keyboard not responding",
    "Network is down across the company",
    "CRM software is sluggish",
    "Monitor flickering",
    "Wi-Fi unstable",
    "Time clock system failing",
    "Printer not printing",
    "Intermittent remote access problem",
    "Billing system offline",
    "Mouse not working properly",
    "Software update failed",
    "Server not responding",
    "VPN connection is very slow",
    "Error opening the management app",
    "Server hard disk failure",
];

/// Errors raised while generating or seeding history.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settings for the synthetic history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of tickets to generate.
    pub count: usize,
    /// Calendar months (1-12) that receive extra demand.
    pub high_demand_months: Vec<u32>,
    /// Seed for reproducible output (None draws from entropy).
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 100,
            high_demand_months: vec![1, 6, 11],
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    pub fn with_high_demand_months(mut self, months: Vec<u32>) -> Self {
        self.high_demand_months = months;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        if let Some(bad) = self
            .high_demand_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(GeneratorError::InvalidConfig(format!(
                "high-demand month {bad} is outside 1..=12"
            )));
        }
        Ok(())
    }
}

/// Produces synthetic tickets.
#[derive(Debug, Clone)]
pub struct SeasonalGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    shift: WeightedIndex<u32>,
}

impl SeasonalGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let shift = WeightedIndex::new(SHIFT_WEIGHTS)
            .map_err(|e| GeneratorError::InvalidConfig(e.to_string()))?;

        Ok(Self { config, rng, shift })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn is_high_demand(&self, ts: &NaiveDateTime) -> bool {
        self.config.high_demand_months.contains(&ts.month())
    }

    /// Opened-at timestamp for one synthetic ticket.
    pub fn opened_at(&mut self, now: NaiveDateTime) -> NaiveDateTime {
        let start = now - Duration::days(WINDOW_DAYS);
        let base = start + Duration::days(self.rng.gen_range(0..=WINDOW_DAYS));

        let k = SHIFT_MULTIPLIERS[self.shift.sample(&mut self.rng)];
        let pulled = base + Duration::days(k * SHIFT_STEP_DAYS);

        if pulled <= now && self.is_high_demand(&pulled) {
            pulled
        } else {
            base
        }
    }

    fn pick<T: Copy>(&mut self, pool: &[T]) -> T {
        pool[self.rng.gen_range(0..pool.len())]
    }

    /// One synthetic ticket.
    pub fn ticket(&mut self, now: NaiveDateTime) -> NewTicket {
        NewTicket {
            requester: self.pick(&REQUESTERS).to_string(),
            category: self.pick(&Category::ALL),
            priority: self.pick(&Priority::ALL),
            description: self.pick(&DESCRIPTIONS).to_string(),
            opened_at: self.opened_at(now),
        }
    }

    /// `config.count` synthetic tickets.
    pub fn generate(&mut self, now: NaiveDateTime) -> Vec<NewTicket> {
        (0..self.config.count).map(|_| self.ticket(now)).collect()
    }
}

/// Clear the store and fill it with generated history.
///
/// Returns the number of tickets inserted.
pub fn initialize(
    store: &dyn TicketStore,
    config: &GeneratorConfig,
    now: NaiveDateTime,
) -> Result<usize, GeneratorError> {
    let mut generator = SeasonalGenerator::new(config.clone())?;

    store.reset()?;
    let tickets = generator.generate(now);
    let inserted = tickets.len();
    for ticket in tickets {
        store.append(ticket)?;
    }

    info!(
        inserted,
        high_demand_months = ?config.high_demand_months,
        "Seeded ticket history"
    );
    Ok(inserted)
}
