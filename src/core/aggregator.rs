use crate::domain::model::{DomainAvailability, DomainCounters, ProbeOutcome};
use std::collections::HashMap;

/// Cumulative per-domain success counters.
///
/// Counters are never reset, so every report reflects all attempts since the
/// aggregator was created. Domains are reported in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct AvailabilityAggregator {
    counters: Vec<DomainCounters>,
    index: HashMap<String, usize>,
}

impl AvailabilityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self, outcome: &ProbeOutcome) {
        let slot = match self.index.get(&outcome.domain) {
            Some(&slot) => slot,
            None => {
                self.counters.push(DomainCounters::new(outcome.domain.clone()));
                let slot = self.counters.len() - 1;
                self.index.insert(outcome.domain.clone(), slot);
                slot
            }
        };

        let entry = &mut self.counters[slot];
        entry.total_attempts += 1;
        if outcome.succeeded {
            entry.successful_attempts += 1;
        }
    }

    pub fn report(&self) -> Vec<DomainAvailability> {
        self.counters
            .iter()
            .filter_map(|c| {
                c.percentage().map(|availability| DomainAvailability {
                    domain: c.domain.clone(),
                    successful_attempts: c.successful_attempts,
                    total_attempts: c.total_attempts,
                    availability,
                })
            })
            .collect()
    }

    pub fn counters(&self, domain: &str) -> Option<&DomainCounters> {
        self.index.get(domain).map(|&slot| &self.counters[slot])
    }

    pub fn domains_seen(&self) -> usize {
        self.counters.len()
    }

    pub fn total_attempts(&self) -> u64 {
        self.counters.iter().map(|c| c.total_attempts).sum()
    }
}
