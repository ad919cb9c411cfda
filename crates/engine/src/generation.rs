//! Staleness tracking for async resolutions.
//!
//! Each resolver channel owns a counter. Starting a resolution bumps it and
//! captures the value in a [`Ticket`]; the result is applied only if the
//! counter has not moved since and the module still matches the channel.

use crate::ContourState;
use contour_detect::{ModuleId, ModuleResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Currency,
    Translator,
    Dictionary,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Currency, Channel::Translator, Channel::Dictionary];

    pub fn for_module(id: ModuleId) -> Option<Channel> {
        match id {
            ModuleId::Currency => Some(Channel::Currency),
            ModuleId::Translator => Some(Channel::Translator),
            ModuleId::Dictionary => Some(Channel::Dictionary),
            _ => None,
        }
    }

    pub fn module(self) -> ModuleId {
        match self {
            Channel::Currency => ModuleId::Currency,
            Channel::Translator => ModuleId::Translator,
            Channel::Dictionary => ModuleId::Dictionary,
        }
    }
}

/// Captured channel generation of an in-flight resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub channel: Channel,
    pub generation: u64,
}

#[derive(Debug, Default, Clone)]
pub struct Generations {
    currency: u64,
    translator: u64,
    dictionary: u64,
}

impl Generations {
    fn counter_mut(&mut self, channel: Channel) -> &mut u64 {
        match channel {
            Channel::Currency => &mut self.currency,
            Channel::Translator => &mut self.translator,
            Channel::Dictionary => &mut self.dictionary,
        }
    }

    pub fn current(&self, channel: Channel) -> u64 {
        match channel {
            Channel::Currency => self.currency,
            Channel::Translator => self.translator,
            Channel::Dictionary => self.dictionary,
        }
    }

    /// Bump the channel and capture the new value.
    pub fn begin(&mut self, channel: Channel) -> Ticket {
        let counter = self.counter_mut(channel);
        *counter += 1;
        Ticket {
            channel,
            generation: *counter,
        }
    }

    /// Supersede whatever is in flight on `channel`.
    pub fn invalidate(&mut self, channel: Channel) {
        *self.counter_mut(channel) += 1;
    }

    pub fn invalidate_all(&mut self) {
        for channel in Channel::ALL {
            self.invalidate(channel);
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.current(ticket.channel) == ticket.generation
    }
}

/// Continuation of a settled resolution.
///
/// Returns the next state when the result is still wanted, `None` when it
/// must be discarded.
pub fn apply_resolution(
    state: &ContourState,
    generations: &Generations,
    ticket: Ticket,
    resolved: ModuleResult,
) -> Option<ContourState> {
    if !generations.is_current(&ticket) {
        return None;
    }
    let module = state.module.as_ref()?;
    if module.id != ticket.channel.module() || resolved.id() != module.id {
        return None;
    }

    let mut next = state.clone();
    if let Some(module) = next.module.as_mut() {
        module.result = Some(resolved);
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModuleData;
    use contour_detect::currency;

    fn loading(text: &str) -> (ContourState, ModuleResult) {
        let partial = ModuleResult::Currency(currency::detect(text).unwrap());
        let state = ContourState::with_module(ModuleData::detected(partial.clone()));
        let resolved = match partial {
            ModuleResult::Currency(r) => ModuleResult::Currency(r.with_rate(0.9)),
            other => other,
        };
        (state, resolved)
    }

    #[test]
    fn test_current_ticket_applies() {
        let mut generations = Generations::default();
        let ticket = generations.begin(Channel::Currency);
        let (state, resolved) = loading("50 usd to eur");

        let next = apply_resolution(&state, &generations, ticket, resolved).unwrap();
        assert!(!next.result().unwrap().is_partial());
    }

    #[test]
    fn test_superseded_ticket_is_discarded() {
        let mut generations = Generations::default();
        let first = generations.begin(Channel::Currency);
        let _second = generations.begin(Channel::Currency);
        let (state, resolved) = loading("50 usd to eur");

        assert!(apply_resolution(&state, &generations, first, resolved).is_none());
    }

    #[test]
    fn test_invalidate_supersedes_without_new_ticket() {
        let mut generations = Generations::default();
        let ticket = generations.begin(Channel::Currency);
        generations.invalidate_all();
        let (state, resolved) = loading("50 usd to eur");

        assert!(apply_resolution(&state, &generations, ticket, resolved).is_none());
    }

    #[test]
    fn test_module_mismatch_is_discarded() {
        let mut generations = Generations::default();
        let ticket = generations.begin(Channel::Translator);
        let (state, resolved) = loading("50 usd to eur");

        assert!(apply_resolution(&state, &generations, ticket, resolved.clone()).is_none());
        let hidden = ContourState::hidden();
        assert!(apply_resolution(&hidden, &generations, ticket, resolved).is_none());
    }

    #[test]
    fn test_channels_are_independent() {
        let mut generations = Generations::default();
        let currency = generations.begin(Channel::Currency);
        let _dictionary = generations.begin(Channel::Dictionary);
        assert!(generations.is_current(&currency));
    }
}
