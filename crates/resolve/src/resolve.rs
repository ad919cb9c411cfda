//! Total resolvers: partial result in, resolved (or errored) result out.
//!
//! Service errors and panics both end up in the result's `error` field.
//! Nothing here returns `Err` or unwinds into the caller.

use crate::{CurrencyRates, Dictionary, ResolveError, Resolvers, Translator};
use contour_detect::{CurrencyResult, DictionaryResult, ModuleResult, TranslatorResult};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

async fn guarded<T>(fut: impl Future<Output = crate::Result<T>>) -> crate::Result<T> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(ResolveError::Panicked),
    }
}

pub async fn resolve_currency(
    service: &dyn CurrencyRates,
    partial: CurrencyResult,
) -> CurrencyResult {
    let Some(to) = partial.to.clone() else {
        return partial;
    };
    if !partial.needs_resolution() {
        return partial;
    }
    match guarded(service.rate(&partial.from, &to)).await {
        Ok(rate) => {
            debug!(from = %partial.from, to = %to, rate, "Resolved exchange rate");
            partial.with_rate(rate)
        }
        Err(e) => {
            warn!(from = %partial.from, to = %to, error = %e, "Exchange rate lookup failed");
            partial.with_error(format!("Rate unavailable: {e}"))
        }
    }
}

pub async fn resolve_translation(
    service: &dyn Translator,
    partial: TranslatorResult,
) -> TranslatorResult {
    let Some(target) = partial.target.clone() else {
        return partial;
    };
    if !partial.needs_resolution() {
        return partial;
    }
    match guarded(service.translate(&partial.text, partial.source.as_deref(), &target)).await {
        Ok(translated) => partial.with_translation(translated),
        Err(e) => {
            warn!(target = %target, error = %e, "Translation failed");
            partial.with_error(format!("Translation failed: {e}"))
        }
    }
}

pub async fn resolve_dictionary(
    service: &dyn Dictionary,
    partial: DictionaryResult,
) -> DictionaryResult {
    if !partial.needs_resolution() {
        return partial;
    }
    match guarded(service.define(&partial.word)).await {
        Ok(definition) => partial.with_definition(definition.phonetic, definition.meanings),
        Err(ResolveError::NotFound(_)) => {
            debug!(word = %partial.word, "No definition found");
            let message = format!("No definition found for \"{}\"", partial.word);
            partial.with_error(message)
        }
        Err(e) => {
            warn!(word = %partial.word, error = %e, "Dictionary lookup failed");
            partial.with_error(format!("Lookup failed: {e}"))
        }
    }
}

/// Dispatch to the resolver for the result's module. Results that need no
/// resolution come back unchanged.
pub async fn resolve(resolvers: &Resolvers, partial: ModuleResult) -> ModuleResult {
    match partial {
        ModuleResult::Currency(r) => {
            ModuleResult::Currency(resolve_currency(resolvers.currency.as_ref(), r).await)
        }
        ModuleResult::Translator(r) => {
            ModuleResult::Translator(resolve_translation(resolvers.translator.as_ref(), r).await)
        }
        ModuleResult::Dictionary(r) => {
            ModuleResult::Dictionary(resolve_dictionary(resolvers.dictionary.as_ref(), r).await)
        }
        other => other,
    }
}
