//! Injection of parsed values into a command instance

use super::slot::Slot;
use crate::command::CommandContext;
use crate::error::CoercionError;
use crate::value::{coerce, Value, ValueType};
use tracing::{trace, warn};

/// Slots of command type `C`, in declaration order.
///
/// `arguments` is aligned with the command's argument list; `options` pairs
/// each slot with the key of its option.
pub struct Bindings<C> {
    pub(crate) arguments: Vec<Slot<C>>,
    pub(crate) options: Vec<(String, Slot<C>)>,
}

impl<C> Default for Bindings<C> {
    fn default() -> Self {
        Self {
            arguments: Vec::new(),
            options: Vec::new(),
        }
    }
}

impl<C: 'static> Bindings<C> {
    /// Empty binding table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the next positional argument
    pub fn push_argument(&mut self, slot: Slot<C>) {
        self.arguments.push(slot);
    }

    /// Bind the option with this key
    pub fn push_option(&mut self, key: impl Into<String>, slot: Slot<C>) {
        self.options.push((key.into(), slot));
    }

    /// Number of bound arguments and options
    pub fn len(&self) -> usize {
        self.arguments.len() + self.options.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn coerce_logged(command: &str, name: &str, raw: &str, value_type: ValueType) -> Option<Value> {
    match coerce(raw, value_type) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(command, name, error = %e, "Exception converting an arg to desired type");
            None
        }
    }
}

fn log_rejected(command: &str, name: &str, errors: Vec<CoercionError>) {
    for e in errors {
        warn!(command, name, error = %e, "Value rejected by field");
    }
}

/// Write every parsed positional and option value into `target`.
///
/// - vararg slots always receive a sequence (possibly empty); elements that
///   fail to convert are skipped
/// - other argument slots are assigned only when a value was bound; a
///   conversion failure keeps the field's default
/// - value options are assigned when present
/// - flag options receive their presence
pub fn inject_all<C: 'static>(bindings: &Bindings<C>, ctx: &CommandContext<'_>, target: &mut C) {
    let command = ctx.command_name();
    let positionals = ctx.positionals();

    for (argument, slot) in ctx.descriptor().arguments().iter().zip(&bindings.arguments) {
        let name = argument.name();
        if argument.is_vararg() {
            let values: Vec<Value> = positionals
                .values(argument)
                .into_iter()
                .filter_map(|raw| coerce_logged(command, name, raw, argument.value_type()))
                .collect();
            trace!(command, name, count = values.len(), "Injecting vararg");
            log_rejected(command, name, slot.assign(target, values));
        } else if let Some(raw) = positionals.value(argument) {
            if let Some(value) = coerce_logged(command, name, raw, argument.value_type()) {
                log_rejected(command, name, slot.assign(target, vec![value]));
            }
        }
    }

    let tokenized = ctx.tokenized();
    for (key, slot) in &bindings.options {
        let Some(option) = ctx.descriptor().options().find(key) else {
            continue;
        };

        if !option.expects_value() {
            let present = tokenized.contains(key);
            log_rejected(command, key, slot.assign(target, vec![Value::Bool(present)]));
            continue;
        }

        let raws = tokenized.values(key);
        if raws.is_empty() {
            continue;
        }
        let values: Vec<Value> = raws
            .iter()
            .filter_map(|raw| coerce_logged(command, key, raw, option.value_type()))
            .collect();
        if !values.is_empty() || slot.shape().is_sequence() {
            log_rejected(command, key, slot.assign(target, values));
        }
    }
}
