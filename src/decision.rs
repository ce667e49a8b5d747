//! Reduce per-column match results to a routing decision.

/// How per-column results are joined into one record-level match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    /// Logical OR: any true column matches the record.
    #[default]
    Any,
    /// Logical AND: every evaluated column must be true.
    All,
}

/// What the user asked to do with matching records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Keep,
    Remove,
}

/// Where a record goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The kept / retained output.
    Primary,
    /// The excluded output, or nowhere if none is configured.
    Secondary,
}

/// Per-record match result: whether any column evaluated true, and
/// whether any evaluated false. Only presence matters, not counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    any_true: bool,
    any_false: bool,
}

impl Outcome {
    pub const TRUE: Outcome = Outcome {
        any_true: true,
        any_false: false,
    };
    pub const FALSE: Outcome = Outcome {
        any_true: false,
        any_false: true,
    };

    /// Outcome with nothing recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, result: bool) {
        if result {
            self.any_true = true;
        } else {
            self.any_false = true;
        }
    }

    #[inline]
    pub fn any_true(&self) -> bool {
        self.any_true
    }

    #[inline]
    pub fn any_false(&self) -> bool {
        self.any_false
    }

    /// Record-level match under `combine`. An empty outcome never matches.
    #[inline]
    pub fn matched(&self, combine: Combine) -> bool {
        match combine {
            Combine::Any => self.any_true,
            Combine::All => self.any_true && !self.any_false,
        }
    }
}

impl FromIterator<bool> for Outcome {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut outcome = Outcome::new();
        for result in iter {
            outcome.record(result);
        }
        outcome
    }
}

/// Route a record given whether it matched and the requested operation.
#[inline]
pub fn decide(matched: bool, operation: Operation) -> Action {
    match (matched, operation) {
        (true, Operation::Keep) | (false, Operation::Remove) => Action::Primary,
        _ => Action::Secondary,
    }
}
