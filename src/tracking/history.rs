//! Call History Module
//!
//! Snapshot of an operation's call log and its human-readable replay.

use std::fmt;

use serde::Serialize;

// == Call ==
/// One logged call: serialized arguments and serialized result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub input: String,
    pub output: String,
}

// == Call History ==
/// The input and output logs of one operation, read independently.
#[derive(Debug, Clone, PartialEq)]
pub struct CallHistory {
    /// Operation name
    pub operation: String,
    /// Serialized argument tuples, in call order
    pub inputs: Vec<String>,
    /// Serialized results, in call order
    pub outputs: Vec<String>,
}

impl CallHistory {
    /// Number of recorded calls, counted from the input log.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// True when the two logs disagree in length.
    ///
    /// Happens when a call failed after its input was logged, or when the
    /// logs were edited outside this crate.
    pub fn is_diverged(&self) -> bool {
        self.inputs.len() != self.outputs.len()
    }

    /// Paired calls in order, stopping at the shorter log.
    pub fn calls(&self) -> impl Iterator<Item = Call> + '_ {
        self.inputs
            .iter()
            .zip(&self.outputs)
            .map(|(input, output)| Call {
                input: input.clone(),
                output: output.clone(),
            })
    }
}

impl fmt::Display for CallHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.len())?;
        for call in self.calls() {
            writeln!(f, "{}(*{}) -> {}", self.operation, call.input, call.output)?;
        }
        Ok(())
    }
}
