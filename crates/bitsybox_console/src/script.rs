use std::fmt;

use anyhow::Result;

use crate::host::Host;

/// The external game engine, seen from the console.
///
/// `boot` runs once after the console is reset and the game/font blobs are
/// in place; the engine registers its per-frame entry point there with
/// [`Host::set_loop`]. Ordinary errors from boot or the callbacks are script
/// errors: they are logged and the console keeps running. Only an error
/// carrying an [`EngineFault`] stops the console.
pub trait ScriptEngine {
    fn name(&self) -> &str;
    fn boot(&mut self, host: &mut Host) -> Result<()>;
}

/// The engine itself is broken (heap corruption, internal panic) and can't
/// run another frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFault {
    message: String,
}

impl EngineFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine fault: {}", self.message)
    }
}

impl std::error::Error for EngineFault {}

/// Whether `error` carries an [`EngineFault`] anywhere in its chain.
pub fn is_fatal(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| cause.is::<EngineFault>())
}

/// Log a script error from `stage` and carry on. Engine faults pass through.
pub fn recover(stage: &str, result: Result<()>) -> Result<()> {
    match result {
        Err(e) if !is_fatal(&e) => {
            log::error!("{} script error: {:#}", stage, e);
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn script_errors_are_absorbed() {
        assert!(recover("update", Err(anyhow!("TypeError: x is undefined"))).is_ok());
        assert!(recover("update", Ok(())).is_ok());
    }

    #[test]
    fn engine_faults_pass_through_context() {
        let fault: Result<()> = Err(EngineFault::new("out of memory").into());
        let wrapped = fault.context("update");
        let error = recover("update", wrapped).unwrap_err();
        assert!(is_fatal(&error));
        assert!(format!("{:#}", error).contains("engine fault: out of memory"));
    }
}
