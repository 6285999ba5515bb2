//! Startup defaults read from the environment.
//!
//! - [`init_acceleration`] — `LZ4BLK_ACCELERATION`, default [`ACCELERATION_DEFAULT`]
//! - [`init_nb_workers`] — `LZ4BLK_NBWORKERS`, default [`NB_WORKERS_DEFAULT`] (0 = auto)
//!
//! Command-line flags take precedence over both.

use crate::cli::arg_utils::read_size_prefix;
use crate::config::{ACCELERATION_DEFAULT, ENV_ACCELERATION, ENV_NBWORKERS, NB_WORKERS_DEFAULT};
use crate::displaylevel;

/// Read the default acceleration from `LZ4BLK_ACCELERATION`.
pub fn init_acceleration() -> i32 {
    init_acceleration_from(std::env::var(ENV_ACCELERATION).ok().as_deref())
}

/// Testable core of [`init_acceleration`]: `None` means the variable is unset.
pub fn init_acceleration_from(env_val: Option<&str>) -> i32 {
    if let Some(env) = env_val {
        if let Some((val, "")) = read_size_prefix(env) {
            if let Ok(val) = i32::try_from(val) {
                return val;
            }
        }
        displaylevel!(
            2,
            "Ignore environment variable setting {}={}: not a valid unsigned value \n",
            ENV_ACCELERATION,
            env
        );
    }
    ACCELERATION_DEFAULT
}

/// Read the benchmark worker count from `LZ4BLK_NBWORKERS`.
pub fn init_nb_workers() -> usize {
    init_nb_workers_from(std::env::var(ENV_NBWORKERS).ok().as_deref())
}

/// Testable core of [`init_nb_workers`]: `None` means the variable is unset.
pub fn init_nb_workers_from(env_val: Option<&str>) -> usize {
    if let Some(env) = env_val {
        if let Some((val, "")) = read_size_prefix(env) {
            return val;
        }
        displaylevel!(
            2,
            "Ignore environment variable setting {}={}: not a valid unsigned value \n",
            ENV_NBWORKERS,
            env
        );
    }
    NB_WORKERS_DEFAULT
}
