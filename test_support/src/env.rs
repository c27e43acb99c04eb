//! Environment doubles for configuration path resolution.

use ledger_steps::config::CONFIG_ENV;
use mockable::MockEnv;
use std::env::VarError;

/// Mocked environment in which `LEDGER_STEPS_CONFIG` holds `value`.
///
/// `None` models an unset variable.
#[must_use]
pub fn mocked_config_env(value: Option<&str>) -> MockEnv {
    let owned = value.map(str::to_owned);
    let mut env = MockEnv::new();
    env.expect_raw()
        .withf(|key| key == CONFIG_ENV)
        .returning(move |_| owned.clone().ok_or(VarError::NotPresent));
    env
}
