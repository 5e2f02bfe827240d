/// Initialises `env_logger`. `RUST_LOG` wins when set; otherwise `--verbose`
/// enables debug output for this crate and everything else stays at warn.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "warn,ccv=debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder
        .format_timestamp(None)
        .format_target(false);
    if let Err(e) = builder.try_init() {
        log::debug!("logger already initialised: {e}");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
