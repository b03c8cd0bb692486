use rstest::rstest;
use serial_test::serial;
use std::env;
use std::time::Duration;
use usuario_config::constants::{
    USUARIO_EMAIL_CHANGE_STRATEGY, USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS,
};
use usuario_config::{ConfigError, EmailChangeStrategy, ModuleConfig};

fn clear_env() {
    env::remove_var(USUARIO_EMAIL_CHANGE_STRATEGY);
    env::remove_var(USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS);
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    clear_env();

    let config = ModuleConfig::from_env().unwrap();

    assert_eq!(config.email_change_strategy, EmailChangeStrategy::Default);
    assert_eq!(config.token_confirmation_lifespan, Duration::from_secs(86_400));
    assert_eq!(config, ModuleConfig::default());
}

#[test]
#[serial]
fn test_config_strategy_values() {
    let cases = [
        ("0", EmailChangeStrategy::Insecure),
        ("1", EmailChangeStrategy::Default),
        ("2", EmailChangeStrategy::Secure),
        ("insecure", EmailChangeStrategy::Insecure),
        ("Default", EmailChangeStrategy::Default),
        (" SECURE ", EmailChangeStrategy::Secure),
    ];

    for (value, expected) in cases {
        clear_env();
        env::set_var(USUARIO_EMAIL_CHANGE_STRATEGY, value);

        let config = ModuleConfig::from_env().unwrap();
        assert_eq!(config.email_change_strategy, expected, "value {:?}", value);
    }

    clear_env();
}

#[rstest]
#[case("")]
#[case("3")]
#[case("confirm")]
fn test_strategy_rejects_unknown_values(#[case] value: &str) {
    assert!(value.parse::<EmailChangeStrategy>().is_err());
}

#[test]
#[serial]
fn test_config_invalid_strategy() {
    clear_env();
    env::set_var(USUARIO_EMAIL_CHANGE_STRATEGY, "paranoid");

    let result = ModuleConfig::from_env();

    assert!(matches!(
        result.unwrap_err(),
        ConfigError::InvalidEmailChangeStrategy(value) if value == "paranoid"
    ));

    clear_env();
}

#[test]
#[serial]
fn test_config_custom_lifespan() {
    clear_env();
    env::set_var(USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS, "3600");

    let config = ModuleConfig::from_env().unwrap();
    assert_eq!(config.token_confirmation_lifespan, Duration::from_secs(3600));

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_lifespan() {
    clear_env();
    env::set_var(USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS, "one day");

    let result = ModuleConfig::from_env();
    assert!(matches!(result.unwrap_err(), ConfigError::InvalidLifespan(_)));

    env::set_var(USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS, "0");
    let result = ModuleConfig::from_env();
    assert!(matches!(result.unwrap_err(), ConfigError::ZeroLifespan));

    clear_env();
}

#[test]
fn test_strategy_display_roundtrips_through_from_str() {
    for strategy in [
        EmailChangeStrategy::Insecure,
        EmailChangeStrategy::Default,
        EmailChangeStrategy::Secure,
    ] {
        assert_eq!(strategy.to_string().parse::<EmailChangeStrategy>().unwrap(), strategy);
    }
}
