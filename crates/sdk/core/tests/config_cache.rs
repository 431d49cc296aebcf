//! Process-wide configuration cache.
//!
//! Lives in its own test binary: it mutates the process environment and the
//! global cache, which no other test may observe.

use drops_sdk_core::{DropsConfig, SuiNetwork};

fn set(key: &str, value: &str) {
    // SAFETY: this binary has a single test, so no other thread reads the
    // environment concurrently.
    unsafe { std::env::set_var(key, value) };
}

#[test]
fn environment_is_resolved_once_per_process() {
    set("SUI_NETWORK", "testnet");
    set("SUI_RPC_URL", "https://fullnode.testnet.sui.io:443");
    set("DROPS_PACKAGE_NAME", "drops");
    set("COLLECTION_MODULE_NAME", "collection");
    set("DROP_MODULE_NAME", "drop");
    set("COLLECTIONS_REGISTRY_ID", &format!("0x{}", "c1".repeat(32)));
    set("ADDRESS_DROPS_REGISTRY_ID", &format!("0x{}", "a7".repeat(32)));
    set("USER_PRIVATE_KEY", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");

    // A failed validation is not cached.
    unsafe { std::env::remove_var("DROPS_PACKAGE_ID") };
    let err = DropsConfig::init_from_env().unwrap_err();
    assert!(err.mentions("DROPS_PACKAGE_ID"));

    set("DROPS_PACKAGE_ID", &format!("0x{}", "d1".repeat(32)));
    let first = DropsConfig::init_from_env().unwrap();
    assert_eq!(first.network, SuiNetwork::Testnet);

    // Later changes to the environment are not picked up.
    set("SUI_NETWORK", "mainnet");
    let second = DropsConfig::init_from_env().unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(second.network, SuiNetwork::Testnet);
    assert_eq!(DropsConfig::from_env().unwrap().network, SuiNetwork::Mainnet);
}
