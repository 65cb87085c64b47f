use mcp_setup::secrets::{EnvSecretProvider, NoSecrets, SecretChain, SecretProvider};
use serial_test::serial;
use std::cell::Cell;
use std::rc::Rc;

/// Answers with a fixed value and counts how often it was asked.
struct Counting {
    value: Option<&'static str>,
    calls: Rc<Cell<usize>>,
}

impl SecretProvider for Counting {
    fn lookup(&self, _name: &str) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        self.value.map(String::from)
    }
}

#[test]
fn test_chain_stops_at_first_hit() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let chain = SecretChain::new()
        .with(Counting { value: Some("from-first"), calls: Rc::clone(&first) })
        .with(Counting { value: Some("from-second"), calls: Rc::clone(&second) });

    assert_eq!(chain.lookup("TOKEN"), Some("from-first".to_string()));
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
}

#[test]
fn test_chain_falls_through_misses() {
    let calls = Rc::new(Cell::new(0));
    let chain = SecretChain::new()
        .with(NoSecrets)
        .with(Counting { value: Some("fallback"), calls: Rc::clone(&calls) });

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.lookup("TOKEN"), Some("fallback".to_string()));
}

#[test]
fn test_empty_chain_finds_nothing() {
    let chain = SecretChain::new();
    assert!(chain.is_empty());
    assert_eq!(chain.lookup("TOKEN"), None);
}

#[test]
#[serial]
fn test_env_provider_reads_trimmed_value() {
    std::env::set_var("MCP_SETUP_TEST_SECRET", "  ghp_env\n");
    assert_eq!(EnvSecretProvider.lookup("MCP_SETUP_TEST_SECRET"), Some("ghp_env".to_string()));

    std::env::set_var("MCP_SETUP_TEST_SECRET", "   ");
    assert_eq!(EnvSecretProvider.lookup("MCP_SETUP_TEST_SECRET"), None);

    std::env::remove_var("MCP_SETUP_TEST_SECRET");
    assert_eq!(EnvSecretProvider.lookup("MCP_SETUP_TEST_SECRET"), None);
}
