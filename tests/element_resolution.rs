//! Resolution-engine behavior: memoization, retries and deadlines.

mod common;

use std::time::{Duration, Instant};

use selenite::common::command::RequestMethod;
use selenite::prelude::*;
use selenite::{ElementPolicy, WebDriverError};

use common::*;

fn quick_policy(retry_ms: u64, poll_ms: u64) -> ElementPolicy {
    ElementPolicy::new(
        Duration::from_millis(retry_ms),
        Duration::from_millis(poll_ms),
    )
}

#[test]
fn resolve_is_idempotent_once_a_handle_is_memoized() {
    let fake = FakeDriverSync::new().push(200, &element_body("e1"));
    let (session, log) = session_with(fake);

    let elem = session.element(By::Css("#q".to_string()));
    let first = elem.resolve().unwrap();
    let second = elem.resolve().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.as_str(), "e1");
    assert_eq!(log.len(), 1, "second resolve must not hit the network");
}

#[test]
fn resolve_retries_through_transient_not_found() {
    let fake = FakeDriverSync::new()
        .push(404, &no_such_element_body())
        .push(404, &no_such_element_body())
        .push(404, &no_such_element_body())
        .push(200, &element_body("e1"));
    let (session, log) = session_with(fake);

    let elem = session
        .element(By::Css("#q".to_string()))
        .with_policy(quick_policy(1_000, 10));

    let start = Instant::now();
    let id = elem.resolve().unwrap();
    let elapsed = start.elapsed();

    assert_eq!(id.as_str(), "e1");
    assert_eq!(log.count(RequestMethod::Post, "/element"), 4);
    assert!(
        elapsed >= Duration::from_millis(30),
        "three failed polls must take at least three intervals, took {:?}",
        elapsed
    );
    assert!(elapsed < Duration::from_secs(1));
}

#[test]
fn resolve_fails_with_not_found_at_the_deadline() {
    let fake = FakeDriverSync::new().fallback(404, &no_such_element_body());
    let (session, _log) = session_with(fake);

    let elem = session
        .element(By::Css("#missing".to_string()))
        .with_policy(quick_policy(100, 10));

    let start = Instant::now();
    let err = elem.resolve().unwrap_err();
    let elapsed = start.elapsed();

    match err {
        WebDriverError::ElementNotFound {
            selector,
            strategy,
            elapsed: reported,
        } => {
            assert_eq!(selector, "#missing");
            assert_eq!(strategy, "css selector");
            assert!(reported >= Duration::from_millis(100));
        }
        other => panic!("expected ElementNotFound, got {:?}", other),
    }
    assert!(elapsed >= Duration::from_millis(100));
    assert!(
        elapsed < Duration::from_millis(250),
        "deadline overshot by more than an interval: {:?}",
        elapsed
    );
}

#[test]
fn transport_faults_are_not_retried_as_not_found() {
    let fake = FakeDriverSync::new().fallback(500, "this is not json");
    let (session, log) = session_with(fake);

    let elem = session
        .element(By::Css("#q".to_string()))
        .with_policy(quick_policy(1_000, 10));

    let err = elem.resolve().unwrap_err();
    assert!(matches!(err, WebDriverError::Json(_)));
    assert_eq!(
        log.count(RequestMethod::Post, "/element"),
        1,
        "a decode failure must fail immediately, not poll until the deadline"
    );
}

#[test]
fn eager_find_element_is_one_shot() {
    let fake = FakeDriverSync::new().push(200, &element_body("e7"));
    let (session, log) = session_with(fake);

    let elem = session.find_element(By::Css("#q".to_string())).unwrap();
    assert_eq!(elem.element_id().unwrap().as_str(), "e7");
    assert_eq!(log.len(), 1);

    // The handle came from the find; operations reuse it.
    let fake_displayed = elem.resolve().unwrap();
    assert_eq!(fake_displayed.as_str(), "e7");
    assert_eq!(log.len(), 1);
}

#[test]
fn find_elements_decodes_each_reference() {
    let body = format!(
        r#"{{"value":[{{"{}":"e1"}},{{"ELEMENT":"e2"}}]}}"#,
        W3C_KEY
    );
    let fake = FakeDriverSync::new().push(200, &body);
    let (session, log) = session_with(fake);

    let elems = session.find_elements(By::Tag("li".to_string())).unwrap();
    let ids: Vec<&str> = elems
        .iter()
        .map(|e| e.element_id().unwrap().as_str())
        .collect();
    assert_eq!(ids, vec!["e1", "e2"]);
    assert_eq!(log.count(RequestMethod::Post, "/elements"), 1);
}

#[test]
fn legacy_element_key_resolves_too() {
    let fake = FakeDriverSync::new().push(200, r#"{"value":{"ELEMENT":"legacy9"}}"#);
    let (session, _log) = session_with(fake);

    let elem = session.element(By::XPath("//input".to_string()));
    assert_eq!(elem.resolve().unwrap().as_str(), "legacy9");
}
