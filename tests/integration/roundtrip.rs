//! Unsigned write-then-read round-trips.

use crate::helpers::*;
use keyed_cookies::{CookieJar, GetOptions, SetOptions};

/// A value written on one exchange reads back exactly on the next.
#[test]
fn test_set_then_get_round_trip() {
    let mut first = Exchange::new();
    let mut jar = CookieJar::new(&first.request, &mut first.response);
    jar.set("session", "abc123", &SetOptions::default()).unwrap();

    let mut second = first.replay();
    let mut jar = CookieJar::new(&second.request, &mut second.response);

    assert_eq!(
        jar.get("session", &GetOptions::default()).unwrap(),
        Some("abc123".to_string())
    );
}

/// Names containing regex metacharacters match only literally, even with
/// near-miss decoys in the same header.
#[test]
fn test_metacharacter_names_match_literally() {
    let mut exchange = Exchange::with_cookie_header("aXb=decoy; a.b=real; a$b=dollar");
    let mut jar = CookieJar::new(&exchange.request, &mut exchange.response);

    assert_eq!(
        jar.get("a.b", &GetOptions::default()).unwrap(),
        Some("real".to_string())
    );
    assert_eq!(
        jar.get("a$b", &GetOptions::default()).unwrap(),
        Some("dollar".to_string())
    );
}

/// A metacharacter name also survives a full write-then-read cycle.
#[test]
fn test_metacharacter_name_round_trip() {
    let mut first = Exchange::new();
    let mut jar = CookieJar::new(&first.request, &mut first.response);
    jar.set("a.b", "dot", &SetOptions::default()).unwrap();

    let mut second = first.replay();
    let mut jar = CookieJar::new(&second.request, &mut second.response);

    assert_eq!(
        jar.get("a.b", &GetOptions::default()).unwrap(),
        Some("dot".to_string())
    );
}

/// Several cookies written on one exchange all survive the replay.
#[test]
fn test_multiple_cookies_round_trip() {
    let mut first = Exchange::new();
    let mut jar = CookieJar::new(&first.request, &mut first.response);
    jar.set("one", "1", &SetOptions::default())
        .unwrap()
        .set("two", "2", &SetOptions::default())
        .unwrap();

    let mut second = first.replay();
    let mut jar = CookieJar::new(&second.request, &mut second.response);

    assert_eq!(
        jar.get("one", &GetOptions::default()).unwrap(),
        Some("1".to_string())
    );
    assert_eq!(
        jar.get("two", &GetOptions::default()).unwrap(),
        Some("2".to_string())
    );
}

/// Writing an empty value queues an epoch-expired deletion marker.
#[test]
fn test_deletion_renders_epoch_expiry() {
    let mut exchange = Exchange::new();
    let mut jar = CookieJar::new(&exchange.request, &mut exchange.response);
    jar.set("session", "", &SetOptions::default()).unwrap();

    assert_eq!(
        set_cookie_lines(&exchange.response),
        vec!["session=; path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT; httponly"]
    );
}
