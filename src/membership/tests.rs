use super::{Membership, Memberships, StatusModes};
use crate::mode::Mode;

#[test]
fn add_orders_by_rank() {
    let ranks = StatusModes::default();
    let mut m = Memberships::new();
    m.add(&ranks, Membership::OPERATOR);
    m.add(&ranks, Membership::VOICE);
    assert_eq!(m.format(true), "@+");
    assert_eq!(m.format(false), "@");

    let mut m = Memberships::new();
    m.add(&ranks, Membership::VOICE);
    m.add(&ranks, Membership::HALFOP);
    m.add(&ranks, Membership::FOUNDER);
    m.add(&ranks, Membership::OPERATOR);
    assert_eq!(m.format(true), "~@%+");
    assert_eq!(m.highest(), Some(Membership::FOUNDER));
}

#[test]
fn add_is_idempotent() {
    let ranks = StatusModes::default();
    let mut m = Memberships::new();
    m.add(&ranks, Membership::OPERATOR);
    m.add(&ranks, Membership::VOICE);
    m.add(&ranks, Membership::OPERATOR);
    m.add(&ranks, Membership::VOICE);
    assert_eq!(m.len(), 2);
    assert_eq!(&*m, [Membership::OPERATOR, Membership::VOICE]);
}

#[test]
fn remove() {
    let ranks = StatusModes::default();
    let mut m = Memberships::new();
    m.add(&ranks, Membership::OPERATOR);
    m.add(&ranks, Membership::VOICE);
    assert!(m.remove(Membership::OPERATOR));
    assert_eq!(m.format(false), "+");
    assert!(!m.remove(Membership::OPERATOR));
    assert!(m.remove(Membership::VOICE));
    assert!(m.is_empty());
    assert_eq!(m.format(false), "");
    assert_eq!(m.format(true), "");
}

#[test]
fn custom_order() {
    // Reversed ranks: whatever the server says goes.
    let ranks = StatusModes::parse("(vo)+@").unwrap();
    let mut m = Memberships::new();
    m.add(&ranks, Membership::OPERATOR);
    m.add(&ranks, Membership::VOICE);
    assert_eq!(m.format(true), "+@");
}

#[test]
fn parse_prefix() {
    let ranks = StatusModes::parse("(qaohv)~&@%+").unwrap();
    assert_eq!(ranks, StatusModes::default());
    assert_eq!(ranks.to_string(), "(qaohv)~&@%+");
    let ranks = StatusModes::parse("(ov)@+").unwrap();
    assert_eq!(ranks.len(), 2);
    assert_eq!(ranks.by_prefix('@'), Some(Membership::OPERATOR));
    assert_eq!(ranks.by_mode(Mode::new(b'v').unwrap()), Some(Membership::VOICE));
    assert_eq!(ranks.by_mode(Mode::new(b'q').unwrap()), None);
    assert_eq!(ranks.by_prefix('~'), None);
    assert!(StatusModes::parse("").unwrap().is_empty());
    assert_eq!(StatusModes::parse("").unwrap().to_string(), "");
}

#[test]
fn parse_prefix_invalid() {
    assert!(StatusModes::parse("ov@+").is_err());
    assert!(StatusModes::parse("(ov@+").is_err());
    assert!(StatusModes::parse("(ov)@").is_err());
    assert!(StatusModes::parse("(o1)@+").is_err());
}

#[test]
fn split_prefixes() {
    let ranks = StatusModes::default();
    let (m, nick) = ranks.split_prefixes("+@alice");
    assert_eq!(nick, "alice");
    assert_eq!(m.format(true), "@+");
    let (m, nick) = ranks.split_prefixes("bob");
    assert_eq!(nick, "bob");
    assert!(m.is_empty());
    let (m, nick) = ranks.split_prefixes("%carol!user@host");
    assert_eq!(nick, "carol!user@host");
    assert_eq!(m.highest(), Some(Membership::HALFOP));
}

#[cfg(feature = "serde")]
#[test]
fn status_modes_serde() {
    let json = serde_json::to_string(&StatusModes::parse("(ov)@+").unwrap()).unwrap();
    assert_eq!(json, r#"[{"mode":"o","prefix":"@"},{"mode":"v","prefix":"+"}]"#);
    let parsed: StatusModes = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.to_string(), "(ov)@+");
}
