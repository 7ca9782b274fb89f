use super::{Mode, ModeSet, ModeType, ModeTypes};
use crate::error::ModeError;

static MODE_RL: Mode = unsafe { Mode::new_unchecked(b'r') };
static MODE_RU: Mode = unsafe { Mode::new_unchecked(b'R') };
static MODE_SL: Mode = unsafe { Mode::new_unchecked(b's') };

fn mode(letter: u8) -> Mode {
    Mode::new(letter).unwrap()
}

#[test]
fn mode_basic() {
    assert_eq!(MODE_RL.into_char(), 'r');
    assert_eq!(MODE_RU.into_char(), 'R');
    // For modes, r < R < s.
    assert!(MODE_RL < MODE_RU);
    assert!(MODE_RL < MODE_SL);
    assert!(MODE_RU < MODE_SL);
    assert_eq!(Mode::new(b'+'), None);
    assert_eq!(Mode::new(b'0'), None);
    assert_eq!(Mode::from_char('é'), None);
    assert_eq!(Mode::from_char('Z'), Some(mode(b'Z')));
    assert!(Mode::try_from('~').is_err());
}

#[test]
fn mode_index_roundtrip() {
    for letter in (b'a'..=b'z').chain(b'A'..=b'Z') {
        let m = mode(letter);
        assert_eq!(Mode::from_index(m.index()), m);
    }
}

#[test]
fn modeset_basic() {
    let mut set = ModeSet::new();
    assert_eq!(set.len(), 0);
    assert!(set.set(MODE_RL));
    assert!(set.contains(MODE_RL));
    assert_eq!(set.len(), 1);
    assert!(set.set(MODE_RU));
    assert_eq!(set.len(), 2);
    assert!(!set.set(MODE_RU));
    assert_eq!(set.len(), 2);
    assert!(set.unset(MODE_RL));
    assert!(!set.contains(MODE_RL));
    assert!(set.contains(MODE_RU));
    assert!(!set.unset(MODE_RL));
    assert_eq!(set.len(), 1);
}

#[test]
fn modeset_iter() {
    let set = ModeSet::new().with(MODE_SL).with(MODE_RU).with(MODE_RL);
    let mut iter = set.into_iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next(), Some(MODE_RL));
    assert_eq!(iter.next_back(), Some(MODE_SL));
    assert_eq!(iter.next(), Some(MODE_RU));
    assert_eq!(iter.next(), None);
    assert_eq!(set.to_string(), "rRs");
}

#[test]
fn modeset_apply() {
    let mut set = ModeSet::new();
    set.apply("+iwx").unwrap();
    assert_eq!(set, ModeSet::from_letters("iwx"));
    set.apply("-x+Z").unwrap();
    assert_eq!(set.to_string(), "iwZ");
    set.apply("+-+").unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.apply("i"), Err(ModeError::MissingSign { modes: "i".to_owned() }));
    assert_eq!(set.len(), 3);
}

#[test]
fn modetypes_standard() {
    let types = ModeTypes::default();
    assert_eq!(types.get(mode(b'b')), Some(ModeType::A));
    assert_eq!(types.get(mode(b'e')), Some(ModeType::A));
    assert_eq!(types.get(mode(b'I')), Some(ModeType::A));
    assert_eq!(types.get(mode(b'k')), Some(ModeType::B));
    assert_eq!(types.get(mode(b'l')), Some(ModeType::C));
    for letter in *b"imnst" {
        assert_eq!(types.get(mode(letter)), Some(ModeType::D));
    }
    assert_eq!(types.get(mode(b'o')), None);
    assert_eq!(types.get(mode(b'E')), None);
    assert_eq!(types.to_string(), "beI,k,l,imnst");
}

#[test]
fn modetypes_parse() {
    let (types, extra) = ModeTypes::parse("eIbq,k,flj,CFLMPQScgimnprstz,XY");
    assert_eq!(types.get(mode(b'q')), Some(ModeType::A));
    assert_eq!(types.get(mode(b'j')), Some(ModeType::C));
    assert_eq!(types.get(mode(b'z')), Some(ModeType::D));
    assert_eq!(types.get(mode(b'X')), None);
    assert_eq!(extra, ModeSet::from_letters("XY"));

    let (types, extra) = ModeTypes::parse("b,k");
    assert_eq!(types.get(mode(b'b')), Some(ModeType::A));
    assert_eq!(types.of_type(ModeType::C), ModeSet::new());
    assert!(extra.is_empty());

    let (types, _) = ModeTypes::parse("");
    assert!(types.all().is_empty());
}

#[test]
fn modetypes_insert() {
    let mut types = ModeTypes::default();
    assert_eq!(types.insert(mode(b'k'), ModeType::C), Some(ModeType::B));
    assert_eq!(types.get(mode(b'k')), Some(ModeType::C));
    assert!(!types.of_type(ModeType::B).contains(mode(b'k')));
    assert_eq!(types.insert(mode(b'f'), ModeType::A), None);
    assert_eq!(types.remove(mode(b'f')), Some(ModeType::A));
    assert_eq!(types.get(mode(b'f')), None);
}

#[test]
fn takes_arg() {
    assert!(ModeType::A.takes_arg(true) && ModeType::A.takes_arg(false));
    assert!(ModeType::B.takes_arg(true) && ModeType::B.takes_arg(false));
    assert!(ModeType::C.takes_arg(true) && !ModeType::C.takes_arg(false));
    assert!(!ModeType::D.takes_arg(true) && !ModeType::D.takes_arg(false));
}

#[cfg(feature = "serde")]
#[test]
fn modetypes_serde() {
    let json = serde_json::to_string(&ModeTypes::default()).unwrap();
    assert_eq!(json, r#"{"a":"beI","b":"k","c":"l","d":"imnst"}"#);
    let parsed: ModeTypes = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ModeTypes::default());
    assert!(serde_json::from_str::<ModeSet>(r#""ab+""#).is_err());
}
