use crate::environment::prelude::Value;

use super::prelude::{Host, HostError, HostFunction, Rng, SleepMode, RAND_MAX};

fn host() -> Host<Vec<u8>> {
    Host::new(vec![], SleepMode::Skip)
}

#[test]
fn test_lookup_by_name() {
    assert_eq!(HostFunction::from_name("putchar"), Some(HostFunction::Putchar));
    assert_eq!(HostFunction::from_name("isdigit"), Some(HostFunction::Isdigit));
    assert_eq!(HostFunction::from_name("printf"), None);

    let arities = HostFunction::ALL.iter()
        .map(|function| function.arity())
        .collect::<Vec<usize>>();

    assert_eq!(arities, vec![1, 1, 1, 0, 1, 1]);
}

#[test]
fn test_putchar_writes_low_byte() -> Result<(), HostError> {
    let mut host = host();

    assert_eq!(host.call(HostFunction::Putchar, &[Value(72)])?, Value(72));
    assert_eq!(host.call(HostFunction::Putchar, &[Value(256 + 105)])?, Value(361));

    assert_eq!(host.into_output(), b"Hi".to_vec());

    Ok(())
}

#[test]
fn test_rand_is_reproducible() -> Result<(), HostError> {
    let mut host = host();

    assert_eq!(host.call(HostFunction::Rand, &[])?, Value(16838));

    host.call(HostFunction::Srand, &[Value(1234)])?;
    let first = host.call(HostFunction::Rand, &[])?;
    let second = host.call(HostFunction::Rand, &[])?;

    assert_eq!(first, Value(3558));

    host.call(HostFunction::Srand, &[Value(1234)])?;

    assert_eq!(host.call(HostFunction::Rand, &[])?, first);
    assert_eq!(host.call(HostFunction::Rand, &[])?, second);

    Ok(())
}

#[test]
fn test_rand_range() {
    let mut rng = Rng::new(42);

    for _ in 0..1000 {
        let value = rng.rand();
        assert!((0..=RAND_MAX).contains(&value));
    }
}

#[test]
fn test_abs_and_isdigit() -> Result<(), HostError> {
    let mut host = host();

    assert_eq!(host.call(HostFunction::Abs, &[Value(-5)])?, Value(5));
    assert_eq!(host.call(HostFunction::Abs, &[Value(5)])?, Value(5));
    assert_eq!(host.call(HostFunction::Abs, &[Value(i32::MIN)])?, Value(i32::MIN));

    assert_eq!(host.call(HostFunction::Isdigit, &[Value('0' as i32)])?, Value(1));
    assert_eq!(host.call(HostFunction::Isdigit, &[Value('9' as i32)])?, Value(1));
    assert_eq!(host.call(HostFunction::Isdigit, &[Value('a' as i32)])?, Value(0));
    assert_eq!(host.call(HostFunction::Isdigit, &[Value('/' as i32)])?, Value(0));

    Ok(())
}

#[test]
fn test_skipped_sleep_returns_zero() -> Result<(), HostError> {
    let mut host = host();

    assert_eq!(host.call(HostFunction::Sleep, &[Value(1000)])?, Value(0));
    assert!(host.output().is_empty());

    Ok(())
}

#[test]
fn test_arity_is_checked() {
    let mut host = host();

    assert!(matches!(
        host.call(HostFunction::Putchar, &[]),
        Err(HostError::Arity { name: "putchar", expected: 1, got: 0 })
    ));
}
