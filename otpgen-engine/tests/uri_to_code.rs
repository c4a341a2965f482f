use std::thread;

use otpgen_core::{Algorithm, OtpDescriptor, ParseError};
use otpgen_engine::{Error, TotpEngine};
use pretty_assertions::assert_eq;

const EXAMPLE_URI: &str =
    "otpauth://totp/Example:alice@google.com?secret=JBSWY3DPEHPK3PXP&issuer=Example";

fn engine(uri: &str) -> TotpEngine {
    let descriptor: OtpDescriptor = uri.parse().unwrap();
    TotpEngine::try_from(descriptor).unwrap()
}

#[test]
fn example_account() {
    let engine = engine(EXAMPLE_URI);

    assert_eq!("996554", engine.current_code(59).unwrap().as_str());
    assert!(engine.verify("996554", 59).unwrap());
    assert!(!engine.verify("000000", 59).unwrap());
}

#[test]
fn parameters_reach_the_engine() {
    let engine = engine(
        "otpauth://totp/ACME:john?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZA&algorithm=SHA256&digits=8&period=30",
    );

    assert_eq!(8, engine.config().digits());
    assert_eq!(Algorithm::Sha256, engine.config().algorithm());
    assert_eq!("46119246", engine.current_code(59).unwrap().as_str());
}

#[test]
fn period_changes_counter() {
    let engine = engine("otpauth://totp/a?secret=JBSWY3DPEHPK3PXP&period=60");

    assert_eq!(0, engine.counter(59).unwrap());
    assert_eq!(1, engine.counter(60).unwrap());
    assert_eq!(1, engine.seconds_remaining(59).unwrap());
}

#[test]
fn hotp_uri_rejected() {
    let result = "otpauth://hotp/a?secret=JBSWY3DPEHPK3PXP&counter=0".parse::<OtpDescriptor>();
    assert!(matches!(result, Err(ParseError::UnsupportedOtpType(t)) if t == "hotp"));
}

#[test]
fn missing_secret_rejected() {
    let result = "otpauth://totp/a?issuer=Example".parse::<OtpDescriptor>();
    assert!(matches!(result, Err(ParseError::InvalidUri(_))));
}

#[test]
fn padding_only_secret_rejected_by_engine() {
    let descriptor: OtpDescriptor = "otpauth://totp/a?secret=%3D%3D%3D%3D".parse().unwrap();
    assert!(descriptor.secret.is_empty());
    assert!(matches!(
        TotpEngine::try_from(descriptor),
        Err(Error::EmptySecret)
    ));
}

#[test]
fn shared_between_threads() {
    let engine = engine(EXAMPLE_URI);
    let expected = engine.current_code(1_700_000_000).unwrap();

    thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(|| engine.current_code(1_700_000_000).unwrap()))
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(expected, handle.join().unwrap());
        }
    });
}
