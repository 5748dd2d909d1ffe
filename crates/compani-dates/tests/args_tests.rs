//! JSON-valued entry points and the deprecated fixed-length operations.

use compani_dates::{CompaniDate, CompaniDuration, CompaniError, CompaniInterval};
use serde_json::{json, Value};

fn date(iso: &str) -> CompaniDate {
    CompaniDate::new(iso).expect("valid date")
}

fn wrong_date() -> CompaniError {
    CompaniError::InvalidDate("wrong arguments".to_string())
}

// ===========================================================================
// 1. CompaniDate::from_args
// ===========================================================================

#[test]
fn date_from_single_iso_string() {
    let d = CompaniDate::from_args(&[json!("2021-11-24T07:12:08.000Z")]).unwrap();
    assert_eq!(d.to_iso(), "2021-11-24T07:12:08.000Z");
}

#[test]
fn date_from_value_and_format() {
    let d = CompaniDate::from_args(&[json!("24/11/2021"), json!("%d/%m/%Y")]).unwrap();
    assert_eq!(d.to_iso(), "2021-11-23T23:00:00.000Z");
}

#[test]
fn date_rejects_wrong_shapes() {
    let cases = [
        vec![json!(null)],
        vec![json!("")],
        vec![json!(1637738000000_i64)],
        vec![json!({"date": "2021-11-24"})],
        vec![json!("2021-11-24"), json!(null)],
        vec![json!("2021-11-24"), json!("%Y-%m-%d"), json!("extra")],
    ];
    for args in cases {
        assert_eq!(
            CompaniDate::from_args(&args).unwrap_err(),
            wrong_date(),
            "args {args:?}"
        );
    }
}

#[test]
fn diff_value_requires_string_unit() {
    let d = date("2021-11-24T10:00:00.000Z");
    assert_eq!(
        d.diff_value("2021-11-22T10:00:00.000Z", &json!("days"))
            .unwrap()
            .to_iso(),
        "P2D"
    );
    assert_eq!(
        d.diff_value("2021-11-22T10:00:00.000Z", &json!(["days"])).unwrap_err(),
        CompaniError::InvalidArgument("expected unit to be a string".to_string())
    );
}

#[test]
fn diff_value_rejects_missing_and_numeric_unit() {
    let d = date("2021-11-24T10:00:00.000Z");
    for unit in [Value::Null, json!(1), json!({"unit": "days"})] {
        assert_eq!(
            d.diff_value("2021-11-22T10:00:00.000Z", &unit).unwrap_err(),
            CompaniError::InvalidArgument("expected unit to be a string".to_string()),
            "unit {unit:?}"
        );
    }
}

#[test]
fn add_value_requires_iso_string() {
    let d = date("2021-11-24T10:00:00.000Z");
    assert_eq!(
        d.add_value(&json!("PT1H")).unwrap().to_iso(),
        "2021-11-24T11:00:00.000Z"
    );
    assert_eq!(
        d.subtract_value(&json!("PT1H")).unwrap().to_iso(),
        "2021-11-24T09:00:00.000Z"
    );
    assert_eq!(
        d.add_value(&json!({"hours": 1})).unwrap_err(),
        CompaniError::InvalidArgument(
            "expected an ISO 8601 duration string, got object".to_string()
        )
    );
    assert_eq!(
        d.subtract_value(&json!(3600)).unwrap_err(),
        CompaniError::InvalidArgument(
            "expected an ISO 8601 duration string, got number".to_string()
        )
    );
}

// ===========================================================================
// 2. CompaniDuration::from_args
// ===========================================================================

#[test]
fn duration_from_args_shapes() {
    assert!(CompaniDuration::from_args(&[]).unwrap().is_zero());
    assert_eq!(
        CompaniDuration::from_args(&[json!("PT2H")]).unwrap().to_iso(),
        "PT2H"
    );
    assert_eq!(
        CompaniDuration::from_args(&[json!({"hours": 2, "minutes": 30})])
            .unwrap()
            .to_iso(),
        "PT2H30M"
    );
}

#[test]
fn duration_from_args_rejects_wrong_shapes() {
    let wrong = CompaniError::InvalidDuration("wrong arguments".to_string());
    for args in [
        vec![json!(null)],
        vec![json!(3600)],
        vec![json!({"hours": 1.5})],
        vec![json!({"hours": "2"})],
        vec![json!("PT1H"), json!("PT2H")],
    ] {
        assert_eq!(
            CompaniDuration::from_args(&args).unwrap_err(),
            wrong,
            "args {args:?}"
        );
    }
}

#[test]
fn duration_from_args_rejects_unknown_field() {
    assert_eq!(
        CompaniDuration::from_args(&[json!({"fortnights": 1})]).unwrap_err(),
        CompaniError::InvalidUnit("fortnights".to_string())
    );
}

// ===========================================================================
// 3. CompaniInterval::from_args
// ===========================================================================

#[test]
fn interval_from_args() {
    let i = CompaniInterval::from_args(&[
        json!("2022-02-11T09:00:00.000Z"),
        json!("2022-02-13T09:00:00.000Z"),
    ])
    .unwrap();
    assert_eq!(i.range_by("P1D", false).unwrap().len(), 3);

    let wrong = CompaniError::InvalidInterval("wrong arguments".to_string());
    assert_eq!(CompaniInterval::from_args(&[]).unwrap_err(), wrong);
    assert_eq!(
        CompaniInterval::from_args(&[json!("2022-02-11T09:00:00.000Z")]).unwrap_err(),
        wrong
    );
    assert_eq!(
        CompaniInterval::from_args(&[json!("2022-02-11T09:00:00.000Z"), json!(null)])
            .unwrap_err(),
        wrong
    );
}

// ===========================================================================
// 4. Deprecated fixed-length operations
// ===========================================================================

#[test]
#[allow(deprecated)]
fn old_diff_truncates_unless_float() {
    let d = date("2021-11-24T10:00:00.000Z");
    assert_eq!(
        d.old_diff("2021-11-22T22:00:00.000Z", "days", false).unwrap(),
        json!({"days": 1})
    );
    assert_eq!(
        d.old_diff("2021-11-22T22:00:00.000Z", "days", true).unwrap(),
        json!({"days": 1.5})
    );
    assert_eq!(
        date("2021-11-22T22:00:00.000Z")
            .old_diff(d, "day", false)
            .unwrap(),
        json!({"day": -1})
    );
}

#[test]
#[allow(deprecated)]
fn old_diff_ignores_dst() {
    // 23 real hours, which is less than one fixed 24-hour day.
    let d = date("2021-03-28T10:00:00.000+02:00");
    assert_eq!(
        d.old_diff("2021-03-27T10:00:00.000+01:00", "days", false).unwrap(),
        json!({"days": 0})
    );
}

#[test]
#[allow(deprecated)]
fn old_add_uses_fixed_lengths() {
    let d = date("2021-03-27T10:00:00.000Z");
    assert_eq!(
        d.old_add(&json!({"days": 1})).unwrap().to_iso(),
        "2021-03-28T10:00:00.000Z"
    );
    assert_eq!(
        date("2021-01-31T10:00:00.000Z")
            .old_add(&json!({"months": 1}))
            .unwrap()
            .to_iso(),
        "2021-03-02T10:00:00.000Z"
    );
    assert_eq!(
        d.old_subtract(&json!({"hours": 2, "minutes": 30}))
            .unwrap()
            .to_iso(),
        "2021-03-27T07:30:00.000Z"
    );
}

#[test]
#[allow(deprecated)]
fn old_add_rejects_non_objects_and_singular_keys() {
    let d = date("2021-03-27T10:00:00.000Z");
    assert_eq!(
        d.old_add(&json!(1)).unwrap_err(),
        CompaniError::InvalidArgument("expected to be an object, got number".to_string())
    );
    assert_eq!(
        d.old_subtract(&json!("PT1H")).unwrap_err(),
        CompaniError::InvalidArgument("expected to be an object, got string".to_string())
    );
    assert_eq!(
        d.old_add(&json!({"day": 1})).unwrap_err(),
        CompaniError::InvalidUnit("day".to_string())
    );
    assert!(matches!(
        d.old_add(&json!({"days": "1"})),
        Err(CompaniError::InvalidArgument(_))
    ));
}
