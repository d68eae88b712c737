//! End-to-end behavior of the fluent validator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use formcheck::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn form(data: serde_json::Value) -> Validator<serde_json::Value> {
    Validator::new(data)
}

// ============================================================================
// SINGLE-FIELD RULES
// ============================================================================

#[test]
fn valid_email_passes() {
    let mut v = form(json!({"email": "test@test.com"}));
    v.email().validate("email");
    assert!(!v.has_errors());
}

#[test]
fn filter_runs_before_rules_and_returns_the_filtered_value() {
    let mut v = form(json!({"email": "   test@emailwithwhitespace.com       "}));
    let out = v
        .filter(|value| value.trim().to_string())
        .email()
        .validate("email")
        .unwrap();
    assert_eq!(out, FieldValue::Scalar("test@emailwithwhitespace.com".into()));
    assert!(!v.has_errors());
}

#[rstest]
#[case("Test Name", false)]
#[case("", true)]
#[case("   ", true)]
#[case("0", false)]
fn required_fails_exactly_on_blank(#[case] value: &str, #[case] fails: bool) {
    let mut v = form(json!({ "name": value }));
    v.required().validate("name");
    assert_eq!(v.has_errors(), fails);
}

#[test]
fn missing_field_is_only_an_error_under_required() {
    let mut v = form(json!({}));
    v.email().validate("email");
    assert!(!v.has_errors());

    v.required().validate("email");
    assert!(v.has_errors());
}

#[rstest]
#[case(json!(2.5), false)]
#[case(json!("2.5"), false)]
#[case(json!("test"), true)]
fn float_rule(#[case] value: serde_json::Value, #[case] fails: bool) {
    let mut v = form(json!({ "float": value }));
    v.float().validate("float");
    assert_eq!(v.has_errors(), fails);
}

#[rstest]
#[case(json!(20), false)]
#[case(json!("20"), false)]
#[case(json!("test"), true)]
#[case(json!("2.5"), true)]
fn integer_rule(#[case] value: serde_json::Value, #[case] fails: bool) {
    let mut v = form(json!({ "integer": value }));
    v.integer().validate("integer");
    assert_eq!(v.has_errors(), fails);
}

#[test]
fn digits_rule() {
    let mut v = form(json!({"digits": 20}));
    v.digits().validate("digits");
    assert!(!v.has_errors());

    let mut v = form(json!({"digits": "test"}));
    v.digits().validate("digits");
    assert!(v.has_errors());
}

// ============================================================================
// NUMERIC BOUNDS
// ============================================================================

#[test]
fn min_is_inclusive_by_default() {
    let mut v = form(json!({"min": 35}));
    v.min(30.0).validate("min");
    assert!(!v.has_errors());

    v.min(35.0).validate("min");
    assert!(!v.has_errors());

    v.min(40.0).validate("min");
    assert!(v.has_errors());
}

#[test]
fn min_failure_formats_the_default_message() {
    let mut v = form(json!({"age": 5}));
    v.min(30.0).validate_as("age", "Age");
    assert_eq!(
        v.error("age"),
        Some("Age must be greater than or equal to 30.")
    );
}

#[test]
fn max_bound() {
    let mut v = form(json!({"max": 29}));
    v.max(30.0).validate("max");
    assert!(!v.has_errors());

    v.max(20.0).validate("max");
    assert!(v.has_errors());
}

#[test]
fn between_passes_inside_and_fails_outside() {
    let mut v = form(json!({"between": 35}));
    v.between(30.0, 40.0).validate("between");
    assert!(!v.has_errors());

    v.between(40.0, 50.0).validate_as("between", "Quantity");
    assert_eq!(
        v.error("between"),
        Some("Quantity must be between 40 and 50.")
    );
}

#[test]
fn exclusive_bounds_reject_the_limit_itself() {
    let mut v = form(json!({"n": 30}));
    v.min_exclusive(30.0).validate("n");
    assert!(v.has_errors());

    v.clear_errors();
    v.between_exclusive(30.0, 40.0).validate("n");
    assert!(v.has_errors());
}

#[test]
fn sign_rules() {
    let mut v = form(json!({"up": 3, "down": -3}));
    v.positive().validate("up");
    v.negative().validate("down");
    assert!(!v.has_errors());

    v.negative().validate("up");
    assert!(v.has_errors());
}

// ============================================================================
// LENGTHS AND AFFIXES
// ============================================================================

#[rstest]
#[case(10, false)]
#[case(60, true)]
fn min_length_rule(#[case] bound: usize, #[case] fails: bool) {
    let mut v = form(json!({"text": "this is a string"}));
    v.min_length(bound).validate("text");
    assert_eq!(v.has_errors(), fails);
}

#[rstest]
#[case(20, false)]
#[case(5, true)]
fn max_length_rule(#[case] bound: usize, #[case] fails: bool) {
    let mut v = form(json!({"text": "this is a string"}));
    v.max_length(bound).validate("text");
    assert_eq!(v.has_errors(), fails);
}

#[rstest]
#[case(16, false)]
#[case(5, true)]
fn exact_length_rule(#[case] bound: usize, #[case] fails: bool) {
    let mut v = form(json!({"text": "this is a string"}));
    v.length(bound).validate("text");
    assert_eq!(v.has_errors(), fails);
}

#[test]
fn affix_rules_and_their_messages() {
    let mut v = form(json!({"host": "example.org"}));
    v.starts_with("www.").validate_as("host", "Hostname");
    assert_eq!(v.error("host"), Some("Hostname must start with \"www.\"."));

    v.clear_errors();
    v.not_ends_with(".org").validate("host");
    assert!(v.has_errors());

    v.clear_errors();
    v.ends_with(".org").not_starts_with("ftp.").validate("host");
    assert!(!v.has_errors());
}

// ============================================================================
// CROSS-FIELD COMPARISON
// ============================================================================

#[test]
fn matches_compares_against_the_other_field() {
    let mut v = form(json!({
        "password": "testpass",
        "password_confirm": "testpass",
    }));
    v.matches("password_confirm", "Password Confirmation")
        .validate("password");
    assert!(!v.has_errors());
}

#[test]
fn matches_against_a_missing_field_fails_for_nonempty_values() {
    let mut v = form(json!({
        "password": "testpass",
        "password_confirm": "testpass",
    }));
    v.matches("password_confirmaton", "Password Confirmation")
        .validate_as("password", "Password");
    assert_eq!(
        v.error("password"),
        Some("Password must match Password Confirmation.")
    );
}

#[test]
fn not_matches() {
    let mut v = form(json!({
        "password": "test",
        "password_confirm": "another test",
    }));
    v.not_matches("password_confirm", "Password Confirmation")
        .validate("password");
    assert!(!v.has_errors());

    let mut v = form(json!({
        "password": "test",
        "password_confirm": "test",
    }));
    v.not_matches("password_confirm", "Password Confirmation")
        .validate("password");
    assert!(v.has_errors());
}

#[test]
fn matches_reads_the_live_value_at_validate_time() {
    let mut v = form(json!({"a": "one", "b": "two"}));
    v.matches("b", "B");
    // Rebinding the data before validate: the comparison sees the new "b".
    v.set_data(json!({"a": "one", "b": "one"}));
    v.validate("a");
    assert!(!v.has_errors());
}

// ============================================================================
// DATES
// ============================================================================

#[test]
fn date_rule_with_explicit_format() {
    let mut v = form(json!({"date": "10/20/2010"}));
    v.date_fmt(DateFormat::MDY).validate("date");
    assert!(!v.has_errors());

    let mut v = form(json!({"date": "test"}));
    v.date_fmt(DateFormat::MDY).validate("date");
    assert!(v.has_errors());
}

#[test]
fn date_rule_uses_the_session_default_format() {
    let mut v = form(json!({"date": "20/10/2010"}));
    v.set_date_format(DateFormat::DMY);
    v.date().validate("date");
    assert!(!v.has_errors());
}

#[test]
fn impossible_dates_fail() {
    let mut v = form(json!({"date": "2/30/2010"}));
    v.date_fmt(DateFormat::MDY).validate("date");
    assert!(v.has_errors());
}

#[test]
fn min_date_with_a_literal_limit() {
    let mut v = form(json!({"start": "06/15/2024"}));
    v.min_date(DateLimit::Literal("06/01/2024".into()))
        .validate("start");
    assert!(!v.has_errors());

    v.min_date(DateLimit::Literal("07/01/2024".into()))
        .validate_as("start", "Start date");
    assert_eq!(
        v.error("start"),
        Some("Start date must be later than 07/01/2024.")
    );
}

#[test]
fn max_date_with_a_field_limit() {
    let mut v = form(json!({
        "checkin": "06/10/2024",
        "checkout": "06/15/2024",
    }));
    v.max_date(DateLimit::Field("checkout".into()))
        .validate("checkin");
    assert!(!v.has_errors());
}

#[test]
fn date_limits_fail_unparseable_values() {
    let mut v = form(json!({"start": "whenever"}));
    v.min_date(DateLimit::Literal("06/01/2024".into()))
        .validate("start");
    assert!(v.has_errors());
}

#[test]
#[should_panic(expected = "cannot resolve min_date limit")]
fn unresolvable_date_limit_is_fatal() {
    let mut v = form(json!({}));
    v.min_date(DateLimit::Field("no_such_field".into()));
}

// ============================================================================
// CHECKSUM AND MEMBERSHIP
// ============================================================================

#[test]
fn ccnum_luhn() {
    let mut v = form(json!({"card": "4532015112830366"}));
    v.ccnum().validate("card");
    assert!(!v.has_errors());

    let mut v = form(json!({"card": "4532015112830367"}));
    v.ccnum().validate_as("card", "Card number");
    assert_eq!(
        v.error("card"),
        Some("Card number must be a valid credit card number.")
    );
}

#[test]
fn ccnum_length_bounds() {
    let mut v = form(json!({"card": "424242424242"}));
    v.ccnum().validate("card");
    assert!(v.has_errors());
}

#[test]
fn one_of_accepts_a_list_or_a_csv_string() {
    let mut v = form(json!({"color": "green"}));
    v.one_of(["red", "green", "blue"]).validate("color");
    assert!(!v.has_errors());

    v.one_of_str("red,green,blue").validate("color");
    assert!(!v.has_errors());

    v.one_of(["cyan", "magenta"]).validate_as("color", "Color");
    assert_eq!(v.error("color"), Some("Color must be one of cyan, magenta."));
}

#[test]
fn none_of_rejects_members() {
    let mut v = form(json!({"username": "admin"}));
    v.none_of(["admin", "root"]).validate("username");
    assert!(v.has_errors());

    v.clear_errors();
    v.none_of_str("admin,root").validate("username");
    assert!(v.has_errors());
}

// ============================================================================
// FREE-FORM RULES
// ============================================================================

#[test]
fn custom_predicate() {
    let mut v = form(json!({"answer": "42"}));
    v.custom("the_answer", |value| value == "42").validate("answer");
    assert!(!v.has_errors());

    v.custom("wrong_answer", |value| value == "41")
        .message("{} is not the answer.")
        .validate_as("answer", "Answer");
    assert_eq!(v.error("answer"), Some("Answer is not the answer."));
}

#[test]
fn custom_pattern_matches_as_regex_when_it_compiles() {
    let mut v = form(json!({"zip": "12345-6789"}));
    v.custom_pattern("zip", r"^\d{5}(-\d{4})?$").validate("zip");
    assert!(!v.has_errors());
}

#[test]
fn custom_pattern_falls_back_to_equality() {
    // An unbalanced paren cannot compile as a regex, so the value has to
    // equal the string itself.
    let mut v = form(json!({"token": "(exact"}));
    v.custom_pattern("token", "(exact").validate("token");
    assert!(!v.has_errors());

    let mut v = form(json!({"token": "different"}));
    v.custom_pattern("token", "(exact").validate("token");
    assert!(v.has_errors());
}

#[test]
fn unknown_custom_rule_uses_the_global_fallback_message() {
    let mut v = form(json!({"x": "nope"}));
    v.custom("mystery", |_| false).validate_as("x", "X");
    assert_eq!(v.error("x"), Some("X has an error."));
}

// ============================================================================
// LIST VALUES
// ============================================================================

#[test]
fn every_element_is_validated() {
    let mut v = form(json!({
        "emails": ["test@test.com", "test2@test.com", "test3@test.com"],
    }));
    v.email().validate("emails");
    assert!(!v.has_errors());
}

#[test]
fn one_bad_element_fails_the_field() {
    let mut v = form(json!({
        "emails": ["test@test.com", "test2@test.com", "testtest.com"],
    }));
    v.email().validate("emails");
    assert!(v.has_errors());
}

#[test]
fn required_over_a_list_rejects_empty_elements() {
    let mut v = form(json!({
        "names": ["Test Name", "Another Name", "And Another Name"],
    }));
    v.required().validate("names");
    assert!(!v.has_errors());

    let mut v = form(json!({"names": ["Test Name", "", "And Another Name"]}));
    v.required().validate("names");
    assert!(v.has_errors());
}

#[test]
fn element_failure_short_circuits_remaining_elements() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut v = form(json!({"items": ["bad", "also-bad", "fine"]}));
    v.custom("count_calls", move |value| {
        seen.fetch_add(1, Ordering::SeqCst);
        value == "fine"
    })
    .validate("items");

    assert!(v.has_errors());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn filters_apply_to_every_element() {
    let mut v = form(json!({"tags": ["  a  ", " b "]}));
    let out = v
        .filter(|value| value.trim().to_string())
        .required()
        .validate("tags")
        .unwrap();
    assert_eq!(
        out,
        FieldValue::List(vec!["a".into(), "b".into()])
    );
}

// ============================================================================
// ENGINE LIFE CYCLE
// ============================================================================

#[test]
fn first_failing_rule_short_circuits_the_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut v = form(json!({"name": ""}));
    v.required()
        .custom("never_reached", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        })
        .validate("name");

    assert!(v.has_errors());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn chain_is_empty_after_validate_regardless_of_outcome() {
    let mut v = form(json!({"bad": "", "other": ""}));

    v.required().validate("bad");
    assert!(v.has_errors());

    // No rules queued: the next field passes trivially even though the
    // previous one failed.
    assert!(v.validate("other").is_some());
    assert_eq!(v.errors().len(), 1);
}

#[test]
fn revalidation_with_the_same_input_is_idempotent() {
    let mut v = form(json!({"age": "35"}));
    let first = v.between(30.0, 40.0).validate("age");
    let second = v.between(30.0, 40.0).validate("age");
    assert_eq!(first, second);
    assert!(!v.has_errors());
}

#[test]
fn error_map_grows_across_fields_and_keeps_the_first_failure() {
    let mut v = form(json!({"a": "", "b": "not-an-email"}));
    v.required().validate("a");
    v.email().validate("b");

    assert_eq!(v.errors().len(), 2);
    let keys: Vec<&str> = v.errors().iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["a", "b"]);

    let messages: Vec<&str> = v.errors().messages().collect();
    assert_eq!(messages.len(), 2);
}

#[test]
fn default_label_embeds_the_key() {
    let mut v = form(json!({"nickname": ""}));
    v.required().validate("nickname");
    assert_eq!(
        v.error("nickname"),
        Some("Field with the name of \"nickname\" is required.")
    );
}

// ============================================================================
// NESTED DATA
// ============================================================================

#[test]
fn dot_paths_reach_nested_values() {
    let mut v = form(json!({
        "user": {"contact": {"email": "ada@example.com"}},
    }));
    v.required().email().validate("user.contact.email");
    assert!(!v.has_errors());
}

#[test]
fn dot_paths_index_arrays() {
    let mut v = form(json!({"emails": ["first@x.com", "second"]}));
    v.email().validate("emails.0");
    assert!(!v.has_errors());

    v.email().validate("emails.1");
    assert!(v.has_errors());
}

#[test]
fn broken_paths_resolve_to_absent() {
    let mut v = form(json!({"user": {"name": "Ada"}}));
    v.required().validate("user.missing.deeper");
    assert!(v.has_errors());
}

// ============================================================================
// MESSAGE CONFIGURATION
// ============================================================================

#[test]
fn set_message_overrides_for_the_whole_session() {
    let mut v = form(json!({"a": "", "b": ""}));
    v.set_message("required", "{} must not be left blank.");

    v.required().validate_as("a", "First");
    v.required().validate_as("b", "Second");

    assert_eq!(v.error("a"), Some("First must not be left blank."));
    assert_eq!(v.error("b"), Some("Second must not be left blank."));
}

#[test]
fn catalog_parent_chain_supplies_missing_templates() {
    let mut overrides = MessageCatalog::empty();
    overrides.set("required", "{} lipsei.");
    let catalog = overrides.with_parent(Arc::new(MessageCatalog::builtin()));

    let mut v = Validator::with_catalog(json!({"name": "", "mail": "bad"}), catalog);

    v.required().validate_as("name", "Onoma");
    assert_eq!(v.error("name"), Some("Onoma lipsei."));

    // No override for `email`: the parent's template applies.
    v.email().validate_as("mail", "Mail");
    assert_eq!(v.error("mail"), Some("Mail is an invalid email address."));
}

#[test]
fn without_a_parent_the_fallback_template_applies() {
    let catalog = MessageCatalog::empty();
    let mut v = Validator::with_catalog(json!({"mail": "bad"}), catalog);
    v.email().validate_as("mail", "Mail");
    assert_eq!(v.error("mail"), Some("Mail has an error."));
}

#[test]
fn call_site_message_beats_every_table() {
    let mut v = form(json!({"mail": "bad"}));
    v.set_message("email", "{} table override.");
    v.email().message("{} call-site override.").validate_as("mail", "Mail");
    assert_eq!(v.error("mail"), Some("Mail call-site override."));
}
