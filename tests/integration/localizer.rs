use pretty_assertions::assert_eq;

use crate::common::fixtures;

#[test]
fn fixture_locales_load() {
    let localizer = fixtures::localizer();
    assert_eq!(localizer.locales(), vec!["en", "no"]);
    assert_eq!(localizer.default_locale(), "en");
}

#[test]
fn missing_keys_fall_back_to_default_locale() {
    let localizer = fixtures::localizer();
    assert_eq!(
        localizer.localize("no", "{queue.pageindicator}"),
        "Side {page}/{pages}"
    );
    assert_eq!(localizer.localize("no", "{info.what}"), "What is roxbot?");
    assert_eq!(
        localizer.localize("fr", "{queue.pageindicator}"),
        "Page {page}/{pages}"
    );
}

#[test]
fn unknown_tokens_are_left_in_place() {
    let localizer = fixtures::localizer();
    assert_eq!(
        localizer.localize("en", "{nope.missing} and {info.what}"),
        "{nope.missing} and What is roxbot?"
    );
}

#[test]
fn reload_reports_locale_count() {
    let localizer = fixtures::localizer();
    assert_eq!(localizer.reload().unwrap(), 2);
}
