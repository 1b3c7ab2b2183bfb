//! Behavioural tests for the heuristic scorer.

use geo::Coord;
use kidspot_core::{
    AgePreference, Amenity, Badge, EpochMillis, Filters, Place, PlaceScoreDetails, PriorityLayer,
    ReviewHighlight, score_place_with_details,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

const NOW: EpochMillis = 1_750_000_000_000;
const DAY_MS: EpochMillis = 24 * 60 * 60 * 1_000;

#[fixture]
fn place() -> RefCell<Place> {
    RefCell::new(Place::default())
}

#[fixture]
fn filters() -> RefCell<Filters> {
    RefCell::new(Filters::default())
}

#[fixture]
fn details() -> RefCell<Option<PlaceScoreDetails>> {
    RefCell::new(None)
}

fn scored(details: &RefCell<Option<PlaceScoreDetails>>) -> PlaceScoreDetails {
    details
        .borrow()
        .clone()
        .expect("the place must be scored first")
}

// --- Given steps ---

#[given("a restaurant with a playroom, a kids menu and reviews citing monitors")]
fn given_family_restaurant(#[from(place)] place: &RefCell<Place>) {
    *place.borrow_mut() = Place::new("p1", "Restaurante Família Feliz")
        .with_description("Restaurante com brinquedoteca e menu infantil.")
        .with_categories(["restaurant"])
        .with_location(Coord { x: -46.6, y: -23.5 })
        .with_amenities([Amenity::Playroom, Amenity::KidsMenu])
        .with_google_rating(4.5, 120)
        .with_review_snippets(["Excelente para crianças", "Tem menu infantil e monitores."]);
}

#[given("a lodging venue described as a hotel for adults")]
fn given_hotel(#[from(place)] place: &RefCell<Place>) {
    *place.borrow_mut() = Place::new("h1", "Estadia Central")
        .with_description("Hotel focado em adultos")
        .with_categories(["lodging"]);
}

#[given("an amusement park with recent reviews citing every feature")]
fn given_dedicated_park(#[from(place)] place: &RefCell<Place>) {
    *place.borrow_mut() = Place::new("a1", "Mundo da Diversão")
        .with_categories(["amusement_park"])
        .with_amenities([Amenity::Playroom, Amenity::Monitors, Amenity::Playground])
        .with_review_highlights([
            ReviewHighlight::new("Espaço kids enorme")
                .with_rating(5.0)
                .with_created_at(NOW - 3 * DAY_MS),
            ReviewHighlight::new("Monitores cuidadosos")
                .with_rating(5.0)
                .with_created_at(NOW - 9 * DAY_MS),
            ReviewHighlight::new("Parquinho coberto e seguro")
                .with_rating(4.0)
                .with_created_at(NOW - 30 * DAY_MS),
        ]);
}

#[given("a cafe whose only review says it has no kids area")]
fn given_negated_review(#[from(place)] place: &RefCell<Place>) {
    *place.borrow_mut() = Place::new("c1", "Cafe Aurora")
        .with_categories(["cafe"])
        .with_review_highlights([ReviewHighlight::new("Bom café, mas sem espaço kids").with_rating(5.0)]);
}

#[given("a cafe whose only review praises the kids area")]
fn given_positive_review(#[from(place)] place: &RefCell<Place>) {
    *place.borrow_mut() = Place::new("c2", "Cafe Aurora")
        .with_categories(["cafe"])
        .with_review_highlights([ReviewHighlight::new("Adoramos o espaço kids").with_rating(5.0)]);
}

#[given("filters for children up to five")]
fn given_toddlers(#[from(filters)] filters: &RefCell<Filters>) {
    filters.borrow_mut().children_age = AgePreference::UpToFive;
}

#[given("filters for all ages")]
fn given_all_ages(#[from(filters)] filters: &RefCell<Filters>) {
    filters.borrow_mut().children_age = AgePreference::All;
}

// --- When steps ---

#[when("I score the place")]
fn when_score(
    #[from(place)] place: &RefCell<Place>,
    #[from(filters)] filters: &RefCell<Filters>,
    #[from(details)] details: &RefCell<Option<PlaceScoreDetails>>,
) {
    let result = score_place_with_details(&place.borrow(), &filters.borrow(), NOW);
    *details.borrow_mut() = Some(result);
}

// --- Then steps ---

#[then("the place is in tier A")]
fn then_tier_a(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    assert_eq!(scored(details).priority_layer, PriorityLayer::A);
}

#[then("the place is in tier B")]
fn then_tier_b(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    assert_eq!(scored(details).priority_layer, PriorityLayer::B);
}

#[then("the score is at least 83")]
fn then_at_least_83(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    let score = scored(details).score;
    assert!(score >= 83.0, "score {score} below regression baseline");
}

#[then("the score is at least 90")]
fn then_at_least_90(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    let score = scored(details).score;
    assert!(score >= 90.0, "score {score} below 90");
}

#[then("the place is not hidden")]
fn then_not_hidden(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    assert!(!scored(details).should_hide);
}

#[then("the place is hidden with a zero score")]
fn then_hidden(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    let result = scored(details);
    assert!(result.should_hide);
    assert!(result.score.abs() < f64::EPSILON);
    assert_eq!(result.priority_layer, PriorityLayer::D);
    assert!(result.badges.is_empty());
    assert!(result.review_chips.is_empty());
}

#[then("the badges include dedicated, monitors and playground")]
fn then_badges(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    let badges = scored(details).badges;
    for expected in [Badge::DedicatedKids, Badge::Monitors, Badge::Playground] {
        assert!(badges.contains(&expected), "missing {expected} in {badges:?}");
    }
}

#[then("no review chips are reported")]
fn then_no_chips(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    assert!(scored(details).review_chips.is_empty());
}

#[then("the review bonus is zero")]
fn then_zero_bonus(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    assert!(scored(details).review_bonus.abs() < f64::EPSILON);
}

#[then("the review chips contain the kids area label")]
fn then_kids_chip(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    let chips = scored(details).review_chips;
    assert!(chips.iter().any(|chip| chip == "Espaco kids citado"), "{chips:?}");
}

#[then("the review bonus is positive")]
fn then_positive_bonus(#[from(details)] details: &RefCell<Option<PlaceScoreDetails>>) {
    assert!(scored(details).review_bonus > 0.0);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/scoring.feature", name = $title)]
        fn $fn_name(
            place: RefCell<Place>,
            filters: RefCell<Filters>,
            details: RefCell<Option<PlaceScoreDetails>>,
        ) {
            let _ = (place, filters, details);
        }
    };
}

register_scenario!(
    family_restaurant_for_toddlers,
    "family restaurant for toddlers scores highly"
);
register_scenario!(lodging_is_hidden, "lodging venues are hidden");
register_scenario!(
    dedicated_venue_tops_tiers,
    "dedicated venue with recent reviews reaches the top tier"
);
register_scenario!(negated_review_is_ignored, "negated kids area review is ignored");
register_scenario!(positive_review_adds_chip, "positive kids area review adds a chip");
