//! Place fixtures shared by unit, behaviour and downstream crate tests.

use geo::Coord;

use crate::{
    Amenity, EpochMillis, Filters, Place, PlaceScoreDetails, PlaceScorer, ReviewHighlight,
};

/// One day in epoch milliseconds.
pub const DAY_MS: EpochMillis = 24 * 60 * 60 * 1_000;

/// Fixed clock used by fixtures, mid 2025.
pub const FIXTURE_NOW: EpochMillis = 1_750_000_000_000;

/// Praca da Se, Sao Paulo. Used as a default search centre.
pub const SAO_PAULO_CENTER: Coord<f64> = Coord {
    x: -46.633_308,
    y: -23.550_52,
};

/// Restaurant with a playroom, kids menu and a review citing monitors.
#[must_use]
pub fn family_restaurant() -> Place {
    Place::new("p1", "Restaurante Família Feliz")
        .with_description("Restaurante com brinquedoteca e menu infantil.")
        .with_categories(["restaurant"])
        .with_location(Coord { x: -46.6, y: -23.5 })
        .with_amenities([Amenity::Playroom, Amenity::KidsMenu])
        .with_google_rating(4.5, 120)
        .with_review_snippets(["Excelente para crianças", "Tem menu infantil e monitores."])
}

/// Lodging venue that must always be hidden.
#[must_use]
pub fn adults_hotel() -> Place {
    Place::new("h1", "Hotel Central")
        .with_description("Hotel focado em adultos")
        .with_categories(["lodging"])
        .with_location(Coord { x: -46.63, y: -23.55 })
}

/// Amusement park with recent positive reviews citing every mention category.
#[must_use]
pub fn dedicated_park(now: EpochMillis) -> Place {
    Place::new("a1", "Parque Aventura Kids")
        .with_description("Parque com atividades para criancas")
        .with_categories(["amusement_park"])
        .with_location(Coord { x: -46.64, y: -23.56 })
        .with_amenities([Amenity::Playroom, Amenity::Monitors, Amenity::Playground])
        .with_google_rating(4.7, 850)
        .with_review_highlights([
            ReviewHighlight::new("Espaço kids enorme e limpo")
                .with_rating(5.0)
                .with_created_at(now - 5 * DAY_MS),
            ReviewHighlight::new("Monitores muito atenciosos com os pequenos")
                .with_rating(5.0)
                .with_created_at(now - 12 * DAY_MS),
            ReviewHighlight::new("O parquinho é o ponto alto do passeio")
                .with_rating(4.0)
                .with_created_at(now - 20 * DAY_MS),
        ])
}

/// Cafe with no family evidence at all.
#[must_use]
pub fn plain_cafe() -> Place {
    Place::new("c1", "Cafe Central")
        .with_categories(["cafe"])
        .with_location(Coord { x: -46.635, y: -23.551 })
}

/// Scorer returning the same details for every place.
#[derive(Debug, Clone, Default)]
pub struct StubScorer {
    details: PlaceScoreDetails,
}

impl StubScorer {
    /// Return `details` for every place.
    #[must_use]
    pub const fn with_details(details: PlaceScoreDetails) -> Self {
        Self { details }
    }
}

impl PlaceScorer for StubScorer {
    fn score_details(&self, _: &Place, _: &Filters, _: EpochMillis) -> PlaceScoreDetails {
        self.details.clone()
    }
}
