use std::collections::BTreeMap;

use super::platforms::{Category, PlatformRecord};

/// Matched categories; iteration follows `Category`'s canonical order
pub type PlatformMatches = BTreeMap<Category, &'static [PlatformRecord]>;

/// Substring triggers per category
///
/// Sets overlap on purpose: "ticket" selects both trains and flights.
const TRIGGERS: [(Category, &[&str]); 5] = [
    (
        Category::Hotels,
        &["hotel", "room", "accommodation", "stay", "book hotel"],
    ),
    (
        Category::TrainTickets,
        &["train", "railway", "irctc", "ticket", "book train"],
    ),
    (Category::BusTickets, &["bus", "coach", "redbus", "book bus"]),
    (
        Category::FlightTickets,
        &["flight", "air", "plane", "book flight", "fly", "ticket"],
    ),
    (
        Category::TouristPlaces,
        &[
            "tourist",
            "attraction",
            "place",
            "visit",
            "see",
            "trip",
            "itinerary",
            "plan",
        ],
    ),
];

pub fn triggers(category: Category) -> &'static [&'static str] {
    TRIGGERS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

/// Categories whose triggers occur in the query (case-insensitive substring match)
///
/// Over-matching is accepted; an empty map means nothing should be rendered.
pub fn match_platforms(query: &str) -> PlatformMatches {
    let query_lower = query.to_lowercase();

    TRIGGERS
        .iter()
        .filter(|(_, words)| words.iter().any(|word| query_lower.contains(word)))
        .map(|(category, _)| (*category, category.platforms()))
        .collect()
}
