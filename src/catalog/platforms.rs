//! Static booking platform catalog
//!
//! Edit this table to change which platforms are suggested; nothing here is
//! computed at runtime.

use std::fmt;

/// Travel need grouping, declared in canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Hotels,
    TrainTickets,
    BusTickets,
    FlightTickets,
    TouristPlaces,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 5] = [
        Category::Hotels,
        Category::TrainTickets,
        Category::BusTickets,
        Category::FlightTickets,
        Category::TouristPlaces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Hotels => "Hotels",
            Category::TrainTickets => "Train Tickets",
            Category::BusTickets => "Bus Tickets",
            Category::FlightTickets => "Flight Tickets",
            Category::TouristPlaces => "Tourist Places",
        }
    }

    /// Icon of the category's first platform
    pub fn icon(self) -> &'static str {
        self.platforms().first().map(|p| p.icon).unwrap_or("🔗")
    }

    pub fn platforms(self) -> &'static [PlatformRecord] {
        match self {
            Category::Hotels => HOTELS,
            Category::TrainTickets => TRAIN_TICKETS,
            Category::BusTickets => BUS_TICKETS,
            Category::FlightTickets => FLIGHT_TICKETS,
            Category::TouristPlaces => TOURIST_PLACES,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One third-party booking website
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRecord {
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub icon: &'static str,
}

const HOTELS: &[PlatformRecord] = &[
    PlatformRecord {
        name: "Booking.com",
        description: "Global hotel booking platform with millions of properties, competitive rates, and no booking fees",
        url: "https://www.booking.com",
        icon: "🏨",
    },
    PlatformRecord {
        name: "MakeMyTrip",
        description: "India's leading travel platform for hotels, flights, and packages with exclusive deals",
        url: "https://www.makemytrip.com",
        icon: "✈️",
    },
    PlatformRecord {
        name: "Goibibo",
        description: "Popular Indian travel platform offering budget-friendly hotel and travel deals",
        url: "https://www.goibibo.com",
        icon: "🌟",
    },
];

const TRAIN_TICKETS: &[PlatformRecord] = &[PlatformRecord {
    name: "IRCTC",
    description: "Official Indian Railways booking platform for train tickets across India",
    url: "https://www.irctc.co.in",
    icon: "🚂",
}];

const BUS_TICKETS: &[PlatformRecord] = &[PlatformRecord {
    name: "RedBus",
    description: "India's largest online bus booking platform with thousands of operators",
    url: "https://www.redbus.in",
    icon: "🚌",
}];

const FLIGHT_TICKETS: &[PlatformRecord] = &[
    PlatformRecord {
        name: "MakeMyTrip Flights",
        description: "Comprehensive flight booking with all major airlines and competitive pricing",
        url: "https://www.makemytrip.com/flights",
        icon: "✈️",
    },
    PlatformRecord {
        name: "Cleartrip",
        description: "Popular flight booking platform with real-time prices and instant confirmations",
        url: "https://www.cleartrip.com",
        icon: "🛫",
    },
];

const TOURIST_PLACES: &[PlatformRecord] = &[PlatformRecord {
    name: "TripAdvisor",
    description: "World's largest travel community with reviews, photos, and booking for attractions",
    url: "https://www.tripadvisor.in",
    icon: "🗺️",
}];
