//! Curated fallback data used when the live travel APIs have nothing to offer.

use std::sync::OnceLock;

use regex::Regex;
use strum::Display;

/// Where a hotel listing came from. Rendered in the listing header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HotelSource {
    #[strum(to_string = "Amadeus API")]
    Amadeus,
    #[strum(to_string = "Local Recommendations")]
    LocalRecommendations,
    #[strum(to_string = "Simulated Data")]
    Simulated,
}

/// A hand-picked hotel with a fixed nightly price in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuratedHotel {
    pub name: &'static str,
    pub rating: f32,
    pub location: &'static str,
    pub price: u32,
    pub amenities: &'static [&'static str],
}

const fn hotel(
    name: &'static str,
    rating: f32,
    location: &'static str,
    price: u32,
    amenities: &'static [&'static str],
) -> CuratedHotel {
    CuratedHotel {
        name,
        rating,
        location,
        price,
        amenities,
    }
}

struct CityHotels {
    /// Case-insensitive pattern matched against the requested city.
    pattern: &'static str,
    hotels: &'static [CuratedHotel],
}

const CITY_HOTELS: &[CityHotels] = &[
    CityHotels {
        pattern: r"(?i)\btokyo\b",
        hotels: &[
            hotel("Park Hyatt Tokyo", 4.8, "Shinjuku", 450, &["WiFi", "Pool", "Spa", "Restaurant", "City View"]),
            hotel("Aman Tokyo", 4.9, "Otemachi", 800, &["WiFi", "Spa", "Restaurant", "Gym", "Concierge"]),
            hotel("Hotel Gracery Shinjuku", 4.2, "Shinjuku", 180, &["WiFi", "Restaurant", "Bar", "Convenience Store"]),
            hotel("Shibuya Excel Hotel", 4.0, "Shibuya", 150, &["WiFi", "Restaurant", "Business Center"]),
            hotel("Hotel Century Southern Tower", 4.3, "Shinjuku", 200, &["WiFi", "Restaurant", "Bar", "City View"]),
            hotel("Shinjuku Prince Hotel", 3.8, "Shinjuku", 120, &["WiFi", "Restaurant", "Bar", "Movie Theater"]),
        ],
    },
    CityHotels {
        pattern: r"(?i)\bparis\b",
        hotels: &[
            hotel("The Ritz Paris", 4.9, "Place Vendôme", 1200, &["WiFi", "Spa", "Restaurant", "Bar", "Concierge", "Historic"]),
            hotel("Hotel de Crillon", 4.8, "Place de la Concorde", 1000, &["WiFi", "Spa", "Restaurant", "Bar", "Pool", "Luxury"]),
            hotel("Le Bristol Paris", 4.7, "Rue du Faubourg Saint-Honoré", 800, &["WiFi", "Spa", "Restaurant", "Bar", "Pool", "Garden"]),
            hotel("Hotel Plaza Athénée", 4.6, "Avenue Montaigne", 900, &["WiFi", "Spa", "Restaurant", "Bar", "Eiffel View"]),
            hotel("Le Meurice", 4.5, "Rue de Rivoli", 750, &["WiFi", "Spa", "Restaurant", "Bar", "Tuileries View"]),
            hotel("Hotel Lutetia", 4.4, "Left Bank", 400, &["WiFi", "Spa", "Restaurant", "Bar", "Historic"]),
        ],
    },
    CityHotels {
        pattern: r"(?i)\blondon\b",
        hotels: &[
            hotel("The Savoy", 4.9, "Strand", 800, &["WiFi", "Spa", "Restaurant", "Bar", "River View", "Historic"]),
            hotel("Claridge's", 4.8, "Mayfair", 900, &["WiFi", "Spa", "Restaurant", "Bar", "Afternoon Tea", "Luxury"]),
            hotel("The Connaught", 4.7, "Mayfair", 850, &["WiFi", "Spa", "Restaurant", "Bar", "Aman Spa"]),
            hotel("The Dorchester", 4.6, "Park Lane", 750, &["WiFi", "Spa", "Restaurant", "Bar", "Hyde Park View"]),
            hotel("Brown's Hotel", 4.5, "Mayfair", 600, &["WiFi", "Spa", "Restaurant", "Bar", "Historic"]),
            hotel("The Goring", 4.4, "Belgravia", 500, &["WiFi", "Restaurant", "Bar", "Garden", "Royal Warrant"]),
        ],
    },
    CityHotels {
        pattern: r"(?i)\b(new york|nyc)\b",
        hotels: &[
            hotel("The Plaza", 4.8, "Central Park South", 600, &["WiFi", "Spa", "Restaurant", "Bar", "Central Park View", "Historic"]),
            hotel("Waldorf Astoria", 4.7, "Park Avenue", 550, &["WiFi", "Spa", "Restaurant", "Bar", "Art Deco", "Luxury"]),
            hotel("The St. Regis", 4.6, "Fifth Avenue", 700, &["WiFi", "Spa", "Restaurant", "Bar", "Butler Service"]),
            hotel("The Peninsula", 4.5, "Fifth Avenue", 650, &["WiFi", "Spa", "Restaurant", "Bar", "Rooftop Pool"]),
            hotel("The Carlyle", 4.4, "Upper East Side", 500, &["WiFi", "Restaurant", "Bar", "Bemelmans Bar", "Historic"]),
            hotel("The Mark", 4.3, "Upper East Side", 450, &["WiFi", "Restaurant", "Bar", "Jean-Georges", "Modern"]),
        ],
    },
    CityHotels {
        pattern: r"(?i)\brome\b",
        hotels: &[
            hotel("Hotel de Russie", 4.8, "Piazza del Popolo", 600, &["WiFi", "Spa", "Restaurant", "Bar", "Garden", "Historic"]),
            hotel("Hassler Roma", 4.7, "Piazza Trinità dei Monti", 700, &["WiFi", "Spa", "Restaurant", "Bar", "Spanish Steps View"]),
            hotel("Hotel Eden", 4.6, "Via Ludovisi", 550, &["WiFi", "Spa", "Restaurant", "Bar", "City View", "Dorchester Collection"]),
            hotel("Palazzo Manfredi", 4.5, "Via Labicana", 400, &["WiFi", "Restaurant", "Bar", "Colosseum View"]),
            hotel("Hotel Raphael", 4.4, "Piazza Navona", 350, &["WiFi", "Restaurant", "Bar", "Rooftop Terrace", "Historic"]),
            hotel("Hotel Locarno", 4.3, "Via della Penna", 300, &["WiFi", "Restaurant", "Bar", "Art Nouveau", "Charming"]),
        ],
    },
    CityHotels {
        pattern: r"(?i)\bbarcelona\b",
        hotels: &[
            hotel("Hotel Arts Barcelona", 4.8, "Port Olímpic", 400, &["WiFi", "Spa", "Restaurant", "Bar", "Beach Access", "Ritz-Carlton"]),
            hotel("W Barcelona", 4.7, "Barceloneta", 350, &["WiFi", "Spa", "Restaurant", "Bar", "Beachfront", "Modern"]),
            hotel("Hotel Majestic", 4.6, "Passeig de Gràcia", 300, &["WiFi", "Spa", "Restaurant", "Bar", "Gaudí Architecture"]),
            hotel("Casa Fuster", 4.5, "Passeig de Gràcia", 280, &["WiFi", "Restaurant", "Bar", "Modernist Building", "Historic"]),
            hotel("Hotel 1898", 4.4, "La Rambla", 250, &["WiFi", "Restaurant", "Bar", "Rooftop Pool", "Colonial"]),
            hotel("Hotel Neri", 4.3, "Gothic Quarter", 200, &["WiFi", "Restaurant", "Bar", "Historic Building", "Boutique"]),
        ],
    },
];

const GENERIC_HOTELS: &[CuratedHotel] = &[
    hotel("Grand Hotel", 4.5, "City Center", 200, &["WiFi", "Pool", "Spa", "Restaurant"]),
    hotel("Comfort Inn", 3.8, "Airport Area", 120, &["WiFi", "Breakfast", "Parking"]),
    hotel("Luxury Resort", 4.9, "Beachfront", 350, &["WiFi", "Pool", "Spa", "Restaurant", "Gym", "Beach Access"]),
    hotel("City Suites", 4.2, "Business District", 180, &["WiFi", "Gym", "Breakfast"]),
    hotel("Budget Stay", 3.5, "Suburbs", 90, &["WiFi", "Parking"]),
    hotel("Boutique Escape", 4.7, "Old Town", 270, &["WiFi", "Spa", "Restaurant", "Bar"]),
];

fn city_patterns() -> &'static [(Regex, &'static [CuratedHotel])] {
    static COMPILED: OnceLock<Vec<(Regex, &'static [CuratedHotel])>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        CITY_HOTELS
            .iter()
            .filter_map(|c| Regex::new(c.pattern).ok().map(|re| (re, c.hotels)))
            .collect()
    })
}

/// Curated hotels for `city`: the city-specific table when one matches,
/// otherwise the generic table.
pub fn curated_hotels(city: &str) -> (HotelSource, &'static [CuratedHotel]) {
    let city = city.trim();
    city_patterns()
        .iter()
        .find(|(re, _)| re.is_match(city))
        .map(|(_, hotels)| (HotelSource::LocalRecommendations, *hotels))
        .unwrap_or_else(simulated_hotels)
}

/// The generic table, whatever the city.
pub fn simulated_hotels() -> (HotelSource, &'static [CuratedHotel]) {
    (HotelSource::Simulated, GENERIC_HOTELS)
}

/// Estimated nightly USD rate for an Amadeus hotel chain code.
///
/// Reference data carries no prices, so rates are bucketed by chain.
pub fn estimated_nightly_rate(chain_code: &str) -> u32 {
    match chain_code {
        "HI" | "AC" | "CP" => 150,
        "MA" | "RI" | "SH" => 300,
        "ZZ" | "NN" => 180,
        _ => 200,
    }
}

/// Curated sightseeing notes for a well-known destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityGuide {
    pub city: &'static str,
    pub attractions: &'static [&'static str],
    pub restaurants: &'static [&'static str],
    pub activities: &'static [&'static str],
    pub tips: &'static [&'static str],
}

const CITY_GUIDES: &[CityGuide] = &[
    CityGuide {
        city: "Paris",
        attractions: &["Eiffel Tower", "Louvre Museum", "Notre-Dame Cathedral", "Arc de Triomphe"],
        restaurants: &["Le Jules Verne", "L'Astrance", "Pierre Gagnaire"],
        activities: &["Seine River Cruise", "Montmartre Walking Tour", "Wine Tasting"],
        tips: &["Visit museums on first Sunday of month for free entry", "Book Eiffel Tower tickets in advance"],
    },
    CityGuide {
        city: "Tokyo",
        attractions: &["Senso-ji Temple", "Tokyo Skytree", "Shibuya Crossing", "Tsukiji Fish Market"],
        restaurants: &["Sukiyabashi Jiro", "Narisawa", "Den"],
        activities: &["Cherry Blossom Viewing", "Robot Restaurant Show", "Traditional Tea Ceremony"],
        tips: &["Get a Japan Rail Pass for train travel", "Learn basic Japanese phrases"],
    },
    CityGuide {
        city: "New York",
        attractions: &["Statue of Liberty", "Central Park", "Times Square", "Empire State Building"],
        restaurants: &["Le Bernardin", "Eleven Madison Park", "Per Se"],
        activities: &["Broadway Show", "Brooklyn Bridge Walk", "Museum of Modern Art"],
        tips: &["Get a MetroCard for subway access", "Book Broadway tickets in advance"],
    },
    CityGuide {
        city: "London",
        attractions: &["Big Ben", "Tower of London", "Buckingham Palace", "British Museum"],
        restaurants: &["The Fat Duck", "Gordon Ramsay", "Sketch"],
        activities: &["Thames River Cruise", "West End Show", "Changing of the Guard"],
        tips: &["Get an Oyster card for public transport", "Book attractions in advance"],
    },
    CityGuide {
        city: "Rome",
        attractions: &["Colosseum", "Vatican Museums", "Trevi Fountain", "Pantheon"],
        restaurants: &["La Pergola", "Il Pagliaccio", "Aroma"],
        activities: &["Vatican Tour", "Roman Forum Walk", "Gelato Tasting"],
        tips: &["Book Vatican tickets online to skip lines", "Visit early morning to avoid crowds"],
    },
    CityGuide {
        city: "Barcelona",
        attractions: &["Sagrada Familia", "Park Güell", "Casa Batlló", "La Rambla"],
        restaurants: &["El Celler de Can Roca", "Tickets", "Disfrutar"],
        activities: &["Gaudi Architecture Tour", "Tapas Crawl", "Beach Day"],
        tips: &["Book Sagrada Familia tickets in advance", "Learn basic Catalan phrases"],
    },
    CityGuide {
        city: "Aspen",
        attractions: &["Aspen Mountain", "Maroon Bells", "Aspen Art Museum", "Wheeler Opera House"],
        restaurants: &["Element 47", "Cache Cache", "Matsuhisa"],
        activities: &["Skiing/Snowboarding", "Hiking Maroon Bells", "Hot Springs"],
        tips: &["Visit during shoulder seasons for better deals", "Book ski passes in advance"],
    },
    CityGuide {
        city: "Colorado",
        attractions: &["Rocky Mountain National Park", "Garden of the Gods", "Mesa Verde", "Pikes Peak"],
        restaurants: &["Fruition", "Acorn", "Mercantile"],
        activities: &["Hiking", "Rock Climbing", "White Water Rafting", "Skiing"],
        tips: &["Check weather conditions before outdoor activities", "Get altitude acclimation"],
    },
];

/// Look up a curated guide by city name (trimmed, case-insensitive).
pub fn city_guide(city: &str) -> Option<&'static CityGuide> {
    let city = city.trim();
    CITY_GUIDES.iter().find(|g| g.city.eq_ignore_ascii_case(city))
}
