//! Facility categories offered on the keyboard
//!
//! Each button label maps to an external category code, except the custom
//! query button which switches the conversation to free-text input.

/// Place categories with a fixed upstream type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Restaurant,
    Cafe,
    Store,
    ConvenienceStore,
    Lodging,
    Hospital,
    Pharmacy,
    GasStation,
    Parking,
    Atm,
    SubwayStation,
    BusStation,
    School,
    PlaceOfWorship,
}

impl Category {
    /// All categories in keyboard order
    pub const ALL: [Category; 14] = [
        Category::Restaurant,
        Category::Cafe,
        Category::Store,
        Category::ConvenienceStore,
        Category::Lodging,
        Category::Hospital,
        Category::Pharmacy,
        Category::GasStation,
        Category::Parking,
        Category::Atm,
        Category::SubwayStation,
        Category::BusStation,
        Category::School,
        Category::PlaceOfWorship,
    ];

    /// Upstream place type code
    pub fn code(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Store => "store",
            Category::ConvenienceStore => "convenience_store",
            Category::Lodging => "lodging",
            Category::Hospital => "hospital",
            Category::Pharmacy => "pharmacy",
            Category::GasStation => "gas_station",
            Category::Parking => "parking",
            Category::Atm => "atm",
            Category::SubwayStation => "subway_station",
            Category::BusStation => "bus_station",
            Category::School => "school",
            Category::PlaceOfWorship => "place_of_worship",
        }
    }

    /// Button label shown to the user
    pub fn label(self) -> &'static str {
        match self {
            Category::Restaurant => "🍽 Restaurants",
            Category::Cafe => "☕ Cafes",
            Category::Store => "🛍 Shops",
            Category::ConvenienceStore => "🏪 Convenience Stores",
            Category::Lodging => "🏨 Hotels",
            Category::Hospital => "🏥 Hospitals",
            Category::Pharmacy => "💊 Pharmacies",
            Category::GasStation => "⛽ Gas Stations",
            Category::Parking => "🚗 Parking",
            Category::Atm => "🏦 Banks/ATMs",
            Category::SubwayStation => "🚇 Metro Stations",
            Category::BusStation => "🚍 Bus Stops",
            Category::School => "🎓 Schools",
            Category::PlaceOfWorship => "🕌 Worship Places",
        }
    }

}

/// Label of the button that switches to free-text search
pub const CUSTOM_QUERY_LABEL: &str = "✍️ Custom Query";

/// What a facility-keyboard press means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityChoice {
    Category(Category),
    CustomQuery,
}

impl FacilityChoice {
    /// Exact-match lookup of a keyboard label
    pub fn from_label(label: &str) -> Option<Self> {
        if label == CUSTOM_QUERY_LABEL {
            return Some(FacilityChoice::CustomQuery);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .map(FacilityChoice::Category)
    }
}
