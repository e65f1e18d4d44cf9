use indiamap_shared::registry::EmbeddedSource;
use indiamap_shared::DatasetRegistry;

const INDIA: &str = include_str!("../assets/maps/India.json");
const GOA: &str = include_str!("../assets/maps/Goa.json");
const KERALA: &str = include_str!("../assets/maps/Kerala.json");

/// Registry of every map the frontend can show.
pub fn registry() -> DatasetRegistry {
    DatasetRegistry::new()
        .with_country(EmbeddedSource::new("India", INDIA))
        .with_subdivision("Goa", EmbeddedSource::new("Goa", GOA))
        .with_subdivision("Kerala", EmbeddedSource::new("Kerala", KERALA))
}
