use crate::domain::candidate::Candidate;

/// Built-in restaurant set used whenever the live search yields nothing.
#[derive(Clone, Debug)]
pub struct RestaurantCatalog {
    restaurants: Vec<Candidate>,
}

impl Default for RestaurantCatalog {
    fn default() -> Self {
        Self::sample()
    }
}

impl RestaurantCatalog {
    pub fn new(restaurants: Vec<Candidate>) -> Self {
        Self { restaurants }
    }

    pub fn sample() -> Self {
        Self::new(vec![
            Candidate::catalog(
                "Green Veggie",
                "Vegetarian",
                "Indiranagar",
                "Paneer Tikka, Dal Fry, Roti",
            ),
            Candidate::catalog(
                "Pizza Palace",
                "Italian",
                "Koramangala",
                "Margherita, Farmhouse, Pepperoni",
            ),
            Candidate::catalog("Sushi Zen", "Japanese", "MG Road", "Sushi Roll, Miso Soup, Tempura"),
            Candidate::catalog("Burger Hub", "American", "Whitefield", "Cheeseburger, Fries, Coke"),
            Candidate::catalog(
                "Tandoori Tales",
                "Indian",
                "Jayanagar",
                "Tandoori Chicken, Naan, Paneer Butter Masala",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Case-insensitive substring filter on location and cuisine, in catalog order.
    pub fn filter(
        &self,
        location: Option<&str>,
        cuisine: Option<&str>,
        limit: usize,
    ) -> Vec<Candidate> {
        let location = location.map(str::to_lowercase);
        let cuisine = cuisine.map(str::to_lowercase);

        self.restaurants
            .iter()
            .filter(|restaurant| {
                location
                    .as_deref()
                    .map_or(true, |wanted| restaurant.location.to_lowercase().contains(wanted))
            })
            .filter(|restaurant| {
                cuisine.as_deref().map_or(true, |wanted| {
                    restaurant
                        .cuisine
                        .as_deref()
                        .is_some_and(|actual| actual.to_lowercase().contains(wanted))
                })
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::RestaurantCatalog;
    use crate::domain::candidate::candidate_names;

    #[test]
    fn sample_catalog_has_five_entries() {
        let catalog = RestaurantCatalog::sample();
        assert_eq!(catalog.len(), 5);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn location_and_cuisine_narrow_to_green_veggie() {
        let catalog = RestaurantCatalog::sample();
        let matches = catalog.filter(Some("Indiranagar"), Some("vegetarian"), 5);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Green Veggie");
        assert_eq!(matches[0].cuisine.as_deref(), Some("Vegetarian"));
        assert_eq!(matches[0].menu.as_deref(), Some("Paneer Tikka, Dal Fry, Roti"));
    }

    #[test]
    fn filters_are_case_insensitive_substrings() {
        let catalog = RestaurantCatalog::sample();
        let matches = catalog.filter(Some("mg ro"), None, 5);
        assert_eq!(candidate_names(&matches), vec!["Sushi Zen".to_string()]);
    }

    #[test]
    fn no_filters_returns_catalog_order_up_to_limit() {
        let catalog = RestaurantCatalog::sample();
        let matches = catalog.filter(None, None, 2);
        assert_eq!(
            candidate_names(&matches),
            vec!["Green Veggie".to_string(), "Pizza Palace".to_string()]
        );
    }

    #[test]
    fn unmatched_filters_yield_empty_list() {
        let catalog = RestaurantCatalog::sample();
        assert!(catalog.filter(Some("Indiranagar"), Some("sushi"), 5).is_empty());
        assert!(catalog.filter(None, None, 0).is_empty());
    }
}
