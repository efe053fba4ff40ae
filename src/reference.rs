//! Static price reference ("menu") and its inverse.
//!
//! Both tables are plain immutable values handed to the imputers; nothing in
//! the pipeline reads them from global state.

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maps an item label to its canonical unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    prices: BTreeMap<String, Decimal>,
}

impl Menu {
    pub fn new(entries: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        Self {
            prices: entries.into_iter().collect(),
        }
    }

    /// The eight-item cafe menu.
    pub fn cafe_default() -> Self {
        const ENTRIES: [(&str, i64, u32); 8] = [
            ("Cookie", 10, 1),
            ("Tea", 15, 1),
            ("Coffee", 20, 1),
            ("Cake", 30, 1),
            ("Juice", 30, 1),
            ("Sandwich", 40, 1),
            ("Smoothie", 40, 1),
            ("Salad", 50, 1),
        ];
        Self::new(
            ENTRIES
                .iter()
                .map(|(label, mantissa, scale)| (label.to_string(), Decimal::new(*mantissa, *scale))),
        )
    }

    /// Loads a menu from a JSON object of `"label": price` pairs.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening menu file {path:?}"))?;
        let reader = BufReader::new(file);
        let menu = serde_json::from_reader(reader).context("Parsing menu JSON")?;
        Ok(menu)
    }

    pub fn price_of(&self, label: &str) -> Option<Decimal> {
        self.prices.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn inverse(&self) -> InverseMenu {
        let mut labels: BTreeMap<Decimal, Vec<String>> = BTreeMap::new();
        for (label, price) in &self.prices {
            labels
                .entry(price.normalize())
                .or_default()
                .push(label.clone());
        }
        InverseMenu { labels }
    }
}

/// Maps a unit price to every label sold at that price.
///
/// Keys are normalized so `3.0` and `3.00` address the same candidates.
/// Candidate lists are in label order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseMenu {
    labels: BTreeMap<Decimal, Vec<String>>,
}

impl InverseMenu {
    pub fn candidates(&self, price: &Decimal) -> Option<&[String]> {
        self.labels
            .get(&price.normalize())
            .map(Vec::as_slice)
            .filter(|labels| !labels.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_menu_has_eight_items() {
        let menu = Menu::cafe_default();
        assert_eq!(menu.len(), 8);
        assert_eq!(menu.price_of("Coffee"), Some(Decimal::new(2, 0)));
        assert_eq!(menu.price_of("Mystery"), None);
    }

    #[test]
    fn inverse_groups_shared_prices() {
        let inverse = Menu::cafe_default().inverse();
        assert_eq!(
            inverse.candidates(&Decimal::new(300, 2)),
            Some(&["Cake".to_string(), "Juice".to_string()][..])
        );
        assert_eq!(
            inverse.candidates(&Decimal::new(15, 1)),
            Some(&["Tea".to_string()][..])
        );
        assert_eq!(inverse.candidates(&Decimal::new(7, 0)), None);
    }

    #[test]
    fn menu_round_trips_through_json_object() {
        let menu: Menu = serde_json::from_str(r#"{"Bagel": "2.5", "Muffin": 3}"#).unwrap();
        assert_eq!(menu.price_of("Bagel"), Some(Decimal::new(25, 1)));
        assert_eq!(menu.price_of("Muffin"), Some(Decimal::new(3, 0)));
    }
}
