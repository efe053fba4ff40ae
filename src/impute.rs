//! Menu-driven imputation in both directions.

use log::debug;
use rand::{Rng, seq::SliceRandom};

use crate::{
    record::CafeRecord,
    reference::{InverseMenu, Menu},
};

/// Fills a missing unit price from the menu when the item is known.
///
/// Items the menu does not list keep their missing price.
pub fn impute_unit_price(records: Vec<CafeRecord>, menu: &Menu) -> Vec<CafeRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if record.unit_price.is_none()
                && let Some(price) = record.item.as_deref().and_then(|item| menu.price_of(item))
            {
                debug!("{}: unit price {price} from menu", record.txn_id);
                record.unit_price = Some(price);
            }
            record
        })
        .collect()
}

/// Fills a missing item by drawing uniformly among the menu items sold at the
/// record's unit price. Pass a seeded generator for reproducible output.
pub fn impute_item<R: Rng + ?Sized>(
    records: Vec<CafeRecord>,
    inverse: &InverseMenu,
    rng: &mut R,
) -> Vec<CafeRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if record.item.is_none()
                && let Some(candidates) = record
                    .unit_price
                    .as_ref()
                    .and_then(|price| inverse.candidates(price))
                && let Some(choice) = candidates.choose(&mut *rng)
            {
                debug!(
                    "{}: item '{choice}' drawn from {} candidate(s)",
                    record.txn_id,
                    candidates.len()
                );
                record.item = Some(choice.clone());
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use rust_decimal::Decimal;

    fn record(item: Option<&str>, price: Option<Decimal>) -> CafeRecord {
        CafeRecord {
            txn_id: "TXN".to_string(),
            item: item.map(str::to_string),
            unit_price: price,
            ..CafeRecord::default()
        }
    }

    #[test]
    fn known_items_get_menu_prices() {
        let menu = Menu::cafe_default();
        let out = impute_unit_price(vec![record(Some("Salad"), None)], &menu);
        assert_eq!(out[0].unit_price, Some(Decimal::new(5, 0)));
    }

    #[test]
    fn unknown_items_stay_unpriced() {
        let menu = Menu::cafe_default();
        let out = impute_unit_price(vec![record(Some("Mystery"), None)], &menu);
        assert_eq!(out[0].unit_price, None);
    }

    #[test]
    fn present_prices_are_not_replaced() {
        let menu = Menu::cafe_default();
        let out = impute_unit_price(vec![record(Some("Tea"), Some(Decimal::new(9, 0)))], &menu);
        assert_eq!(out[0].unit_price, Some(Decimal::new(9, 0)));
    }

    #[test]
    fn unique_price_maps_to_its_only_item() {
        let inverse = Menu::cafe_default().inverse();
        let mut rng = StdRng::seed_from_u64(0);
        let out = impute_item(
            vec![record(None, Some(Decimal::new(15, 1)))],
            &inverse,
            &mut rng,
        );
        assert_eq!(out[0].item.as_deref(), Some("Tea"));
    }

    #[test]
    fn shared_price_draws_only_from_candidates() {
        let inverse = Menu::cafe_default().inverse();
        let mut rng = StdRng::seed_from_u64(11);
        let rows = (0..64)
            .map(|_| record(None, Some(Decimal::new(30, 1))))
            .collect();
        let out = impute_item(rows, &inverse, &mut rng);
        assert!(
            out.iter()
                .all(|r| matches!(r.item.as_deref(), Some("Cake") | Some("Juice")))
        );
        assert!(out.iter().any(|r| r.item.as_deref() == Some("Cake")));
        assert!(out.iter().any(|r| r.item.as_deref() == Some("Juice")));
    }

    #[test]
    fn same_seed_gives_same_choices() {
        let inverse = Menu::cafe_default().inverse();
        let rows = || {
            (0..16)
                .map(|_| record(None, Some(Decimal::new(4, 0))))
                .collect::<Vec<_>>()
        };
        let first = impute_item(rows(), &inverse, &mut StdRng::seed_from_u64(42));
        let second = impute_item(rows(), &inverse, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn unlisted_price_leaves_item_missing() {
        let inverse = Menu::cafe_default().inverse();
        let mut rng = StdRng::seed_from_u64(3);
        let out = impute_item(
            vec![record(None, Some(Decimal::new(7, 0)))],
            &inverse,
            &mut rng,
        );
        assert_eq!(out[0].item, None);
    }
}
