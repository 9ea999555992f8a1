//! Aggregated shopping list built from a user's cart.
//!
//! The list sums ingredient amounts across every recipe in the cart, grouped
//! by ingredient name and measurement unit. Groups are ordered by name using
//! plain byte-wise comparison; groups sharing a name keep the order in which
//! they first appeared in the input. The rendered report has no timestamp, so
//! repeated downloads of an unchanged cart are byte-identical.

use std::collections::HashMap;

/// First line of every rendered report.
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";
/// Suggested filename for the downloadable report.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// One ledger contribution: an ingredient amount from a recipe in the cart.
///
/// Storage adapters may pre-aggregate, in which case `amount` is already a
/// partial sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

impl CartIngredientLine {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: u64) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// A summed group in the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

/// Aggregated, ordered shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Group `lines` by (name, unit), sum each group and order by name.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{CartIngredientLine, ShoppingList};
    ///
    /// let list = ShoppingList::aggregate([
    ///     CartIngredientLine::new("Sugar", "g", 50),
    ///     CartIngredientLine::new("Flour", "g", 200),
    ///     CartIngredientLine::new("Flour", "g", 100),
    /// ]);
    /// assert_eq!(list.render(), "Shopping list:\n- Flour 300 g\n- Sugar 50 g\n");
    /// ```
    #[must_use]
    pub fn aggregate<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = CartIngredientLine>,
    {
        let mut items: Vec<ShoppingListItem> = Vec::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for line in lines {
            let key = (line.name, line.measurement_unit);
            if let Some(item) = positions.get(&key).and_then(|&index| items.get_mut(index)) {
                item.total = item.total.saturating_add(line.amount);
                continue;
            }
            positions.insert(key.clone(), items.len());
            let (name, measurement_unit) = key;
            items.push(ShoppingListItem {
                name,
                measurement_unit,
                total: line.amount,
            });
        }

        // `sort_by` is stable, so equal names keep first-appearance order.
        items.sort_by(|left, right| left.name.cmp(&right.name));
        Self { items }
    }

    /// Ordered groups.
    #[must_use]
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// True when the cart contributed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the plain-text report: the header, then `- <name> <sum> <unit>`
    /// per group, every line newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        self.items.iter().fold(
            format!("{SHOPPING_LIST_HEADER}\n"),
            |mut report, item| {
                report.push_str(&format!(
                    "- {} {} {}\n",
                    item.name, item.total, item.measurement_unit
                ));
                report
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(name: &str, unit: &str, amount: u64) -> CartIngredientLine {
        CartIngredientLine::new(name, unit, amount)
    }

    #[test]
    fn empty_cart_renders_header_only() {
        let list = ShoppingList::aggregate(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render(), "Shopping list:\n");
    }

    #[test]
    fn sums_same_ingredient_and_unit() {
        let list = ShoppingList::aggregate([
            line("Flour", "g", 200),
            line("Sugar", "g", 50),
            line("Flour", "g", 100),
        ]);
        assert_eq!(list.render(), "Shopping list:\n- Flour 300 g\n- Sugar 50 g\n");
    }

    #[test]
    fn each_group_renders_one_terminated_line() {
        let report = ShoppingList::aggregate([
            line("Milk", "ml", 200),
            line("Milk", "cup", 1),
            line("Eggs", "pcs", 2),
        ])
        .render();
        assert_eq!(
            report,
            "Shopping list:\n- Eggs 2 pcs\n- Milk 200 ml\n- Milk 1 cup\n"
        );
        assert_eq!(report.lines().count(), 4);
    }

    #[test]
    fn different_units_stay_separate_in_first_seen_order() {
        let list = ShoppingList::aggregate([
            line("Milk", "ml", 200),
            line("Milk", "cup", 1),
            line("Milk", "ml", 300),
        ]);
        let items: Vec<_> = list
            .items()
            .iter()
            .map(|item| (item.measurement_unit.as_str(), item.total))
            .collect();
        assert_eq!(items, vec![("ml", 500), ("cup", 1)]);
    }

    #[rstest]
    #[case(vec![line("b", "g", 1), line("a", "g", 1), line("c", "g", 1)])]
    #[case(vec![line("c", "g", 1), line("b", "g", 1), line("a", "g", 1)])]
    #[case(vec![line("a", "g", 1), line("c", "g", 1), line("b", "g", 1)])]
    fn orders_by_name_regardless_of_input_order(#[case] lines: Vec<CartIngredientLine>) {
        let names: Vec<_> = ShoppingList::aggregate(lines)
            .items()
            .iter()
            .map(|item| item.name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn ordering_is_case_sensitive_ordinal() {
        let list = ShoppingList::aggregate([line("apple", "pcs", 1), line("Zucchini", "pcs", 2)]);
        let names: Vec<_> = list.items().iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Zucchini", "apple"]);
    }

    #[test]
    fn rendering_is_idempotent() {
        let lines = vec![line("Eggs", "pcs", 3), line("Butter", "g", 20)];
        let first = ShoppingList::aggregate(lines.clone()).render();
        let second = ShoppingList::aggregate(lines).render();
        assert_eq!(first, second);
    }

    #[test]
    fn sums_saturate_instead_of_wrapping() {
        let list = ShoppingList::aggregate([line("Salt", "g", u64::MAX), line("Salt", "g", 5)]);
        assert_eq!(list.items().first().map(|item| item.total), Some(u64::MAX));
    }
}
