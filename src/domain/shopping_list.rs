pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.pdf";

/// One ingredient of a shopping cart, summed over every cart recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Renders the downloadable list. Every item line except the last ends in
/// `", "` before the newline.
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut list = SHOPPING_LIST_HEADER.to_string();
    for (position, item) in items.iter().enumerate() {
        list.push_str(&format!(
            "\n{} - {} {}",
            item.name, item.amount, item.measurement_unit
        ));
        if position + 1 < items.len() {
            list.push_str(", ");
        }
    }
    list
}
