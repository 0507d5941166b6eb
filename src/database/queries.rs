mod ingredient_queries;
mod list_queries;
mod recipe_queries;
mod shopping_cart_queries;
mod subscription_queries;
mod tag_queries;
mod token_queries;
mod user_queries;

pub use ingredient_queries::*;
pub use list_queries::*;
pub use recipe_queries::*;
pub use shopping_cart_queries::*;
pub use subscription_queries::*;
pub use tag_queries::*;
pub use token_queries::*;
pub use user_queries::*;

/// Escapes `LIKE` wildcards so user input only matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
