mod auth_token;
mod new_ingredient;
mod new_recipe;
mod new_tag;
mod new_user;
mod password;
mod recipe_image;
mod role;
mod shopping_list;
mod user_email;
mod user_name;
mod user_update;
mod validation;

pub use auth_token::*;
pub use new_ingredient::*;
pub use new_recipe::*;
pub use new_tag::*;
pub use new_user::*;
pub use password::*;
pub use recipe_image::*;
pub use role::*;
pub use shopping_list::*;
pub use user_email::*;
pub use user_name::*;
pub use user_update::*;
pub use validation::*;
