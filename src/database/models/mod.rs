pub mod article;
pub mod order;
pub mod product;
pub mod user;

pub use article::Article;
pub use order::{Order, OrderLine, OrderOwner};
pub use product::{Product, ProductInput};
pub use user::{NewUser, Role, User, UserProfile};
