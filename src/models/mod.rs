mod product;

pub use product::{CreateProduct, Product, UpdateProduct};
