use super::crud::Resource;
use crate::AppState;
use crate::database::DynRepository;
use crate::database::models::{Category, CategoryInput};

pub struct Categories;

impl Resource for Categories {
    type Entity = Category;
    type Detail = Category;
    type Input = CategoryInput;

    const NAME: &'static str = "Category";
    const PATH: &'static str = "/categories";

    fn repository(state: &AppState) -> DynRepository<Category, Category, CategoryInput> {
        state.categories.clone()
    }
}
